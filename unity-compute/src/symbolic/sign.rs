//! Conservative sign analysis.
//!
//! The functions here answer "is this expression provably positive / non-negative for every value
//! of its variables where it is defined?". A `false` answer means "not provable with these simple
//! rules", not "negative".

use super::expr::{Expr, Func, Primary};

/// Returns true if the expression is provably strictly positive wherever it is defined.
pub fn is_positive(expr: &Expr) -> bool {
    match expr {
        Expr::Primary(Primary::Number(n)) => n.cmp0().is_gt(),
        Expr::Primary(Primary::Symbol(_)) => false,
        Expr::Primary(Primary::Call(func, args)) => match (func, args.as_slice()) {
            (Func::Exp, _) => true,
            (Func::Sqrt, [arg]) => is_positive(arg),
            (Func::Abs, [arg]) => is_positive(arg),
            _ => false,
        },
        Expr::Add(terms) => {
            terms.iter().all(is_nonnegative) && terms.iter().any(is_positive)
        },
        Expr::Mul(factors) => factors.iter().all(is_positive),
        Expr::Exp(base, _) => is_positive(base),
        Expr::Derivative(..) | Expr::Integral(..) | Expr::Limit(..) => false,
    }
}

/// Returns true if the expression is provably non-negative wherever it is defined.
pub fn is_nonnegative(expr: &Expr) -> bool {
    if is_positive(expr) {
        return true;
    }

    match expr {
        Expr::Primary(Primary::Number(n)) => n.cmp0().is_ge(),
        Expr::Primary(Primary::Call(Func::Sqrt | Func::Abs, _)) => true,
        Expr::Add(terms) => terms.iter().all(is_nonnegative),
        Expr::Mul(factors) => factors.iter().all(is_nonnegative),
        Expr::Exp(base, exp) => match exp.as_number() {
            // `b^(2k)`, and `b^(p/q)` with even `q` (only defined for `b >= 0`)
            Some(e) if e.is_integer() => e.numer().is_even() || is_nonnegative(base),
            Some(e) => e.denom().is_even() || is_nonnegative(base),
            None => is_nonnegative(base),
        },
        _ => false,
    }
}

/// Returns true if the expression is provably non-zero wherever it is defined: either a non-zero
/// number, or provably strictly positive.
pub fn is_nonzero(expr: &Expr) -> bool {
    match expr.as_number() {
        Some(n) => n.cmp0().is_ne(),
        None => is_positive(expr),
    }
}

/// Returns true if the expression is provably defined and continuous for every real value of its
/// variables.
///
/// Calculus operations are never considered continuous here, since their values are only known
/// once evaluated.
pub fn is_continuous(expr: &Expr) -> bool {
    expr.post_order_iter().all(|node| match node {
        Expr::Primary(Primary::Call(Func::Log, args)) => args.iter().all(is_positive),
        Expr::Primary(Primary::Call(Func::Sqrt, args)) => args.iter().all(is_nonnegative),
        Expr::Exp(base, exp) => match exp.as_number() {
            Some(e) if e.is_integer() && e.cmp0().is_ge() => true,
            Some(e) if e.is_integer() => is_nonzero(base),
            // `b^(p/q)`, `p > 0`, is continuous for odd `q` (real odd roots), or where `b >= 0`
            Some(e) if e.cmp0().is_gt() => e.denom().is_odd() || is_nonnegative(base),
            _ => is_positive(base),
        },
        Expr::Derivative(..) | Expr::Integral(..) | Expr::Limit(..) => false,
        _ => true,
    })
}
