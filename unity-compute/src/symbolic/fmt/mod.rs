//! Rendering of [`Expr`]s as plain text (the [`Display`](std::fmt::Display) implementation) and
//! as LaTeX (see [`Latex`]).

mod latex;

pub use latex::Latex;

use super::expr::{Expr, Func, Primary};
use std::fmt::{self, Display, Formatter};

/// Binding strength of an expression when printed, used to decide where parentheses go.
///
/// Negative numbers bind like a sum (`x^(-1)`), and fractions like a product (`(1/2)^x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    Sum,
    Product,
    Power,
    Atom,
}

impl Expr {
    pub(crate) fn precedence(&self) -> Precedence {
        match self {
            Self::Primary(Primary::Number(n)) if n.cmp0().is_lt() => Precedence::Sum,
            Self::Primary(Primary::Number(n)) if !n.is_integer() => Precedence::Product,
            Self::Add(_) => Precedence::Sum,
            Self::Mul(_) => Precedence::Product,
            Self::Exp(_, _) => Precedence::Power,
            _ => Precedence::Atom,
        }
    }

    /// Returns a value that renders this expression as LaTeX when displayed.
    pub fn as_latex(&self) -> Latex<'_> {
        Latex(self)
    }

    /// Renders this expression as LaTeX.
    pub fn latex(&self) -> String {
        self.as_latex().to_string()
    }
}

/// Writes `expr`, wrapped in parentheses if `paren` is true.
fn write_grouped(f: &mut Formatter<'_>, expr: &Expr, paren: bool) -> fmt::Result {
    if paren {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

impl Display for Primary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Symbol(sym) => write!(f, "{}", sym),
            Self::Call(Func::Abs, args) => {
                write!(f, "|")?;
                write_args(f, args)?;
                write!(f, "|")
            },
            Self::Call(func, args) => {
                write!(f, "{}(", func)?;
                write_args(f, args)?;
                write!(f, ")")
            },
        }
    }
}

fn write_args(f: &mut Formatter<'_>, args: &[Expr]) -> fmt::Result {
    let mut iter = args.iter();
    if let Some(arg) = iter.next() {
        write!(f, "{}", arg)?;
        for arg in iter {
            write!(f, ", {}", arg)?;
        }
    }
    Ok(())
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary(primary) => write!(f, "{}", primary),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                // a leading sum needs no parentheses: `(a + b) + c` reads as `a + b + c`
                if let Some(term) = iter.next() {
                    write!(f, "{}", term)?;
                }
                for term in iter {
                    match term.negated_form() {
                        Some(negated) => {
                            write!(f, " - ")?;
                            write_grouped(f, &negated, negated.precedence() <= Precedence::Sum)?;
                        },
                        None => {
                            write!(f, " + ")?;
                            write_grouped(f, term, term.precedence() <= Precedence::Sum)?;
                        },
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                let mut iter = factors.iter();
                if factors.len() > 1 && factors[0] == Expr::number(-1) {
                    write!(f, "-")?;
                    iter.next();
                    if let Some(factor) = iter.next() {
                        write_grouped(f, factor, factor.precedence() < Precedence::Product)?;
                    }
                } else if let Some(factor) = iter.next() {
                    write_grouped(f, factor, matches!(factor, Self::Add(_)))?;
                }
                for factor in iter {
                    write!(f, " * ")?;
                    write_grouped(f, factor, factor.precedence() < Precedence::Product)?;
                }
                Ok(())
            },
            Self::Exp(base, exp) => {
                write_grouped(f, base, base.precedence() <= Precedence::Power)?;
                write!(f, "^")?;
                write_grouped(f, exp, exp.precedence() < Precedence::Atom)
            },
            Self::Derivative(body, var, 1) => write!(f, "d/d{}({})", var, body),
            Self::Derivative(body, var, order) => {
                write!(f, "d^{}/d{}^{}({})", order, var, order, body)
            },
            Self::Integral(body, var, None) => write!(f, "integral({}, {})", body, var),
            Self::Integral(body, var, Some(bounds)) => {
                write!(f, "integral({}, {}, {}, {})", body, var, bounds.0, bounds.1)
            },
            Self::Limit(body, var, point) => write!(f, "limit({}, {} -> {})", body, var, point),
        }
    }
}
