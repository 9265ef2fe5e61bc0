//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::symbolic::{
    expr::Expr,
    sign::{is_nonnegative, is_positive},
    simplify::{rules::do_multiply, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        factors.iter().any(Expr::is_zero).then(Expr::zero)
    })?;

    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| !factor.is_one())
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(Expr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// `a*(b*c) = a*b*c`
pub fn flatten_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, Expr::Mul(_))) {
            return None;
        }

        let new_factors = factors.iter()
            .flat_map(|factor| match factor {
                Expr::Mul(inner) => inner.clone(),
                factor => vec![factor.clone()],
            })
            .collect();
        Some(Expr::Mul(new_factors))
    })?;

    step_collector.push(Step::FlattenProduct);
    Some(opt)
}

/// `2*a*3 = 6*a`
pub fn fold_numbers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let (numbers, others): (Vec<&Expr>, Vec<&Expr>) = factors.iter()
            .partition(|factor| factor.is_number());
        if numbers.len() < 2 {
            return None;
        }

        let product = numbers.into_iter()
            .filter_map(Expr::as_number)
            .fold(Rational::from(1), |acc, n| acc * n);
        let new_factors = std::iter::once(Expr::from(product))
            .chain(others.into_iter().cloned())
            .collect();
        Some(Expr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::FoldNumbers);
    Some(opt)
}

/// Utility function to extract the base and exponent of an expression. If the expression is not
/// [`Expr::Exp`], the exponent is `1`.
///
/// - `a^b` -> `(a, b)`
/// - `a` -> `(a, 1)`
fn split_power(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Exp(lhs, rhs) => (lhs.as_ref().clone(), rhs.as_ref().clone()),
        expr => (expr.clone(), Expr::one()),
    }
}

/// Returns true if `base^lhs * base^rhs = base^(lhs + rhs)` holds wherever the left-hand side is
/// defined.
fn can_add_exponents(base: &Expr, lhs: &Expr, rhs: &Expr) -> bool {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(lhs), Some(rhs)) => (lhs.is_integer() && rhs.is_integer()) || is_nonnegative(base),
        _ => is_positive(base),
    }
}

fn add_exponents(lhs: Expr, rhs: Expr) -> Expr {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Expr::from(Rational::from(a + b)),
        _ => lhs + rhs,
    }
}

/// Combines like factors.
///
/// `a*a = a^2`
/// `a^2*a^3 = a^5`
/// `a*a^(-1) = 1`
/// etc.
///
/// Exponents are only added when that is valid for every value of the base: integer exponents
/// always, other exponents only over non-negative (or, for symbolic exponents, positive) bases.
pub fn combine_like_factors(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        // (base, exponent, canonical form of the base); numbers are never combined
        let mut groups: Vec<(Expr, Expr, Option<Expr>)> = Vec::with_capacity(factors.len());
        for factor in factors {
            if factor.is_number() {
                groups.push((factor.clone(), Expr::one(), None));
                continue;
            }

            let (base, exp) = split_power(factor);
            let key = base.canonical();
            let group = groups.iter_mut().find(|(group_base, group_exp, group_key)| {
                group_key.as_ref() == Some(&key) && can_add_exponents(group_base, group_exp, &exp)
            });
            match group {
                Some((_, group_exp, _)) => {
                    let lhs = std::mem::replace(group_exp, Expr::zero());
                    *group_exp = add_exponents(lhs, exp);
                },
                None => groups.push((base, exp, Some(key))),
            }
        }

        if groups.len() == factors.len() {
            return None;
        }

        let new_factors = groups.into_iter()
            .filter(|(_, exp, _)| !exp.is_zero())
            .map(|(base, exp, _)| if exp.is_one() { base } else { base.pow(exp) })
            .collect();
        Some(Expr::Mul(new_factors).downgrade())
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    multiply_zero(expr, step_collector)
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| flatten_product(expr, step_collector))
        .or_else(|| fold_numbers(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn inverse_cancels() {
        let f = x().powi(2) + Expr::number(1);
        let expr = Expr::Mul(vec![f.clone(), f.recip()]);
        assert_eq!(combine_like_factors(&expr, &mut ()), Some(Expr::one()));
    }

    #[test]
    fn integer_exponents_add() {
        let expr = Expr::Mul(vec![x(), Expr::number(3), x().powi(2)]);
        assert_eq!(
            combine_like_factors(&expr, &mut ()),
            Some(Expr::Mul(vec![x().powi(3), Expr::number(3)])),
        );
    }

    #[test]
    fn fractional_exponents_need_nonnegative_base() {
        let half = || Expr::number((1, 2));
        let expr = Expr::Mul(vec![x().pow(half()), x().pow(half())]);
        assert_eq!(combine_like_factors(&expr, &mut ()), None);

        let base = x().abs();
        let expr = Expr::Mul(vec![base.clone().pow(half()), base.clone().pow(half())]);
        assert_eq!(combine_like_factors(&expr, &mut ()), Some(base));
    }

    #[test]
    fn zero_and_one() {
        let expr = Expr::Mul(vec![x(), Expr::zero(), x().sin()]);
        assert_eq!(multiply_zero(&expr, &mut ()), Some(Expr::zero()));

        let expr = Expr::Mul(vec![Expr::one(), x()]);
        assert_eq!(multiply_one(&expr, &mut ()), Some(x()));
    }
}
