//! Simplification rules for power expressions.

use crate::primitive::{exact_rational_pow, prime_factors};
use crate::symbolic::{
    expr::Expr,
    sign::is_nonnegative,
    simplify::{rules::do_power, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `a^0 = 1`
pub fn power_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |_, rhs| rhs.is_zero().then(Expr::one))?;

    step_collector.push(Step::PowerZero);
    Some(opt)
}

/// `0^a = 0`, for positive numeric `a`
pub fn power_zero_left(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let positive = rhs.as_number().map_or(false, |n| n.cmp0().is_gt());
        (lhs.is_zero() && positive).then(Expr::zero)
    })?;

    step_collector.push(Step::PowerZeroLeft);
    Some(opt)
}

/// `1^a = 1`
pub fn power_one_left(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, _| lhs.is_one().then(Expr::one))?;

    step_collector.push(Step::PowerOneLeft);
    Some(opt)
}

/// `a^1 = a`
pub fn power_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| rhs.is_one().then(|| lhs.clone()))?;

    step_collector.push(Step::PowerOne);
    Some(opt)
}

/// `4^(1/2) = 2`
/// `(2/3)^(-2) = 9/4`
///
/// Only applies when the result is an exact rational number.
pub fn evaluate_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let value = exact_rational_pow(lhs.as_number()?, rhs.as_number()?)?;
        Some(Expr::from(value))
    })?;

    step_collector.push(Step::EvaluatePower);
    Some(opt)
}

/// `12^(1/2) = 2^1*3^(1/2)`
/// `(1/4)^(1/6) = 2^(-1/3)`
///
/// Splits a positive rational base raised to a non-integer numeric power into powers of primes,
/// so that radicals of related numbers share bases and can be combined.
pub fn factor_numeric_base(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let (base, exp) = (lhs.as_number()?, rhs.as_number()?);
        if base.cmp0().is_le() || exp.is_integer() {
            return None;
        }

        let numer = prime_factors(base.numer())?;
        let denom = prime_factors(base.denom())?;
        let factors = numer.into_iter()
            .map(|(p, k)| (p, Rational::from(k)))
            .chain(denom.into_iter().map(|(p, k)| (p, -Rational::from(k))))
            .collect::<Vec<_>>();

        match factors.as_slice() {
            [] => return None,
            [(_, k)] if *k == 1 => return None,
            _ => {},
        }

        let powers = factors.into_iter()
            .map(|(p, k)| Expr::from(Rational::from(p)).pow(Expr::from(k * exp)))
            .collect();
        Some(Expr::Mul(powers).downgrade())
    })?;

    step_collector.push(Step::FactorNumericBase);
    Some(opt)
}

/// Multiplies two exponents, folding them if both are numbers.
fn multiply_exponents(lhs: &Expr, rhs: &Expr) -> Expr {
    match (lhs.as_number(), rhs.as_number()) {
        (Some(a), Some(b)) => Expr::from(Rational::from(a * b)),
        _ => Expr::Mul(vec![lhs.clone(), rhs.clone()]),
    }
}

/// `(a^b)^c = a^(b*c)`, for integer `c`, or numeric `b` and `c` with non-negative `a`
pub fn power_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let Expr::Exp(base, inner) = lhs else {
            return None;
        };

        let outer_integer = rhs.as_number().map_or(false, |n| n.is_integer());
        let both_numeric = inner.is_number() && rhs.is_number();
        if outer_integer || (both_numeric && is_nonnegative(base)) {
            Some(base.as_ref().clone().pow(multiply_exponents(inner, rhs)))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerPower);
    Some(opt)
}

/// `(a^(2n))^c = |a|^(2n*c)`, for numeric `c`
///
/// This is the real-valued reading of even roots: `sqrt(a^2) = |a|`.
pub fn power_of_even_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let Expr::Exp(base, inner) = lhs else {
            return None;
        };

        let even = inner.as_number().map_or(false, |n| n.is_integer() && n.numer().is_even());
        if even && rhs.is_number() {
            Some(base.as_ref().clone().abs().pow(multiply_exponents(inner, rhs)))
        } else {
            None
        }
    })?;

    step_collector.push(Step::PowerOfEvenPower);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    power_zero(expr, step_collector)
        .or_else(|| power_zero_left(expr, step_collector))
        .or_else(|| power_one_left(expr, step_collector))
        .or_else(|| power_one(expr, step_collector))
        .or_else(|| evaluate_power(expr, step_collector))
        .or_else(|| factor_numeric_base(expr, step_collector))
        .or_else(|| power_power(expr, step_collector))
        .or_else(|| power_of_even_power(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn power_of_power() {
        // (x^(1/2))^2 = x^1
        let expr = x().pow(Expr::number((1, 2))).powi(2);
        assert_eq!(power_power(&expr, &mut ()), Some(x().powi(1)));

        // (x^2)^(1/2) is |x|, not x
        let expr = x().powi(2).pow(Expr::number((1, 2)));
        assert_eq!(power_power(&expr, &mut ()), None);
        assert_eq!(power_of_even_power(&expr, &mut ()), Some(x().abs().powi(1)));

        // (|x|^4)^(1/2) = |x|^2
        let expr = x().abs().powi(4).pow(Expr::number((1, 2)));
        assert_eq!(power_power(&expr, &mut ()), Some(x().abs().powi(2)));
    }

    #[test]
    fn numeric_powers() {
        let expr = Expr::number(8).pow(Expr::number((2, 3)));
        assert_eq!(evaluate_power(&expr, &mut ()), Some(Expr::number(4)));

        let expr = Expr::number(0).powi(-1);
        assert_eq!(evaluate_power(&expr, &mut ()), None);
        assert_eq!(power_zero_left(&expr, &mut ()), None);
    }

    #[test]
    fn numeric_bases_are_factored() {
        let expr = Expr::number(12).pow(Expr::number((1, 2)));
        assert_eq!(
            factor_numeric_base(&expr, &mut ()),
            Some(Expr::Mul(vec![
                Expr::number(2).pow(Expr::number(1)),
                Expr::number(3).pow(Expr::number((1, 2))),
            ])),
        );

        let expr = Expr::number((1, 4)).pow(Expr::number((1, 6)));
        assert_eq!(
            factor_numeric_base(&expr, &mut ()),
            Some(Expr::number(2).pow(Expr::number((-1, 3)))),
        );

        // already a prime
        let expr = Expr::number(2).pow(Expr::number((1, 3)));
        assert_eq!(factor_numeric_base(&expr, &mut ()), None);

        // the real cube root of a negative number is left alone
        let expr = Expr::number(-8).pow(Expr::number((1, 3)));
        assert_eq!(factor_numeric_base(&expr, &mut ()), None);
    }
}
