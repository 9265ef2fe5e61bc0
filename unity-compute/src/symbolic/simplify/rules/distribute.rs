//! Simplification rules related to the distributive property.

use crate::symbolic::{
    expr::Expr,
    sign::is_nonnegative,
    simplify::{rules::{do_multiply, do_power}, step::Step},
    step_collector::StepCollector,
};

/// `c*(a+b) = c*a + c*b`, for a numeric coefficient `c`
///
/// Only a lone numeric coefficient is distributed, so that `f - f` cancels when `f` is a sum.
pub fn distribute_coefficient(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let (coefficient, terms) = match factors {
            [Expr::Add(terms), coefficient] | [coefficient, Expr::Add(terms)] => {
                (coefficient.as_number()?, terms)
            },
            _ => return None,
        };

        let new_terms = terms.iter()
            .map(|term| Expr::from(coefficient.clone()) * term.clone())
            .collect();
        Some(Expr::Add(new_terms))
    })?;

    step_collector.push(Step::DistributeCoefficient);
    Some(opt)
}

/// `(a*b)^c = a^c * b^c`, for integer `c`, or numeric `c` with non-negative factors
pub fn distribute_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |lhs, rhs| {
        let Expr::Mul(factors) = lhs else {
            return None;
        };

        let exponent = rhs.as_number()?;
        if !exponent.is_integer() && !factors.iter().all(is_nonnegative) {
            return None;
        }

        let new_factors = factors.iter()
            .map(|factor| factor.clone().pow(rhs.clone()))
            .collect();
        Some(Expr::Mul(new_factors))
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// Applies all distribution rules.
///
/// Distribution may not reduce the size of the expression, since it can introduce additional
/// operations. However, it may be necessary for other rules to apply.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    distribute_coefficient(expr, step_collector)
        .or_else(|| distribute_power(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn coefficient() {
        let expr = Expr::Mul(vec![Expr::number(-1), x().powi(2) + Expr::number(1)]);
        assert_eq!(
            distribute_coefficient(&expr, &mut ()),
            Some(Expr::Add(vec![
                Expr::Mul(vec![Expr::number(-1), x().powi(2)]),
                Expr::number(-1),
            ])),
        );

        let expr = Expr::Mul(vec![x(), x() + Expr::number(1)]);
        assert_eq!(distribute_coefficient(&expr, &mut ()), None);
    }

    #[test]
    fn power() {
        let expr = Expr::Mul(vec![Expr::number(2), x()]).powi(-1);
        assert_eq!(
            distribute_power(&expr, &mut ()),
            Some(Expr::Mul(vec![Expr::number(2).powi(-1), x().powi(-1)])),
        );

        let expr = Expr::Mul(vec![Expr::number(-1), x()]).pow(Expr::number((1, 2)));
        assert_eq!(distribute_power(&expr, &mut ()), None);
    }
}
