//! Simplification rules for trigonometric functions.

use crate::symbolic::{
    expr::{Expr, Func, Primary},
    simplify::{rules::{do_add, do_call}, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `sin(0) = 0`
pub fn sin_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Sin, |arg| arg.is_zero().then(Expr::zero))?;

    step_collector.push(Step::SinZero);
    Some(opt)
}

/// `cos(0) = 1`
pub fn cos_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Cos, |arg| arg.is_zero().then(Expr::one))?;

    step_collector.push(Step::CosZero);
    Some(opt)
}

/// If the term is `c*sin(a)^2` or `c*cos(a)^2`, returns `(c, function, canonical form of a)`.
fn trig_square(term: &Expr) -> Option<(Rational, Func, Expr)> {
    let (coefficient, power) = match term {
        Expr::Mul(factors) => match factors.as_slice() {
            [coefficient, power] => (coefficient.as_number()?.clone(), power),
            _ => return None,
        },
        power => (Rational::from(1), power),
    };

    let Expr::Exp(base, exp) = power else {
        return None;
    };
    if exp.as_small_integer() != Some(2) {
        return None;
    }

    match base.as_ref() {
        Expr::Primary(Primary::Call(func @ (Func::Sin | Func::Cos), args)) => match args.as_slice() {
            [arg] => Some((coefficient, *func, arg.canonical())),
            _ => None,
        },
        _ => None,
    }
}

/// `c*sin(a)^2 + c*cos(a)^2 = c`
pub fn pythagorean(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let squares = terms.iter().map(trig_square).collect::<Vec<_>>();
        for (i, sin_square) in squares.iter().enumerate() {
            let Some((coefficient, Func::Sin, arg)) = sin_square else {
                continue;
            };

            let cos_index = squares.iter().position(|square| matches!(
                square,
                Some((c, Func::Cos, a)) if c == coefficient && a == arg
            ));
            if let Some(j) = cos_index {
                let new_terms = terms.iter()
                    .enumerate()
                    .filter(|(k, _)| *k != j)
                    .map(|(k, term)| if k == i {
                        Expr::from(coefficient.clone())
                    } else {
                        term.clone()
                    })
                    .collect();
                return Some(Expr::Add(new_terms).downgrade());
            }
        }

        None
    })?;

    step_collector.push(Step::Pythagorean);
    Some(opt)
}

/// Applies all trigonometric rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    sin_zero(expr, step_collector)
        .or_else(|| cos_zero(expr, step_collector))
        .or_else(|| pythagorean(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn pythagorean_identity() {
        let a = Expr::number(2) * x();
        let expr = a.clone().sin().powi(2) + a.clone().cos().powi(2);
        assert_eq!(pythagorean(&expr, &mut ()), Some(Expr::one()));
    }

    #[test]
    fn pythagorean_with_coefficient_and_other_terms() {
        let expr = Expr::Add(vec![
            x(),
            Expr::Mul(vec![Expr::number(3), x().cos().powi(2)]),
            Expr::Mul(vec![Expr::number(3), x().sin().powi(2)]),
        ]);
        assert_eq!(
            pythagorean(&expr, &mut ()),
            Some(Expr::Add(vec![x(), Expr::number(3)])),
        );
    }

    #[test]
    fn mismatched_arguments() {
        let expr = x().sin().powi(2) + (x() + Expr::number(1)).cos().powi(2);
        assert_eq!(pythagorean(&expr, &mut ()), None);
    }
}
