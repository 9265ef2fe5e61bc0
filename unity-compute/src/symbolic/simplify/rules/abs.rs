//! Simplification rules for the absolute value.

use crate::symbolic::{
    expr::{Expr, Func},
    sign::is_nonnegative,
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};
use rug::Rational;

/// `|-3| = 3`
pub fn abs_number(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Abs, |arg| {
        arg.as_number().map(|n| Expr::from(Rational::from(n.abs_ref())))
    })?;

    step_collector.push(Step::AbsNumber);
    Some(opt)
}

/// `|a| = a`, for provably non-negative `a`
pub fn abs_nonnegative(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Abs, |arg| {
        is_nonnegative(arg).then(|| arg.clone())
    })?;

    step_collector.push(Step::AbsNonNegative);
    Some(opt)
}

/// Applies all absolute value rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    abs_number(expr, step_collector)
        .or_else(|| abs_nonnegative(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn absolute_values() {
        assert_eq!(abs_number(&Expr::number(-3).abs(), &mut ()), Some(Expr::number(3)));

        let guarded = Expr::symbol("x").powi(2) + Expr::number(1);
        assert_eq!(abs_nonnegative(&guarded.clone().abs(), &mut ()), Some(guarded));

        assert_eq!(abs_nonnegative(&Expr::symbol("x").abs(), &mut ()), None);
    }
}
