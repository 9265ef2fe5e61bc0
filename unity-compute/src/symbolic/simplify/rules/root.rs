//! Simplification rules for radicals.

use crate::symbolic::{
    expr::{Expr, Func},
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};

/// `sqrt(a) = a^(1/2)`
pub fn sqrt_to_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Sqrt, |arg| {
        Some(arg.clone().pow(Expr::number((1, 2))))
    })?;

    step_collector.push(Step::SqrtToPower);
    Some(opt)
}

/// Applies all root rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    sqrt_to_power(expr, step_collector)
}
