//! Rules that evaluate calculus operations.
//!
//! These rules fail silently (return `None`) when an operation cannot be evaluated; the operation
//! is then left in the tree as an opaque subexpression.

use crate::symbolic::{
    derivative::nth_derivative,
    expr::Expr,
    integral::{antiderivative, definite},
    limit::limit,
    simplify::step::Step,
    step_collector::StepCollector,
};
use log::trace;

/// `d/dx f = f'`
pub fn evaluate_derivative(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Derivative(body, var, order) = expr else {
        return None;
    };

    let result = nth_derivative(body, var, *order)
        .map_err(|err| trace!("leaving `{}` unevaluated: {}", expr, err))
        .ok()?;
    step_collector.push(Step::EvaluateDerivative);
    Some(result)
}

/// `integral(f, x) = F`
/// `integral(f, x, a, b) = F(b) - F(a)`
pub fn evaluate_integral(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Integral(body, var, bounds) = expr else {
        return None;
    };

    let result = match bounds {
        Some(bounds) => definite(body, var, &bounds.0, &bounds.1),
        None => antiderivative(body, var),
    };
    let result = result
        .map_err(|err| trace!("leaving `{}` unevaluated: {}", expr, err))
        .ok()?;
    step_collector.push(Step::EvaluateIntegral);
    Some(result)
}

/// `lim_{x -> p} f = f(p)`, for `f` continuous at `p`
pub fn evaluate_limit(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let Expr::Limit(body, var, point) = expr else {
        return None;
    };

    let result = limit(body, var, point)
        .map_err(|err| trace!("leaving `{}` unevaluated: {}", expr, err))
        .ok()?;
    step_collector.push(Step::EvaluateLimit);
    Some(result)
}

/// Applies all calculus rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    evaluate_derivative(expr, step_collector)
        .or_else(|| evaluate_integral(expr, step_collector))
        .or_else(|| evaluate_limit(expr, step_collector))
}
