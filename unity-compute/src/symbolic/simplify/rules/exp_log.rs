//! Simplification rules for the exponential function and the natural logarithm.

use crate::symbolic::{
    expr::{Expr, Func},
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};

/// `exp(0) = 1`
pub fn exp_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Exp, |arg| arg.is_zero().then(Expr::one))?;

    step_collector.push(Step::ExpZero);
    Some(opt)
}

/// `log(1) = 0`
pub fn log_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Log, |arg| arg.is_one().then(Expr::zero))?;

    step_collector.push(Step::LogOne);
    Some(opt)
}

/// `exp(log(a)) = a`
pub fn exp_log(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Exp, |arg| arg.as_call(Func::Log).cloned())?;

    step_collector.push(Step::ExpLog);
    Some(opt)
}

/// `log(exp(a)) = a`
pub fn log_exp(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, Func::Log, |arg| arg.as_call(Func::Exp).cloned())?;

    step_collector.push(Step::LogExp);
    Some(opt)
}

/// Applies all exponential and logarithm rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    exp_zero(expr, step_collector)
        .or_else(|| log_one(expr, step_collector))
        .or_else(|| exp_log(expr, step_collector))
        .or_else(|| log_exp(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn inverses() {
        let u = Expr::symbol("x").powi(2) + Expr::number(1);
        assert_eq!(exp_log(&u.clone().log().exp(), &mut ()), Some(u.clone()));
        assert_eq!(log_exp(&u.clone().exp().log(), &mut ()), Some(u));
        assert_eq!(exp_zero(&Expr::zero().exp(), &mut ()), Some(Expr::one()));
        assert_eq!(log_one(&Expr::one().log(), &mut ()), Some(Expr::zero()));
    }
}
