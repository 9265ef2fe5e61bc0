//! Implementation of the rewriting rules.
//!
//! Each rule in this module is a function that takes the expression to simplify as an argument,
//! and returns `Some(expr)` with the rewritten expression if the rule applies, or `None` if the
//! rule does not apply. A rule never returns an expression identical to its input.
//!
//! Every rule preserves the value of the expression wherever the input is defined.

pub mod abs;
pub mod add;
pub mod calculus;
pub mod distribute;
pub mod exp_log;
pub mod multiply;
pub mod power;
pub mod root;
pub mod trigonometry;

use crate::symbolic::expr::{Expr, Func, Primary};
use crate::symbolic::step_collector::StepCollector;
use super::step::Step;

/// If the expression is a call to the given function with a single argument, calls the given
/// transformation function with the argument.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    expr: &Expr,
    func: Func,
    f: impl Copy + Fn(&Expr) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Primary(Primary::Call(target, args)) = expr {
        if let ([arg], true) = (args.as_slice(), *target == func) {
            return f(arg);
        }
    }

    None
}

/// If the expression is an add expression, calls the given transformation function with the terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &Expr, f: impl Copy + Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a multiplication expression, calls the given transformation function with
/// the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &Expr, f: impl Copy + Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a power expression, calls the given transformation function with the left
/// and right-hand-side of the power.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(
    expr: &Expr,
    f: impl Copy + Fn(&Expr, &Expr) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Exp(lhs, rhs) = expr {
        f(lhs, rhs)
    } else {
        None
    }
}

/// Applies all rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add::all(expr, step_collector)
        .or_else(|| multiply::all(expr, step_collector))
        .or_else(|| trigonometry::all(expr, step_collector))
        .or_else(|| power::all(expr, step_collector))
        .or_else(|| root::all(expr, step_collector))
        .or_else(|| abs::all(expr, step_collector))
        .or_else(|| exp_log::all(expr, step_collector))
        .or_else(|| distribute::all(expr, step_collector))
        .or_else(|| calculus::all(expr, step_collector))
}
