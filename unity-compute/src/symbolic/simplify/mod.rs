//! Module to simplify expressions.
//!
//! This module provides the [`simplify`] function, which attempts to reduce the complexity of an
//! expression. It does this by repeatedly applying rewriting rules to the expression in multiple
//! passes, until no more rules apply.
//!
//! Every pass ends by putting the expression in [canonical form](Expr::canonical). The process
//! has reached a fixed point once a pass leaves the canonical form unchanged. Since the rule set
//! is not guaranteed to be terminating on arbitrary input, the number of passes and the total
//! number of rule applications are capped by [`Limits`]; use [`simplify_bounded`] to find out
//! whether the cap was hit.

pub mod rules;
pub mod step;

use log::{debug, trace};
use super::expr::Expr;
use super::step_collector::StepCollector;
use step::Step;

/// Caps on the amount of work the simplifier may do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum number of passes over the whole expression.
    pub passes: usize,

    /// Maximum number of rule applications, summed over all passes.
    pub rewrites: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            passes: 16,
            rewrites: 4096,
        }
    }
}

/// The result of a bounded simplification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Simplified {
    /// The simplified expression, in canonical form.
    pub expr: Expr,

    /// Number of passes performed.
    pub passes: usize,

    /// Number of rule applications performed.
    pub rewrites: usize,

    /// Whether a fixed point was reached before any of the [`Limits`] was exhausted.
    pub converged: bool,
}

/// Base implementation of the simplification algorithm.
///
/// Rules are tried on the node itself first, then on its children, repeating until nothing
/// changes or the rewrite budget runs out.
fn inner_simplify(
    expr: &Expr,
    budget: &mut usize,
    step_collector: &mut dyn StepCollector<Step>,
) -> (Expr, bool) {
    let mut expr = expr.clone();
    let mut changed_at_least_once = false;

    while *budget > 0 {
        let mut changed_in_this_pass = false;

        // try to simplify this expression using all rules
        if let Some(new_expr) = rules::all(&expr, step_collector) {
            trace!("rewrote `{}` to `{}`", expr, new_expr);
            *budget -= 1;
            expr = new_expr;
            changed_in_this_pass = true;
            changed_at_least_once = true;
        }

        // then begin recursing into the expression's children
        for child in expr.children_mut() {
            let (new_child, changed) = inner_simplify(child, budget, step_collector);
            *child = new_child;
            // use |= instead of = to not reset these variables to false if already true
            changed_in_this_pass |= changed;
            changed_at_least_once |= changed;
        }

        if !changed_in_this_pass {
            break;
        }
    }

    (expr, changed_at_least_once)
}

/// Simplify the given expression, stopping when either of the given [`Limits`] is exhausted.
pub fn simplify_bounded(
    expr: &Expr,
    limits: Limits,
    step_collector: &mut dyn StepCollector<Step>,
) -> Simplified {
    let mut current = expr.canonical();
    let mut budget = limits.rewrites;
    let mut passes = 0;
    let mut converged = false;

    while passes < limits.passes && budget > 0 {
        passes += 1;
        let (next, changed) = inner_simplify(&current, &mut budget, step_collector);
        let next = next.canonical();

        if !changed || next == current {
            converged = true;
            current = next;
            break;
        }
        current = next;
    }

    let rewrites = limits.rewrites - budget;
    debug!(
        "simplified in {} pass(es), {} rewrite(s), converged: {}",
        passes,
        rewrites,
        converged,
    );
    Simplified {
        expr: current,
        passes,
        rewrites,
        converged,
    }
}

/// Simplify the given expression with the default [`Limits`].
pub fn simplify(expr: &Expr) -> Expr {
    simplify_bounded(expr, Limits::default(), &mut ()).expr
}

/// Simplify the given expression with the default [`Limits`]. The steps taken by the simplifier
/// will also be collected and returned. This is useful for debugging, and also for displaying the
/// steps taken to the user.
pub fn simplify_with_steps(expr: &Expr) -> (Expr, Vec<Step>) {
    let mut steps = Vec::new();
    let expr = simplify_bounded(expr, Limits::default(), &mut steps).expr;
    (expr, steps)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn f() -> Expr {
        x().powi(2) + Expr::number(1)
    }

    #[test]
    fn multiplicative_inverse() {
        let expr = f() * f().recip();
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn multiplicative_inverse_steps() {
        let expr = f() * f().recip();
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, Expr::one());
        assert!(steps.contains(&Step::CombineLikeFactors));
    }

    #[test]
    fn derivative_of_square() {
        let expr = x().powi(2).derivative("x", 1);
        assert_eq!(simplify(&expr), Expr::Mul(vec![Expr::number(2), x()]));
    }

    #[test]
    fn pythagorean_of_derivative() {
        let inner = x().powi(2).derivative("x", 1);
        let expr = inner.clone().sin().powi(2) + inner.cos().powi(2);
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn pythagorean_of_linear() {
        let inner = Expr::number(2) * x();
        let expr = inner.clone().sin().powi(2) + inner.cos().powi(2);
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn exponential_cancellation() {
        let expr = (f() - f()).exp();
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn root_power_symmetry() {
        let root = f().abs().powi(3).sqrt();
        let expr = root.clone() * root.recip();
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn radicals_of_related_numbers() {
        // 2^(-1/3) * 4^(1/6) = 2^(-1/3) * 2^(1/3)
        let expr = Expr::number(2).pow(Expr::number((-1, 3)))
            * Expr::number(4).pow(Expr::number((1, 6)));
        let (simplified, steps) = simplify_with_steps(&expr);
        assert_eq!(simplified, Expr::one());
        assert!(steps.contains(&Step::FactorNumericBase));

        // 12^(1/2) / (2 * 3^(1/2))
        let expr = Expr::number(12).pow(Expr::number((1, 2)))
            * (Expr::number(2) * Expr::number(3).pow(Expr::number((1, 2)))).recip();
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn limit_of_identity() {
        let expr = (f() * f().recip()).limit("x", Expr::number(2));
        assert_eq!(simplify(&expr), Expr::one());
    }

    #[test]
    fn already_simple() {
        let result = simplify_bounded(&x(), Limits::default(), &mut ());
        assert_eq!(result, Simplified {
            expr: x(),
            passes: 1,
            rewrites: 0,
            converged: true,
        });
    }

    #[test]
    fn exhausted_budget() {
        let expr = f() * f().recip();
        let limits = Limits { passes: 16, rewrites: 0 };
        let result = simplify_bounded(&expr, limits, &mut ());
        assert!(!result.converged);
        assert_eq!(result.rewrites, 0);
        assert_eq!(result.expr, expr.canonical());
    }
}
