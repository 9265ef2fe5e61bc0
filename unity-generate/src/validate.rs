//! Verification that a composite expression equals exactly 1.

use log::debug;
use unity_compute::symbolic::{
    expr::Expr,
    simplify::{simplify_bounded, step::Step, Limits},
};

/// Why a composite was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Rewriting reached a fixed point that is not `1`. Contains the normal form.
    NotOne(Expr),

    /// Rewriting was cut off by its caps before reaching `1` or a fixed point.
    IterationCap,
}

/// The outcome of validating a composite expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The composite reduces to exactly `1`.
    Accept {
        /// Number of rewriting passes it took.
        passes: usize,

        /// The rewriting steps taken, in order.
        steps: Vec<Step>,
    },

    /// The composite could not be shown to equal `1`.
    Reject(RejectReason),
}

impl Verdict {
    /// Returns true if the verdict is [`Verdict::Accept`].
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept { .. })
    }
}

/// Decides whether an expression equals exactly `1`.
pub trait Validator {
    /// Validates the expression.
    fn validate(&self, expr: &Expr) -> Verdict;
}

impl<V: Validator + ?Sized> Validator for &V {
    fn validate(&self, expr: &Expr) -> Verdict {
        (**self).validate(expr)
    }
}

/// Validates expressions by rewriting them to a normal form with the bounded simplifier, then
/// comparing the normal form with the constant `1`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SymbolicValidator {
    /// Caps on the rewriting.
    pub limits: Limits,
}

impl SymbolicValidator {
    /// Creates a validator with the given caps.
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }
}

impl Validator for SymbolicValidator {
    fn validate(&self, expr: &Expr) -> Verdict {
        let mut steps = Vec::new();
        let result = simplify_bounded(expr, self.limits, &mut steps);

        let verdict = if result.expr.is_one() {
            Verdict::Accept { passes: result.passes, steps }
        } else if result.converged {
            Verdict::Reject(RejectReason::NotOne(result.expr))
        } else {
            Verdict::Reject(RejectReason::IterationCap)
        };
        debug!("validated `{}`: accepted = {}", expr, verdict.is_accept());
        verdict
    }
}
