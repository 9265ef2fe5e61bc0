//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Algebraic expressions in this module are represented as a tree of [`Expr`] nodes. Sums and
//! products are n-ary: `x + (y + z)` is best represented as a single [`Expr::Add`] node with
//! _three_ children, `x`, `y`, and `z`. The arithmetic operators on [`Expr`] flatten as they go,
//! and [`Expr::canonical`] flattens, folds numbers and sorts operands, so that two trees that
//! only differ in operand order compare equal after canonicalization.
//!
//! ```
//! use unity_compute::symbolic::Expr;
//!
//! let x = Expr::symbol("x");
//! let a = x.clone() + (Expr::symbol("y") + Expr::number(2));
//! let b = (Expr::number(2) + Expr::symbol("y")) + x;
//! assert!(a.structurally_eq(&b));
//! assert_eq!(a.fingerprint(), b.fingerprint());
//! ```
//!
//! Derivatives, integrals and limits are nodes of the tree as well; they are evaluated by the
//! functions in [`derivative`], [`integral`] and [`limit`] respectively.
//!
//! # Simplification
//!
//! Simplification is done by applying a set of rewriting rules to the expression in multiple
//! passes. Each rule is simply a function that accepts an expression and returns [`Option<Expr>`];
//! if the rule is applicable to the expression, the rule is applied and the result is returned.
//!
//! The current set of rules is defined in [`simplify::rules`]. It is intentionally small: it
//! covers arithmetic folding, exponent laws, absolute values, `exp` / `log` cancellation, the
//! Pythagorean identity and the evaluation of calculus nodes.
//!
//! ```
//! use unity_compute::symbolic::{simplify, Expr};
//!
//! let f = Expr::symbol("x").powi(2) + Expr::number(1);
//! let expr = f.clone().sin().powi(2) + f.cos().powi(2);
//! assert_eq!(simplify(&expr), Expr::one());
//! ```
//!
//! For more information, see the [`mod@simplify`] module.

pub mod canonical;
pub mod derivative;
pub mod expr;
pub mod fmt;
pub mod integral;
pub mod limit;
pub mod sign;
pub mod simplify;
pub mod step_collector;

pub use canonical::Fingerprint;
pub use expr::{Expr, Func, Primary};
pub use simplify::{simplify, simplify_bounded, simplify_with_steps, Limits, Simplified};
pub use step_collector::{StepCollector, Tally};
