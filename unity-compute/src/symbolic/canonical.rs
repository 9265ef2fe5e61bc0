//! The canonical form of an expression, used for structural comparison and fingerprinting.
//!
//! Canonicalization never changes the mathematical meaning of an expression. It:
//!
//! - canonicalizes every child first;
//! - flattens nested sums into sums and nested products into products;
//! - folds all numeric terms of a sum (and numeric factors of a product) into one exact number,
//! dropping an additive `0` or multiplicative `1` when other operands remain;
//! - folds a power of two numbers when the result is an exact rational number;
//! - sorts the operands of sums and products by the total order derived for [`Expr`];
//! - collapses sums and products left with a single operand.
//!
//! The result depends only on the multiset of operands, so building the same tree with operands
//! in a different order yields the same canonical form. Canonicalizing a canonical form returns it
//! unchanged.

use crate::primitive::exact_rational_pow;
use rug::Rational;
use std::{collections::hash_map::DefaultHasher, hash::{Hash, Hasher}};
use super::expr::{Expr, Primary};

/// A 64-bit hash of the canonical form of an expression.
///
/// Structurally equal expressions always share a fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fingerprint(pub u64);

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl Expr {
    /// Returns the canonical form of this expression.
    ///
    /// See the [module-level documentation](self) for what canonicalization does.
    pub fn canonical(&self) -> Expr {
        match self {
            Self::Primary(Primary::Call(func, args)) => {
                Self::Primary(Primary::Call(*func, args.iter().map(Expr::canonical).collect()))
            },
            Self::Primary(_) => self.clone(),
            Self::Add(terms) => canonical_sum(terms),
            Self::Mul(factors) => canonical_product(factors),
            Self::Exp(base, exp) => {
                let base = base.canonical();
                let exp = exp.canonical();
                if let (Some(b), Some(e)) = (base.as_number(), exp.as_number()) {
                    if let Some(value) = exact_rational_pow(b, e) {
                        return Expr::from(value);
                    }
                }
                base.pow(exp)
            },
            Self::Derivative(body, var, order) => {
                Self::Derivative(Box::new(body.canonical()), var.clone(), *order)
            },
            Self::Integral(body, var, bounds) => Self::Integral(
                Box::new(body.canonical()),
                var.clone(),
                bounds.as_ref().map(|bounds| Box::new((bounds.0.canonical(), bounds.1.canonical()))),
            ),
            Self::Limit(body, var, point) => Self::Limit(
                Box::new(body.canonical()),
                var.clone(),
                Box::new(point.canonical()),
            ),
        }
    }

    /// Returns true if the two expressions have identical canonical forms.
    ///
    /// This is stricter than mathematical equivalence: `(x + 1)^2` and `x^2 + 2x + 1` are not
    /// structurally equal.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        self.canonical() == other.canonical()
    }

    /// Returns the fingerprint of this expression, a hash of its canonical form.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut hasher = DefaultHasher::new();
        self.canonical().hash(&mut hasher);
        Fingerprint(hasher.finish())
    }
}

fn canonical_sum(terms: &[Expr]) -> Expr {
    let mut constant = Rational::new();
    let mut operands = Vec::with_capacity(terms.len());
    let mut push = |term: Expr| match term {
        Expr::Primary(Primary::Number(n)) => constant += n,
        term => operands.push(term),
    };

    for term in terms {
        match term.canonical() {
            Expr::Add(inner) => inner.into_iter().for_each(&mut push),
            term => push(term),
        }
    }

    if constant.cmp0().is_ne() || operands.is_empty() {
        operands.push(Expr::from(constant));
    }
    operands.sort();
    Expr::Add(operands).downgrade()
}

fn canonical_product(factors: &[Expr]) -> Expr {
    let mut constant = Rational::from(1);
    let mut operands = Vec::with_capacity(factors.len());
    let mut push = |factor: Expr| match factor {
        Expr::Primary(Primary::Number(n)) => constant *= n,
        factor => operands.push(factor),
    };

    for factor in factors {
        match factor.canonical() {
            Expr::Mul(inner) => inner.into_iter().for_each(&mut push),
            factor => push(factor),
        }
    }

    if constant != 1 || operands.is_empty() {
        operands.push(Expr::from(constant));
    }
    operands.sort();
    Expr::Mul(operands).downgrade()
}
