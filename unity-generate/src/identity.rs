//! Composition of a base expression with an identity, producing an expression equal to 1.

use crate::{generator::{LIMIT_POINTS, VAR}, level::Level};
use log::trace;
use rand::{distributions::{Distribution, WeightedIndex}, Rng};
use std::fmt;
use unity_compute::symbolic::expr::Expr;

/// Probability of nesting a second scheme around the composite, at [`Level::High`].
const NESTING_PROBABILITY: f64 = 0.35;

/// Probability of wrapping the composite in a limit, at [`Level::High`].
const LIMIT_PROBABILITY: f64 = 0.3;

/// An identity used to build an expression equal to 1 out of a non-vanishing `f`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scheme {
    /// `f * f^(-1)`
    MultiplicativeInverse,

    /// `exp(f - f)`
    ExponentialCancellation,

    /// `sin(f)^2 + cos(f)^2`
    Pythagorean,

    /// `sqrt(|f|^n) * sqrt(|f|^n)^(-1)`
    RootPower,

    /// `lim_{x -> p} f`, for an `f` that is already identically 1.
    LimitWrap,
}

impl Scheme {
    /// The schemes available at a level, with their weights.
    fn weights(level: Level) -> &'static [(Scheme, u32)] {
        match level {
            Level::Elementary => &[(Scheme::MultiplicativeInverse, 1)],
            Level::Middle => &[(Scheme::MultiplicativeInverse, 3), (Scheme::RootPower, 2)],
            Level::High => &[
                (Scheme::MultiplicativeInverse, 2),
                (Scheme::ExponentialCancellation, 2),
                (Scheme::Pythagorean, 2),
                (Scheme::RootPower, 2),
            ],
        }
    }

    /// Picks a scheme for the level at random.
    fn pick(level: Level, rng: &mut impl Rng) -> Scheme {
        let table = Self::weights(level);
        match WeightedIndex::new(table.iter().map(|(_, weight)| *weight)) {
            Ok(dist) => table[dist.sample(rng)].0,
            Err(_) => Scheme::MultiplicativeInverse,
        }
    }

    /// Applies the scheme to `f`.
    fn apply(self, f: Expr, rng: &mut impl Rng) -> Expr {
        match self {
            Scheme::MultiplicativeInverse => multiplicative_inverse(f),
            Scheme::ExponentialCancellation => exponential_cancellation(f),
            Scheme::Pythagorean => pythagorean(f),
            Scheme::RootPower => root_power(f, rng.gen_range(2..=6)),
            Scheme::LimitWrap => {
                limit_wrap(f, LIMIT_POINTS[rng.gen_range(0..LIMIT_POINTS.len())])
            },
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::MultiplicativeInverse => write!(f, "multiplicative inverse"),
            Scheme::ExponentialCancellation => write!(f, "exponential cancellation"),
            Scheme::Pythagorean => write!(f, "pythagorean identity"),
            Scheme::RootPower => write!(f, "root-power symmetry"),
            Scheme::LimitWrap => write!(f, "limit"),
        }
    }
}

/// `f * f^(-1)`
pub fn multiplicative_inverse(f: Expr) -> Expr {
    Expr::Mul(vec![f.clone(), f.recip()])
}

/// `exp(f - f)`
pub fn exponential_cancellation(f: Expr) -> Expr {
    Expr::Add(vec![f.clone(), Expr::Mul(vec![Expr::number(-1), f])]).exp()
}

/// `sin(f)^2 + cos(f)^2`
pub fn pythagorean(f: Expr) -> Expr {
    Expr::Add(vec![f.clone().sin().powi(2), f.cos().powi(2)])
}

/// `sqrt(|f|^n) * sqrt(|f|^n)^(-1)`
pub fn root_power(f: Expr, n: i64) -> Expr {
    let root = f.abs().powi(n).sqrt();
    Expr::Mul(vec![root.clone(), root.recip()])
}

/// `lim_{x -> point} f`
pub fn limit_wrap(f: Expr, point: i64) -> Expr {
    f.limit(VAR, Expr::number(point))
}

/// An expression equal to 1, along with the schemes used to build it, innermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    /// The composite expression.
    pub expr: Expr,

    /// The schemes applied to the base expression, innermost first.
    pub schemes: Vec<Scheme>,
}

/// Builds composite expressions out of base expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityTransformer {
    /// Whether [`Level::High`] composites may be decorated with a second scheme or a limit.
    pub nesting: bool,
}

impl Default for IdentityTransformer {
    fn default() -> Self {
        Self { nesting: true }
    }
}

impl IdentityTransformer {
    /// Creates a transformer.
    pub fn new(nesting: bool) -> Self {
        Self { nesting }
    }

    /// Composes the non-vanishing base expression `base` with an identity suited to the level.
    pub fn transform(&self, base: Expr, level: Level, rng: &mut impl Rng) -> Composite {
        let scheme = Scheme::pick(level, rng);
        let mut composite = Composite {
            expr: scheme.apply(base, rng),
            schemes: vec![scheme],
        };

        if self.nesting && level == Level::High {
            let budget = level.composite_depth();
            if rng.gen_bool(NESTING_PROBABILITY) {
                let scheme = Scheme::pick(level, rng);
                decorate(&mut composite, scheme, budget, rng);
            }
            if rng.gen_bool(LIMIT_PROBABILITY) {
                decorate(&mut composite, Scheme::LimitWrap, budget, rng);
            }
        }

        trace!("composed with {:?}: `{}`", composite.schemes, composite.expr);
        composite
    }
}

/// Applies another scheme to the composite, unless the result would exceed the depth budget.
fn decorate(composite: &mut Composite, scheme: Scheme, budget: usize, rng: &mut impl Rng) {
    let decorated = scheme.apply(composite.expr.clone(), rng);
    if decorated.depth() <= budget {
        composite.expr = decorated;
        composite.schemes.push(scheme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use unity_compute::symbolic::simplify;

    fn f() -> Expr {
        Expr::Add(vec![Expr::symbol(VAR).sin().powi(2), Expr::number(2)])
    }

    #[test]
    fn schemes_equal_one() {
        let composites = [
            multiplicative_inverse(f()),
            exponential_cancellation(f()),
            pythagorean(f()),
            root_power(f(), 4),
            limit_wrap(multiplicative_inverse(f()), -1),
        ];
        for composite in composites {
            assert_eq!(simplify(&composite), Expr::one(), "`{}`", composite);
            for x in [-1.5, 0.0, 0.7, 3.0] {
                let value = composite.eval_at(VAR, x).unwrap();
                assert_float_absolute_eq!(value, 1.0, 1e-9);
            }
        }
    }

    #[test]
    fn elementary_uses_inverse_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let transformer = IdentityTransformer::default();
        for _ in 0..20 {
            let composite = transformer.transform(f(), Level::Elementary, &mut rng);
            assert_eq!(composite.schemes, vec![Scheme::MultiplicativeInverse]);
        }
    }

    #[test]
    fn no_decorations_without_nesting() {
        let mut rng = StdRng::seed_from_u64(11);
        let transformer = IdentityTransformer::new(false);
        for _ in 0..50 {
            let composite = transformer.transform(f(), Level::High, &mut rng);
            assert_eq!(composite.schemes.len(), 1);
        }
    }

    #[test]
    fn decorations_respect_depth_budget() {
        let mut rng = StdRng::seed_from_u64(5);
        let transformer = IdentityTransformer::default();
        for _ in 0..100 {
            let composite = transformer.transform(f(), Level::High, &mut rng);
            assert!(composite.expr.depth() <= Level::High.composite_depth());
        }
    }
}
