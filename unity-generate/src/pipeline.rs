//! The generation pipeline: generate, compose, validate, check for uniqueness, retry.

use crate::{
    config::{FallbackPolicy, PipelineConfig},
    error::PipelineExhausted,
    fallback::known_good,
    generator::Generator,
    guard::{Novelty, UniquenessGuard},
    identity::{Composite, IdentityTransformer, Scheme},
    level::Level,
    validate::{RejectReason, SymbolicValidator, Validator, Verdict},
};
use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use unity_compute::symbolic::{expr::Expr, simplify::step::Step, Fingerprint};

/// Where a [`Generated`] expression came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Origin {
    /// Freshly generated, validated and recorded as served.
    Fresh,

    /// The known-good expression for the level, served after the retry budget ran out.
    Fallback,
}

/// An expression equal to 1, ready to be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// The requested level.
    pub level: Level,

    /// The composite expression.
    pub expr: Expr,

    /// The expression in plain text.
    pub text: String,

    /// The expression in LaTeX.
    pub latex: String,

    /// Fingerprint of the expression.
    pub fingerprint: Fingerprint,

    /// Number of attempts made, including the successful one.
    pub attempts: usize,

    /// Whether the expression was freshly generated.
    pub origin: Origin,

    /// The identities the expression was built with, innermost first.
    pub schemes: Vec<Scheme>,

    /// The rewriting steps that reduced the expression to `1`. Empty for fallbacks.
    pub steps: Vec<Step>,

    /// Why each earlier attempt was rejected, in order.
    pub rejections: Vec<Rejection>,
}

impl Generated {
    fn new(
        level: Level,
        expr: Expr,
        attempts: usize,
        origin: Origin,
        schemes: Vec<Scheme>,
        steps: Vec<Step>,
        rejections: Vec<Rejection>,
    ) -> Self {
        Self {
            level,
            text: expr.to_string(),
            latex: expr.latex(),
            fingerprint: expr.fingerprint(),
            expr,
            attempts,
            origin,
            schemes,
            steps,
            rejections,
        }
    }
}

/// Why an attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The composite did not validate.
    Validation(RejectReason),

    /// The composite was served before.
    Collision(Fingerprint),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(RejectReason::NotOne(normal)) => {
                write!(f, "reduced to `{}` instead of 1", normal)
            },
            Self::Validation(RejectReason::IterationCap) => write!(f, "rewriting was cut off"),
            Self::Collision(fingerprint) => write!(f, "already served (fingerprint {})", fingerprint),
        }
    }
}

/// The states of a request.
#[derive(Debug)]
enum State {
    Generating,
    Validating(Composite),
    Checking(Composite, Vec<Step>),
    Rejected(Rejection),
    Fallback,
}

/// Generates expressions equal to 1 that were not served before.
///
/// Each call to [`Pipeline::generate`] runs a bounded retry loop; every attempt draws a new base
/// expression, composes it with an identity, validates the composite and checks it against the
/// [`UniquenessGuard`]. The guard is only touched by accepted attempts, so it can be shared by
/// several pipelines, for example one per thread.
#[derive(Debug)]
pub struct Pipeline<V = SymbolicValidator> {
    config: PipelineConfig,
    validator: V,
    transformer: IdentityTransformer,
    guard: Arc<UniquenessGuard>,
    rng: StdRng,
}

impl Pipeline {
    /// Creates a pipeline validating with the [`SymbolicValidator`].
    pub fn new(config: PipelineConfig, guard: Arc<UniquenessGuard>) -> Self {
        let validator = SymbolicValidator::new(config.limits());
        Self::with_validator(config, guard, validator)
    }
}

impl<V: Validator> Pipeline<V> {
    /// Creates a pipeline validating with the given validator.
    pub fn with_validator(config: PipelineConfig, guard: Arc<UniquenessGuard>, validator: V) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            validator,
            transformer: IdentityTransformer::new(config.nesting),
            guard,
            rng,
        }
    }

    /// Returns the configuration of the pipeline.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the guard served expressions are recorded in.
    pub fn guard(&self) -> &Arc<UniquenessGuard> {
        &self.guard
    }

    /// Replaces the guard served expressions are recorded in.
    pub fn set_guard(&mut self, guard: Arc<UniquenessGuard>) {
        self.guard = guard;
    }

    /// Generates an expression equal to 1 at the given level.
    ///
    /// Returns [`PipelineExhausted`] if every attempt was rejected and the fallback policy is
    /// [`FallbackPolicy::FailLoudly`].
    pub fn generate(&mut self, level: Level) -> Result<Generated, PipelineExhausted> {
        let mut remaining = self.config.retry_budget;
        let mut attempts = 0;
        let mut rejections = Vec::new();
        let mut state = State::Generating;

        loop {
            state = match state {
                State::Generating if remaining == 0 => State::Fallback,
                State::Generating => {
                    remaining -= 1;
                    attempts += 1;
                    debug!("attempt {}: generating {} expression", attempts, level);

                    let base = Generator::new(level, &mut self.rng).generate();
                    State::Validating(self.transformer.transform(base, level, &mut self.rng))
                },
                State::Validating(composite) => match self.validator.validate(&composite.expr) {
                    Verdict::Accept { steps, .. } => State::Checking(composite, steps),
                    Verdict::Reject(reason) => State::Rejected(Rejection::Validation(reason)),
                },
                State::Checking(composite, steps) => {
                    let fingerprint = composite.expr.fingerprint();
                    match self.guard.check_and_record(fingerprint) {
                        Novelty::Fresh => {
                            info!("accepted `{}` after {} attempt(s)", composite.expr, attempts);
                            return Ok(Generated::new(
                                level,
                                composite.expr,
                                attempts,
                                Origin::Fresh,
                                composite.schemes,
                                steps,
                                rejections,
                            ));
                        },
                        Novelty::Duplicate => State::Rejected(Rejection::Collision(fingerprint)),
                    }
                },
                State::Rejected(rejection) => {
                    debug!("attempt {} rejected: {}", attempts, rejection);
                    rejections.push(rejection);
                    State::Generating
                },
                State::Fallback => return self.fallback(level, attempts, rejections),
            };
        }
    }

    fn fallback(
        &self,
        level: Level,
        attempts: usize,
        rejections: Vec<Rejection>,
    ) -> Result<Generated, PipelineExhausted> {
        warn!("retry budget exhausted after {} attempt(s) at level {}", attempts, level);
        match self.config.fallback {
            FallbackPolicy::KnownGood => {
                let (expr, scheme) = known_good(level);
                info!("serving known-good {} expression `{}`", level, expr);
                Ok(Generated::new(
                    level,
                    expr,
                    attempts,
                    Origin::Fallback,
                    vec![scheme],
                    Vec::new(),
                    rejections,
                ))
            },
            FallbackPolicy::FailLoudly => Err(PipelineExhausted { level, attempts }),
        }
    }
}
