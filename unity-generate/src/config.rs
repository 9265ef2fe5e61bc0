//! Configuration of the generation pipeline.

use crate::guard::GuardScope;
use std::num::NonZeroUsize;
use unity_compute::symbolic::Limits;

/// What to do once the retry budget is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FallbackPolicy {
    /// Serve a fixed, known-good expression for the level.
    #[default]
    KnownGood,

    /// Return [`PipelineExhausted`](crate::error::PipelineExhausted).
    FailLoudly,
}

/// Options for the generation pipeline. Use [`PipelineConfigBuilder`] to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Number of generation attempts per request before falling back.
    ///
    /// The default value is `20`.
    pub retry_budget: usize,

    /// What to do once the retry budget is exhausted.
    pub fallback: FallbackPolicy,

    /// Maximum number of rewriting passes when validating an expression.
    ///
    /// The default value is `16`.
    pub rewrite_passes: usize,

    /// Maximum number of rule applications when validating an expression.
    ///
    /// The default value is `4096`.
    pub rewrite_budget: usize,

    /// Whether [`Level::High`](crate::level::Level::High) composites may be decorated with nested
    /// identities and limits.
    ///
    /// The default value is `true`.
    pub nesting: bool,

    /// Seed of the random number generator. If [`None`], the generator is seeded from the
    /// operating system.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let limits = Limits::default();
        Self {
            retry_budget: 20,
            fallback: FallbackPolicy::default(),
            rewrite_passes: limits.passes,
            rewrite_budget: limits.rewrites,
            nesting: true,
            seed: None,
        }
    }
}

impl PipelineConfig {
    /// The caps to validate expressions with.
    pub fn limits(&self) -> Limits {
        Limits {
            passes: self.rewrite_passes,
            rewrites: self.rewrite_budget,
        }
    }
}

/// Helper struct to build a [`PipelineConfig`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfigBuilder(PipelineConfig);

impl PipelineConfigBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of attempts per request. See [`PipelineConfig::retry_budget`].
    pub fn retry_budget(mut self, retry_budget: usize) -> Self {
        self.0.retry_budget = retry_budget;
        self
    }

    /// Sets the fallback policy. See [`FallbackPolicy`] for more information.
    pub fn fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.0.fallback = fallback;
        self
    }

    /// Sets the maximum number of rewriting passes.
    pub fn rewrite_passes(mut self, rewrite_passes: usize) -> Self {
        self.0.rewrite_passes = rewrite_passes;
        self
    }

    /// Sets the maximum number of rule applications.
    pub fn rewrite_budget(mut self, rewrite_budget: usize) -> Self {
        self.0.rewrite_budget = rewrite_budget;
        self
    }

    /// Sets whether high-level composites may be decorated.
    pub fn nesting(mut self, nesting: bool) -> Self {
        self.0.nesting = nesting;
        self
    }

    /// Sets the seed of the random number generator.
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.0.seed = seed;
        self
    }

    /// Builds the [`PipelineConfig`] struct.
    pub fn build(self) -> PipelineConfig {
        self.0
    }
}

/// Options for the [`GuardRegistry`](crate::guard::GuardRegistry).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GuardConfig {
    /// Which requests share a guard.
    pub scope: GuardScope,

    /// Maximum number of fingerprints each guard remembers; unbounded if [`None`]. A guard always
    /// remembers at least the last fingerprint, so duplicate detection cannot be turned off.
    pub capacity: Option<NonZeroUsize>,

    /// Maximum number of sessions with their own guard, the least recently used one being
    /// forgotten first; unbounded if [`None`]. Only used with [`GuardScope::Session`].
    pub max_sessions: Option<NonZeroUsize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.retry_budget, 20);
        assert_eq!(config.fallback, FallbackPolicy::KnownGood);
        assert_eq!(config.limits(), Limits::default());
        assert!(config.nesting);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn builder() {
        let config = PipelineConfigBuilder::new()
            .retry_budget(3)
            .fallback(FallbackPolicy::FailLoudly)
            .rewrite_passes(4)
            .rewrite_budget(100)
            .nesting(false)
            .seed(Some(9))
            .build();
        assert_eq!(config, PipelineConfig {
            retry_budget: 3,
            fallback: FallbackPolicy::FailLoudly,
            rewrite_passes: 4,
            rewrite_budget: 100,
            nesting: false,
            seed: Some(9),
        });
    }
}
