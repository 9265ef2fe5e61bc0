//! Generation of symbolic expressions that are elaborate, yet equal exactly 1.
//!
//! A request for a [`Level`] goes through the [`Pipeline`]:
//!
//! 1. the [`generator`] draws a random base expression `f(x)` that never vanishes;
//! 2. the [`identity`] transformer wraps it in an identity, such as `f * f^(-1)` or
//!    `sin(f)^2 + cos(f)^2`, so that the whole tree equals 1;
//! 3. the [`validate`] step rewrites the tree to a normal form and checks that it is exactly `1`;
//! 4. the [`guard`] step rejects expressions that were already served.
//!
//! Rejected attempts are retried up to a budget, after which a known-good expression is served or
//! [`PipelineExhausted`] is returned, depending on the [`FallbackPolicy`].
//!
//! ```
//! use std::sync::Arc;
//! use unity_generate::{Level, Pipeline, PipelineConfigBuilder, UniquenessGuard};
//!
//! let config = PipelineConfigBuilder::new().seed(Some(1)).build();
//! let mut pipeline = Pipeline::new(config, Arc::new(UniquenessGuard::new()));
//! let generated = pipeline.generate(Level::Middle).unwrap();
//! println!("{} = 1", generated.text);
//! ```

pub mod config;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod guard;
pub mod identity;
pub mod level;
pub mod pipeline;
pub mod validate;

pub use config::{FallbackPolicy, GuardConfig, PipelineConfig, PipelineConfigBuilder};
pub use error::PipelineExhausted;
pub use guard::{GuardRegistry, GuardScope, Novelty, UniquenessGuard};
pub use identity::{Composite, IdentityTransformer, Scheme};
pub use level::{InvalidLevel, Level};
pub use pipeline::{Generated, Origin, Pipeline, Rejection};
pub use validate::{RejectReason, SymbolicValidator, Validator, Verdict};
