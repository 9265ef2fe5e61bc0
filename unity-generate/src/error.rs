use crate::level::Level;
use std::fmt;
use unity_attrs::ErrorKind;

/// Every attempt of a request was rejected, and the fallback policy is
/// [`FallbackPolicy::FailLoudly`](crate::config::FallbackPolicy::FailLoudly).
#[derive(Debug, Clone, PartialEq, Eq, ErrorKind)]
#[error(
    message = format!("could not generate a fresh {} expression in {} attempt(s)", level, attempts),
    labels = ["this request"],
    help = "try again, raise the retry budget with `--retries`, or drop `--strict` to allow the known-good fallback",
)]
pub struct PipelineExhausted {
    /// The requested level.
    pub level: Level,

    /// Number of attempts made.
    pub attempts: usize,
}

impl fmt::Display for PipelineExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not generate a fresh {} expression in {} attempt(s)",
            self.level,
            self.attempts,
        )
    }
}

impl std::error::Error for PipelineExhausted {}
