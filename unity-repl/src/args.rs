//! Command-line options.

use simplelog::LevelFilter;
use std::fmt;
use unity_generate::{FallbackPolicy, GuardConfig, GuardScope, PipelineConfig, PipelineConfigBuilder};

/// Options given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Configuration of the pipeline.
    pub pipeline: PipelineConfig,

    /// Configuration of the uniqueness guards.
    pub guard: GuardConfig,

    /// Maximum level of log messages to print.
    pub log: LevelFilter,

    /// File to read commands from, instead of the terminal.
    pub file: Option<String>,
}

/// An invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgsError {
    /// The flag needs a value that was not given.
    MissingValue(String),

    /// The value given to the flag is not valid.
    InvalidValue(String, String),

    /// The flag is not known.
    UnknownFlag(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue(flag) => write!(f, "missing value for `{}`", flag),
            Self::InvalidValue(flag, value) => write!(f, "invalid value `{}` for `{}`", value, flag),
            Self::UnknownFlag(flag) => write!(f, "unknown flag `{}`", flag),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Usage text printed with `--help`.
pub const USAGE: &str = "\
usage: unity-repl [options] [file]

Reads commands from `file`, from standard input if it is not a terminal, or interactively.

options:
  --seed <n>         seed the random number generator
  --retries <n>      attempts per request before falling back (default 20)
  --strict           fail instead of serving a known-good expression
  --scope <scope>    `process` (default) or `session`: which requests share a uniqueness guard
  --capacity <n>     remember at most `n` expressions per guard (`n` > 0)
  --sessions <n>     keep guards for at most `n` sessions, forgetting the least recently used
  --log <level>      `off`, `error`, `warn` (default), `info`, `debug` or `trace`
  --help             print this message";

/// Returns the value following a flag, parsed.
fn value<T: std::str::FromStr>(
    flag: &str,
    args: &mut impl Iterator<Item = String>,
) -> Result<T, ArgsError> {
    let value = args.next().ok_or_else(|| ArgsError::MissingValue(flag.to_string()))?;
    value.parse().map_err(|_| ArgsError::InvalidValue(flag.to_string(), value))
}

/// Parses the command-line arguments, excluding the program name. Returns [`None`] if `--help`
/// was given.
pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Option<Options>, ArgsError> {
    let mut args = args.into_iter();
    let mut builder = PipelineConfigBuilder::new();
    let mut guard = GuardConfig::default();
    let mut log = LevelFilter::Warn;
    let mut file = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => builder = builder.seed(Some(value(&arg, &mut args)?)),
            "--retries" => builder = builder.retry_budget(value(&arg, &mut args)?),
            "--strict" => builder = builder.fallback(FallbackPolicy::FailLoudly),
            "--scope" => {
                let scope = value::<String>(&arg, &mut args)?;
                guard.scope = match scope.as_str() {
                    "process" => GuardScope::Process,
                    "session" => GuardScope::Session,
                    _ => return Err(ArgsError::InvalidValue(arg.clone(), scope)),
                };
            },
            "--capacity" => guard.capacity = Some(value(&arg, &mut args)?),
            "--sessions" => guard.max_sessions = Some(value(&arg, &mut args)?),
            "--log" => log = value(&arg, &mut args)?,
            "--help" | "-h" => return Ok(None),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(ArgsError::UnknownFlag(flag.to_string()));
            },
            _ => file = Some(arg.clone()),
        }
    }

    Ok(Some(Options {
        pipeline: builder.build(),
        guard,
        log,
        file,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::num::NonZeroUsize;

    fn args(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn defaults() {
        let options = parse(args("")).unwrap().unwrap();
        assert_eq!(options.pipeline, PipelineConfig::default());
        assert_eq!(options.guard, GuardConfig::default());
        assert_eq!(options.log, LevelFilter::Warn);
        assert_eq!(options.file, None);
    }

    #[test]
    fn all_flags() {
        let options = parse(args(
            "--seed 5 --retries 3 --strict --scope session --capacity 10 --sessions 4 --log debug cmds.txt",
        )).unwrap().unwrap();
        assert_eq!(options.pipeline.seed, Some(5));
        assert_eq!(options.pipeline.retry_budget, 3);
        assert_eq!(options.pipeline.fallback, FallbackPolicy::FailLoudly);
        assert_eq!(options.guard, GuardConfig {
            scope: GuardScope::Session,
            capacity: NonZeroUsize::new(10),
            max_sessions: NonZeroUsize::new(4),
        });
        assert_eq!(options.log, LevelFilter::Debug);
        assert_eq!(options.file.as_deref(), Some("cmds.txt"));
    }

    #[test]
    fn errors() {
        assert_eq!(parse(args("--seed")), Err(ArgsError::MissingValue("--seed".to_string())));
        assert_eq!(
            parse(args("--retries many")),
            Err(ArgsError::InvalidValue("--retries".to_string(), "many".to_string())),
        );
        assert_eq!(
            parse(args("--capacity 0")),
            Err(ArgsError::InvalidValue("--capacity".to_string(), "0".to_string())),
        );
        assert_eq!(parse(args("--fast")), Err(ArgsError::UnknownFlag("--fast".to_string())));
        assert_eq!(parse(args("--help")), Ok(None));
    }
}
