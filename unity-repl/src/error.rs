//! Errors reported by the REPL.

use unity_attrs::ErrorKind;

/// The command is not one of the known commands.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown command `{}`", name),
    labels = ["this command"],
    help = match suggestion {
        Some(suggestion) => format!("did you mean `{}`?", suggestion),
        None => "type `help` to list the available commands".to_string(),
    },
)]
pub struct UnknownCommand {
    /// The command as typed.
    pub name: String,

    /// The closest known command, if any is close enough.
    pub suggestion: Option<String>,
}

/// The level name is not recognized.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("unknown level `{}`", name),
    labels = ["this level"],
    help = "the levels are `elementary`, `middle` and `high` (or `1`, `2` and `3`)",
)]
pub struct UnknownLevel {
    /// The level as typed.
    pub name: String,
}

/// The command needs an argument that was not given.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("missing argument for `{}`", command),
    labels = [format!("expected {} after this", expected)],
)]
pub struct MissingArgument {
    /// The command.
    pub command: &'static str,

    /// Description of the expected argument.
    pub expected: &'static str,
}

/// The command was given more arguments than it takes.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("too many arguments for `{}`", command),
    labels = ["this argument is not expected"],
    help = "type `help` to see how to use each command",
)]
pub struct UnexpectedArgument {
    /// The command.
    pub command: &'static str,
}

/// The argument is not a number.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("`{}` is not a number", arg),
    labels = ["this argument"],
)]
pub struct InvalidNumber {
    /// The argument as typed.
    pub arg: String,
}

/// The command inspects the last generated expression, but there is none yet.
#[derive(Debug, ErrorKind)]
#[error(
    message = "no expression was generated yet",
    labels = ["this command"],
    help = "type `generate` first",
)]
pub struct NothingGenerated;

/// The expression cannot be evaluated at the given point.
#[derive(Debug, ErrorKind)]
#[error(
    message = format!("the expression cannot be evaluated at x = {}", x),
    labels = ["this point"],
)]
pub struct Undefined {
    /// The point.
    pub x: f64,
}
