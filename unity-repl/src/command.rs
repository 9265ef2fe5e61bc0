//! Parsing of REPL commands.

use crate::error::{
    InvalidNumber,
    MissingArgument,
    UnexpectedArgument,
    UnknownCommand,
    UnknownLevel,
};
use levenshtein::levenshtein;
use std::ops::Range;
use unity_error::Error;
use unity_generate::Level;

/// The names of all commands, as listed by `help`.
pub const COMMANDS: [&str; 9] = [
    "generate",
    "level",
    "session",
    "steps",
    "eval",
    "seen",
    "help",
    "quit",
    "exit",
];

/// A command entered in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Generate an expression, at the given level or the current one.
    Generate(Option<Level>),

    /// Change the current level.
    Level(Level),

    /// Switch to the given session.
    Session(String),

    /// Show the rewriting steps of the last generated expression.
    Steps,

    /// Evaluate the last generated expression at a point.
    Eval(f64),

    /// Show how many expressions the current guard remembers.
    Seen,

    /// List the commands.
    Help,

    /// Leave the REPL.
    Quit,
}

/// A word of the input, along with its location.
#[derive(Debug, Clone, PartialEq)]
struct Word<'a> {
    text: &'a str,
    span: Range<usize>,
}

/// Splits the input into whitespace-separated words.
fn words(input: &str) -> Vec<Word<'_>> {
    input
        .split_whitespace()
        .map(|text| {
            let start = text.as_ptr() as usize - input.as_ptr() as usize;
            Word { text, span: start..start + text.len() }
        })
        .collect()
}

/// Returns the known command closest to the given name, if any is close enough.
fn similar_command(name: &str) -> Option<&'static str> {
    COMMANDS
        .iter()
        .map(|command| (levenshtein(command, name), *command))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, command)| command)
}

fn parse_level(word: &Word) -> Result<Level, Error> {
    word.text.parse::<Level>().map_err(|_| {
        Error::new(vec![word.span.clone()], UnknownLevel { name: word.text.to_string() })
    })
}

/// Returns an error if there are arguments past the first `count`.
fn at_most(command: &'static str, args: &[Word], count: usize) -> Result<(), Error> {
    match args.get(count) {
        Some(extra) => Err(Error::new(vec![extra.span.clone()], UnexpectedArgument { command })),
        None => Ok(()),
    }
}

/// Returns the required argument of a command.
fn required<'a, 'b>(
    command: &'static str,
    name: &Word,
    args: &'b [Word<'a>],
    expected: &'static str,
) -> Result<&'b Word<'a>, Error> {
    at_most(command, args, 1)?;
    args.first()
        .ok_or_else(|| Error::new(vec![name.span.clone()], MissingArgument { command, expected }))
}

/// Parses a line of input. Returns [`None`] for a blank line.
pub fn parse(input: &str) -> Result<Option<Command>, Error> {
    let words = words(input);
    let Some((name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match name.text.to_ascii_lowercase().as_str() {
        "generate" => {
            at_most("generate", args, 1)?;
            Command::Generate(args.first().map(parse_level).transpose()?)
        },
        "level" => Command::Level(parse_level(required("level", name, args, "a level")?)?),
        "session" => {
            let id = required("session", name, args, "a session id")?;
            Command::Session(id.text.to_string())
        },
        "steps" => {
            at_most("steps", args, 0)?;
            Command::Steps
        },
        "eval" => {
            let arg = required("eval", name, args, "a value for x")?;
            let x = arg.text.parse::<f64>().map_err(|_| {
                Error::new(vec![arg.span.clone()], InvalidNumber { arg: arg.text.to_string() })
            })?;
            Command::Eval(x)
        },
        "seen" => {
            at_most("seen", args, 0)?;
            Command::Seen
        },
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => {
            return Err(Error::new(vec![name.span.clone()], UnknownCommand {
                name: other.to_string(),
                suggestion: similar_command(other).map(str::to_string),
            }));
        },
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn commands() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        assert_eq!(parse("generate").unwrap(), Some(Command::Generate(None)));
        assert_eq!(parse("generate HIGH").unwrap(), Some(Command::Generate(Some(Level::High))));
        assert_eq!(parse("  level 2 ").unwrap(), Some(Command::Level(Level::Middle)));
        assert_eq!(parse("session alice").unwrap(), Some(Command::Session("alice".to_string())));
        assert_eq!(parse("eval -0.5").unwrap(), Some(Command::Eval(-0.5)));
        assert_eq!(parse("exit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn word_spans() {
        let input = " eval  1.5";
        let spans = words(input).into_iter().map(|word| word.span).collect::<Vec<_>>();
        assert_eq!(spans, vec![1..5, 7..10]);
    }

    #[test]
    fn errors_point_at_the_offending_word() {
        let err = parse("genrate").unwrap_err();
        assert_eq!(err.spans, vec![0..7]);

        let err = parse("level 1 2").unwrap_err();
        assert_eq!(err.spans, vec![8..9]);

        let err = parse("eval").unwrap_err();
        assert_eq!(err.spans, vec![0..4]);

        let err = parse("level expert").unwrap_err();
        assert_eq!(err.spans, vec![6..12]);
    }

    #[test]
    fn suggestions() {
        assert_eq!(similar_command("genrate"), Some("generate"));
        assert_eq!(similar_command("sen"), Some("seen"));
        assert_eq!(similar_command("frobnicate"), None);
    }
}
