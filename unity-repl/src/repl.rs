//! State of a REPL session and execution of its commands.

use crate::{
    args::Options,
    command::{self, Command, COMMANDS},
    error::{NothingGenerated, Undefined},
};
use log::debug;
use unity_compute::symbolic::Tally;
use unity_error::Error;
use unity_generate::{
    generator::VAR,
    Generated,
    GuardRegistry,
    Level,
    Origin,
    Pipeline,
};

/// Whether the REPL should keep reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The state of the REPL.
#[derive(Debug)]
pub struct Repl {
    registry: GuardRegistry,
    pipeline: Pipeline,
    level: Level,
    session: Option<String>,
    last: Option<Generated>,
}

impl Repl {
    /// Creates a REPL with the given options.
    pub fn new(options: &Options) -> Self {
        let registry = GuardRegistry::new(options.guard);
        let pipeline = Pipeline::new(options.pipeline, registry.guard_for(None));
        Self {
            registry,
            pipeline,
            level: Level::default(),
            session: None,
            last: None,
        }
    }

    /// Parses and executes a line of input.
    pub fn execute(&mut self, input: &str) -> Result<Flow, Error> {
        let Some(command) = command::parse(input)? else {
            return Ok(Flow::Continue);
        };

        // errors about the current state point at the whole line
        let span = vec![0..input.trim_end().len()];
        match command {
            Command::Generate(level) => {
                let level = level.unwrap_or(self.level);
                let generated = self.pipeline
                    .generate(level)
                    .map_err(|err| Error::new(span, err))?;
                print_generated(&generated);
                self.last = Some(generated);
            },
            Command::Level(level) => {
                self.level = level;
                println!("level set to {}", level);
            },
            Command::Session(id) => {
                self.pipeline.set_guard(self.registry.guard_for(Some(id.as_str())));
                debug!("switched to session `{}`", id);
                println!("session `{}`", id);
                self.session = Some(id);
            },
            Command::Steps => {
                let last = self.last.as_ref().ok_or_else(|| Error::new(span, NothingGenerated))?;
                for (i, rejection) in last.rejections.iter().enumerate() {
                    println!("attempt {} rejected: {}", i + 1, rejection);
                }
                if last.steps.is_empty() {
                    println!("(no steps recorded)");
                    return Ok(Flow::Continue);
                }
                for (i, step) in last.steps.iter().enumerate() {
                    println!("{:>4}. {:?}", i + 1, step);
                }

                let tally = last.steps.iter().copied().collect::<Tally<_>>();
                let summary = tally.counts()
                    .iter()
                    .map(|(step, count)| format!("{:?} x{}", step, count))
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("{} step(s): {}", tally.total(), summary);
            },
            Command::Eval(x) => {
                let last = self.last.as_ref().ok_or_else(|| Error::new(span.clone(), NothingGenerated))?;
                let value = last.expr
                    .eval_at(VAR, x)
                    .ok_or_else(|| Error::new(span, Undefined { x }))?;
                println!("{}", value);
            },
            Command::Seen => {
                let guard = self.pipeline.guard();
                match guard.capacity() {
                    Some(capacity) => println!("{} of at most {} expression(s) remembered", guard.len(), capacity),
                    None => println!("{} expression(s) remembered", guard.len()),
                }
            },
            Command::Help => print_help(),
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Returns the prompt to show, which includes the current session.
    pub fn prompt(&self) -> String {
        match &self.session {
            Some(session) => format!("{}@{}> ", session, self.level),
            None => format!("{}> ", self.level),
        }
    }
}

fn print_generated(generated: &Generated) {
    println!("{}", generated.text);
    println!("latex: {}", generated.latex);

    let schemes = generated.schemes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", then ");
    let origin = match generated.origin {
        Origin::Fresh => "fresh",
        Origin::Fallback => "fallback",
    };
    println!(
        "level {}, {}, {} attempt(s), {}; fingerprint {}",
        generated.level,
        origin,
        generated.attempts,
        schemes,
        generated.fingerprint,
    );
}

fn print_help() {
    println!("commands ({}):", COMMANDS.join(", "));
    println!("  generate [level]   generate an expression equal to 1");
    println!("  level <level>      set the level: elementary, middle or high (or 1, 2, 3)");
    println!("  session <id>       switch to another session");
    println!("  steps              show how the last expression reduces to 1");
    println!("  eval <x>           evaluate the last expression at x");
    println!("  seen               count the expressions the current guard remembers");
    println!("  help               show this message");
    println!("  quit, exit         leave");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use pretty_assertions::assert_eq;
    use unity_generate::GuardScope;

    fn repl(flags: &str) -> Repl {
        let args = flags.split_whitespace().map(str::to_string);
        let options = args::parse(args).unwrap().unwrap();
        Repl::new(&options)
    }

    #[test]
    fn generate_and_inspect() {
        let mut repl = repl("--seed 1");
        assert!(repl.execute("steps").is_err());
        assert_eq!(repl.execute("generate middle").unwrap(), Flow::Continue);
        assert_eq!(repl.last.as_ref().map(|last| last.level), Some(Level::Middle));
        assert!(repl.execute("steps").is_ok());
        assert_eq!(repl.pipeline.guard().len(), 1);
    }

    #[test]
    fn level_changes_default() {
        let mut repl = repl("--seed 2");
        repl.execute("level high").unwrap();
        assert_eq!(repl.level, Level::High);
        repl.execute("generate").unwrap();
        assert_eq!(repl.last.as_ref().map(|last| last.level), Some(Level::High));
    }

    #[test]
    fn sessions_have_their_own_guard() {
        let mut repl = repl("--seed 3 --scope session");
        assert_eq!(repl.registry.scope(), GuardScope::Session);
        repl.execute("session a").unwrap();
        repl.execute("generate").unwrap();
        assert_eq!(repl.pipeline.guard().len(), 1);

        repl.execute("session b").unwrap();
        assert_eq!(repl.pipeline.guard().len(), 0);
        assert_eq!(repl.prompt(), "b@elementary> ");
    }

    #[test]
    fn quit() {
        let mut repl = repl("");
        assert_eq!(repl.execute("").unwrap(), Flow::Continue);
        assert_eq!(repl.execute("quit").unwrap(), Flow::Quit);
    }
}
