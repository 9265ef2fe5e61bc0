mod args;
mod command;
mod error;
mod repl;

use repl::{Flow, Repl};
use rustyline::{error::ReadlineError, DefaultEditor};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};

/// Executes one line, reporting errors to stderr.
fn execute_line(repl: &mut Repl, line: &str) -> Flow {
    match repl.execute(line) {
        Ok(flow) => flow,
        Err(err) => {
            if let Err(io_err) = err.report_to_stderr("input", line) {
                eprintln!("{}", io_err);
            }
            Flow::Continue
        },
    }
}

/// Executes every line of the input, stopping at `quit`.
fn execute(repl: &mut Repl, input: &str) {
    for line in input.lines() {
        if execute_line(repl, line) == Flow::Quit {
            break;
        }
    }
}

/// Reads one line from the terminal and executes it.
fn process_line(rl: &mut DefaultEditor, repl: &mut Repl) -> Result<Flow, ReadlineError> {
    let input = rl.readline(&repl.prompt())?;
    if input.trim().is_empty() {
        return Ok(Flow::Continue);
    }

    rl.add_history_entry(&input)?;
    Ok(execute_line(repl, &input))
}

fn main() -> ExitCode {
    let options = match args::parse(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", args::USAGE);
            return ExitCode::SUCCESS;
        },
        Err(err) => {
            eprintln!("error: {}\n\n{}", err, args::USAGE);
            return ExitCode::from(2);
        },
    };

    if let Err(err) = TermLogger::init(
        options.log,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("could not set up logging: {}", err);
    }

    let mut repl = Repl::new(&options);

    if let Some(filename) = &options.file {
        // run commands from a file
        match fs::read_to_string(filename) {
            Ok(input) => execute(&mut repl, &input),
            Err(err) => {
                eprintln!("could not read `{}`: {}", filename, err);
                return ExitCode::FAILURE;
            },
        }
    } else if !io::stdin().is_terminal() {
        // read commands from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("could not read standard input: {}", err);
            return ExitCode::FAILURE;
        }
        execute(&mut repl, &input);
    } else {
        // run the repl / interactive mode
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(err) => {
                eprintln!("could not start the editor: {}", err);
                return ExitCode::FAILURE;
            },
        };

        loop {
            match process_line(&mut rl, &mut repl) {
                Ok(Flow::Continue) => (),
                Ok(Flow::Quit) => break,
                Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
                Err(err) => {
                    eprintln!("{}", err);
                    break;
                },
            }
        }
    }

    ExitCode::SUCCESS
}
