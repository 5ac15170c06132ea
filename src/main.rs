use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use clap::Parser;
use colored::Colorize;
use tracing::Level;
use paren::{ConditionalMode, Options, Outcome, Session};

/// Evaluates one statement per line.
#[derive(Parser, Debug)]
#[clap(name = "paren", version, about)]
struct Cli {
    /// File with one statement per line; stdin when absent.
    #[clap(value_parser)]
    file: Option<PathBuf>,

    /// Statement to run; may repeat. Takes precedence over FILE.
    #[clap(short = 'e', long = "eval", value_parser)]
    statements: Vec<String>,

    /// Evaluate only the branch an `if` selects.
    #[clap(long)]
    short_circuit: bool,

    /// Echo `name = value` after every assignment.
    #[clap(long)]
    print_bindings: bool,

    /// Print every binding once all statements ran.
    #[clap(long)]
    dump_env: bool,

    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> Options {
        let conditional = if self.short_circuit {
            ConditionalMode::ShortCircuit
        } else {
            ConditionalMode::Eager
        };

        Options { conditional }
    }

    fn level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn source_lines(&self) -> io::Result<Vec<String>> {
        if !self.statements.is_empty() {
            return Ok(self.statements.clone());
        }

        match &self.file {
            Some(path) => Ok(fs::read_to_string(path)?.lines().map(str::to_owned).collect()),
            None => io::stdin().lock().lines().collect(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(cli.level())
        .init();

    let lines = match cli.source_lines() {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("{}", format!("cannot read input: {}", e).red());
            process::exit(2);
        }
    };

    let mut session = Session::stdout(cli.options());
    let mut failed = false;

    for (index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        match session.run(line) {
            Ok(outcome @ Outcome::Bound { .. }) if cli.print_bindings => println!("{}", outcome),
            Ok(_) => {}
            Err(e) => {
                failed = true;
                eprintln!("{}", format!("line {}: {}", index + 1, e).red());
            }
        }
    }

    if cli.dump_env {
        for (name, value) in session.env().bindings() {
            println!("{} = {}", name.bold(), value);
        }
    }

    if failed {
        process::exit(1);
    }
}
