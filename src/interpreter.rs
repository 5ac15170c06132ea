use std::io::{self, Write};
use tracing::{debug, trace};
use crate::config::Options;
use crate::env::Env;
use crate::error::Result;
use crate::evaluator::{Evaluator, Outcome};
use crate::lexer::lex;
use crate::parser::parse;

/// One environment plus the sink `print` writes to. Statements run one at a
/// time against the same bindings.
pub struct Session<W: Write> {
    env: Env,
    options: Options,
    output: W,
}

impl Session<io::Stdout> {
    pub fn stdout(options: Options) -> Self {
        Session::new(io::stdout(), options)
    }
}

impl<W: Write> Session<W> {
    pub fn new(output: W, options: Options) -> Self {
        Session {
            env: Env::new(),
            options,
            output,
        }
    }

    pub fn run(&mut self, source: &str) -> Result<Outcome> {
        debug!(source, "running statement");
        run_with(source, &mut self.env, &mut self.output, self.options)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn options(&self) -> Options {
        self.options
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Lexes, parses and evaluates one statement against `env`.
pub fn run_with(source: &str, env: &mut Env, output: &mut dyn Write, options: Options) -> Result<Outcome> {
    let tokens = lex(source)?;
    trace!(count = tokens.len(), "lexed");

    let statement = parse(tokens, source.len())?;
    let outcome = Evaluator::new(env, output, options).eval(&statement)?;
    output.flush()?;

    Ok(outcome)
}
