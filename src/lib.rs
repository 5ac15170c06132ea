pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod value;

pub use ast::{ArithmeticOperator, Comparison, ComparisonOperator, Expression, Literal, Statement};
pub use config::{ConditionalMode, Options};
pub use env::Env;
pub use error::{Error, Result};
pub use evaluator::Outcome;
pub use interpreter::Session;
pub use value::Value;

/// Runs one statement against `env` with default options, printing to stdout.
pub fn run(source: &str, env: &mut Env) -> Result<Outcome> {
    interpreter::run_with(source, env, &mut std::io::stdout(), Options::default())
}
