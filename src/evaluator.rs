use std::fmt;
use std::io::Write;
use tracing::{debug, trace};
use crate::ast::{ArithmeticOperator, Comparison, ComparisonOperator, Expression, Statement};
use crate::config::{ConditionalMode, Options};
use crate::env::Env;
use crate::error::{Error, Result};
use crate::value::Value;

/// What a successfully evaluated statement left behind.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Bound {
    name: String,
    value: Value,
  },
  Discarded(Value),
}

impl Outcome {
  pub fn value(&self) -> &Value {
    match self {
      Outcome::Bound { value, .. } => value,
      Outcome::Discarded(value) => value,
    }
  }
}

impl fmt::Display for Outcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Outcome::Bound { name, value } => write!(f, "{} = {}", name, value),
      Outcome::Discarded(value) => write!(f, "{}", value),
    }
  }
}

/// Walks a statement children-first, left to right, so every form sees its
/// operands fully evaluated before its own rule applies.
pub struct Evaluator<'a> {
  env: &'a mut Env,
  output: &'a mut dyn Write,
  options: Options,
}

impl<'a> Evaluator<'a> {
  pub fn new(env: &'a mut Env, output: &'a mut dyn Write, options: Options) -> Self {
    Evaluator {
      env,
      output,
      options,
    }
  }

  pub fn eval(&mut self, statement: &Statement) -> Result<Outcome> {
    statement.check_shape()?;

    match statement {
      Statement::Assignment { name, value } => {
        let value = self.eval_expression(value)?;
        debug!(%name, %value, "binding");
        self.env.set(name.clone(), value.clone());

        Ok(Outcome::Bound { name: name.clone(), value })
      }
      Statement::Expression(expression) => Ok(Outcome::Discarded(self.eval_expression(expression)?)),
    }
  }

  fn eval_expression(&mut self, expression: &Expression) -> Result<Value> {
    match expression {
      Expression::Literal(literal) => Ok(Value::from(literal)),
      Expression::Variable(name) => self.env.get(name),
      Expression::Quoted(items) | Expression::List(items) | Expression::Cons(items) => {
        Ok(Value::Sequence(self.eval_items(items)?))
      }
      Expression::Arithmetic { operator, operands } => self.eval_arithmetic(*operator, operands),
      Expression::Car(operand) => {
        let items = self.quoted_items("car", operand)?;
        Ok(items.into_iter().next().unwrap_or(Value::Empty))
      }
      Expression::Cdr(operand) => {
        let items = self.quoted_items("cdr", operand)?;
        if items.len() < 2 {
          Ok(Value::Empty)
        } else {
          Ok(Value::Sequence(items.into_iter().skip(1).collect()))
        }
      }
      Expression::Define { name, value } => {
        let value = Value::from(value);
        debug!(%name, %value, "define");
        self.env.set(name.clone(), value);
        Ok(Value::Unit)
      }
      Expression::Comparison(comparison) => Ok(Value::Boolean(self.eval_comparison(comparison)?)),
      Expression::If { condition, consequent, alternative } => {
        let holds = self.eval_comparison(condition)?;

        match self.options.conditional {
          ConditionalMode::Eager => {
            let consequent = self.eval_branch(consequent.as_deref())?;
            let alternative = self.eval_branch(alternative.as_deref())?;
            trace!(holds, "both branches evaluated");
            Ok(if holds { consequent } else { alternative })
          }
          ConditionalMode::ShortCircuit => {
            let branch = if holds { consequent } else { alternative };
            self.eval_branch(branch.as_deref())
          }
        }
      }
      Expression::Length(target) => match self.eval_expression(target)? {
        Value::Text(text) => Ok(Value::Number(text.chars().count().saturating_sub(2) as f64)),
        Value::Sequence(items) => Ok(Value::Number(items.len() as f64)),
        other => Err(Error::TypeMismatch {
          operator: "length".to_owned(),
          expected: "text or quoted list",
          found: other.type_name(),
        }),
      },
      Expression::Print(text) => {
        writeln!(self.output, "{}", Value::unquote(text))?;
        Ok(Value::Unit)
      }
      Expression::IsNull(items) => Ok(Value::Boolean(items.is_empty())),
    }
  }

  fn eval_items(&mut self, items: &[Expression]) -> Result<Vec<Value>> {
    items.iter().map(|item| self.eval_expression(item)).collect()
  }

  fn eval_branch(&mut self, branch: Option<&Expression>) -> Result<Value> {
    match branch {
      Some(expression) => self.eval_expression(expression),
      None => Ok(Value::Unit),
    }
  }

  fn quoted_items(&mut self, form: &'static str, operand: &Expression) -> Result<Vec<Value>> {
    match operand {
      Expression::Quoted(items) => self.eval_items(items),
      _ => Err(Error::StructuralMismatch { form }),
    }
  }

  /// No operands gives the operator symbol, one operand is returned as is,
  /// otherwise the operator is folded over the rest with the first as seed.
  fn eval_arithmetic(&mut self, operator: ArithmeticOperator, operands: &[Expression]) -> Result<Value> {
    let values = self.eval_items(operands)?;
    let mut values = values.into_iter();

    let seed = match values.next() {
      Some(seed) => seed,
      None => return Ok(Value::Symbol(operator.symbol().to_owned())),
    };

    values.try_fold(seed, |accumulator, operand| Self::apply_arithmetic(operator, accumulator, operand))
  }

  fn apply_arithmetic(operator: ArithmeticOperator, left: Value, right: Value) -> Result<Value> {
    let (left, right) = match (&left, &right) {
      (Value::Number(left), Value::Number(right)) => (*left, *right),
      (Value::Number(_), other) | (other, _) => {
        return Err(Error::TypeMismatch {
          operator: operator.symbol().to_owned(),
          expected: "number",
          found: other.type_name(),
        });
      }
    };

    let result = match operator {
      ArithmeticOperator::Add => left + right,
      ArithmeticOperator::Subtract => left - right,
      ArithmeticOperator::Multiply => left * right,
      ArithmeticOperator::Divide => {
        if right == 0.0 {
          return Err(Error::DivisionByZero);
        }
        left / right
      }
      ArithmeticOperator::Power => left.powf(right),
    };

    Ok(Value::Number(result))
  }

  fn eval_comparison(&mut self, comparison: &Comparison) -> Result<bool> {
    let left = self.eval_expression(&comparison.left)?;
    let right = self.eval_expression(&comparison.right)?;
    let operator = comparison.operator;

    // `eq` never fails: values of different types are simply not `eq`.
    if operator != ComparisonOperator::Eq && !left.same_type(&right) {
      return Err(Error::TypeMismatch {
        operator: operator.symbol().to_owned(),
        expected: left.type_name(),
        found: right.type_name(),
      });
    }

    let ordering = left.ordering(&right);

    Ok(match operator {
      ComparisonOperator::Equal | ComparisonOperator::Eq => left == right,
      ComparisonOperator::Greater => ordering == Some(std::cmp::Ordering::Greater),
      ComparisonOperator::Less => ordering == Some(std::cmp::Ordering::Less),
      ComparisonOperator::GreaterEqual => ordering.map_or(false, |o| o.is_ge()),
      ComparisonOperator::LessEqual => ordering.map_or(false, |o| o.is_le()),
    })
  }
}

#[cfg(test)]
mod tests {
  use crate::config::Options;
  use crate::env::Env;
  use crate::error::{Error, Result};
  use crate::evaluator::{Evaluator, Outcome};
  use crate::lexer::lex;
  use crate::parser::parse;
  use crate::value::Value;

  fn eval_in(env: &mut Env, input: &str, options: Options) -> (Result<Outcome>, String) {
    let mut output = Vec::new();
    let res = lex(input)
      .and_then(|tokens| parse(tokens, input.len()))
      .and_then(|statement| Evaluator::new(env, &mut output, options).eval(&statement));

    (res, String::from_utf8(output).unwrap())
  }

  fn eval(input: &str) -> Result<Value> {
    let mut env = Env::new();
    eval_in(&mut env, input, Options::default()).0.map(|outcome| outcome.value().clone())
  }

  fn number(value: f64) -> Value {
    Value::Number(value)
  }

  fn text(value: &str) -> Value {
    Value::Text(format!("\"{}\"", value))
  }

  #[test]
  fn arithmetic_folds_from_the_first_operand() {
    assert_eq!(eval("(+ 1 2 3)").unwrap(), number(6.0));
    assert_eq!(eval("(- 10 2 3)").unwrap(), number(5.0));
    assert_eq!(eval("(* 2 3 4)").unwrap(), number(24.0));
    assert_eq!(eval("(/ 20 2 5)").unwrap(), number(2.0));
    assert_eq!(eval("(^ 2 3 2)").unwrap(), number(64.0));
  }

  #[test]
  fn arithmetic_nests() {
    assert_eq!(eval("(+ (- 2 4) 2)").unwrap(), number(0.0));
    assert_eq!(eval("(* (+ 1 1) (- 9 3) (/ 8 4))").unwrap(), number(24.0));
  }

  #[test]
  fn operator_alone_evaluates_to_its_symbol() {
    for symbol in ["+", "-", "*", "/", "^"] {
      assert_eq!(eval(&format!("({})", symbol)).unwrap(), Value::Symbol(symbol.to_owned()));
    }
  }

  #[test]
  fn single_operand_is_returned_unchanged() {
    for symbol in ["+", "-", "*", "/", "^"] {
      assert_eq!(eval(&format!("({} 5)", symbol)).unwrap(), number(5.0));
    }
    assert_eq!(eval("(+ (*))").unwrap(), Value::Symbol("*".to_owned()));
  }

  #[test]
  fn symbol_operand_cannot_be_folded() {
    assert!(matches!(
      eval("(+ 1 (-))"),
      Err(Error::TypeMismatch { expected: "number", found: "symbol", .. })
    ));
    assert!(matches!(eval("(+ (-) 1)"), Err(Error::TypeMismatch { found: "symbol", .. })));
  }

  #[test]
  fn division_by_zero_fails() {
    assert!(matches!(eval("(/ 1 0)"), Err(Error::DivisionByZero)));
    assert!(matches!(eval("(/ 1 (- 2 2))"), Err(Error::DivisionByZero)));
  }

  #[test]
  fn list_collects_literals_in_order() {
    assert_eq!(
      eval(r#"(list "a" 1 #t #f '(2 '()))"#).unwrap(),
      Value::Sequence(vec![
        text("a"),
        number(1.0),
        Value::Boolean(true),
        Value::Boolean(false),
        Value::Sequence(vec![number(2.0), Value::Sequence(vec![])]),
      ]),
    );
    assert_eq!(eval("(list)").unwrap(), Value::Sequence(vec![]));
  }

  #[test]
  fn car_selects_the_first_element() {
    assert_eq!(eval("(car '(1 2))").unwrap(), number(1.0));
    assert_eq!(
      eval("(car '('(1 2) 3))").unwrap(),
      Value::Sequence(vec![number(1.0), number(2.0)]),
    );
    assert_eq!(eval("(car '())").unwrap(), Value::Empty);
  }

  #[test]
  fn cdr_selects_the_rest() {
    assert_eq!(
      eval("(cdr '(1 2 3))").unwrap(),
      Value::Sequence(vec![number(2.0), number(3.0)]),
    );
    assert_eq!(eval("(cdr '(1 2))").unwrap(), Value::Sequence(vec![number(2.0)]));
    assert_eq!(eval("(cdr '(1))").unwrap(), Value::Empty);
    assert_eq!(eval("(cdr '())").unwrap(), Value::Empty);
  }

  #[test]
  fn selectors_require_a_quoted_list() {
    assert!(matches!(eval("(car (list 1 2))"), Err(Error::StructuralMismatch { form: "car" })));
    assert!(matches!(eval("(cdr 5)"), Err(Error::StructuralMismatch { form: "cdr" })));
    assert!(matches!(eval("(car x)"), Err(Error::StructuralMismatch { form: "car" })));
  }

  #[test]
  fn structural_mismatch_binds_nothing() {
    let mut env = Env::new();
    let (res, _) = eval_in(&mut env, "x = (car (cons 1))", Options::default());

    assert!(res.unwrap_err().is_syntax());
    assert!(env.is_empty());
  }

  #[test]
  fn structural_mismatch_runs_no_side_effects() {
    let mut env = Env::new();
    let (res, output) = eval_in(&mut env, r#"(car (if (= 1 1) (print "a")))"#, Options::default());

    assert!(matches!(res, Err(Error::StructuralMismatch { form: "car" })));
    assert_eq!(output, "");
  }

  #[test]
  fn define_binds_a_literal() {
    let mut env = Env::new();
    let (res, _) = eval_in(&mut env, "(define y 5)", Options::default());

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Unit));
    assert_eq!(env.get("y").unwrap(), number(5.0));

    eval_in(&mut env, r#"(define y "five")"#, Options::default()).0.unwrap();
    assert_eq!(env.get("y").unwrap(), text("five"));
  }

  #[test]
  fn assigning_a_define_binds_both_names() {
    let mut env = Env::new();
    let (res, _) = eval_in(&mut env, "x = (define y 5)", Options::default());

    assert_eq!(res.unwrap(), Outcome::Bound { name: "x".to_owned(), value: Value::Unit });
    assert_eq!(env.get("x").unwrap(), Value::Unit);
    assert_eq!(env.get("y").unwrap(), number(5.0));
    assert_eq!(env.len(), 2);
  }

  #[test]
  fn caret_is_exponentiation() {
    assert_eq!(eval("(^ 2 3)").unwrap(), number(8.0));
    assert_eq!(eval("(^ 2 10)").unwrap(), number(1024.0));
  }

  #[test]
  fn comparisons_of_same_typed_values() {
    assert_eq!(eval("(= 1 1)").unwrap(), Value::Boolean(true));
    assert_eq!(eval("(> 1 2)").unwrap(), Value::Boolean(false));
    assert_eq!(eval("(< 1 2)").unwrap(), Value::Boolean(true));
    assert_eq!(eval("(>= 2 2)").unwrap(), Value::Boolean(true));
    assert_eq!(eval("(<= 3 2)").unwrap(), Value::Boolean(false));
    assert_eq!(eval(r#"(< "a" "b")"#).unwrap(), Value::Boolean(true));
    assert_eq!(eval("(> #t #f)").unwrap(), Value::Boolean(true));
    assert_eq!(eval(r#"(= (length "abc") 3)"#).unwrap(), Value::Boolean(true));
    assert_eq!(eval("(>= (length '(1 2)) (length '()))").unwrap(), Value::Boolean(true));
  }

  #[test]
  fn cross_type_comparison_is_a_type_error() {
    assert!(matches!(
      eval(r#"(= 1 "1")"#),
      Err(Error::TypeMismatch { expected: "number", found: "text", .. })
    ));
    assert!(matches!(eval("(< #t 1)"), Err(Error::TypeMismatch { .. })));
  }

  #[test]
  fn eq_is_structural_and_never_fails() {
    assert_eq!(eval("(eq 2 2)").unwrap(), Value::Boolean(true));
    assert_eq!(eval(r#"(eq "a" "a")"#).unwrap(), Value::Boolean(true));
    assert_eq!(eval(r#"(eq 1 "1")"#).unwrap(), Value::Boolean(false));

    let mut env = Env::new();
    eval_in(&mut env, "a = (list 1 2)", Options::default()).0.unwrap();
    eval_in(&mut env, "b = (cons 1 2)", Options::default()).0.unwrap();
    let (res, _) = eval_in(&mut env, "(eq a b)", Options::default());
    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Boolean(true)));
  }

  #[test]
  fn comparison_looks_up_identifiers() {
    let mut env = Env::new();
    eval_in(&mut env, "(define y 5)", Options::default()).0.unwrap();
    let (res, _) = eval_in(&mut env, "(> y 3)", Options::default());

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Boolean(true)));
  }

  #[test]
  fn unbound_identifier_leaves_env_untouched() {
    let mut env = Env::new();
    eval_in(&mut env, "(define y 5)", Options::default()).0.unwrap();
    let before = env.clone();

    let (res, _) = eval_in(&mut env, "x = (if (= z 1) 1 2)", Options::default());

    assert!(matches!(res, Err(Error::UnboundIdentifier(name)) if name == "z"));
    assert_eq!(env, before);
  }

  #[test]
  fn failed_assignment_keeps_the_old_binding() {
    let mut env = Env::new();
    eval_in(&mut env, "(define y 5)", Options::default()).0.unwrap();
    let (res, _) = eval_in(&mut env, "y = (+ 1 (-))", Options::default());

    assert!(res.is_err());
    assert_eq!(env.get("y").unwrap(), number(5.0));
  }

  #[test]
  fn conditional_returns_the_selected_branch() {
    assert_eq!(eval("(if (= 1 2) (+ 1 1) (+ 3 3))").unwrap(), number(6.0));
    assert_eq!(eval(r#"(if (< 1 2) "yes" "no")"#).unwrap(), text("yes"));
    assert_eq!(eval("(if (= 1 2) 5)").unwrap(), Value::Unit);
    assert_eq!(eval("(if (= 1 1))").unwrap(), Value::Unit);
  }

  #[test]
  fn nested_conditional_with_define_and_length() {
    let mut env = Env::new();
    eval_in(&mut env, "(define y 5)", Options::default()).0.unwrap();
    let (res, _) = eval_in(
      &mut env,
      r#"x = (if (= y (length "krowa")) (if (= 2 2) (+ 1 1) (+ 3 3)) (+ 2 2))"#,
      Options::default(),
    );

    assert_eq!(res.unwrap(), Outcome::Bound { name: "x".to_owned(), value: number(2.0) });
    assert_eq!(env.get("x").unwrap(), number(2.0));
  }

  #[test]
  fn eager_conditional_runs_both_branches() {
    let mut env = Env::new();
    let (res, output) = eval_in(&mut env, r#"(if (= 1 2) (print "a") (print "b"))"#, Options::default());

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Unit));
    assert_eq!(output, "a\nb\n");
  }

  #[test]
  fn eager_conditional_fails_on_untaken_unbound_branch() {
    let mut env = Env::new();
    let (res, _) = eval_in(&mut env, "(if (= 1 1) 1 z)", Options::default());

    assert!(matches!(res, Err(Error::UnboundIdentifier(_))));
  }

  #[test]
  fn short_circuit_conditional_runs_one_branch() {
    let mut env = Env::new();
    let (res, output) = eval_in(
      &mut env,
      r#"(if (= 1 2) (print "a") (print "b"))"#,
      Options::short_circuit(),
    );

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Unit));
    assert_eq!(output, "b\n");

    let (res, _) = eval_in(&mut env, "(if (= 1 1) 1 z)", Options::short_circuit());
    assert_eq!(res.unwrap(), Outcome::Discarded(number(1.0)));
  }

  #[test]
  fn branch_identifier_is_looked_up() {
    let mut env = Env::new();
    eval_in(&mut env, "z = (list 1)", Options::default()).0.unwrap();
    let (res, _) = eval_in(&mut env, "(if (= 1 1) z 0)", Options::default());

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Sequence(vec![number(1.0)])));
  }

  #[test]
  fn length_subtracts_the_stored_quotes() {
    assert_eq!(eval(r#"(length "krowa")"#).unwrap(), number(5.0));
    assert_eq!(eval(r#"(length "")"#).unwrap(), number(0.0));
    assert_eq!(eval(r#"(length "zółw")"#).unwrap(), number(4.0));
    assert_eq!(eval("(length '(1 2 '(3)))").unwrap(), number(3.0));
  }

  #[test]
  fn print_strips_quotes_and_yields_unit() {
    let mut env = Env::new();
    let (res, output) = eval_in(&mut env, r#"(print "hello world")"#, Options::default());

    assert_eq!(res.unwrap(), Outcome::Discarded(Value::Unit));
    assert_eq!(output, "hello world\n");
  }

  #[test]
  fn print_inside_arithmetic_position_is_rejected() {
    assert!(matches!(eval(r#"(+ 1 (print "a"))"#), Err(Error::Syntax(_))));
  }

  #[test]
  fn cons_builds_nested_sequences() {
    assert_eq!(eval("(cons)").unwrap(), Value::Sequence(vec![]));

    let mut env = Env::new();
    let (res, _) = eval_in(&mut env, "x = (cons 1 2 (cons 2 3))", Options::default());

    let expected = Value::Sequence(vec![
      number(1.0),
      number(2.0),
      Value::Sequence(vec![number(2.0), number(3.0)]),
    ]);
    assert_eq!(res.unwrap(), Outcome::Bound { name: "x".to_owned(), value: expected.clone() });
    assert_eq!(env.get("x").unwrap(), expected);
    assert_eq!(expected.to_string(), "[1.0, 2.0, [2.0, 3.0]]");
  }

  #[test]
  fn null_checks_for_an_empty_quoted_list() {
    assert_eq!(eval("(null? '())").unwrap(), Value::Boolean(true));
    assert_eq!(eval("(null? '(1))").unwrap(), Value::Boolean(false));
  }

  #[test]
  fn assignment_overwrites() {
    let mut env = Env::new();
    eval_in(&mut env, "x = (+ 1 1)", Options::default()).0.unwrap();
    eval_in(&mut env, "x = (list \"a\")", Options::default()).0.unwrap();

    assert_eq!(env.get("x").unwrap(), Value::Sequence(vec![text("a")]));
  }
}
