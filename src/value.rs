use std::cmp::Ordering;
use std::fmt;
use std::fmt::Formatter;
use crate::ast::Literal;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Number(f64),
  /// Stored with its surrounding `"` quotes.
  Text(String),
  Boolean(bool),
  Sequence(Vec<Value>),
  /// Selecting past the end of a quoted list.
  Empty,
  Unit,
  /// What an arithmetic form with no operands evaluates to.
  Symbol(String),
}

impl Value {
  pub fn type_name(&self) -> &'static str {
    match self {
      Value::Number(_) => "number",
      Value::Text(_) => "text",
      Value::Boolean(_) => "boolean",
      Value::Sequence(_) => "sequence",
      Value::Empty => "empty",
      Value::Unit => "unit",
      Value::Symbol(_) => "symbol",
    }
  }

  pub fn same_type(&self, other: &Value) -> bool {
    std::mem::discriminant(self) == std::mem::discriminant(other)
  }

  /// Orders two values of the same type. `None` for mixed types and for
  /// comparisons involving NaN.
  pub fn ordering(&self, other: &Value) -> Option<Ordering> {
    match (self, other) {
      (Value::Number(left), Value::Number(right)) => left.partial_cmp(right),
      (Value::Text(left), Value::Text(right)) => Some(left.cmp(right)),
      (Value::Boolean(left), Value::Boolean(right)) => Some(left.cmp(right)),
      (Value::Symbol(left), Value::Symbol(right)) => Some(left.cmp(right)),
      (Value::Sequence(left), Value::Sequence(right)) => {
        for (l, r) in left.iter().zip(right) {
          match l.ordering(r)? {
            Ordering::Equal => continue,
            ordering => return Some(ordering),
          }
        }
        Some(left.len().cmp(&right.len()))
      }
      (Value::Empty, Value::Empty) | (Value::Unit, Value::Unit) => Some(Ordering::Equal),
      _ => None,
    }
  }

  /// Text as it is shown to a user, without the stored quotes.
  pub fn unquote(text: &str) -> &str {
    text
      .strip_prefix('"')
      .and_then(|inner| inner.strip_suffix('"'))
      .unwrap_or(text)
  }
}

impl From<&Literal> for Value {
  fn from(literal: &Literal) -> Self {
    match literal {
      Literal::Number(n) => Value::Number(*n),
      Literal::Text(s) => Value::Text(s.clone()),
      Literal::Boolean(b) => Value::Boolean(*b),
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Value::Number(n) => write!(f, "{:?}", n),
      Value::Text(s) => write!(f, "{}", s),
      Value::Boolean(b) => f.write_str(if *b { "#t" } else { "#f" }),
      Value::Sequence(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", item)?;
        }
        f.write_str("]")
      }
      Value::Empty => f.write_str("[]"),
      Value::Unit => f.write_str("nil"),
      Value::Symbol(s) => write!(f, "{}", s),
    }
  }
}
