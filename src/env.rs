use std::collections::HashMap;
use crate::error::{Error, Result};
use crate::value::Value;

type Values = HashMap<String, Value>;

/// The flat, global binding table. Entries are added or overwritten, never
/// removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
  values: Values,
}

impl Env {
  pub fn new() -> Self {
    Self {
      values: HashMap::new(),
    }
  }

  pub fn from(values: Values) -> Self {
    Self {
      values,
    }
  }

  pub fn get(&self, name: &str) -> Result<Value> {
    match self.values.get(name) {
      Some(value) => Ok(value.clone()),
      None => Err(Error::UnboundIdentifier(name.to_owned())),
    }
  }

  pub fn set(&mut self, name: String, value: Value) {
    self.values.insert(name, value);
  }

  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Bindings ordered by name.
  pub fn bindings(&self) -> Vec<(&str, &Value)> {
    let mut bindings = self.values
      .iter()
      .map(|(name, value)| (name.as_str(), value))
      .collect::<Vec<_>>();
    bindings.sort_by(|a, b| a.0.cmp(b.0));
    bindings
  }
}
