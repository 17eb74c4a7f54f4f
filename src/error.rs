//! Error types for the replication request contract.

use std::fmt;
use thiserror::Error;

/// Aggregate of every business-rule violation found by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
  errors: Vec<String>,
}

impl ValidationErrors {
  pub fn new(errors: Vec<String>) -> Self {
    Self { errors }
  }

  pub fn errors(&self) -> &[String] {
    &self.errors
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn contains(&self, message: &str) -> bool {
    self.errors.iter().any(|error| error == message)
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Validation Failed: ")?;
    for (idx, error) in self.errors.iter().enumerate() {
      write!(f, "{}: {error};", idx + 1)?;
    }
    Ok(())
  }
}

impl std::error::Error for ValidationErrors {}

#[derive(Debug, Error)]
pub enum CcrError {
  #[error("Invalid document: {0}")]
  Parse(String),

  #[error("Invalid wire data: {0}")]
  InvalidWire(String),

  #[error("CRC mismatch: stored={stored:#010x}, computed={computed:#010x}")]
  CrcMismatch { stored: u32, computed: u32 },

  #[error("{0}")]
  Validation(#[from] ValidationErrors),

  #[error("Serialization error: {0}")]
  Serialization(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CcrError>;

#[cfg(test)]
mod tests {
  use super::{CcrError, ValidationErrors};

  #[test]
  fn validation_errors_display_numbers_every_message() {
    let errors = ValidationErrors::new(vec!["first".to_string(), "second".to_string()]);
    assert_eq!(errors.to_string(), "Validation Failed: 1: first;2: second;");
  }

  #[test]
  fn validation_errors_convert_into_crate_error() {
    let error: CcrError = ValidationErrors::new(vec!["oops".to_string()]).into();
    match error {
      CcrError::Validation(inner) => assert!(inner.contains("oops")),
      other => panic!("unexpected error: {other}"),
    }
  }
}
