//! Index name validation shared by every request that names an index.

/// Characters that may never appear in an index name.
pub const INVALID_INDEX_NAME_CHARS: [char; 10] =
  ['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ','];

pub const DEFAULT_MAX_INDEX_NAME_BYTES: usize = 255;

/// A policy that reports problems with an index name.
///
/// Implementations append zero or more human-readable messages to `errors`
/// and never fail themselves, so several names can be checked into one
/// accumulating list.
pub trait NameValidator {
  fn validate_name(&self, name: &str, errors: &mut Vec<String>);
}

impl<F> NameValidator for F
where
  F: Fn(&str, &mut Vec<String>),
{
  fn validate_name(&self, name: &str, errors: &mut Vec<String>) {
    self(name, errors)
  }
}

/// Default index naming rules.
#[derive(Debug, Clone)]
pub struct IndexNamePolicy {
  /// Maximum length of a name in UTF-8 bytes
  pub max_bytes: usize,
}

impl Default for IndexNamePolicy {
  fn default() -> Self {
    Self {
      max_bytes: DEFAULT_MAX_INDEX_NAME_BYTES,
    }
  }
}

impl IndexNamePolicy {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn max_bytes(mut self, max_bytes: usize) -> Self {
    self.max_bytes = max_bytes;
    self
  }
}

impl NameValidator for IndexNamePolicy {
  fn validate_name(&self, name: &str, errors: &mut Vec<String>) {
    let mut report = |reason: String| errors.push(format!("Invalid index name [{name}], {reason}"));

    if name.is_empty() {
      report("must not be empty".to_string());
      return;
    }

    if name.contains(INVALID_INDEX_NAME_CHARS) {
      let listed = INVALID_INDEX_NAME_CHARS
        .iter()
        .map(|ch| ch.to_string())
        .collect::<Vec<_>>()
        .join(", ");
      report(format!("must not contain the following characters [{listed}]"));
    }
    if name.contains('#') {
      report("must not contain '#'".to_string());
    }
    if name.contains(':') {
      report("must not contain ':'".to_string());
    }
    if name.starts_with(['_', '-', '+']) {
      report("must not start with '_', '-', or '+'".to_string());
    }
    if name.chars().any(char::is_uppercase) {
      report("must be lowercase".to_string());
    }
    if name == "." || name == ".." {
      report("must not be '.' or '..'".to_string());
    }
    if name.len() > self.max_bytes {
      report(format!(
        "index name is too long, ({} > {})",
        name.len(),
        self.max_bytes
      ));
    }
  }
}

#[cfg(test)]
mod tests {
  use super::{IndexNamePolicy, NameValidator};

  fn check(name: &str) -> Vec<String> {
    let mut errors = Vec::new();
    IndexNamePolicy::default().validate_name(name, &mut errors);
    errors
  }

  #[test]
  fn accepts_conventional_names() {
    for name in ["logs", "leader-index", "follower_1", ".hidden", "a.b.c", "idx-2026.10.17"] {
      assert!(check(name).is_empty(), "name should pass: {name}");
    }
  }

  #[test]
  fn rejects_invalid_names() {
    let invalid = [
      "", "Upper", "with space", "a/b", "a*", "a?b", "a,b", "a#b", "a:b", "_x", "-x", "+x", ".",
      "..",
    ];

    for name in invalid {
      assert!(!check(name).is_empty(), "name should fail: {name}");
    }
  }

  #[test]
  fn reports_every_broken_rule_with_the_name() {
    let errors = check("_Bad#");
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|error| error.contains("[_Bad#]")));
    assert!(errors.iter().any(|error| error.ends_with("must be lowercase")));
  }

  #[test]
  fn enforces_byte_length() {
    let name = "a".repeat(11);
    let mut errors = Vec::new();
    IndexNamePolicy::new()
      .max_bytes(10)
      .validate_name(&name, &mut errors);
    assert_eq!(
      errors,
      vec![format!(
        "Invalid index name [{name}], index name is too long, (11 > 10)"
      )]
    );
  }

  #[test]
  fn closures_act_as_validators() {
    let deny_all = |name: &str, errors: &mut Vec<String>| errors.push(format!("denied {name}"));
    let mut errors = Vec::new();
    deny_all.validate_name("x", &mut errors);
    assert_eq!(errors, vec!["denied x".to_string()]);
  }
}
