//! Structural validation of a raw provisioner block.
//!
//! Works on the untyped `serde_yaml::Value` handed over by the host
//! configuration system, before any typed deserialization, so that every
//! problem in the block is reported together. Validation is pure: no file
//! is touched here, script paths are only checked for their type.

use serde_yaml::Value;

use crate::config::{MULTIPLE_SET, NONE_SET};
use crate::error::RemoteExecError;

/// Keys understood by a provisioner block.
pub const RECOGNIZED_KEYS: &[&str] = &["inline", "script", "scripts"];

/// Outcome of [`validate`].
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// Non-fatal findings.
    pub warnings: Vec<String>,
    /// Fatal findings, each a [`RemoteExecError::Config`].
    pub errors: Vec<RemoteExecError>,
}

impl ValidationReport {
    /// Returns true if no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapses the report into a single error listing every finding.
    pub fn into_result(self) -> Result<(), RemoteExecError> {
        let mut errors = self.errors;
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => {
                let messages = errors
                    .iter()
                    .map(|e| match e {
                        RemoteExecError::Config(msg) => msg.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                Err(RemoteExecError::Config(messages))
            }
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(RemoteExecError::Config(message.into()));
    }
}

/// Validates a raw provisioner block against the recognized keys.
///
/// Reports unrecognized keys, values of the wrong type, and blocks that set
/// none or more than one of `inline`, `script` and `scripts`. A block with
/// exactly one populated mode and only recognized keys yields an empty
/// report.
pub fn validate(raw: &Value, recognized: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mapping = match raw {
        Value::Mapping(mapping) => mapping,
        Value::Null => {
            report.error(NONE_SET);
            return report;
        }
        other => {
            report.error(format!("provisioner block must be a mapping, got {}", kind(other)));
            return report;
        }
    };

    let mut populated = 0usize;
    let mut mistyped = false;
    for (key, value) in mapping {
        let Some(key) = key.as_str() else {
            report.error(format!("provisioner block keys must be strings, got {}", kind(key)));
            continue;
        };
        if !recognized.contains(&key) {
            report.error(format!(
                "unrecognized key '{}' (expected one of: {})",
                key,
                recognized.join(", ")
            ));
            continue;
        }

        match check_value(key, value) {
            Ok(true) => populated += 1,
            Ok(false) => {}
            Err(message) => {
                mistyped = true;
                report.error(message);
            }
        }
    }

    match populated {
        1 => {}
        // A type error already explains why nothing usable was found.
        0 if mistyped => {}
        0 => report.error(NONE_SET),
        _ => report.error(MULTIPLE_SET),
    }

    report
}

/// Checks the type of a recognized key's value.
///
/// Returns whether the value populates its mode (non-empty).
fn check_value(key: &str, value: &Value) -> Result<bool, String> {
    match (key, value) {
        (_, Value::Null) => Ok(false),
        ("inline", Value::String(command)) => Ok(!command.is_empty()),
        ("script", Value::String(path)) => Ok(!path.is_empty()),
        ("inline" | "scripts", Value::Sequence(items)) => {
            if let Some((index, item)) = items.iter().enumerate().find(|(_, v)| !v.is_string()) {
                return Err(format!(
                    "'{}' entry {} must be a string, got {}",
                    key,
                    index + 1,
                    kind(item)
                ));
            }
            Ok(!items.is_empty())
        }
        ("inline", other) => {
            Err(format!("'inline' must be a string or a list of strings, got {}", kind(other)))
        }
        ("script", other) => Err(format!("'script' must be a string, got {}", kind(other))),
        ("scripts", other) => {
            Err(format!("'scripts' must be a list of strings, got {}", kind(other)))
        }
        // Extra recognized keys supplied by the caller carry no type rule here.
        _ => Ok(false),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
