// SPDX-License-Identifier: PMPL-1.0-or-later

//! Key validation for YAML mappings with a fixed set of fields.

use crate::error::{CrelleError, Result};
use crate::localized::{describe, scalar_text};
use serde_yaml::{Mapping, Value};

/// Allowed keys of a YAML record.
pub struct Schema {
    /// Human label used in error messages, e.g. `problem record`.
    pub name: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl Schema {
    /// Check `raw` is a mapping whose keys are all known and which contains
    /// every required key. `origin` names the file or identifier in errors.
    pub fn validate<'a>(&self, raw: &'a Value, origin: &str) -> Result<&'a Mapping> {
        let what = format!("{} '{}'", self.name, origin);
        let map = raw.as_mapping().ok_or_else(|| {
            CrelleError::schema(&what, format!("expected a mapping, found {}", describe(raw)))
        })?;

        let mut unknown = Vec::new();
        for key in map.keys() {
            match key.as_str() {
                Some(k) if self.required.contains(&k) || self.optional.contains(&k) => {}
                _ => unknown.push(scalar_text(key).unwrap_or_else(|| describe(key).to_string())),
            }
        }
        if !unknown.is_empty() {
            return Err(CrelleError::schema(
                &what,
                format!("unrecognised keys: {}", unknown.join(", ")),
            ));
        }

        let missing: Vec<&str> = self
            .required
            .iter()
            .copied()
            .filter(|k| !map.contains_key(*k))
            .collect();
        if !missing.is_empty() {
            return Err(CrelleError::schema(
                &what,
                format!("missing required keys: {}", missing.join(", ")),
            ));
        }

        Ok(map)
    }
}

/// Read a list of text values, e.g. tags or dependency filenames.
pub(crate) fn text_list(value: &Value, what: &str, field: &str) -> Result<Vec<String>> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| {
                    CrelleError::schema(
                        what,
                        format!("'{}' entries must be text, found {}", field, describe(item)),
                    )
                })
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(CrelleError::schema(
            what,
            format!("'{}' must be a list, found {}", field, describe(other)),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: Schema = Schema {
        name: "record",
        required: &["a", "b"],
        optional: &["c"],
    };

    #[test]
    fn accepts_required_and_optional() {
        let raw: Value = serde_yaml::from_str("{a: 1, b: 2, c: 3}").unwrap();
        assert_eq!(RECORD.validate(&raw, "x").unwrap().len(), 3);
    }

    #[test]
    fn reports_missing_keys() {
        let raw: Value = serde_yaml::from_str("{a: 1}").unwrap();
        let err = RECORD.validate(&raw, "x.yaml").unwrap_err().to_string();
        assert!(err.contains("missing required keys: b"), "{err}");
        assert!(err.contains("x.yaml"), "{err}");
    }

    #[test]
    fn reports_unknown_keys() {
        let raw: Value = serde_yaml::from_str("{a: 1, b: 2, hint: 3}").unwrap();
        let err = RECORD.validate(&raw, "x").unwrap_err().to_string();
        assert!(err.contains("unrecognised keys: hint"), "{err}");
    }

    #[test]
    fn rejects_non_mapping() {
        let raw: Value = serde_yaml::from_str("[a, b]").unwrap();
        assert!(matches!(
            RECORD.validate(&raw, "x"),
            Err(CrelleError::Schema { .. })
        ));
    }

    #[test]
    fn text_list_accepts_null_as_empty() {
        assert!(text_list(&Value::Null, "x", "tags").unwrap().is_empty());
    }

    #[test]
    fn text_list_rejects_scalar() {
        let raw = Value::String("a.png".to_string());
        assert!(text_list(&raw, "x", "dependencies").is_err());
    }
}
