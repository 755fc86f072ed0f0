// SPDX-License-Identifier: PMPL-1.0-or-later

//! Content that may exist in one language, in several, or as an ordered list
//! of sub-parts.
//!
//! Authors write localized text in three ways:
//!
//! ```yaml
//! source: Euler                 # scalar, no language tag
//! problem:                      # mapping from language code to content
//!   eng: Prove that ...
//!   nor: Vis at ...
//! problem:                      # sequence of parts, each scalar or mapping
//!   - {eng: Let n be odd., nor: La n være odde.}
//!   - {eng: Show A., nor: Vis A.}
//! ```
//!
//! The only operation on a [`LocalizedValue`] is [`LocalizedValue::resolve`].
//! Resolution is strict: a mapping without the requested language fails,
//! even when the default language is present.

use crate::error::{CrelleError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedValue {
    repr: Repr,
}

#[derive(Debug, Clone, PartialEq)]
enum Repr {
    /// Untagged content. `language` records the default language it was
    /// attributed to at construction; resolution ignores it.
    Scalar { text: String, language: String },
    /// Language code to content. All values share one shape.
    Localized(BTreeMap<String, LocalizedValue>),
    Sequence(Vec<LocalizedValue>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Text,
    List,
}

impl Shape {
    fn describe(self) -> &'static str {
        match self {
            Shape::Text => "text",
            Shape::List => "a list",
        }
    }
}

/// A localized value after resolution to a single language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Text(String),
    Parts(Vec<Resolved>),
}

impl LocalizedValue {
    /// Normalise a parsed YAML value.
    ///
    /// Mappings become localized values; their entries must all be text or
    /// all be lists. Anything else is attributed to `default_language`.
    pub fn construct(raw: &Value, default_language: &str) -> Result<Self> {
        match raw {
            Value::Mapping(map) => {
                let mut entries = BTreeMap::new();
                let mut shapes: Vec<(String, Shape)> = Vec::new();
                for (key, value) in map {
                    let language = scalar_text(key).ok_or_else(|| {
                        CrelleError::shape(format!(
                            "language keys must be text, found {}",
                            describe(key)
                        ))
                    })?;
                    let (entry, shape) = language_entry(value, &language)?;
                    shapes.push((language.clone(), shape));
                    entries.insert(language, entry);
                }
                if let Some((first_lang, first_shape)) = shapes.first() {
                    if let Some((lang, shape)) =
                        shapes.iter().find(|(_, shape)| shape != first_shape)
                    {
                        return Err(CrelleError::shape(format!(
                            "mixed shapes: '{}' is {} but '{}' is {}",
                            first_lang,
                            first_shape.describe(),
                            lang,
                            shape.describe()
                        )));
                    }
                }
                Ok(Self {
                    repr: Repr::Localized(entries),
                })
            }
            Value::Sequence(items) => {
                let parts = items
                    .iter()
                    .map(|item| match item {
                        Value::Sequence(_) => Err(CrelleError::shape(
                            "a list part cannot itself be a list",
                        )),
                        other => Self::construct(other, default_language),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self {
                    repr: Repr::Sequence(parts),
                })
            }
            other => Ok(Self::scalar(required_text(other)?, default_language)),
        }
    }

    pub fn scalar(text: impl Into<String>, language: &str) -> Self {
        Self {
            repr: Repr::Scalar {
                text: text.into(),
                language: language.to_string(),
            },
        }
    }

    /// An empty localized mapping. Resolving it always fails.
    pub fn empty() -> Self {
        Self {
            repr: Repr::Localized(BTreeMap::new()),
        }
    }

    /// Resolve to `language`.
    ///
    /// Scalars resolve to themselves for every language. Mappings require an
    /// exact key. Sequences resolve element by element in order.
    pub fn resolve(&self, language: &str) -> Result<Resolved> {
        match &self.repr {
            Repr::Scalar { text, .. } => Ok(Resolved::Text(text.clone())),
            Repr::Localized(entries) => match entries.get(language) {
                Some(entry) => entry.resolve(language),
                None => Err(CrelleError::MissingTranslation {
                    language: language.to_string(),
                    available: entries.keys().cloned().collect(),
                }),
            },
            Repr::Sequence(parts) => parts
                .iter()
                .map(|part| part.resolve(language))
                .collect::<Result<Vec<_>>>()
                .map(Resolved::Parts),
        }
    }

    /// Language a scalar was attributed to when it was constructed.
    pub fn default_language(&self) -> Option<&str> {
        match &self.repr {
            Repr::Scalar { language, .. } => Some(language),
            _ => None,
        }
    }
}

impl Resolved {
    /// Flatten to typesetting text.
    ///
    /// The first part of a list is common text; any further parts become
    /// items of an `enumerate` environment, one per subproblem.
    pub fn to_text(&self) -> String {
        match self {
            Resolved::Text(text) => text.clone(),
            Resolved::Parts(parts) => {
                let Some((head, rest)) = parts.split_first() else {
                    return String::new();
                };
                let mut text = head.to_text();
                if !rest.is_empty() {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str("\\begin{enumerate}\n");
                    for part in rest {
                        text.push_str("\\item ");
                        text.push_str(&part.to_text());
                        text.push('\n');
                    }
                    text.push_str("\\end{enumerate}");
                }
                text
            }
        }
    }

    /// True when every resolved part is empty text.
    pub fn is_empty(&self) -> bool {
        match self {
            Resolved::Text(text) => text.is_empty(),
            Resolved::Parts(parts) => parts.iter().all(Resolved::is_empty),
        }
    }
}

/// Content stored under one language key: text or a list of text.
fn language_entry(value: &Value, language: &str) -> Result<(LocalizedValue, Shape)> {
    match value {
        Value::Sequence(items) => {
            let parts = items
                .iter()
                .map(|item| {
                    required_text(item).map(|text| LocalizedValue::scalar(text, language))
                })
                .collect::<Result<Vec<_>>>()?;
            Ok((
                LocalizedValue {
                    repr: Repr::Sequence(parts),
                },
                Shape::List,
            ))
        }
        Value::Mapping(_) => Err(CrelleError::shape(format!(
            "entry for '{}' is a mapping; expected text or a list",
            language
        ))),
        other => Ok((
            LocalizedValue::scalar(required_text(other)?, language),
            Shape::Text,
        )),
    }
}

fn required_text(value: &Value) -> Result<String> {
    scalar_text(value).ok_or_else(|| {
        CrelleError::shape(format!("expected text, found {}", describe(value)))
    })
}

/// Text of a YAML scalar. Numbers and booleans keep their written form.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "text",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    fn text(s: &str) -> Resolved {
        Resolved::Text(s.to_string())
    }

    #[test]
    fn mixed_shapes_are_rejected() {
        let raw = yaml("{eng: a, nor: [b, c]}");
        let err = LocalizedValue::construct(&raw, "eng").unwrap_err();
        assert!(matches!(err, CrelleError::Shape { .. }), "{err}");
    }

    #[test]
    fn uniform_list_shapes_are_accepted() {
        let raw = yaml("{eng: [a, b], nor: [c]}");
        let value = LocalizedValue::construct(&raw, "eng").unwrap();
        assert_eq!(
            value.resolve("nor").unwrap(),
            Resolved::Parts(vec![text("c")])
        );
    }

    #[test]
    fn scalar_resolves_for_any_language() {
        let value = LocalizedValue::construct(&yaml("hello"), "eng").unwrap();
        for lang in ["eng", "nor", "deu", "xyz"] {
            assert_eq!(value.resolve(lang).unwrap(), text("hello"));
        }
        assert_eq!(value.default_language(), Some("eng"));
    }

    #[test]
    fn numbers_are_kept_as_written() {
        let value = LocalizedValue::construct(&yaml("1990"), "eng").unwrap();
        assert_eq!(value.resolve("nor").unwrap(), text("1990"));
    }

    #[test]
    fn missing_language_has_no_fallback() {
        let value = LocalizedValue::construct(&yaml("{eng: hi}"), "eng").unwrap();
        match value.resolve("nor") {
            Err(CrelleError::MissingTranslation {
                language,
                available,
            }) => {
                assert_eq!(language, "nor");
                assert_eq!(available, vec!["eng".to_string()]);
            }
            other => panic!("expected missing translation, got {other:?}"),
        }
    }

    #[test]
    fn sequence_keeps_order_and_resolves_each_part() {
        let raw = yaml(
            "- common\n- {eng: first, nor: første}\n- {eng: second, nor: andre}\n- last",
        );
        let value = LocalizedValue::construct(&raw, "eng").unwrap();
        assert_eq!(
            value.resolve("nor").unwrap(),
            Resolved::Parts(vec![
                text("common"),
                text("første"),
                text("andre"),
                text("last")
            ])
        );
    }

    #[test]
    fn sequence_fails_if_any_part_lacks_language() {
        let raw = yaml("- {eng: one, nor: en}\n- {eng: two}");
        let value = LocalizedValue::construct(&raw, "eng").unwrap();
        assert!(value.resolve("nor").is_err());
        assert!(value.resolve("eng").is_ok());
    }

    #[test]
    fn nested_lists_are_rejected() {
        let raw = yaml("- [a, b]");
        assert!(matches!(
            LocalizedValue::construct(&raw, "eng"),
            Err(CrelleError::Shape { .. })
        ));
    }

    #[test]
    fn mapping_inside_language_entry_is_rejected() {
        let raw = yaml("{eng: {nor: x}}");
        assert!(matches!(
            LocalizedValue::construct(&raw, "eng"),
            Err(CrelleError::Shape { .. })
        ));
    }

    #[test]
    fn null_is_not_text() {
        assert!(LocalizedValue::construct(&Value::Null, "eng").is_err());
    }

    #[test]
    fn empty_mapping_never_resolves() {
        assert!(LocalizedValue::empty().resolve("eng").is_err());
    }

    #[test]
    fn parts_render_as_enumerate() {
        let resolved = Resolved::Parts(vec![text("Let n be odd."), text("Show A."), text("Show B.")]);
        assert_eq!(
            resolved.to_text(),
            "Let n be odd.\n\\begin{enumerate}\n\\item Show A.\n\\item Show B.\n\\end{enumerate}"
        );
    }

    #[test]
    fn single_part_renders_without_enumerate() {
        assert_eq!(Resolved::Parts(vec![text("only")]).to_text(), "only");
        assert_eq!(Resolved::Parts(vec![]).to_text(), "");
    }

    #[test]
    fn emptiness() {
        assert!(text("").is_empty());
        assert!(Resolved::Parts(vec![text(""), text("")]).is_empty());
        assert!(!Resolved::Parts(vec![text(""), text("x")]).is_empty());
    }
}
