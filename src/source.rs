// SPDX-License-Identifier: PMPL-1.0-or-later

//! Rendering of a problem's attribution line.
//!
//! Attribution has three tiers, tried in order:
//!
//! 1. a keyword with a canonical phrase for the language (`classical` →
//!    `Klassisk`), title-cased;
//! 2. author-supplied per-language text, passed through as written;
//! 3. any other scalar, passed through unchanged.

use crate::error::Result;
use crate::localized::{LocalizedValue, Resolved};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical attribution phrases: keyword → language code → phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalSources(BTreeMap<String, BTreeMap<String, String>>);

impl CanonicalSources {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, keyword: &str, language: &str, phrase: &str) {
        self.0
            .entry(keyword.to_string())
            .or_default()
            .insert(language.to_string(), phrase.to_string());
    }

    pub fn phrase(&self, keyword: &str, language: &str) -> Option<&str> {
        self.0
            .get(keyword)
            .and_then(|phrases| phrases.get(language))
            .map(String::as_str)
    }
}

impl Default for CanonicalSources {
    fn default() -> Self {
        let mut table = Self::new();
        table.insert("classical", "eng", "classical");
        table.insert("classical", "nor", "klassisk");
        table
    }
}

/// Attribution text for `source` in `language`.
///
/// Fails only when `source` is a per-language mapping without `language`.
pub fn render_source(
    source: &LocalizedValue,
    language: &str,
    canonical: &CanonicalSources,
) -> Result<String> {
    let resolved = source.resolve(language)?;

    if let Resolved::Text(keyword) = &resolved {
        if let Some(phrase) = canonical.phrase(keyword, language) {
            return Ok(title_case(phrase));
        }
    }

    Ok(resolved.to_text())
}

/// Upper-case the first letter of every run of letters, lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CrelleError;
    use serde_yaml::Value;

    fn value(src: &str) -> LocalizedValue {
        let raw: Value = serde_yaml::from_str(src).unwrap();
        LocalizedValue::construct(&raw, "eng").unwrap()
    }

    #[test]
    fn canonical_keyword_is_translated_and_title_cased() {
        let table = CanonicalSources::default();
        assert_eq!(
            render_source(&value("classical"), "nor", &table).unwrap(),
            "Klassisk"
        );
        assert_eq!(
            render_source(&value("classical"), "eng", &table).unwrap(),
            "Classical"
        );
    }

    #[test]
    fn localized_text_is_not_title_cased() {
        let table = CanonicalSources::default();
        assert_eq!(
            render_source(&value("{eng: euclid of alexandria}"), "eng", &table).unwrap(),
            "euclid of alexandria"
        );
        assert_eq!(
            render_source(&value("{eng: Euclid}"), "eng", &table).unwrap(),
            "Euclid"
        );
    }

    #[test]
    fn unknown_scalar_passes_through() {
        let table = CanonicalSources::default();
        assert_eq!(
            render_source(&value("Smith 1990"), "eng", &table).unwrap(),
            "Smith 1990"
        );
    }

    #[test]
    fn keyword_without_phrase_for_language_passes_through() {
        let table = CanonicalSources::default();
        assert_eq!(
            render_source(&value("classical"), "deu", &table).unwrap(),
            "classical"
        );
    }

    #[test]
    fn localized_source_missing_language_fails() {
        let table = CanonicalSources::default();
        assert!(matches!(
            render_source(&value("{eng: Euclid}"), "nor", &table),
            Err(CrelleError::MissingTranslation { .. })
        ));
    }

    #[test]
    fn custom_table_entries() {
        let mut table = CanonicalSources::new();
        table.insert("folklore", "eng", "folklore");
        assert_eq!(
            render_source(&value("folklore"), "eng", &table).unwrap(),
            "Folklore"
        );
        assert_eq!(
            render_source(&value("classical"), "nor", &table).unwrap(),
            "classical"
        );
    }

    #[test]
    fn title_case_matches_word_runs() {
        assert_eq!(title_case("klassisk"), "Klassisk");
        assert_eq!(title_case("løsning"), "Løsning");
        assert_eq!(title_case("imo shortlist 2003"), "Imo Shortlist 2003");
        assert_eq!(title_case("nORDIC"), "Nordic");
        assert_eq!(title_case(""), "");
    }
}
