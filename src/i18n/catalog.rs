// SPDX-License-Identifier: PMPL-1.0-or-later

//! Label catalog for the recognised document languages.
//!
//! A problem set can only be typeset in one of the languages listed here.
//! Problem content itself may carry any language code; only the document
//! language must be recognised, because the template labels come from this
//! table.
//!
//! ## Adding a new language
//!
//! 1. Add a variant to [`Lang`]
//! 2. Add its code to `Lang::code()` and `Lang::from_code()`
//! 3. Add a `const XX: &[(&str, &str)]` label table below
//! 4. Add `Lang::Xx => XX` to the match in `catalog_for()`

use serde::{Deserialize, Serialize};

/// Recognised document languages, keyed by ISO 639-2 three-letter codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    Eng,
    Nor,
}

impl Lang {
    pub fn code(&self) -> &'static str {
        match self {
            Lang::Eng => "eng",
            Lang::Nor => "nor",
        }
    }

    /// Parse a three-letter code. Case-sensitive, like the keys authors
    /// write in problem records.
    pub fn from_code(code: &str) -> Option<Lang> {
        match code {
            "eng" => Some(Lang::Eng),
            "nor" => Some(Lang::Nor),
            _ => None,
        }
    }

    pub fn all() -> &'static [Lang] {
        &[Lang::Eng, Lang::Nor]
    }

    /// English name of the language, used in CLI listings.
    pub fn name(&self) -> &'static str {
        match self {
            Lang::Eng => "english",
            Lang::Nor => "norwegian",
        }
    }

    /// Lower-case label for the given key, or `None` if this language has no
    /// entry for it.
    pub fn label(&self, key: &str) -> Option<&'static str> {
        lookup(catalog_for(*self), key)
    }

    /// Label for the problem environment heading.
    pub fn problem_label(&self) -> &'static str {
        self.label("problem").unwrap_or("problem")
    }

    /// Label for the solution environment heading.
    pub fn solution_label(&self) -> &'static str {
        self.label("solution").unwrap_or("solution")
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

fn lookup(catalog: &'static [(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    catalog.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
}

fn catalog_for(lang: Lang) -> &'static [(&'static str, &'static str)] {
    match lang {
        Lang::Eng => ENG,
        Lang::Nor => NOR,
    }
}

const ENG: &[(&str, &str)] = &[("problem", "problem"), ("solution", "solution")];

const NOR: &[(&str, &str)] = &[("problem", "oppgave"), ("solution", "løsning")];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for lang in Lang::all() {
            assert_eq!(Lang::from_code(lang.code()), Some(*lang));
        }
    }

    #[test]
    fn unknown_codes_rejected() {
        assert_eq!(Lang::from_code("deu"), None);
        assert_eq!(Lang::from_code("ENG"), None);
        assert_eq!(Lang::from_code("en"), None);
        assert_eq!(Lang::from_code(""), None);
    }

    #[test]
    fn every_language_has_both_labels() {
        for lang in Lang::all() {
            assert!(lang.label("problem").is_some(), "{lang} lacks problem");
            assert!(lang.label("solution").is_some(), "{lang} lacks solution");
        }
    }

    #[test]
    fn norwegian_labels() {
        assert_eq!(Lang::Nor.problem_label(), "oppgave");
        assert_eq!(Lang::Nor.solution_label(), "løsning");
    }

    #[test]
    fn unknown_label_key_is_none() {
        assert_eq!(Lang::Eng.label("hint"), None);
    }
}
