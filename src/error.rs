// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error kinds raised while loading problems and assembling a set.
//!
//! Every variant is fatal for a build: the assembler propagates the first
//! error it meets and writes no document.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CrelleError {
    /// A problem record or document config is missing a required key or
    /// carries one that is not recognised.
    #[error("schema error in {what}: {detail}")]
    Schema { what: String, detail: String },

    /// Per-language entries of a localized value disagree on shape, or the
    /// raw value has a shape that cannot hold text at all.
    #[error("shape error: {detail}")]
    Shape { detail: String },

    #[error("no '{language}' translation (available: {})", .available.join(", "))]
    MissingTranslation {
        language: String,
        available: Vec<String>,
    },

    #[error("{kind} '{id}' not found in store")]
    StoreLookup { kind: StoreKind, id: String },

    #[error("unknown language code '{0}'")]
    UnknownLanguage(String),

    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Which part of the store a lookup went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Problem,
    Template,
    Dependency,
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            StoreKind::Problem => "problem",
            StoreKind::Template => "template",
            StoreKind::Dependency => "dependency",
        };
        f.write_str(label)
    }
}

impl CrelleError {
    pub fn schema(what: impl Into<String>, detail: impl Into<String>) -> Self {
        CrelleError::Schema {
            what: what.into(),
            detail: detail.into(),
        }
    }

    pub fn shape(detail: impl Into<String>) -> Self {
        CrelleError::Shape {
            detail: detail.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CrelleError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrelleError>;
