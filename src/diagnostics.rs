// SPDX-License-Identifier: PMPL-1.0-or-later

//! Self-check of a problem database (`crelle doctor`).

use crate::document::{missing_markers, unknown_markers};
use crate::i18n::Lang;
use crate::settings::Settings;
use crate::store::FsStore;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Warn,
    Error,
}

impl Level {
    pub fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERR",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub label: String,
    pub level: Level,
    pub detail: String,
}

impl Diagnostic {
    fn new(label: impl Into<String>, level: Level, detail: String) -> Self {
        Self {
            label: label.into(),
            level,
            detail,
        }
    }

    fn ok(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: impl Into<String>, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }
}

pub fn run(settings: &Settings) -> Vec<Diagnostic> {
    let mut checks = vec![Diagnostic::ok(
        "version",
        format!("crelle {}", env!("CARGO_PKG_VERSION")),
    )];

    checks.push(check_directory("database", &settings.database));
    checks.push(check_directory("problem directory", &settings.problem_root()));
    checks.push(check_directory("template directory", &settings.template_root()));
    checks.push(check_language(&settings.default_language));

    let store = FsStore::new(settings);
    if store.template_root().is_dir() {
        checks.extend(check_templates(&store));
    }
    if store.problem_root().is_dir() {
        checks.push(check_records(&store));
    }
    checks
}

pub fn has_errors(checks: &[Diagnostic]) -> bool {
    checks.iter().any(|check| check.level == Level::Error)
}

fn check_directory(label: &str, path: &Path) -> Diagnostic {
    if path.is_dir() {
        Diagnostic::ok(label, format!("{} exists", path.display()))
    } else if path.exists() {
        Diagnostic::error(
            label,
            format!("{} exists but is not a directory", path.display()),
        )
    } else {
        Diagnostic::error(label, format!("{} missing", path.display()))
    }
}

fn check_language(code: &str) -> Diagnostic {
    match Lang::from_code(code) {
        Some(lang) => Diagnostic::ok("default language", format!("{} ({})", code, lang.name())),
        None => Diagnostic::warning(
            "default language",
            format!(
                "'{}' is not a document language (known: {})",
                code,
                Lang::all()
                    .iter()
                    .map(|l| l.code())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        ),
    }
}

fn check_templates(store: &FsStore) -> Vec<Diagnostic> {
    let ids = match store.template_ids() {
        Ok(ids) => ids,
        Err(err) => return vec![Diagnostic::error("templates", err.to_string())],
    };
    if ids.is_empty() {
        return vec![Diagnostic::warning(
            "templates",
            "no templates found".to_string(),
        )];
    }

    ids.into_iter()
        .map(|id| {
            let label = format!("template {}", id);
            let path = store.template_root().join(&id);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    return Diagnostic::error(label, format!("unreadable: {}", err));
                }
            };
            let missing = missing_markers(&text);
            let unknown = unknown_markers(&text);
            if missing.is_empty() && unknown.is_empty() {
                Diagnostic::ok(label, "all markers present".to_string())
            } else {
                let mut notes = Vec::new();
                if !missing.is_empty() {
                    notes.push(format!("missing {}", missing.join(" ")));
                }
                if !unknown.is_empty() {
                    notes.push(format!("unknown {}", unknown.join(" ")));
                }
                Diagnostic::warning(label, notes.join("; "))
            }
        })
        .collect()
}

fn check_records(store: &FsStore) -> Diagnostic {
    match store.record_ids() {
        Ok(ids) if ids.is_empty() => {
            Diagnostic::warning("problem records", "no records found".to_string())
        }
        Ok(ids) => Diagnostic::ok("problem records", format!("{} records", ids.len())),
        Err(err) => Diagnostic::error("problem records", err.to_string()),
    }
}
