// SPDX-License-Identifier: PMPL-1.0-or-later

//! Problem records and the loader that turns a reference into resolved
//! fragments for one language.

use crate::error::{CrelleError, Result};
use crate::localized::{describe, scalar_text, LocalizedValue};
use crate::schema::{text_list, Schema};
use crate::settings::Settings;
use crate::source::render_source;
use crate::store::Store;
use serde_yaml::Value;
use tracing::debug;

const PROBLEM_SCHEMA: Schema = Schema {
    name: "problem record",
    required: &["tags", "source", "problem"],
    optional: &["dependencies", "preamble", "solution"],
};

/// One authored problem as stored in the database.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemRecord {
    pub tags: Vec<String>,
    pub source: LocalizedValue,
    pub statement: LocalizedValue,
    pub solution: Option<LocalizedValue>,
    pub dependencies: Vec<String>,
    pub preamble: String,
}

impl ProblemRecord {
    /// Validate and normalise a parsed record. `origin` names the record in
    /// error messages.
    pub fn from_yaml(raw: &Value, origin: &str, default_language: &str) -> Result<Self> {
        let map = PROBLEM_SCHEMA.validate(raw, origin)?;
        let what = format!("problem record '{}'", origin);
        let field = |key: &str| map.get(key).filter(|v| !v.is_null());

        let tags = match map.get("tags") {
            Some(value) => text_list(value, &what, "tags")?,
            None => Vec::new(),
        };
        let source = LocalizedValue::construct(&map["source"], default_language)
            .map_err(|e| in_field(e, &what, "source"))?;
        let statement = LocalizedValue::construct(&map["problem"], default_language)
            .map_err(|e| in_field(e, &what, "problem"))?;
        let solution = field("solution")
            .map(|raw| {
                LocalizedValue::construct(raw, default_language)
                    .map_err(|e| in_field(e, &what, "solution"))
            })
            .transpose()?;
        let dependencies = match field("dependencies") {
            Some(value) => text_list(value, &what, "dependencies")?,
            None => Vec::new(),
        };
        let preamble = match field("preamble") {
            Some(value) => scalar_text(value).ok_or_else(|| {
                CrelleError::schema(
                    &what,
                    format!("'preamble' must be text, found {}", describe(value)),
                )
            })?,
            None => String::new(),
        };

        Ok(Self {
            tags,
            source,
            statement,
            solution,
            dependencies,
            preamble,
        })
    }
}

fn in_field(err: CrelleError, what: &str, field: &str) -> CrelleError {
    match err {
        CrelleError::Shape { detail } => CrelleError::shape(format!("{what}, '{field}': {detail}")),
        other => other,
    }
}

/// An entry of a document's problem list.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemReference {
    /// Text inserted into the body as written.
    Literal(String),
    /// Per-language text, resolved to the document language and then
    /// inserted like a literal.
    Inline(LocalizedValue),
    /// Identifier of a record in the problem store.
    Stored(String),
}

impl ProblemReference {
    /// Interpret one YAML list entry.
    ///
    /// A string names a stored record, `{literal: text}` is a literal and
    /// any other mapping is per-language inline text.
    pub fn from_yaml(raw: &Value, default_language: &str) -> Result<Self> {
        match raw {
            Value::String(id) => Ok(ProblemReference::Stored(id.clone())),
            Value::Mapping(map) if map.len() == 1 && map.contains_key("literal") => {
                let text = scalar_text(&map["literal"]).ok_or_else(|| {
                    CrelleError::schema("problem list", "'literal' entries must be text")
                })?;
                Ok(ProblemReference::Literal(text))
            }
            Value::Mapping(_) => Ok(ProblemReference::Inline(LocalizedValue::construct(
                raw,
                default_language,
            )?)),
            other => Err(CrelleError::schema(
                "problem list",
                format!(
                    "entries must be a record name or a mapping, found {}",
                    describe(other)
                ),
            )),
        }
    }
}

/// A stored problem resolved to one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemFragments {
    /// Identifier the problem was loaded from, echoed into the output.
    pub origin_id: String,
    pub source_display: String,
    pub statement_text: String,
    /// Empty when the record has no solution.
    pub solution_text: String,
    pub dependencies: Vec<String>,
    pub preamble_fragment: String,
}

/// Result of loading one problem reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    Literal(String),
    Problem(ProblemFragments),
}

/// Load `reference` and resolve it to `language`.
///
/// Any failure aborts: a missing record, a schema violation, a shape error
/// or a missing translation.
pub fn load(
    reference: &ProblemReference,
    language: &str,
    settings: &Settings,
    store: &dyn Store,
) -> Result<Loaded> {
    match reference {
        ProblemReference::Literal(text) => Ok(Loaded::Literal(text.clone())),
        ProblemReference::Inline(value) => Ok(Loaded::Literal(value.resolve(language)?.to_text())),
        ProblemReference::Stored(id) => {
            let raw = store.read_record(id)?;
            let record = ProblemRecord::from_yaml(&raw, id, &settings.default_language)?;
            let fragments = fragments(&record, id, language, settings)?;
            debug!(
                record = id.as_str(),
                dependencies = fragments.dependencies.len(),
                "loaded problem"
            );
            Ok(Loaded::Problem(fragments))
        }
    }
}

/// Resolve every field of `record` to `language`.
pub fn fragments(
    record: &ProblemRecord,
    origin_id: &str,
    language: &str,
    settings: &Settings,
) -> Result<ProblemFragments> {
    let statement_text = record.statement.resolve(language)?.to_text();
    let solution_text = match &record.solution {
        Some(solution) => {
            let resolved = solution.resolve(language)?;
            if resolved.is_empty() {
                String::new()
            } else {
                resolved.to_text()
            }
        }
        None => String::new(),
    };
    let source_display = render_source(&record.source, language, &settings.canonical_sources)?;

    Ok(ProblemFragments {
        origin_id: origin_id.to_string(),
        source_display,
        statement_text,
        solution_text,
        dependencies: record.dependencies.clone(),
        preamble_fragment: record.preamble.clone(),
    })
}
