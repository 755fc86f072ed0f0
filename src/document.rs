// SPDX-License-Identifier: PMPL-1.0-or-later

//! Problem-set assembly.
//!
//! A document config names a template, a language and an ordered list of
//! problems. [`Assembler::build`] loads every problem, copies attachments
//! into the output directory, and fills the template markers:
//!
//! | Marker           | Replaced with                          |
//! |------------------|----------------------------------------|
//! | `{{{probname}}}` | problem label, title-cased             |
//! | `{{{solname}}}`  | solution label, title-cased            |
//! | `{{{preamble}}}` | standard preamble + problem fragments  |
//! | `{{{problems}}}` | body with every problem and solution   |

use crate::error::{CrelleError, Result};
use crate::i18n::Lang;
use crate::localized::describe;
use crate::problem::{load, Loaded, ProblemFragments, ProblemReference};
use crate::schema::Schema;
use crate::settings::Settings;
use crate::source::title_case;
use crate::store::Store;
use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, warn};

pub const PROBLEM_LABEL_MARKER: &str = "{{{probname}}}";
pub const SOLUTION_LABEL_MARKER: &str = "{{{solname}}}";
pub const PREAMBLE_MARKER: &str = "{{{preamble}}}";
pub const BODY_MARKER: &str = "{{{problems}}}";

pub const MARKERS: [&str; 4] = [
    PROBLEM_LABEL_MARKER,
    SOLUTION_LABEL_MARKER,
    PREAMBLE_MARKER,
    BODY_MARKER,
];

const CONFIG_SCHEMA: Schema = Schema {
    name: "document config",
    required: &["template", "language", "problems"],
    optional: &["solutions"],
};

/// What to typeset.
///
/// In YAML, a bare string in `problems` always names a stored record, so
/// verbatim text must be written as `{literal: ...}`. Any other mapping is
/// per-language inline text:
///
/// ```yaml
/// template: simple.tex
/// language: eng
/// solutions: true
/// problems:
///   - {literal: "Intro text"}
///   - {eng: Warm-up, nor: Oppvarming}
///   - chess.yaml
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentConfig {
    pub template: String,
    pub language: Lang,
    pub problems: Vec<ProblemReference>,
    pub solutions: bool,
}

impl DocumentConfig {
    pub fn from_yaml(raw: &Value, origin: &str, default_language: &str) -> Result<Self> {
        let map = CONFIG_SCHEMA.validate(raw, origin)?;
        let what = format!("document config '{}'", origin);

        let template = map["template"]
            .as_str()
            .ok_or_else(|| CrelleError::schema(&what, "'template' must be text"))?
            .to_string();
        let code = map["language"]
            .as_str()
            .ok_or_else(|| CrelleError::schema(&what, "'language' must be text"))?;
        let language =
            Lang::from_code(code).ok_or_else(|| CrelleError::UnknownLanguage(code.to_string()))?;
        let problems = match &map["problems"] {
            Value::Sequence(entries) => entries
                .iter()
                .map(|entry| ProblemReference::from_yaml(entry, default_language))
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(CrelleError::schema(
                    &what,
                    format!("'problems' must be a list, found {}", describe(other)),
                ))
            }
        };
        let solutions = match map.get("solutions") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                return Err(CrelleError::schema(
                    &what,
                    format!("'solutions' must be true or false, found {}", describe(other)),
                ))
            }
        };

        Ok(Self {
            template,
            language,
            problems,
            solutions,
        })
    }

    pub fn from_file(path: &Path, default_language: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CrelleError::io(path, e))?;
        let raw: Value = serde_yaml::from_str(&content).map_err(|source| CrelleError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&raw, &path.display().to_string(), default_language)
    }
}

/// Outcome of a successful build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildSummary {
    pub language: Lang,
    pub output: PathBuf,
    pub problems: usize,
    pub literals: usize,
    /// Copied attachments in copy order, duplicates included.
    pub dependencies: Vec<PathBuf>,
    pub generated_at: String,
}

pub struct Assembler<'a> {
    settings: &'a Settings,
    store: &'a dyn Store,
}

impl<'a> Assembler<'a> {
    pub fn new(settings: &'a Settings, store: &'a dyn Store) -> Self {
        Self { settings, store }
    }

    /// Build `config` into `out_dir`.
    ///
    /// Every problem is loaded before `out_dir` is touched, so schema,
    /// shape and translation errors leave no output. Nothing is rolled back
    /// after that: attachments copied before a failing copy stay in `out_dir`.
    pub fn build(&self, config: &DocumentConfig, out_dir: &Path) -> Result<BuildSummary> {
        let language = config.language;
        info!(
            template = config.template.as_str(),
            language = language.code(),
            problems = config.problems.len(),
            "building problem set"
        );
        let template = self.store.read_template(&config.template)?;
        for marker in missing_markers(&template) {
            warn!(
                template = config.template.as_str(),
                marker, "template lacks marker; its content will be dropped"
            );
        }

        let loaded = config
            .problems
            .iter()
            .map(|reference| load(reference, language.code(), self.settings, self.store))
            .collect::<Result<Vec<_>>>()?;

        fs::create_dir_all(out_dir).map_err(|e| CrelleError::io(out_dir, e))?;
        let mut dependencies = Vec::new();
        for name in loaded.iter().flat_map(|entry| dependency_names(entry)) {
            dependencies.push(self.store.copy_dependency(name, out_dir)?);
        }

        let preamble = merge_preamble(&self.settings.standard_preamble(), &loaded);
        let body = merge_body(&loaded, config.solutions);
        let document = fill_template(&template, language, &preamble, &body);

        let output = out_dir.join(&self.settings.output_file);
        fs::write(&output, document).map_err(|e| CrelleError::io(&output, e))?;

        let literals = loaded
            .iter()
            .filter(|l| matches!(l, Loaded::Literal(_)))
            .count();
        info!(
            output = %output.display(),
            dependencies = dependencies.len(),
            "wrote problem set"
        );

        Ok(BuildSummary {
            language,
            output,
            problems: loaded.len() - literals,
            literals,
            dependencies,
            generated_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}

fn dependency_names(loaded: &Loaded) -> impl Iterator<Item = &str> {
    let names: &[String] = match loaded {
        Loaded::Problem(fragments) => &fragments.dependencies,
        Loaded::Literal(_) => &[],
    };
    names.iter().map(String::as_str)
}

/// Standard preamble followed by each non-empty problem fragment and a
/// comment naming the record it came from.
pub fn merge_preamble(standard: &str, loaded: &[Loaded]) -> String {
    let mut preamble = standard.to_string();
    for fragments in problems(loaded) {
        if fragments.preamble_fragment.is_empty() {
            continue;
        }
        preamble.push('\n');
        preamble.push_str(fragments.preamble_fragment.trim_end());
        preamble.push_str(&format!("\n% {}", fragments.origin_id));
    }
    preamble
}

/// Body text: literals verbatim between blank lines, records as a
/// `cproblem` block, optionally followed by a `csolution` block.
pub fn merge_body(loaded: &[Loaded], solutions: bool) -> String {
    let mut body = String::new();
    for entry in loaded {
        match entry {
            Loaded::Literal(text) => {
                body.push('\n');
                body.push_str(text);
                body.push('\n');
            }
            Loaded::Problem(fragments) => {
                body.push_str(&format!("\n% {}\n", fragments.origin_id));
                body.push_str(&format!(
                    "\\begin{{cproblem}}{{{}}}\n{}\n\\end{{cproblem}}\n",
                    fragments.source_display, fragments.statement_text
                ));
                if solutions && !fragments.solution_text.is_empty() {
                    body.push_str(&format!(
                        "\\begin{{csolution}}\n{}\n\\end{{csolution}}\n",
                        fragments.solution_text
                    ));
                }
            }
        }
    }
    body
}

/// Replace every occurrence of each marker.
pub fn fill_template(template: &str, language: Lang, preamble: &str, body: &str) -> String {
    template
        .replace(PROBLEM_LABEL_MARKER, &title_case(language.problem_label()))
        .replace(SOLUTION_LABEL_MARKER, &title_case(language.solution_label()))
        .replace(PREAMBLE_MARKER, preamble)
        .replace(BODY_MARKER, body)
}

fn problems(loaded: &[Loaded]) -> impl Iterator<Item = &ProblemFragments> {
    loaded.iter().filter_map(|entry| match entry {
        Loaded::Problem(fragments) => Some(fragments),
        Loaded::Literal(_) => None,
    })
}

fn marker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\{([A-Za-z0-9_]+)\}\}\}").expect("valid marker regex"))
}

/// Every `{{{name}}}` marker in `template`, in order of first appearance.
pub fn scan_markers(template: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for capture in marker_pattern().find_iter(template) {
        let marker = capture.as_str().to_string();
        if !found.contains(&marker) {
            found.push(marker);
        }
    }
    found
}

/// Known markers that `template` does not contain.
pub fn missing_markers(template: &str) -> Vec<&'static str> {
    MARKERS
        .iter()
        .copied()
        .filter(|marker| !template.contains(marker))
        .collect()
}

/// Markers in `template` that the assembler does not know and will leave
/// untouched.
pub fn unknown_markers(template: &str) -> Vec<String> {
    let unknown: Vec<String> = scan_markers(template)
        .into_iter()
        .filter(|marker| !MARKERS.contains(&marker.as_str()))
        .collect();
    if !unknown.is_empty() {
        debug!(markers = ?unknown, "template has unknown markers");
    }
    unknown
}
