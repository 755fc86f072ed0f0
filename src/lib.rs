// SPDX-License-Identifier: PMPL-1.0-or-later

//! Crelle: multilingual problem-set assembly.
//!
//! A problem database holds independently authored problems as YAML
//! records, each carrying its statement, attribution and solution in one or
//! more languages. A short document config picks a template, a language and
//! an ordered list of problems; the assembler resolves everything to that
//! language and writes one LaTeX document plus the attachments it needs.
//!
//! PIPELINE:
//! 1. **Localized values**: text, per-language mappings or lists of parts,
//!    resolved strictly by language code.
//! 2. **Loader**: turns a problem reference into resolved fragments.
//! 3. **Assembler**: merges fragments into the template markers and copies
//!    attachments.

pub mod catalog;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod i18n;
pub mod localized;
pub mod problem;
pub mod schema;
pub mod settings;
pub mod source;
pub mod store;

pub use document::{Assembler, BuildSummary, DocumentConfig};
pub use error::{CrelleError, Result};
pub use i18n::Lang;
pub use localized::{LocalizedValue, Resolved};
pub use problem::{load, Loaded, ProblemFragments, ProblemRecord, ProblemReference};
pub use settings::Settings;
pub use source::{render_source, CanonicalSources};
pub use store::{FsStore, Store};
