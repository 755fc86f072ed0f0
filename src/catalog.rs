// SPDX-License-Identifier: PMPL-1.0-or-later

//! Catalog: list the records of a problem database with their tags
//!
//! Walks the problem directory, parses every record and reports one entry
//! per file. Unlike a build, a broken record does not stop the listing;
//! its entry carries the error instead.

use crate::error::Result;
use crate::problem::ProblemRecord;
use crate::settings::Settings;
use crate::store::{FsStore, Store};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub tags: Vec<String>,
    pub dependencies: Vec<String>,
    pub has_solution: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entries for every record, sorted by identifier. With `tag`, only records
/// carrying that tag are kept; broken records are kept regardless.
pub fn list(store: &FsStore, settings: &Settings, tag: Option<&str>) -> Result<Vec<CatalogEntry>> {
    let mut entries = Vec::new();
    for id in store.record_ids()? {
        let parsed = store
            .read_record(&id)
            .and_then(|raw| ProblemRecord::from_yaml(&raw, &id, &settings.default_language));
        let entry = match parsed {
            Ok(record) => CatalogEntry {
                id,
                tags: record.tags,
                dependencies: record.dependencies,
                has_solution: record.solution.is_some(),
                error: None,
            },
            Err(e) => CatalogEntry {
                id,
                tags: Vec::new(),
                dependencies: Vec::new(),
                has_solution: false,
                error: Some(e.to_string()),
            },
        };
        entries.push(entry);
    }

    if let Some(tag) = tag {
        entries.retain(|entry| entry.error.is_some() || entry.tags.iter().any(|t| t == tag));
    }
    Ok(entries)
}
