// SPDX-License-Identifier: PMPL-1.0-or-later

//! Access to the problem database: records, templates and attachments.
//!
//! The assembler talks to a [`Store`] rather than to the filesystem so the
//! layout of the database stays in one place.

use crate::error::{CrelleError, Result, StoreKind};
use crate::settings::Settings;
use serde_yaml::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub trait Store {
    /// Parsed YAML of the problem record named `id`.
    fn read_record(&self, id: &str) -> Result<Value>;

    /// Raw text of the template named `id`.
    fn read_template(&self, id: &str) -> Result<String>;

    /// Copy attachment `name` into `dest_dir` under the same name.
    fn copy_dependency(&self, name: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// A problem database on disk.
///
/// ```text
/// <database>/
///   crelle.yaml
///   problems/   *.yaml records and their attachments
///   templates/  *.tex templates
/// ```
#[derive(Debug, Clone)]
pub struct FsStore {
    problem_root: PathBuf,
    template_root: PathBuf,
}

impl FsStore {
    pub fn new(settings: &Settings) -> Self {
        Self {
            problem_root: settings.problem_root(),
            template_root: settings.template_root(),
        }
    }

    pub fn problem_root(&self) -> &Path {
        &self.problem_root
    }

    pub fn template_root(&self) -> &Path {
        &self.template_root
    }

    /// Identifiers of every YAML record under the problem directory, sorted.
    pub fn record_ids(&self) -> Result<Vec<String>> {
        if !self.problem_root.is_dir() {
            return Err(CrelleError::io(
                &self.problem_root,
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.problem_root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            let is_yaml = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
                .unwrap_or(false);
            if !is_yaml {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(&self.problem_root) {
                ids.push(relative.to_string_lossy().replace('\\', "/"));
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Identifiers of every template, sorted.
    pub fn template_ids(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.template_root)
            .map_err(|e| CrelleError::io(&self.template_root, e))?;
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

impl Store for FsStore {
    fn read_record(&self, id: &str) -> Result<Value> {
        let path = lookup(&self.problem_root, id, StoreKind::Problem)?;
        debug!(record = id, path = %path.display(), "reading problem record");
        let content = fs::read_to_string(&path).map_err(|e| CrelleError::io(&path, e))?;
        serde_yaml::from_str(&content).map_err(|source| CrelleError::Yaml { path, source })
    }

    fn read_template(&self, id: &str) -> Result<String> {
        let path = lookup(&self.template_root, id, StoreKind::Template)?;
        fs::read_to_string(&path).map_err(|e| CrelleError::io(&path, e))
    }

    fn copy_dependency(&self, name: &str, dest_dir: &Path) -> Result<PathBuf> {
        let source = lookup(&self.problem_root, name, StoreKind::Dependency)?;
        let dest = dest_dir.join(name);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| CrelleError::io(parent, e))?;
        }
        fs::copy(&source, &dest).map_err(|e| CrelleError::io(&dest, e))?;
        debug!(dependency = name, dest = %dest.display(), "copied dependency");
        Ok(dest)
    }
}

/// Path of `id` under `root`, which must name an existing file and must not
/// climb out of `root`.
fn lookup(root: &Path, id: &str, kind: StoreKind) -> Result<PathBuf> {
    let relative = Path::new(id);
    let contained = !id.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    let path = root.join(relative);
    if contained && path.is_file() {
        Ok(path)
    } else {
        Err(CrelleError::StoreLookup {
            kind,
            id: id.to_string(),
        })
    }
}
