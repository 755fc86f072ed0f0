// SPDX-License-Identifier: PMPL-1.0-or-later

//! Static settings for a problem database.
//!
//! Loaded once at startup from `crelle.yaml` and passed by reference to the
//! loader and assembler. Every field has a default, so an empty file (or no
//! file) is a valid configuration.

use crate::error::{CrelleError, Result};
use crate::source::CanonicalSources;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming the database root.
pub const DATABASE_ENV: &str = "CRELLE_DB";

/// File name looked up in the database root when no settings file is given.
pub const SETTINGS_FILE: &str = "crelle.yaml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Root of the problem database.
    pub database: PathBuf,
    /// Subdirectory holding problem records and their attachments.
    pub problem_dir: String,
    /// Subdirectory holding templates.
    pub template_dir: String,
    /// Language attributed to untagged content.
    pub default_language: String,
    /// Packages loaded by the standard preamble.
    pub packages: Vec<String>,
    /// Name of the generated document inside the output directory.
    pub output_file: String,
    pub canonical_sources: CanonicalSources,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: std::env::var_os(DATABASE_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            problem_dir: "problems".to_string(),
            template_dir: "templates".to_string(),
            default_language: "eng".to_string(),
            packages: ["amsmath", "amssymb", "graphicx"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            output_file: "problem_set.tex".to_string(),
            canonical_sources: CanonicalSources::default(),
        }
    }
}

impl Settings {
    /// Settings rooted at `database` with every other field defaulted.
    pub fn for_database(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Read a settings file. A relative `database` written in the file is
    /// taken relative to the file's own directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| CrelleError::io(path, e))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let yaml_error = |source: serde_yaml::Error| CrelleError::Yaml {
            path: path.to_path_buf(),
            source,
        };
        let raw: serde_yaml::Value = serde_yaml::from_str(&content).map_err(yaml_error)?;
        let sets_database = raw.get("database").is_some();
        let mut settings: Self = serde_yaml::from_value(raw).map_err(yaml_error)?;
        if sets_database && settings.database.is_relative() {
            if let Some(dir) = path.parent() {
                settings.database = dir.join(&settings.database);
            }
        }
        Ok(settings)
    }

    /// Resolve settings the way the CLI does: an explicit file wins, then
    /// `crelle.yaml` in the database root, then defaults. An explicit
    /// `database` overrides whatever the file says.
    pub fn discover(explicit: Option<&Path>, database: Option<&Path>) -> Result<Self> {
        let mut settings = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let root = database
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| Self::default().database);
                let candidate = root.join(SETTINGS_FILE);
                if candidate.is_file() {
                    let mut loaded = Self::from_file(&candidate)?;
                    if loaded.database == Path::new(".") {
                        loaded.database = root;
                    }
                    loaded
                } else {
                    Self::for_database(root)
                }
            }
        };
        if let Some(db) = database {
            settings.database = db.to_path_buf();
        }
        Ok(settings)
    }

    pub fn problem_root(&self) -> PathBuf {
        self.database.join(&self.problem_dir)
    }

    pub fn template_root(&self) -> PathBuf {
        self.database.join(&self.template_dir)
    }

    /// Setup directives every generated document starts with.
    pub fn standard_preamble(&self) -> String {
        let mut lines = vec!["\\usepackage[utf8]{inputenc}".to_string()];
        lines.extend(
            self.packages
                .iter()
                .map(|package| format!("\\usepackage{{{}}}", package)),
        );
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn standard_preamble_lists_packages() {
        let settings = Settings::for_database("db");
        assert_eq!(
            settings.standard_preamble(),
            "\\usepackage[utf8]{inputenc}\n\\usepackage{amsmath}\n\\usepackage{amssymb}\n\\usepackage{graphicx}"
        );
    }

    #[test]
    fn roots_join_subdirectories() {
        let settings = Settings::for_database("/data/crelledb");
        assert_eq!(
            settings.problem_root(),
            PathBuf::from("/data/crelledb/problems")
        );
        assert_eq!(
            settings.template_root(),
            PathBuf::from("/data/crelledb/templates")
        );
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crelle.yaml");
        fs::write(
            &path,
            "default_language: nor\npackages: [tikz]\ncanonical_sources:\n  folklore: {eng: folklore}\n",
        )
        .unwrap();
        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.default_language, "nor");
        assert_eq!(settings.packages, vec!["tikz".to_string()]);
        assert_eq!(settings.output_file, "problem_set.tex");
        assert_eq!(
            settings.canonical_sources.phrase("folklore", "eng"),
            Some("folklore")
        );
        assert_eq!(settings.canonical_sources.phrase("classical", "nor"), None);
    }

    #[test]
    fn unknown_settings_key_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("crelle.yaml");
        fs::write(&path, "langauge: nor\n").unwrap();
        assert!(matches!(
            Settings::from_file(&path),
            Err(CrelleError::Yaml { .. })
        ));
    }

    #[test]
    fn discover_reads_file_in_database_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "output_file: set.tex\n").unwrap();
        let settings = Settings::discover(None, Some(dir.path())).unwrap();
        assert_eq!(settings.output_file, "set.tex");
        assert_eq!(settings.database, dir.path());
    }

    #[test]
    fn relative_database_follows_settings_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("site.yaml");
        fs::write(&path, "database: db\n").unwrap();
        let settings = Settings::discover(Some(&path), None).unwrap();
        assert_eq!(settings.database, dir.path().join("db"));
        assert_eq!(settings.problem_root(), dir.path().join("db").join("problems"));
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::discover(None, Some(dir.path())).unwrap();
        assert_eq!(settings.output_file, "problem_set.tex");
        assert_eq!(settings.database, dir.path());
    }
}
