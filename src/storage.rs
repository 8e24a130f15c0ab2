//! On-disk layout of corpora, lexica, reports and application settings.
//!
//! Every persistence operation takes a [`Storage`] explicitly, so a test can
//! point the whole crate at a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::{EntityKind, Error, Result};
use crate::lemmatize::LemmaLanguage;

const CORPORA_DIR: &str = "corpora";
const LEXICA_DIR: &str = "lexica";
const REPORTS_DIR: &str = "reports";
const SETTINGS_NAME: &str = "settings.toml";

/// Root directory holding all persisted state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    /// Use `root` as storage root without touching the file system.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Storage { root: root.into() }
    }

    /// Use `root` as storage root and create the entity directories.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let storage = Storage::new(root);
        for dir in [
            storage.corpora_dir(),
            storage.lexica_dir(),
            storage.reports_dir(),
        ] {
            fs::create_dir_all(dir)?;
        }
        Ok(storage)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn corpora_dir(&self) -> PathBuf {
        self.root.join(CORPORA_DIR)
    }

    pub fn lexica_dir(&self) -> PathBuf {
        self.root.join(LEXICA_DIR)
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.root.join(REPORTS_DIR)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_NAME)
    }

    pub(crate) fn entity_dir(&self, kind: EntityKind, name: &str) -> PathBuf {
        match kind {
            EntityKind::Corpus => self.corpora_dir().join(name),
            EntityKind::Lexicon => self.lexica_dir().join(name),
            EntityKind::Report => self.reports_dir().join(name),
        }
    }

    /// Load the settings file, falling back to defaults when it is missing
    /// or cannot be parsed.
    pub fn settings(&self) -> Settings {
        let path = self.settings_path();
        if !path.exists() {
            return Settings::default();
        }
        match read_toml(&path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("ignoring settings file {}: {e}", path.display());
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        write_toml(&self.settings_path(), settings)
    }
}

/// Application-wide preferences persisted next to the entity directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Language of the Snowball stemmer used for lemma counting.
    pub lemma_language: LemmaLanguage,
    /// Default for adding the sanitized document body to report output.
    pub include_body: bool,
}

/// Reject names that cannot serve as a directory key.
pub fn validate_name(kind: EntityKind, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation(format!("{kind} name must not be empty")));
    }
    if name == "." || name == ".." {
        return Err(Error::validation(format!(
            "{kind} name \"{name}\" is reserved"
        )));
    }
    if name.chars().any(|c| c == '/' || c == '\\' || c.is_control()) {
        return Err(Error::validation(format!(
            "{kind} name \"{name}\" contains a path separator or control character"
        )));
    }
    Ok(())
}

/// Names of all sub-directories of `dir`, sorted. A missing directory lists
/// as empty.
pub(crate) fn list_dir(dir: &Path) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
    }
    names.sort();
    Ok(names)
}

pub(crate) fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Format(format!("cannot parse {}: {e}", path.display())))
}

pub(crate) fn write_toml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = toml::to_string(value)
        .map_err(|e| Error::Format(format!("cannot serialize {}: {e}", path.display())))?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_layout() {
        let td = tempdir().unwrap();
        let storage = Storage::open(td.path().join("data")).unwrap();
        assert!(storage.corpora_dir().is_dir());
        assert!(storage.lexica_dir().is_dir());
        assert!(storage.reports_dir().is_dir());
    }

    #[test]
    fn names_are_directory_safe() {
        assert!(validate_name(EntityKind::Report, "weekly gaming").is_ok());
        assert!(validate_name(EntityKind::Report, "").is_err());
        assert!(validate_name(EntityKind::Report, "   ").is_err());
        assert!(validate_name(EntityKind::Report, "..").is_err());
        assert!(validate_name(EntityKind::Report, "a/b").is_err());
        assert!(validate_name(EntityKind::Report, "a\\b").is_err());
        assert!(validate_name(EntityKind::Report, "a\tb").is_err());
    }

    #[test]
    fn settings_round_trip_and_fallback() {
        let td = tempdir().unwrap();
        let storage = Storage::open(td.path()).unwrap();
        assert_eq!(storage.settings(), Settings::default());

        let settings = Settings {
            lemma_language: LemmaLanguage::German,
            include_body: true,
        };
        storage.save_settings(&settings).unwrap();
        assert_eq!(storage.settings(), settings);

        fs::write(storage.settings_path(), "lemma_language = 42").unwrap();
        assert_eq!(storage.settings(), Settings::default());
    }

    #[test]
    fn list_dir_sorted_and_skips_files() {
        let td = tempdir().unwrap();
        fs::create_dir(td.path().join("b")).unwrap();
        fs::create_dir(td.path().join("a")).unwrap();
        fs::write(td.path().join("c.txt"), "x").unwrap();
        assert_eq!(list_dir(td.path()).unwrap(), vec!["a", "b"]);
        assert!(list_dir(&td.path().join("missing")).unwrap().is_empty());
    }
}
