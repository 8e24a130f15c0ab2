//! Sentiment lexica: named word/score lists, plus the built-in default.

use std::fs;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::storage::{self, Storage};

const TOML_NAME: &str = "lexicon.toml";

/// Name under which the built-in vocabulary is listed and referenced.
pub const DEFAULT_LEXICON_NAME: &str = "VADER Default Lexicon";

/// One lexicon entry. Words need not be unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub score: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Word {
            text: text.into(),
            score,
        }
    }
}

/// Either a stored word list or the built-in default vocabulary.
///
/// The default lexicon contributes to per-document scoring only; having no
/// word list, it never produces lemma frequency rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Lexicon {
    Custom { name: String, words: Vec<Word> },
    /// The built-in vocabulary, a compact subset of VADER's word list.
    Default,
}

#[derive(Deserialize, Serialize)]
struct LexiconFile {
    words: Vec<(String, f64)>,
}

impl Lexicon {
    pub fn name(&self) -> &str {
        match self {
            Lexicon::Custom { name, .. } => name,
            Lexicon::Default => DEFAULT_LEXICON_NAME,
        }
    }

    /// The word list, or `None` for the default lexicon.
    pub fn words(&self) -> Option<&[Word]> {
        match self {
            Lexicon::Custom { words, .. } => Some(words),
            Lexicon::Default => None,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Lexicon::Default)
    }

    /// Create and immediately persist a custom lexicon. An existing lexicon
    /// of the same name is replaced.
    pub fn create(storage: &Storage, name: &str, words: Vec<Word>) -> Result<Lexicon> {
        storage::validate_name(EntityKind::Lexicon, name)?;
        if name == DEFAULT_LEXICON_NAME {
            return Err(Error::validation(format!(
                "\"{DEFAULT_LEXICON_NAME}\" is built in and cannot be replaced"
            )));
        }
        let lexicon = Lexicon::Custom {
            name: name.to_owned(),
            words,
        };
        lexicon.write(storage)?;
        Ok(lexicon)
    }

    pub fn load(storage: &Storage, name: &str) -> Result<Lexicon> {
        if name == DEFAULT_LEXICON_NAME {
            return Ok(Lexicon::Default);
        }
        storage::validate_name(EntityKind::Lexicon, name)?;
        let path = storage.entity_dir(EntityKind::Lexicon, name).join(TOML_NAME);
        if !path.exists() {
            return Err(Error::not_found(EntityKind::Lexicon, name));
        }
        let file: LexiconFile = storage::read_toml(&path)?;
        Ok(Lexicon::Custom {
            name: name.to_owned(),
            words: file
                .words
                .into_iter()
                .map(|(text, score)| Word { text, score })
                .collect(),
        })
    }

    /// Names of all lexica, the default lexicon first.
    pub fn list(storage: &Storage) -> Result<Vec<String>> {
        let mut names = vec![DEFAULT_LEXICON_NAME.to_owned()];
        names.extend(storage::list_dir(&storage.lexica_dir())?);
        Ok(names)
    }

    pub fn exists(storage: &Storage, name: &str) -> bool {
        name == DEFAULT_LEXICON_NAME
            || storage
                .entity_dir(EntityKind::Lexicon, name)
                .join(TOML_NAME)
                .exists()
    }

    /// Remove a stored lexicon. Deleting the default lexicon does nothing.
    pub fn delete(storage: &Storage, name: &str) -> Result<()> {
        if name == DEFAULT_LEXICON_NAME {
            return Ok(());
        }
        storage::validate_name(EntityKind::Lexicon, name)?;
        let dir = storage.entity_dir(EntityKind::Lexicon, name);
        if !dir.exists() {
            return Err(Error::not_found(EntityKind::Lexicon, name));
        }
        fs::remove_dir_all(dir)?;
        debug!("deleted lexicon {name}");
        Ok(())
    }

    /// Persist the word list. The default lexicon has nothing to persist.
    pub fn write(&self, storage: &Storage) -> Result<()> {
        let Lexicon::Custom { name, words } = self else {
            return Ok(());
        };
        let dir = storage.entity_dir(EntityKind::Lexicon, name);
        fs::create_dir_all(&dir)?;
        let file = LexiconFile {
            words: words.iter().map(|w| (w.text.clone(), w.score)).collect(),
        };
        storage::write_toml(&dir.join(TOML_NAME), &file)
    }

    /// The word list in the VADER lexicon file format: one `word\tscore`
    /// line per entry, words sanitized.
    pub fn interchange_lines(&self) -> Vec<String> {
        self.words()
            .unwrap_or_default()
            .iter()
            .map(|w| format!("{}\t{}", sanitize_word(&w.text), w.score))
            .collect()
    }
}

/// Replace tab and newline characters with a space.
pub fn sanitize_word(word: &str) -> String {
    word.replace(['\t', '\n'], " ")
}

/// Parse a word list typed as `word;score` lines. Blank lines are skipped.
pub fn parse_word_list(text: &str) -> Result<Vec<Word>> {
    let mut words = Vec::new();
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let malformed = || {
            Error::validation(format!(
                "line {}: expected a semicolon-separated word-number pair, got \"{line}\"",
                i + 1
            ))
        };
        let mut parts = line.split(';');
        let word = parts.next().ok_or_else(malformed)?;
        let score = parts.next().ok_or_else(malformed)?;
        let score: f64 = score.trim().parse().map_err(|_| malformed())?;
        words.push(Word::new(word, score));
    }
    Ok(words)
}
