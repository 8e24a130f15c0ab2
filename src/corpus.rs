//! Corpora: named, persisted document collections with a fixed metadata
//! schema.
//!
//! A corpus is created with its collection parameters, then compiled once
//! from an already-fetched comment stream, after which its documents can be
//! iterated any number of times.

use std::collections::{BTreeMap, HashSet};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{EntityKind, Error, Result};
use crate::storage::{self, Storage};

const TOML_NAME: &str = "corpus.toml";
const DOCUMENTS_NAME: &str = "documents.jsonl";
/// Format of the `timestamp` metadata field, always UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata fields of every Reddit document, in output order.
pub const REDDIT_METADATA_FIELDS: &[&str] = &[
    "timestamp",
    "score",
    "comment ID",
    "submission ID",
    "subreddit",
];

/// One unit of text plus the metadata fields its source declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub body: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Metadata value for `field`, empty when the document lacks it.
    pub fn field(&self, field: &str) -> &str {
        self.metadata.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Lazy, finite, single-pass document stream.
pub type Documents<'a> = Box<dyn Iterator<Item = Result<Document>> + 'a>;

/// Anything the report engine can read documents from.
pub trait DocumentSource {
    /// Field names every document supplies, in output order.
    fn document_metadata_fields(&self) -> Vec<String>;

    /// Number of documents a full pass yields, if known.
    fn document_count(&self) -> Option<u64>;

    fn iterate_documents(&self) -> Result<Documents<'_>>;
}

/// A Reddit comment as fetched from the Reddit/Pushshift APIs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RedditComment {
    pub id: String,
    pub submission_id: String,
    pub subreddit: String,
    pub body: String,
    pub score: i64,
    /// Creation time, seconds since the Unix epoch.
    pub created_utc: i64,
}

impl RedditComment {
    fn into_document(self) -> Document {
        let timestamp = DateTime::from_timestamp(self.created_utc, 0)
            .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
            .unwrap_or_default();
        let metadata = BTreeMap::from([
            ("timestamp".to_owned(), timestamp),
            ("score".to_owned(), self.score.to_string()),
            ("comment ID".to_owned(), self.id),
            ("submission ID".to_owned(), self.submission_id),
            ("subreddit".to_owned(), self.subreddit),
        ]);
        Document {
            body: self.body,
            metadata,
        }
    }
}

/// A corpus of Reddit comments from a set of subreddits and a time window.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RedditCorpus {
    #[serde(skip)]
    pub name: String,
    #[serde(skip)]
    directory: PathBuf,
    pub subreddits: Vec<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub document_count: u64,
    /// Compiled corpora are ready to be analyzed.
    pub compiled: bool,
}

impl RedditCorpus {
    /// Register a new, not yet compiled corpus and persist it.
    pub fn create(
        storage: &Storage,
        name: &str,
        subreddits: Vec<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<RedditCorpus> {
        storage::validate_name(EntityKind::Corpus, name)?;
        let directory = storage.entity_dir(EntityKind::Corpus, name);
        if directory.exists() {
            return Err(Error::already_exists(EntityKind::Corpus, name));
        }
        if subreddits.is_empty() {
            return Err(Error::validation("select at least one subreddit"));
        }
        if start_time >= end_time {
            return Err(Error::validation("start time must be before end time"));
        }
        let corpus = RedditCorpus {
            name: name.to_owned(),
            directory,
            subreddits,
            start_time,
            end_time,
            document_count: 0,
            compiled: false,
        };
        Corpus::Reddit(corpus.clone()).write()?;
        Ok(corpus)
    }

    fn documents_path(&self) -> PathBuf {
        self.directory.join(DOCUMENTS_NAME)
    }

    fn accepts(&self, subreddits: &HashSet<String>, comment: &RedditComment) -> bool {
        let created = DateTime::from_timestamp(comment.created_utc, 0);
        subreddits.contains(&comment.subreddit.to_lowercase())
            && created.is_some_and(|t| self.start_time <= t && t < self.end_time)
    }

    /// Store the comments belonging to this corpus and mark it compiled.
    ///
    /// Does nothing if the corpus is already compiled. Comments outside the
    /// configured subreddits or time window are skipped. `progress` receives
    /// the running count of kept comments.
    pub fn compile<I>(&mut self, comments: I, mut progress: Option<&mut dyn FnMut(u64)>) -> Result<()>
    where
        I: IntoIterator<Item = RedditComment>,
    {
        if self.compiled {
            debug!("corpus {} already compiled", self.name);
            return Ok(());
        }
        let subreddits: HashSet<String> =
            self.subreddits.iter().map(|s| s.to_lowercase()).collect();
        let mut writer = BufWriter::new(File::create(self.documents_path())?);
        let mut kept = 0;
        let mut skipped = 0;
        for comment in comments {
            if !self.accepts(&subreddits, &comment) {
                skipped += 1;
                continue;
            }
            serde_json::to_writer(&mut writer, &comment)?;
            writer.write_all(b"\n")?;
            kept += 1;
            if let Some(cb) = progress.as_mut() {
                cb(kept);
            }
        }
        writer.flush()?;
        if kept == 0 {
            return Err(Error::validation("no comments found"));
        }
        info!(
            "corpus {}: kept {kept} comments, skipped {skipped}",
            self.name
        );
        self.document_count = kept;
        self.compiled = true;
        Corpus::Reddit(self.clone()).write()
    }
}

impl DocumentSource for RedditCorpus {
    fn document_metadata_fields(&self) -> Vec<String> {
        REDDIT_METADATA_FIELDS.iter().map(|&f| f.to_owned()).collect()
    }

    fn document_count(&self) -> Option<u64> {
        self.compiled.then_some(self.document_count)
    }

    fn iterate_documents(&self) -> Result<Documents<'_>> {
        if !self.compiled {
            return Err(Error::validation(format!(
                "corpus \"{}\" has not been compiled",
                self.name
            )));
        }
        let reader = BufReader::new(File::open(self.documents_path())?);
        let documents = reader
            .lines()
            .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
            .map(|line| -> Result<Document> {
                let comment: RedditComment = serde_json::from_str(&line?)?;
                Ok(comment.into_document())
            });
        Ok(Box::new(documents))
    }
}

/// Every kind of corpus, tagged by `type` in `corpus.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Corpus {
    Reddit(RedditCorpus),
}

impl Corpus {
    pub fn name(&self) -> &str {
        match self {
            Corpus::Reddit(c) => &c.name,
        }
    }

    pub fn is_compiled(&self) -> bool {
        match self {
            Corpus::Reddit(c) => c.compiled,
        }
    }

    fn directory(&self) -> &PathBuf {
        match self {
            Corpus::Reddit(c) => &c.directory,
        }
    }

    pub fn load(storage: &Storage, name: &str) -> Result<Corpus> {
        storage::validate_name(EntityKind::Corpus, name)?;
        let directory = storage.entity_dir(EntityKind::Corpus, name);
        let path = directory.join(TOML_NAME);
        if !path.exists() {
            return Err(Error::not_found(EntityKind::Corpus, name));
        }
        let mut corpus: Corpus = storage::read_toml(&path)?;
        match &mut corpus {
            Corpus::Reddit(c) => {
                c.name = name.to_owned();
                c.directory = directory;
            }
        }
        Ok(corpus)
    }

    pub fn list(storage: &Storage) -> Result<Vec<String>> {
        storage::list_dir(&storage.corpora_dir())
    }

    pub fn exists(storage: &Storage, name: &str) -> bool {
        storage
            .entity_dir(EntityKind::Corpus, name)
            .join(TOML_NAME)
            .exists()
    }

    pub fn write(&self) -> Result<()> {
        fs::create_dir_all(self.directory())?;
        storage::write_toml(&self.directory().join(TOML_NAME), self)
    }

    pub fn delete(storage: &Storage, name: &str) -> Result<()> {
        storage::validate_name(EntityKind::Corpus, name)?;
        let dir = storage.entity_dir(EntityKind::Corpus, name);
        if !dir.exists() {
            return Err(Error::not_found(EntityKind::Corpus, name));
        }
        fs::remove_dir_all(dir)?;
        debug!("deleted corpus {name}");
        Ok(())
    }
}

impl DocumentSource for Corpus {
    fn document_metadata_fields(&self) -> Vec<String> {
        match self {
            Corpus::Reddit(c) => c.document_metadata_fields(),
        }
    }

    fn document_count(&self) -> Option<u64> {
        match self {
            Corpus::Reddit(c) => c.document_count(),
        }
    }

    fn iterate_documents(&self) -> Result<Documents<'_>> {
        match self {
            Corpus::Reddit(c) => c.iterate_documents(),
        }
    }
}

/// Read comments from a JSON Lines file, one [`RedditComment`] per line.
pub fn read_comments(path: &std::path::Path) -> Result<Vec<RedditComment>> {
    let reader = BufReader::new(File::open(path)?);
    let mut comments = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        comments.push(serde_json::from_str(&line)?);
    }
    Ok(comments)
}
