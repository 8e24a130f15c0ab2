#![forbid(unsafe_code)]
//! # corpus_sentiment
//!
//! Lexicon-based sentiment scoring and lemma-frequency analysis over
//! collections of Reddit comments.
//!
//! ## Concepts
//! - **Lexicon**: a named list of `(word, score)` pairs, or the built-in
//!   default vocabulary.
//! - **Corpus**: a named document collection with a fixed metadata schema,
//!   compiled once from downloaded comments.
//! - **Report**: a corpus plus an ordered list of lexica. Running it writes
//!   two tab-separated tables: per-document polarity scores and, for each
//!   custom lexicon, how often its words occur per 10,000 corpus tokens.
//!
//! ## Example
//! ```no_run
//! use corpus_sentiment::{Lexicon, RunOptions, Word, Workspace};
//!
//! let ws = Workspace::open("data")?;
//! Lexicon::create(ws.storage(), "feelings", vec![Word::new("love", 2.0)])?;
//! ws.create_report("weekly", "gaming", vec!["feelings".into()])?;
//! let stats = ws.run_report("weekly", RunOptions::default(), None)?;
//! println!("{} documents scored", stats.documents);
//! # Ok::<(), corpus_sentiment::Error>(())
//! ```

pub mod corpus;
pub mod engine;
pub mod error;
pub mod lemmatize;
pub mod lexicon;
pub mod report;
pub mod sentiment;
pub mod storage;
pub mod summary;
mod vader_lexicon;
pub mod workspace;

pub use corpus::{Corpus, Document, DocumentSource, RedditComment, RedditCorpus};
pub use engine::{Analysis, FrequencyRow, Phase, Progress, RunStats};
pub use error::{EntityKind, Error, Result};
pub use lemmatize::{LemmaLanguage, Lemmatizer, StemmingLemmatizer};
pub use lexicon::{DEFAULT_LEXICON_NAME, Lexicon, Word};
pub use report::{Report, ResultsTable, RunOptions};
pub use sentiment::{PolarityScores, SentimentAnalyzer};
pub use storage::{Settings, Storage};
pub use workspace::Workspace;
