//! The report engine: one streaming pass that scores every document under
//! every lexicon and counts lexicon lemmas across the corpus.
//!
//! Two tab-separated tables come out of a pass:
//!
//! - the output table, one row per document: metadata fields (optionally
//!   preceded by the sanitized body), then `positive`, `neutral`, `negative`
//!   and `compound` for each lexicon in declared order;
//! - the frequency table, one row per (lexicon, lemma) pair with the lemma's
//!   occurrences per 10,000 corpus tokens.
//!
//! Rows are written as soon as they are computed. Memory is bounded by the
//! lexicon vocabulary, not by the corpus.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Write;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corpus::DocumentSource;
use crate::error::Result;
use crate::lemmatize::{Lemmatizer, lemmatize_phrase};
use crate::lexicon::Lexicon;
use crate::sentiment::SentimentAnalyzer;

/// Column holding the sanitized document body, when requested.
pub const BODY_FIELD: &str = "body";

/// Header of the frequency table.
pub const FREQUENCY_FIELDS: [&str; 3] = ["lemmatized word", "lexicon name", "frequency per 10,000"];

const SCORE_KINDS: [&str; 4] = ["positive", "neutral", "negative", "compound"];

const DELIMITER: u8 = b'\t';

/// Relative frequencies are expressed per this many tokens.
const FREQUENCY_BASE: f64 = 10_000.0;

/// The four output columns contributed by one lexicon, in fixed order.
pub fn score_columns(lexicon_name: &str) -> [String; 4] {
    SCORE_KINDS.map(|kind| format!("{lexicon_name} {kind}"))
}

/// Make a body safe for a single TSV cell: line breaks and tabs become
/// spaces.
pub fn sanitize_body(body: &str) -> String {
    body.replace(['\n', '\r', '\t'], " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Lexicon words are being lemmatized; counts words.
    LemmatizingLexicon,
    /// Documents are being scored and counted; counts documents.
    ScoringDocuments,
}

/// Liveness signal from a running pass. `total` is known when the phase
/// size is known up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub phase: Phase,
    pub completed: u64,
    pub total: Option<u64>,
}

/// One row of the frequency table, as read back from a finished report.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FrequencyRow {
    /// Snowball stem of the lexicon word (e.g. "happi"), not a dictionary
    /// form.
    #[serde(rename = "lemmatized word")]
    pub lemma: String,
    #[serde(rename = "lexicon name")]
    pub lexicon: String,
    #[serde(rename = "frequency per 10,000")]
    pub frequency: f64,
}

/// Counts of a finished pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub documents: u64,
    pub total_tokens: u64,
    pub frequency_rows: u64,
}

/// Running token totals of one pass: all tokens, and occurrences of the
/// lemmas in the lexicon vocabulary.
#[derive(Debug, Default)]
pub struct FrequencyCounter {
    total_tokens: u64,
    occurrences: HashMap<String, u64>,
}

impl FrequencyCounter {
    pub fn new() -> Self {
        FrequencyCounter::default()
    }

    /// Count one document token.
    pub fn feed(&mut self, lemma: String, vocabulary: &HashSet<String>) {
        self.total_tokens += 1;
        if vocabulary.contains(&lemma) {
            *self.occurrences.entry(lemma).or_insert(0) += 1;
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn occurrences(&self, lemma: &str) -> u64 {
        self.occurrences.get(lemma).copied().unwrap_or(0)
    }

    /// Occurrences per 10,000 tokens; zero for an empty corpus.
    pub fn relative_frequency(&self, lemma: &str) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        self.occurrences(lemma) as f64 * FREQUENCY_BASE / self.total_tokens as f64
    }
}

struct LexiconAnalysis {
    name: String,
    analyzer: SentimentAnalyzer,
    /// `None` for the default lexicon, which has no word list.
    lemmas: Option<BTreeSet<String>>,
}

/// Scorers and lemma vocabulary prepared for a list of lexica.
pub struct Analysis<'a> {
    lemmatizer: &'a dyn Lemmatizer,
    lexica: Vec<LexiconAnalysis>,
    vocabulary: HashSet<String>,
}

impl<'a> Analysis<'a> {
    /// Build one analyzer per lexicon, in declared order, and lemmatize every
    /// custom lexicon word. `progress` is called once per lexicon word.
    pub fn prepare(
        lexica: &[Lexicon],
        lemmatizer: &'a dyn Lemmatizer,
        progress: &mut dyn FnMut(Progress),
    ) -> Analysis<'a> {
        let total_words: u64 = lexica
            .iter()
            .map(|l| l.words().map_or(0, |w| w.len() as u64))
            .sum();
        let mut completed = 0;
        let mut vocabulary = HashSet::new();
        let mut prepared = Vec::with_capacity(lexica.len());

        for lexicon in lexica {
            let analyzer = SentimentAnalyzer::for_lexicon(lexicon);
            let lemmas = lexicon.words().map(|words| {
                let mut lemmas = BTreeSet::new();
                for word in words {
                    completed += 1;
                    progress(Progress {
                        phase: Phase::LemmatizingLexicon,
                        completed,
                        total: Some(total_words),
                    });
                    let lemma = lemmatize_phrase(lemmatizer, &word.text);
                    if !lemma.is_empty() {
                        lemmas.insert(lemma);
                    }
                }
                lemmas
            });
            if let Some(lemmas) = &lemmas {
                vocabulary.extend(lemmas.iter().cloned());
            }
            debug!(
                "lexicon {}: {} scored words, {} lemmas",
                lexicon.name(),
                analyzer.vocabulary_size(),
                lemmas.as_ref().map_or(0, BTreeSet::len)
            );
            prepared.push(LexiconAnalysis {
                name: lexicon.name().to_owned(),
                analyzer,
                lemmas,
            });
        }

        Analysis {
            lemmatizer,
            lexica: prepared,
            vocabulary,
        }
    }

    /// Distinct lemmas over all custom lexica.
    pub fn vocabulary(&self) -> &HashSet<String> {
        &self.vocabulary
    }

    /// Output table header for documents with `metadata_fields`.
    pub fn output_fields(&self, metadata_fields: &[String], include_body: bool) -> Vec<String> {
        let mut fields = Vec::with_capacity(metadata_fields.len() + 1 + 4 * self.lexica.len());
        if include_body {
            fields.push(BODY_FIELD.to_owned());
        }
        fields.extend(metadata_fields.iter().cloned());
        for lexicon in &self.lexica {
            fields.extend(score_columns(&lexicon.name));
        }
        fields
    }

    /// Stream `source` once, writing the output table to `output` and, once
    /// the stream is exhausted, the frequency table to `frequency`.
    ///
    /// On error both sinks are left as far as they were written.
    pub fn run<W1: Write, W2: Write>(
        &self,
        source: &dyn DocumentSource,
        include_body: bool,
        output: W1,
        frequency: W2,
        progress: &mut dyn FnMut(Progress),
    ) -> Result<RunStats> {
        let metadata_fields = source.document_metadata_fields();
        let total = source.document_count();

        let mut output_writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(output);
        output_writer.write_record(self.output_fields(&metadata_fields, include_body))?;

        let mut frequency_writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .from_writer(frequency);
        frequency_writer.write_record(FREQUENCY_FIELDS)?;

        info!(
            "scoring documents under {} lexica ({} lemmas tracked)",
            self.lexica.len(),
            self.vocabulary.len()
        );

        let mut counter = FrequencyCounter::new();
        let mut documents = 0;
        let mut row: Vec<String> = Vec::new();
        for document in source.iterate_documents()? {
            let document = document?;
            for lemma in self.lemmatizer.lemmatize(&document.body) {
                counter.feed(lemma, &self.vocabulary);
            }

            row.clear();
            if include_body {
                row.push(sanitize_body(&document.body));
            }
            row.extend(metadata_fields.iter().map(|f| document.field(f).to_owned()));
            for lexicon in &self.lexica {
                let scores = lexicon.analyzer.polarity_scores(&document.body);
                row.push(scores.positive.to_string());
                row.push(scores.neutral.to_string());
                row.push(scores.negative.to_string());
                row.push(scores.compound.to_string());
            }
            output_writer.write_record(&row)?;

            documents += 1;
            progress(Progress {
                phase: Phase::ScoringDocuments,
                completed: documents,
                total,
            });
        }
        output_writer.flush()?;

        let mut frequency_rows = 0;
        for lexicon in &self.lexica {
            let Some(lemmas) = &lexicon.lemmas else {
                continue;
            };
            for lemma in lemmas {
                let frequency = counter.relative_frequency(lemma).to_string();
                frequency_writer.write_record([lemma.as_str(), lexicon.name.as_str(), frequency.as_str()])?;
                frequency_rows += 1;
            }
        }
        frequency_writer.flush()?;

        let stats = RunStats {
            documents,
            total_tokens: counter.total_tokens(),
            frequency_rows,
        };
        info!(
            "scored {} documents, {} tokens, {} frequency rows",
            stats.documents, stats.total_tokens, stats.frequency_rows
        );
        Ok(stats)
    }
}
