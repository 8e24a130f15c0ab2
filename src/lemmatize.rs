//! Reduction of text to lower-cased base forms ("lemmas").
//!
//! Lemmas are approximated with Snowball stemming: inflected forms such as
//! "running"/"runs" collapse onto one base form, which is what the frequency
//! table needs. Lexicon entries and document bodies go through the same
//! [`Lemmatizer`], so membership checks compare like with like.
//!
//! The results are stems, not dictionary forms: "happiness" becomes
//! "happi" and "terrible" becomes "terribl". These stems are what the
//! `lemmatized word` column of a report's frequency table holds.

use std::fmt;

use clap::ValueEnum;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Turns text into a sequence of lower-cased base-form tokens.
///
/// Implementations must be deterministic for a given input.
pub trait Lemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String>;
}

/// Stemmer language. `Off` keeps the lower-cased surface forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LemmaLanguage {
    #[default]
    English,
    German,
    French,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Swedish,
    Norwegian,
    Danish,
    Finnish,
    Russian,
    Off,
}

impl LemmaLanguage {
    fn algorithm(self) -> Option<Algorithm> {
        match self {
            LemmaLanguage::English => Some(Algorithm::English),
            LemmaLanguage::German => Some(Algorithm::German),
            LemmaLanguage::French => Some(Algorithm::French),
            LemmaLanguage::Spanish => Some(Algorithm::Spanish),
            LemmaLanguage::Italian => Some(Algorithm::Italian),
            LemmaLanguage::Portuguese => Some(Algorithm::Portuguese),
            LemmaLanguage::Dutch => Some(Algorithm::Dutch),
            LemmaLanguage::Swedish => Some(Algorithm::Swedish),
            LemmaLanguage::Norwegian => Some(Algorithm::Norwegian),
            LemmaLanguage::Danish => Some(Algorithm::Danish),
            LemmaLanguage::Finnish => Some(Algorithm::Finnish),
            LemmaLanguage::Russian => Some(Algorithm::Russian),
            LemmaLanguage::Off => None,
        }
    }
}

impl fmt::Display for LemmaLanguage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LemmaLanguage::English => "english",
            LemmaLanguage::German => "german",
            LemmaLanguage::French => "french",
            LemmaLanguage::Spanish => "spanish",
            LemmaLanguage::Italian => "italian",
            LemmaLanguage::Portuguese => "portuguese",
            LemmaLanguage::Dutch => "dutch",
            LemmaLanguage::Swedish => "swedish",
            LemmaLanguage::Norwegian => "norwegian",
            LemmaLanguage::Danish => "danish",
            LemmaLanguage::Finnish => "finnish",
            LemmaLanguage::Russian => "russian",
            LemmaLanguage::Off => "off",
        };
        write!(f, "{name}")
    }
}

/// Snowball-backed [`Lemmatizer`] over Unicode word boundaries.
///
/// Punctuation and whitespace never become tokens.
pub struct StemmingLemmatizer {
    stemmer: Option<Stemmer>,
}

impl StemmingLemmatizer {
    pub fn new(language: LemmaLanguage) -> Self {
        StemmingLemmatizer {
            stemmer: language.algorithm().map(Stemmer::create),
        }
    }
}

impl Default for StemmingLemmatizer {
    fn default() -> Self {
        StemmingLemmatizer::new(LemmaLanguage::default())
    }
}

impl Lemmatizer for StemmingLemmatizer {
    fn lemmatize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        lower
            .unicode_words()
            .map(|word| match &self.stemmer {
                Some(stemmer) => stemmer.stem(word).into_owned(),
                None => word.to_owned(),
            })
            .collect()
    }
}

/// Lemmatize a (possibly multi-word) lexicon entry into a single key:
/// lemmas joined with single spaces, lower-cased.
pub fn lemmatize_phrase<L: Lemmatizer + ?Sized>(lemmatizer: &L, phrase: &str) -> String {
    lemmatizer.lemmatize(phrase).join(" ").to_lowercase()
}
