//! Reports: a corpus plus an ordered list of lexica, and the two tables a
//! run derives from them.
//!
//! A report directory holds `report.toml` (configuration and the `complete`
//! flag), `output.tsv` and `frequency.tsv`. The tables are only meaningful
//! while `complete` is true; a run clears the flag before touching them.

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::engine::{Analysis, FrequencyRow, Progress, RunStats};
use crate::error::{EntityKind, Error, Result};
use crate::lemmatize::{LemmaLanguage, StemmingLemmatizer};
use crate::lexicon::Lexicon;
use crate::storage::{self, Settings, Storage};

const TOML_NAME: &str = "report.toml";
const OUTPUT_NAME: &str = "output.tsv";
const FREQUENCY_NAME: &str = "frequency.tsv";

/// Per-run choices that are not part of the report configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Add the sanitized document body as the leading output column.
    pub include_body: bool,
    pub language: LemmaLanguage,
}

impl From<Settings> for RunOptions {
    fn from(settings: Settings) -> Self {
        RunOptions {
            include_body: settings.include_body,
            language: settings.lemma_language,
        }
    }
}

/// The output table of a finished run, read back as text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultsTable {
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Report {
    #[serde(skip)]
    pub name: String,
    pub corpus_name: String,
    pub lexicon_names: Vec<String>,
    /// True only after a run returned normally and until the next run starts.
    pub complete: bool,
}

impl Report {
    /// Register a new report and persist it with `complete = false`.
    ///
    /// Nothing is written unless every check passes.
    pub fn create(
        storage: &Storage,
        name: &str,
        corpus_name: &str,
        lexicon_names: Vec<String>,
    ) -> Result<Report> {
        storage::validate_name(EntityKind::Report, name)?;
        if Report::exists(storage, name) {
            return Err(Error::already_exists(EntityKind::Report, name));
        }
        if lexicon_names.is_empty() {
            return Err(Error::validation("select at least one lexicon"));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = lexicon_names.iter().find(|n| !seen.insert(n.as_str())) {
            return Err(Error::validation(format!(
                "lexicon \"{dup}\" is listed more than once"
            )));
        }
        if !Corpus::exists(storage, corpus_name) {
            return Err(Error::not_found(EntityKind::Corpus, corpus_name));
        }
        if let Some(missing) = lexicon_names.iter().find(|n| !Lexicon::exists(storage, n)) {
            return Err(Error::not_found(EntityKind::Lexicon, missing));
        }

        let report = Report {
            name: name.to_owned(),
            corpus_name: corpus_name.to_owned(),
            lexicon_names,
            complete: false,
        };
        report.write(storage)?;
        debug!("created report {name}");
        Ok(report)
    }

    pub fn load(storage: &Storage, name: &str) -> Result<Report> {
        storage::validate_name(EntityKind::Report, name)?;
        let path = storage.entity_dir(EntityKind::Report, name).join(TOML_NAME);
        if !path.exists() {
            return Err(Error::not_found(EntityKind::Report, name));
        }
        let mut report: Report = storage::read_toml(&path)?;
        report.name = name.to_owned();
        Ok(report)
    }

    pub fn list(storage: &Storage) -> Result<Vec<String>> {
        storage::list_dir(&storage.reports_dir())
    }

    pub fn exists(storage: &Storage, name: &str) -> bool {
        storage
            .entity_dir(EntityKind::Report, name)
            .join(TOML_NAME)
            .exists()
    }

    /// Persist the configuration and `complete` flag; the tables are left as
    /// they are.
    pub fn write(&self, storage: &Storage) -> Result<()> {
        let dir = self.directory(storage);
        fs::create_dir_all(&dir)?;
        storage::write_toml(&dir.join(TOML_NAME), self)
    }

    /// Remove the report directory, tables included.
    ///
    /// Does not know about runs in flight; go through
    /// [`Workspace::delete_report`](crate::workspace::Workspace::delete_report)
    /// when one may be active.
    pub fn delete(storage: &Storage, name: &str) -> Result<()> {
        storage::validate_name(EntityKind::Report, name)?;
        let dir = storage.entity_dir(EntityKind::Report, name);
        if !dir.exists() {
            return Err(Error::not_found(EntityKind::Report, name));
        }
        fs::remove_dir_all(dir)?;
        debug!("deleted report {name}");
        Ok(())
    }

    fn directory(&self, storage: &Storage) -> PathBuf {
        storage.entity_dir(EntityKind::Report, &self.name)
    }

    pub fn output_path(&self, storage: &Storage) -> PathBuf {
        self.directory(storage).join(OUTPUT_NAME)
    }

    pub fn frequency_path(&self, storage: &Storage) -> PathBuf {
        self.directory(storage).join(FREQUENCY_NAME)
    }

    /// Recompute both tables from scratch.
    ///
    /// `complete` is cleared and persisted before anything else happens, and
    /// set again only once both tables are fully written. Any error leaves it
    /// false, with the tables in whatever state the failure left them.
    pub fn run(
        &mut self,
        storage: &Storage,
        options: RunOptions,
        progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<RunStats> {
        self.complete = false;
        self.write(storage)?;

        let mut ignore = |_: Progress| {};
        let progress: &mut dyn FnMut(Progress) = match progress {
            Some(cb) => cb,
            None => &mut ignore,
        };

        let corpus = Corpus::load(storage, &self.corpus_name)?;
        if !corpus.is_compiled() {
            return Err(Error::validation(format!(
                "corpus \"{}\" has not been compiled",
                self.corpus_name
            )));
        }
        let lexica = self
            .lexicon_names
            .iter()
            .map(|name| Lexicon::load(storage, name))
            .collect::<Result<Vec<_>>>()?;

        info!(
            "running report {} on corpus {} ({} lexica, lemmas: {})",
            self.name,
            self.corpus_name,
            lexica.len(),
            options.language
        );
        let lemmatizer = StemmingLemmatizer::new(options.language);
        let analysis = Analysis::prepare(&lexica, &lemmatizer, progress);

        let output = File::create(self.output_path(storage))?;
        let frequency = File::create(self.frequency_path(storage))?;
        let stats = analysis.run(&corpus, options.include_body, output, frequency, progress)?;

        self.complete = true;
        self.write(storage)?;
        info!("report {} complete", self.name);
        Ok(stats)
    }

    /// The output table, or `None` while the report is not complete.
    pub fn results(&self, storage: &Storage) -> Result<Option<ResultsTable>> {
        if !self.complete {
            return Ok(None);
        }
        let mut reader = tsv_reader(&self.output_path(storage))?;
        let headers = reader.headers()?.iter().map(str::to_owned).collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_owned).collect());
        }
        Ok(Some(ResultsTable { headers, rows }))
    }

    /// The frequency table, or `None` while the report is not complete.
    pub fn frequencies(&self, storage: &Storage) -> Result<Option<Vec<FrequencyRow>>> {
        if !self.complete {
            return Ok(None);
        }
        let mut reader = tsv_reader(&self.frequency_path(storage))?;
        let rows: Vec<FrequencyRow> = reader
            .deserialize()
            .collect::<std::result::Result<_, _>>()?;
        Ok(Some(rows))
    }

    /// Copy both tables into `dir` as `<report>.tsv` and
    /// `<report> frequency.tsv`. Returns the written paths. The frequency
    /// table's `lemmatized word` column holds stems such as "happi".
    pub fn export(&self, storage: &Storage, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.complete {
            return Err(Error::validation(format!(
                "report \"{}\" has no complete results to export",
                self.name
            )));
        }
        fs::create_dir_all(dir)?;
        let targets = [
            (self.output_path(storage), dir.join(format!("{}.tsv", self.name))),
            (
                self.frequency_path(storage),
                dir.join(format!("{} frequency.tsv", self.name)),
            ),
        ];
        let mut written = Vec::with_capacity(targets.len());
        for (from, to) in targets {
            if to.exists() {
                warn!("overwriting {}", to.display());
            }
            fs::copy(&from, &to)?;
            written.push(to);
        }
        Ok(written)
    }
}

fn tsv_reader(path: &Path) -> Result<csv::Reader<File>> {
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(File::open(path)?))
}
