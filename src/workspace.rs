//! The owning application: storage plus the set of reports whose run is in
//! flight.
//!
//! A [`Workspace`] is `Sync`; share it by reference between the thread
//! running a report and the threads browsing or deleting reports.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use crate::corpus::Corpus;
use crate::engine::{FrequencyRow, Progress, RunStats};
use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::report::{Report, ResultsTable, RunOptions};
use crate::storage::{Settings, Storage};

#[derive(Debug, Clone)]
pub struct Workspace {
    storage: Storage,
    running: Arc<Mutex<HashSet<String>>>,
}

/// Marks a report as running until dropped.
struct RunGuard {
    running: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        running.remove(&self.name);
        debug!("report {} no longer running", self.name);
    }
}

impl Workspace {
    pub fn new(storage: Storage) -> Self {
        Workspace {
            storage,
            running: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Open (and lay out) the storage root at `root`.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self> {
        Ok(Workspace::new(Storage::open(root)?))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn settings(&self) -> Settings {
        self.storage.settings()
    }

    fn running(&self) -> MutexGuard<'_, HashSet<String>> {
        // a panicking run still releases its guard, so the set stays valid
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_running(&self, report: &str) -> bool {
        self.running().contains(report)
    }

    /// Lock the running set, refusing with `InUse` if `report` is in it.
    /// While the returned guard lives no run of `report` can start.
    fn idle(&self, report: &str) -> Result<MutexGuard<'_, HashSet<String>>> {
        let running = self.running();
        if running.contains(report) {
            return Err(Error::InUse(report.to_owned()));
        }
        Ok(running)
    }

    fn begin_run(&self, report: &str) -> Result<RunGuard> {
        let mut running = self.running();
        if !running.insert(report.to_owned()) {
            return Err(Error::InUse(report.to_owned()));
        }
        Ok(RunGuard {
            running: Arc::clone(&self.running),
            name: report.to_owned(),
        })
    }

    pub fn lexicon_names(&self) -> Result<Vec<String>> {
        Lexicon::list(&self.storage)
    }

    pub fn load_lexicon(&self, name: &str) -> Result<Lexicon> {
        Lexicon::load(&self.storage, name)
    }

    pub fn corpus_names(&self) -> Result<Vec<String>> {
        Corpus::list(&self.storage)
    }

    pub fn load_corpus(&self, name: &str) -> Result<Corpus> {
        Corpus::load(&self.storage, name)
    }

    pub fn report_names(&self) -> Result<Vec<String>> {
        Report::list(&self.storage)
    }

    /// Report configuration. Readable while a run is in flight; the
    /// `complete` flag is then false.
    pub fn load_report(&self, name: &str) -> Result<Report> {
        Report::load(&self.storage, name)
    }

    pub fn create_report(
        &self,
        name: &str,
        corpus_name: &str,
        lexicon_names: Vec<String>,
    ) -> Result<Report> {
        Report::create(&self.storage, name, corpus_name, lexicon_names)
    }

    /// Delete a report and its tables. Refused while the report is running,
    /// in which case nothing is removed.
    pub fn delete_report(&self, name: &str) -> Result<()> {
        let _idle = self.idle(name).inspect_err(|_| {
            warn!("refusing to delete report {name} while it is running");
        })?;
        Report::delete(&self.storage, name)
    }

    /// Run a report on the calling thread. Fails with `InUse` if the same
    /// report is already running elsewhere.
    pub fn run_report(
        &self,
        name: &str,
        options: RunOptions,
        progress: Option<&mut dyn FnMut(Progress)>,
    ) -> Result<RunStats> {
        let _guard = self.begin_run(name)?;
        let mut report = Report::load(&self.storage, name)?;
        report.run(&self.storage, options, progress)
    }

    /// The output table, or `None` unless the report is complete. Refused
    /// while the report is running; a run cannot start during the read.
    pub fn report_results(&self, name: &str) -> Result<Option<ResultsTable>> {
        let _idle = self.idle(name)?;
        Report::load(&self.storage, name)?.results(&self.storage)
    }

    pub fn report_frequencies(&self, name: &str) -> Result<Option<Vec<FrequencyRow>>> {
        let _idle = self.idle(name)?;
        Report::load(&self.storage, name)?.frequencies(&self.storage)
    }

    pub fn export_report(&self, name: &str, dir: &Path) -> Result<Vec<PathBuf>> {
        let _idle = self.idle(name)?;
        Report::load(&self.storage, name)?.export(&self.storage, dir)
    }
}
