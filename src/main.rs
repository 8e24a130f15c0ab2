#![forbid(unsafe_code)]
//! # corpus_sentiment CLI
//!
//! Command-line front end for the `corpus_sentiment` crate: manage lexica,
//! corpora and reports stored under one data directory, run reports, and
//! inspect or export their results.
//!
//! ## Example
//! ```bash
//! corpus_sentiment lexicon create feelings --words feelings.txt
//! corpus_sentiment corpus create gaming --subreddit gaming --start 2021-02-01 --end 2021-02-08
//! corpus_sentiment corpus compile gaming --comments comments.jsonl
//! corpus_sentiment report create weekly --corpus gaming --lexicon feelings --lexicon "VADER Default Lexicon"
//! corpus_sentiment report run weekly --include-body
//! corpus_sentiment report export weekly ./out
//! ```
//!
//! The data directory defaults to `$HOME/.local/share/corpus_sentiment` and
//! can be set with `--data-dir` or `CORPUS_SENTIMENT_DATA`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use corpus_sentiment::summary::{self, TOP_FREQUENCIES};
use corpus_sentiment::{
    Corpus, Error, LemmaLanguage, Lexicon, Phase, Progress, RedditCorpus, Result, RunOptions,
    SentimentAnalyzer, Workspace, corpus, lexicon,
};
use log::{error, info};

const DATA_ENV: &str = "CORPUS_SENTIMENT_DATA";

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Directory holding corpora, lexica, reports and settings
    #[arg(long, env = DATA_ENV, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage sentiment lexica
    #[command(subcommand)]
    Lexicon(LexiconCommand),
    /// Manage corpora of Reddit comments
    #[command(subcommand)]
    Corpus(CorpusCommand),
    /// Manage, run and inspect reports
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Subcommand)]
enum LexiconCommand {
    /// Create (or replace) a lexicon from a file of `word;score` lines
    Create {
        name: String,
        #[arg(long)]
        words: PathBuf,
    },
    /// List lexicon names
    List,
    /// Print a lexicon's words and scores
    Show { name: String },
    /// Delete a lexicon
    Delete { name: String },
}

#[derive(Subcommand)]
enum CorpusCommand {
    /// Register a corpus of comments from subreddits within a time window
    Create {
        name: String,
        /// Subreddit to include (repeatable)
        #[arg(long = "subreddit", required = true)]
        subreddits: Vec<String>,
        /// Window start, `YYYY-MM-DD` or RFC 3339 (inclusive)
        #[arg(long, value_parser = parse_time)]
        start: DateTime<Utc>,
        /// Window end, `YYYY-MM-DD` or RFC 3339 (exclusive)
        #[arg(long, value_parser = parse_time)]
        end: DateTime<Utc>,
    },
    /// Store downloaded comments (JSON Lines) in a corpus
    Compile {
        name: String,
        #[arg(long)]
        comments: PathBuf,
    },
    /// List corpus names
    List,
    /// Print a corpus's parameters
    Show { name: String },
    /// Delete a corpus
    Delete { name: String },
}

#[derive(Args)]
struct RunArgs {
    name: String,
    /// Add the sanitized comment body as the first output column
    #[arg(long, default_value_t = false)]
    include_body: bool,
    /// Stemmer language for lemma counting (defaults to the stored setting)
    #[arg(long)]
    language: Option<LemmaLanguage>,
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Create a report over a corpus and one or more lexica
    Create {
        name: String,
        #[arg(long)]
        corpus: String,
        /// Lexicon to score with (repeatable, order is kept)
        #[arg(long = "lexicon", required = true)]
        lexica: Vec<String>,
    },
    /// List report names
    List,
    /// Run a report
    Run(RunArgs),
    /// Print a report's configuration and, when complete, its summary
    ///
    /// Top words are listed as Snowball stems (e.g. "happi"), not dictionary
    /// forms.
    Show {
        name: String,
        /// Also print compound scores over time
        #[arg(long, default_value_t = false)]
        timeline: bool,
    },
    /// Copy a complete report's tables into a directory
    ///
    /// The `lemmatized word` column of the frequency table holds Snowball
    /// stems (e.g. "happi"), not dictionary forms.
    Export { name: String, dir: PathBuf },
    /// Delete a report and its results
    Delete { name: String },
}

fn parse_time(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
        .ok_or_else(|| format!("expected YYYY-MM-DD or an RFC 3339 time, got \"{s}\""))
}

fn default_data_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => Path::new(&home).join(".local/share/corpus_sentiment"),
        None => PathBuf::from("corpus_sentiment_data"),
    }
}

fn print_lines<I: IntoIterator<Item = String>>(lines: I) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn lexicon_command(ws: &Workspace, command: LexiconCommand) -> Result<()> {
    match command {
        LexiconCommand::Create { name, words } => {
            let words = lexicon::parse_word_list(&fs::read_to_string(words)?)?;
            let count = words.len();
            Lexicon::create(ws.storage(), &name, words)?;
            println!("created lexicon \"{name}\" with {count} words");
        }
        LexiconCommand::List => print_lines(ws.lexicon_names()?)?,
        LexiconCommand::Show { name } => {
            let lexicon = ws.load_lexicon(&name)?;
            if lexicon.is_default() {
                let size = SentimentAnalyzer::for_lexicon(&lexicon).vocabulary_size();
                println!(
                    "{name} is built in: {size} words, a subset of the full VADER vocabulary \
                     (about 7,500 words), so scores differ from full VADER"
                );
            } else {
                print_lines(lexicon.interchange_lines())?;
            }
        }
        LexiconCommand::Delete { name } => {
            Lexicon::delete(ws.storage(), &name)?;
            println!("deleted lexicon \"{name}\"");
        }
    }
    Ok(())
}

fn corpus_command(ws: &Workspace, command: CorpusCommand) -> Result<()> {
    match command {
        CorpusCommand::Create {
            name,
            subreddits,
            start,
            end,
        } => {
            RedditCorpus::create(ws.storage(), &name, subreddits, start, end)?;
            println!("created corpus \"{name}\"");
        }
        CorpusCommand::Compile { name, comments } => {
            let Corpus::Reddit(mut reddit) = ws.load_corpus(&name)?;
            if reddit.compiled {
                println!("corpus \"{name}\" is already compiled");
                return Ok(());
            }
            let comments = corpus::read_comments(&comments)?;
            info!("read {} comments", comments.len());
            reddit.compile(comments, None)?;
            println!(
                "compiled corpus \"{name}\": {} documents",
                reddit.document_count
            );
        }
        CorpusCommand::List => print_lines(ws.corpus_names()?)?,
        CorpusCommand::Show { name } => {
            let Corpus::Reddit(reddit) = ws.load_corpus(&name)?;
            println!("name\t{name}");
            println!("type\treddit");
            println!("subreddits\t{}", reddit.subreddits.join(", "));
            println!("start\t{}", reddit.start_time.to_rfc3339());
            println!("end\t{}", reddit.end_time.to_rfc3339());
            println!("compiled\t{}", reddit.compiled);
            println!("documents\t{}", reddit.document_count);
        }
        CorpusCommand::Delete { name } => {
            Corpus::delete(ws.storage(), &name)?;
            println!("deleted corpus \"{name}\"");
        }
    }
    Ok(())
}

fn show_progress(p: Progress) {
    let label = match p.phase {
        Phase::LemmatizingLexicon => "lemmatizing lexicon words",
        Phase::ScoringDocuments => "scoring documents",
    };
    match p.total {
        Some(total) if p.completed == total || p.completed % 100 == 0 => {
            eprint!("\r{label}: {}/{total}", p.completed);
            if p.completed == total {
                eprintln!();
            }
        }
        None if p.completed % 100 == 0 => eprint!("\r{label}: {}", p.completed),
        _ => {}
    }
}

fn show_report(ws: &Workspace, name: &str, timeline: bool) -> Result<()> {
    let report = ws.load_report(name)?;
    println!("name\t{name}");
    println!("corpus\t{}", report.corpus_name);
    println!("lexica\t{}", report.lexicon_names.join(", "));
    println!("complete\t{}", report.complete);

    let Some(results) = ws.report_results(name)? else {
        return Ok(());
    };
    println!();
    println!("lexicon\tdocuments\tpositive\tneutral\tnegative\tcompound\tcompound std");
    for s in summary::lexicon_summaries(&results, &report.lexicon_names)? {
        println!(
            "{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.4}\t{:.4}",
            s.lexicon, s.documents, s.positive, s.neutral, s.negative, s.compound, s.compound_std
        );
    }

    if timeline {
        println!();
        println!("timestamp\t{}", report.lexicon_names.join("\t"));
        for point in summary::compound_timeline(
            &results,
            &report.lexicon_names,
            summary::default_bucket(),
        )? {
            let values: Vec<String> = point.compound.iter().map(|v| format!("{v:.4}")).collect();
            println!("{}\t{}", point.time, values.join("\t"));
        }
    }

    let frequencies = ws.report_frequencies(name)?.unwrap_or_default();
    for lexicon in &report.lexicon_names {
        let top = summary::top_frequencies(&frequencies, lexicon, TOP_FREQUENCIES);
        if top.is_empty() {
            continue;
        }
        println!();
        println!("top words of \"{lexicon}\" (stems, per 10,000)");
        for row in top {
            println!("{}\t{:.2}", row.lemma, row.frequency);
        }
    }
    Ok(())
}

fn report_command(ws: &Workspace, command: ReportCommand) -> Result<()> {
    match command {
        ReportCommand::Create {
            name,
            corpus,
            lexica,
        } => {
            ws.create_report(&name, &corpus, lexica)?;
            println!("created report \"{name}\"");
        }
        ReportCommand::List => print_lines(ws.report_names()?)?,
        ReportCommand::Run(args) => {
            let settings = ws.settings();
            let options = RunOptions {
                include_body: args.include_body || settings.include_body,
                language: args.language.unwrap_or(settings.lemma_language),
            };
            let mut progress = show_progress;
            let stats = ws.run_report(&args.name, options, Some(&mut progress))?;
            println!(
                "report \"{}\" complete: {} documents, {} tokens, {} frequency rows",
                args.name, stats.documents, stats.total_tokens, stats.frequency_rows
            );
        }
        ReportCommand::Show { name, timeline } => show_report(ws, &name, timeline)?,
        ReportCommand::Export { name, dir } => {
            for path in ws.export_report(&name, &dir)? {
                println!("{}", path.display());
            }
        }
        ReportCommand::Delete { name } => {
            ws.delete_report(&name)?;
            println!("deleted report \"{name}\"");
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    let ws = Workspace::open(&data_dir).map_err(|e| match e {
        Error::Io(io) => Error::Io(io::Error::new(
            io.kind(),
            format!("cannot open data directory {}: {io}", data_dir.display()),
        )),
        other => other,
    })?;
    match cli.command {
        Command::Lexicon(c) => lexicon_command(&ws, c),
        Command::Corpus(c) => corpus_command(&ws, c),
        Command::Report(c) => report_command(&ws, c),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("Error: {}", e);
        process::exit(1);
    }
}
