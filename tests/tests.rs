//! Integration tests for `corpus_sentiment`.
//
// This suite verifies:
// - Library behavior through `Workspace` (report lifecycle, output schema, frequencies)
// - Concurrency rules (no deletion or reading while a report runs)
// - CLI behavior for lexica, corpora and reports, including export
//
// Notes:
// - Every test owns a temporary data directory; nothing touches the user's data.
// - CLI tests pass `--data-dir` explicitly, so `CORPUS_SENTIMENT_DATA` is never read.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use regex::Regex;
use tempfile::tempdir;

use corpus_sentiment::{
    DEFAULT_LEXICON_NAME, Error, Lexicon, Phase, Progress, RedditComment, RedditCorpus, Report,
    RunOptions, Word, Workspace,
};

// 2021-02-01 00:00:00 UTC
const WINDOW_START: i64 = 1_612_137_600;

// --------------------- helpers ---------------------

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a file with content in a temp dir.
fn write_file(dir: &assert_fs::TempDir, name: &str, content: &str) -> PathBuf {
    let f = dir.child(name);
    f.write_str(content).unwrap();
    f.path().to_path_buf()
}

/// Read file to string.
fn read_to_string<P: AsRef<Path>>(p: P) -> String {
    fs::read_to_string(p).unwrap()
}

fn comment(i: i64, body: &str) -> RedditComment {
    RedditComment {
        id: format!("c{i}"),
        submission_id: "t3_abc".to_string(),
        subreddit: "gaming".to_string(),
        body: body.to_string(),
        score: 10 - i,
        created_utc: WINDOW_START + 3600 * i,
    }
}

/// Comments as JSON Lines, the format `corpus compile` reads.
fn comments_jsonl(bodies: &[&str]) -> String {
    bodies
        .iter()
        .enumerate()
        .map(|(i, b)| serde_json::to_string(&comment(i as i64, b)).unwrap() + "\n")
        .collect()
}

/// Workspace with a compiled corpus "gaming" and a lexicon "mine" = {love: 2.0}.
fn workspace(root: &Path, bodies: &[&str]) -> Workspace {
    init_logger();
    let ws = Workspace::open(root).unwrap();
    let start = chrono::DateTime::from_timestamp(WINDOW_START, 0).unwrap();
    let end = chrono::DateTime::from_timestamp(WINDOW_START + 7 * 86_400, 0).unwrap();
    let mut corpus =
        RedditCorpus::create(ws.storage(), "gaming", vec!["gaming".into()], start, end).unwrap();
    let comments: Vec<RedditComment> = bodies
        .iter()
        .enumerate()
        .map(|(i, b)| comment(i as i64, b))
        .collect();
    corpus.compile(comments, None).unwrap();
    Lexicon::create(ws.storage(), "mine", vec![Word::new("love", 2.0)]).unwrap();
    ws
}

/// Parse a TSV file into its header and rows.
fn read_tsv(p: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(p)
        .unwrap();
    let header = reader.headers().unwrap().iter().map(String::from).collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

/// Run CLI successfully against a data directory.
fn run_cli_ok_in(data: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("corpus_sentiment").unwrap();
    cmd.arg("--data-dir").arg(data);
    cmd.args(args).assert().success()
}

/// Run CLI expecting failure against a data directory.
fn run_cli_fail_in(data: &Path, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = assert_cmd::Command::cargo_bin("corpus_sentiment").unwrap();
    cmd.arg("--data-dir").arg(data);
    cmd.args(args).assert().failure()
}

// --------------------- library tests ---------------------

#[test]
fn lib_single_lexicon_scores_and_frequencies() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["I love this", "I hate this", ""]);
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    let stats = ws.run_report("r", RunOptions::default(), None).unwrap();
    assert_eq!(stats.documents, 3);

    let report = ws.load_report("r").unwrap();
    assert!(report.complete);
    let (header, rows) = read_tsv(&report.output_path(ws.storage()));
    assert_eq!(rows.len(), 3);
    let pos = header.iter().position(|h| h == "mine positive").unwrap();
    let compound = header.iter().position(|h| h == "mine compound").unwrap();
    assert_eq!(rows[0][pos], "0.6");
    assert_eq!(rows[0][compound], "0.4588");
    assert_eq!(rows[2][compound], "0");

    // "I love this" + "I hate this" = 6 tokens, "love" once
    let freqs = ws.report_frequencies("r").unwrap().unwrap();
    assert_eq!(freqs.len(), 1);
    assert_eq!(freqs[0].lemma, "love");
    assert!((freqs[0].frequency - 10_000.0 / 6.0).abs() < 1e-9);
}

#[test]
fn lib_output_schema_follows_declared_lexicon_order() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["good game", "bad game"]);
    Lexicon::create(ws.storage(), "other", vec![Word::new("game", 0.5)]).unwrap();
    ws.create_report(
        "r",
        "gaming",
        vec!["other".into(), DEFAULT_LEXICON_NAME.into(), "mine".into()],
    )
    .unwrap();
    let options = RunOptions {
        include_body: true,
        ..RunOptions::default()
    };
    ws.run_report("r", options, None).unwrap();

    let report = ws.load_report("r").unwrap();
    let (header, rows) = read_tsv(&report.output_path(ws.storage()));
    let mut expected: Vec<String> = ["body", "timestamp", "score", "comment ID", "submission ID", "subreddit"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for lexicon in ["other", DEFAULT_LEXICON_NAME, "mine"] {
        for kind in ["positive", "neutral", "negative", "compound"] {
            expected.push(format!("{lexicon} {kind}"));
        }
    }
    assert_eq!(header, expected);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "good game");
    assert_eq!(rows[0][1], "2021-02-01 00:00:00");
    assert_eq!(rows[1][2], "9");

    // the default lexicon never shows up in the frequency table
    let freqs = ws.report_frequencies("r").unwrap().unwrap();
    assert!(freqs.iter().all(|f| f.lexicon != DEFAULT_LEXICON_NAME));
    let game = freqs.iter().find(|f| f.lemma == "game").unwrap();
    assert_eq!(game.lexicon, "other");
    assert!((game.frequency - 5_000.0).abs() < 1e-9);
}

#[test]
fn lib_body_column_has_no_line_breaks_or_tabs() {
    let td = tempdir().unwrap();
    let ws = workspace(
        td.path(),
        &["line one\nline two", "col\tumn", "crlf\r\nend", "\"quoted\" love"],
    );
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    let options = RunOptions {
        include_body: true,
        ..RunOptions::default()
    };
    ws.run_report("r", options, None).unwrap();

    let report = ws.load_report("r").unwrap();
    let (_, rows) = read_tsv(&report.output_path(ws.storage()));
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert!(!row[0].contains('\n') && !row[0].contains('\t') && !row[0].contains('\r'));
    }
    assert_eq!(rows[0][0], "line one line two");
    assert_eq!(rows[3][0], "\"quoted\" love");

    // the raw output file has exactly one line per row plus the header
    let raw = read_to_string(report.output_path(ws.storage()));
    assert_eq!(raw.lines().count(), 5);
}

#[test]
fn lib_empty_corpus_completes() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["placeholder"]);
    fs::write(
        ws.storage().corpora_dir().join("gaming").join("documents.jsonl"),
        "",
    )
    .unwrap();
    ws.create_report("r", "gaming", vec!["mine".into(), DEFAULT_LEXICON_NAME.into()])
        .unwrap();
    let stats = ws.run_report("r", RunOptions::default(), None).unwrap();
    assert_eq!(stats.documents, 0);
    assert_eq!(stats.total_tokens, 0);

    let results = ws.report_results("r").unwrap().unwrap();
    assert!(results.rows.is_empty());
    assert_eq!(results.headers.len(), 5 + 8);
    let freqs = ws.report_frequencies("r").unwrap().unwrap();
    assert_eq!(freqs.len(), 1);
    assert_eq!(freqs[0].frequency, 0.0);
    assert!(ws.load_report("r").unwrap().complete);
}

#[test]
fn lib_rerun_produces_identical_tables() {
    let td = tempdir().unwrap();
    let ws = workspace(
        td.path(),
        &["I love love this", "Loving it! Truly LOVED", "meh", "not love"],
    );
    ws.create_report("r", "gaming", vec![DEFAULT_LEXICON_NAME.into(), "mine".into()])
        .unwrap();
    let report = ws.load_report("r").unwrap();

    ws.run_report("r", RunOptions::default(), None).unwrap();
    let first_output = fs::read(report.output_path(ws.storage())).unwrap();
    let first_freq = fs::read(report.frequency_path(ws.storage())).unwrap();
    assert!(ws.load_report("r").unwrap().complete);

    ws.run_report("r", RunOptions::default(), None).unwrap();
    assert_eq!(fs::read(report.output_path(ws.storage())).unwrap(), first_output);
    assert_eq!(fs::read(report.frequency_path(ws.storage())).unwrap(), first_freq);
    assert!(ws.load_report("r").unwrap().complete);
}

#[test]
fn lib_failed_run_leaves_report_incomplete() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["I love this"]);
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    ws.run_report("r", RunOptions::default(), None).unwrap();
    assert!(ws.load_report("r").unwrap().complete);

    corpus_sentiment::Corpus::delete(ws.storage(), "gaming").unwrap();
    let err = ws.run_report("r", RunOptions::default(), None).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(!ws.load_report("r").unwrap().complete);
    assert!(ws.report_results("r").unwrap().is_none());
    assert!(ws.report_frequencies("r").unwrap().is_none());
}

#[test]
fn lib_create_errors_leave_storage_untouched() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["x"]);
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    let before = read_to_string(ws.storage().reports_dir().join("r").join("report.toml"));

    let err = ws
        .create_report("r", "gaming", vec![DEFAULT_LEXICON_NAME.into()])
        .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists { .. }));
    assert_eq!(
        read_to_string(ws.storage().reports_dir().join("r").join("report.toml")),
        before
    );

    let err = ws.create_report("s", "missing", vec!["mine".into()]).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert_eq!(ws.report_names().unwrap(), vec!["r".to_string()]);
    assert!(matches!(
        Report::load(ws.storage(), "s"),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn lib_delete_while_running_is_refused() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["I love this", "and this", "and that"]);
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    let (started_tx, started_rx) = mpsc::channel();
    let (resume_tx, resume_rx) = mpsc::channel::<()>();

    thread::scope(|s| {
        let runner = s.spawn(|| {
            let mut cb = move |p: Progress| {
                if p.phase == Phase::ScoringDocuments && p.completed == 2 {
                    started_tx.send(()).unwrap();
                    resume_rx.recv().unwrap();
                }
            };
            ws.run_report("r", RunOptions::default(), Some(&mut cb))
        });

        started_rx.recv().unwrap();
        let err = ws.delete_report("r").unwrap_err();
        assert!(matches!(err, Error::InUse(ref name) if name == "r"));
        assert!(ws.storage().reports_dir().join("r").join("report.toml").exists());
        assert!(ws.storage().reports_dir().join("r").join("output.tsv").exists());
        assert!(matches!(ws.report_results("r"), Err(Error::InUse(_))));

        resume_tx.send(()).unwrap();
        runner.join().unwrap().unwrap();
    });

    ws.delete_report("r").unwrap();
    assert!(!ws.storage().reports_dir().join("r").exists());
}

// --------------------- CLI tests ---------------------

#[test]
fn cli_missing_report_fails() {
    let data = assert_fs::TempDir::new().unwrap();
    run_cli_fail_in(data.path(), &["report", "run", "nope"])
        .stderr(predicate::str::contains("report \"nope\" does not exist"));
}

#[test]
fn cli_lexicon_lifecycle() {
    let data = assert_fs::TempDir::new().unwrap();
    let files = assert_fs::TempDir::new().unwrap();
    let words = write_file(&files, "feelings.txt", "love;2\nhate;-2.5\n\nkind of;0.5\n");
    let words = words.to_str().unwrap();

    run_cli_ok_in(data.path(), &["lexicon", "create", "feelings", "--words", words])
        .stdout(predicate::str::contains("3 words"));
    run_cli_ok_in(data.path(), &["lexicon", "list"])
        .stdout(predicate::str::diff(format!("{DEFAULT_LEXICON_NAME}\nfeelings\n")));
    run_cli_ok_in(data.path(), &["lexicon", "show", "feelings"])
        .stdout(predicate::str::diff("love\t2\nhate\t-2.5\nkind of\t0.5\n"));
    run_cli_ok_in(data.path(), &["lexicon", "show", DEFAULT_LEXICON_NAME])
        .stdout(
            predicate::str::is_match(r"is built in: \d{3} words, a subset of the full VADER")
                .unwrap(),
        );
    run_cli_ok_in(data.path(), &["lexicon", "delete", "feelings"]);
    run_cli_fail_in(data.path(), &["lexicon", "show", "feelings"])
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn cli_malformed_word_list_fails() {
    let data = assert_fs::TempDir::new().unwrap();
    let files = assert_fs::TempDir::new().unwrap();
    let words = write_file(&files, "bad.txt", "love;2\nno score here\n");
    run_cli_fail_in(
        data.path(),
        &["lexicon", "create", "bad", "--words", words.to_str().unwrap()],
    )
    .stderr(predicate::str::contains("line 2"));
    run_cli_ok_in(data.path(), &["lexicon", "list"])
        .stdout(predicate::str::contains("bad").not());
}

#[test]
fn cli_corpus_rejects_inverted_window() {
    let data = assert_fs::TempDir::new().unwrap();
    run_cli_fail_in(
        data.path(),
        &[
            "corpus", "create", "c", "--subreddit", "gaming", "--start", "2021-02-08", "--end",
            "2021-02-01",
        ],
    )
    .stderr(predicate::str::contains("start time must be before end time"));
    run_cli_fail_in(
        data.path(),
        &[
            "corpus", "create", "c", "--subreddit", "gaming", "--start", "last week", "--end",
            "2021-02-01",
        ],
    );
}

#[test]
fn cli_full_report_workflow() {
    let data = assert_fs::TempDir::new().unwrap();
    let files = assert_fs::TempDir::new().unwrap();
    let words = write_file(&files, "mine.txt", "love;2\n");
    let comments = write_file(
        &files,
        "comments.jsonl",
        &comments_jsonl(&["I love this", "I hate this", "", "multi\nline\tbody"]),
    );
    let out = files.child("exported");

    run_cli_ok_in(
        data.path(),
        &["lexicon", "create", "mine", "--words", words.to_str().unwrap()],
    );
    run_cli_ok_in(
        data.path(),
        &[
            "corpus", "create", "gaming", "--subreddit", "gaming", "--start", "2021-02-01",
            "--end", "2021-02-08",
        ],
    );
    run_cli_ok_in(
        data.path(),
        &["corpus", "compile", "gaming", "--comments", comments.to_str().unwrap()],
    )
    .stdout(predicate::str::contains("4 documents"));
    run_cli_ok_in(data.path(), &["corpus", "show", "gaming"])
        .stdout(predicate::str::contains("compiled\ttrue"));

    run_cli_fail_in(
        data.path(),
        &["report", "create", "weekly", "--corpus", "gaming", "--lexicon", "nope"],
    )
    .stderr(predicate::str::contains("lexicon \"nope\" does not exist"));
    run_cli_ok_in(
        data.path(),
        &[
            "report", "create", "weekly", "--corpus", "gaming", "--lexicon", "mine", "--lexicon",
            DEFAULT_LEXICON_NAME,
        ],
    );
    run_cli_ok_in(data.path(), &["report", "show", "weekly"])
        .stdout(predicate::str::contains("complete\tfalse"));

    run_cli_ok_in(data.path(), &["report", "run", "weekly", "--include-body"])
        .stdout(predicate::str::contains("4 documents"));
    run_cli_ok_in(data.path(), &["report", "show", "weekly", "--timeline"])
        .stdout(predicate::str::contains("complete\ttrue"))
        .stdout(predicate::str::contains("top words of \"mine\" (stems, per 10,000)"))
        .stdout(predicate::str::contains("2021-02-01 01:00:00"));

    run_cli_ok_in(
        data.path(),
        &["report", "export", "weekly", out.path().to_str().unwrap()],
    );
    out.child("weekly.tsv").assert(predicate::path::exists());
    out.child("weekly frequency.tsv")
        .assert(predicate::str::starts_with(
            "lemmatized word\tlexicon name\tfrequency per 10,000\n",
        ));

    let exported = read_to_string(out.child("weekly.tsv").path());
    let mut lines = exported.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("body\ttimestamp\tscore\tcomment ID\tsubmission ID\tsubreddit\t"));
    let ts = Regex::new(r"\t\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\t").unwrap();
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| ts.is_match(r)));
    assert!(rows[3].starts_with("multi line body\t"));

    run_cli_ok_in(data.path(), &["report", "delete", "weekly"]);
    run_cli_ok_in(data.path(), &["report", "list"]).stdout(predicate::str::is_empty());
}

#[test]
fn cli_export_incomplete_report_fails() {
    let td = tempdir().unwrap();
    let ws = workspace(td.path(), &["I love this"]);
    ws.create_report("r", "gaming", vec!["mine".into()]).unwrap();
    let out = assert_fs::TempDir::new().unwrap();
    run_cli_fail_in(td.path(), &["report", "export", "r", out.path().to_str().unwrap()])
        .stderr(predicate::str::contains("no complete results"));
    out.child("r.tsv").assert(predicate::path::missing());
}
