//! Figures derived from a finished report, for display.

use chrono::{DateTime, NaiveDateTime, TimeDelta};

use crate::corpus::TIMESTAMP_FORMAT;
use crate::engine::{FrequencyRow, score_columns};
use crate::error::{Error, Result};
use crate::report::ResultsTable;

/// Timelines longer than this are resampled into fixed buckets.
pub const RESAMPLE_THRESHOLD: usize = 20;

/// How many lemmas a frequency chart shows.
pub const TOP_FREQUENCIES: usize = 20;

pub fn default_bucket() -> TimeDelta {
    TimeDelta::hours(6)
}

/// Means of the four scores of one lexicon over all documents.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconSummary {
    pub lexicon: String,
    pub documents: usize,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub compound: f64,
    /// Population standard deviation of the compound score.
    pub compound_std: f64,
}

/// Compound score per lexicon at one point in time, in lexicon order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePoint {
    pub time: NaiveDateTime,
    pub compound: Vec<f64>,
}

fn column(results: &ResultsTable, name: &str) -> Result<usize> {
    results
        .column(name)
        .ok_or_else(|| Error::validation(format!("results have no \"{name}\" column")))
}

fn number(cell: &str) -> Result<f64> {
    cell.parse()
        .map_err(|_| Error::validation(format!("\"{cell}\" is not a number")))
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

pub fn lexicon_summaries(results: &ResultsTable, lexica: &[String]) -> Result<Vec<LexiconSummary>> {
    let mut summaries = Vec::with_capacity(lexica.len());
    for lexicon in lexica {
        let mut columns: [Vec<f64>; 4] = Default::default();
        for (values, name) in columns.iter_mut().zip(score_columns(lexicon)) {
            let idx = column(results, &name)?;
            for row in &results.rows {
                values.push(number(&row[idx])?);
            }
        }
        let [positive, neutral, negative, compound] = &columns;
        summaries.push(LexiconSummary {
            lexicon: lexicon.clone(),
            documents: results.rows.len(),
            positive: mean(positive),
            neutral: mean(neutral),
            negative: mean(negative),
            compound: mean(compound),
            compound_std: std_dev(compound),
        });
    }
    Ok(summaries)
}

/// Compound scores over time, one series per lexicon.
///
/// Up to [`RESAMPLE_THRESHOLD`] documents are returned one point each, in
/// time order. Longer timelines are averaged into `bucket`-sized windows
/// aligned to the Unix epoch; windows without documents are filled by
/// linear interpolation between their neighbours.
pub fn compound_timeline(
    results: &ResultsTable,
    lexica: &[String],
    bucket: TimeDelta,
) -> Result<Vec<TimelinePoint>> {
    let ts = column(results, "timestamp")?;
    let columns = lexica
        .iter()
        .map(|l| column(results, &format!("{l} compound")))
        .collect::<Result<Vec<_>>>()?;

    let mut points = Vec::with_capacity(results.rows.len());
    for row in &results.rows {
        let time = NaiveDateTime::parse_from_str(&row[ts], TIMESTAMP_FORMAT)
            .map_err(|e| Error::validation(format!("bad timestamp \"{}\": {e}", row[ts])))?;
        let compound = columns
            .iter()
            .map(|&c| number(&row[c]))
            .collect::<Result<Vec<_>>>()?;
        points.push(TimelinePoint { time, compound });
    }
    points.sort_by_key(|p| p.time);

    if points.len() <= RESAMPLE_THRESHOLD {
        return Ok(points);
    }
    resample(&points, lexica.len(), bucket)
}

fn resample(points: &[TimelinePoint], series: usize, bucket: TimeDelta) -> Result<Vec<TimelinePoint>> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Ok(Vec::new());
    };
    let width = bucket.num_seconds().max(1);
    let key = |p: &TimelinePoint| p.time.and_utc().timestamp().div_euclid(width);
    let first_key = key(first);
    let buckets = (key(last) - first_key + 1) as usize;

    let mut sums = vec![vec![0.0; series]; buckets];
    let mut counts = vec![0usize; buckets];
    for p in points {
        let i = (key(p) - first_key) as usize;
        counts[i] += 1;
        for (sum, v) in sums[i].iter_mut().zip(&p.compound) {
            *sum += v;
        }
    }

    let means: Vec<Option<Vec<f64>>> = sums
        .into_iter()
        .zip(&counts)
        .map(|(s, &n)| (n > 0).then(|| s.into_iter().map(|v| v / n as f64).collect()))
        .collect();

    let origin = DateTime::from_timestamp(first_key * width, 0)
        .ok_or_else(|| Error::validation("timeline start is out of range"))?
        .naive_utc();

    let mut resampled = Vec::with_capacity(buckets);
    let mut prev = 0;
    for i in 0..buckets {
        let compound = match &means[i] {
            Some(m) => {
                prev = i;
                m.clone()
            }
            None => {
                // first and last buckets always hold a document
                let next = (i + 1..buckets).find(|&j| means[j].is_some()).unwrap_or(prev);
                match (&means[prev], &means[next]) {
                    (Some(a), Some(b)) if next > prev => {
                        let t = (i - prev) as f64 / (next - prev) as f64;
                        a.iter().zip(b).map(|(a, b)| a + (b - a) * t).collect()
                    }
                    (Some(a), _) => a.clone(),
                    _ => vec![0.0; series],
                }
            }
        };
        resampled.push(TimelinePoint {
            time: origin + TimeDelta::seconds(width * i as i64),
            compound,
        });
    }
    Ok(resampled)
}

/// The `limit` most frequent lemmas of `lexicon`, highest first. Ties keep
/// table order.
pub fn top_frequencies<'a>(rows: &'a [FrequencyRow], lexicon: &str, limit: usize) -> Vec<&'a FrequencyRow> {
    let mut selected: Vec<&FrequencyRow> = rows.iter().filter(|r| r.lexicon == lexicon).collect();
    selected.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));
    selected.truncate(limit);
    selected
}
