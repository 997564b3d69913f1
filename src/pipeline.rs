//! Chunked read → normalize → reduce → write driver.
//!
//! Batches are processed strictly in input order, one at a time. Each batch is
//! fully read and transformed before any of its rows reach the writer, and the
//! writer is flushed after every batch, so an aborted run leaves only whole
//! batches behind.

use crate::annotate::Annotator;
use crate::config::Config;
use crate::error::Result;
use crate::normalize::normalize_all;
use crate::reduce::{reduce_batch, Reduced};
use crate::table::{OutputLayout, TableReader, TableWriter};
use csv::StringRecord;
use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow {
    pub raw: String,
    pub stopword: String,
    pub lemma: String,
}

/// Before/after view of the first few input rows, for eyeballing settings.
#[derive(Debug, Clone)]
pub struct SampleReport {
    pub rows: Vec<SampleRow>,
    width: usize,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub batches: usize,
    pub rows: usize,
    pub elapsed: Duration,
    pub output: PathBuf,
}

/// Derived columns for one batch, index-aligned with its rows.
struct Derived {
    raw: Vec<String>,
    reduced: Reduced,
}

pub struct Pipeline<'a, A: Annotator + ?Sized> {
    config: &'a Config,
    annotator: &'a A,
}

impl<'a, A: Annotator + ?Sized> Pipeline<'a, A> {
    pub fn new(config: &'a Config, annotator: &'a A) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, annotator })
    }

    /// Independent read of the first `sample_rows` rows. Ignores `row_cap`
    /// and shares nothing with the main pass.
    pub fn sample(&self) -> Result<SampleReport> {
        let mut reader = TableReader::open(&self.config.input, self.config.delimiter_byte())?;
        let layout = OutputLayout::new(reader.headers(), &self.config.text_column, reader.path())?;
        let rows = reader.read_rows(self.config.sample_rows)?;
        let Derived { raw, reduced } = self.derive(&layout, &rows)?;

        let rows = raw
            .into_iter()
            .zip(reduced.stopword)
            .zip(reduced.lemma)
            .map(|((raw, stopword), lemma)| SampleRow {
                raw,
                stopword,
                lemma,
            })
            .collect();
        Ok(SampleReport {
            rows,
            width: self.config.sample_width,
        })
    }

    pub fn run(&self) -> Result<RunSummary> {
        let config = self.config;
        let reader = TableReader::open(&config.input, config.delimiter_byte())?;
        let layout = OutputLayout::new(reader.headers(), &config.text_column, reader.path())?;
        for name in layout.replaced() {
            warn!("input already has column '{}'; its values will be replaced", name);
        }

        let mut writer = TableWriter::create(&config.output, config.delimiter_byte())?;
        writer.write_header(layout.header())?;

        let start = Instant::now();
        let mut batches = 0;
        let mut rows = 0;
        for batch in reader.batches(config.batch_size, config.row_cap) {
            let batch = batch?;
            let out = self.transform_batch(&layout, &batch)?;
            writer.write_batch(&out)?;

            batches += 1;
            rows += out.len();
            debug!(batch = batches, size = out.len(), "batch written");
            info!(
                "chunk {} | rows {} | elapsed {:.1}s",
                batches,
                rows,
                start.elapsed().as_secs_f64()
            );
        }

        let output = writer.finish()?;
        info!("DONE -> {}", output.display());
        Ok(RunSummary {
            batches,
            rows,
            elapsed: start.elapsed(),
            output,
        })
    }

    fn transform_batch(&self, layout: &OutputLayout, batch: &[StringRecord]) -> Result<Vec<StringRecord>> {
        let Derived { raw, reduced } = self.derive(layout, batch)?;
        Ok(batch
            .iter()
            .enumerate()
            .map(|(i, row)| {
                layout.assemble(
                    row,
                    [
                        raw[i].as_str(),
                        reduced.stopword[i].as_str(),
                        reduced.lemma[i].as_str(),
                    ],
                )
            })
            .collect())
    }

    /// Normalize once per row; the same text feeds `text_raw` and the annotator.
    fn derive(&self, layout: &OutputLayout, rows: &[StringRecord]) -> Result<Derived> {
        let raw = normalize_all(rows.iter().map(|r| layout.text(r)), self.config);
        let reduced = reduce_batch(self.annotator, &raw, self.config.keep_punctuation)?;
        Ok(Derived { raw, reduced })
    }
}

fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}

impl fmt::Display for SampleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "--- SANITY CHECK (first {} rows, truncated) ---",
            self.rows.len()
        )?;
        for (i, row) in self.rows.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "Row {}:", i + 1)?;
            writeln!(f, "raw  : {}", truncate(&row.raw, self.width))?;
            writeln!(f, "stop : {}", truncate(&row.stopword, self.width))?;
            writeln!(f, "lemma: {}", truncate(&row.lemma, self.width))?;
        }
        writeln!(f)?;
        write!(f, "--------------------------------------------")
    }
}
