//! Delimited-file access: a bounded sample read, a batch iterator for the
//! main pass, and an append-only writer.

use crate::error::{Error, Result};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use indexmap::IndexMap;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const TEXT_RAW: &str = "text_raw";
pub const TEXT_STOPWORD: &str = "text_stopword";
pub const TEXT_LEMMA: &str = "text_lemma";
pub const DERIVED_COLUMNS: [&str; 3] = [TEXT_RAW, TEXT_STOPWORD, TEXT_LEMMA];

pub type Batch = Vec<StringRecord>;

pub struct TableReader {
    reader: csv::Reader<File>,
    headers: StringRecord,
    path: PathBuf,
}

impl TableReader {
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;
        let headers = reader.headers().map_err(|e| Error::csv(path, e))?.clone();
        Ok(Self {
            reader,
            headers,
            path: path.to_path_buf(),
        })
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read up to `rows` records from the current position. Short rows are
    /// kept (missing fields read as absent); rows wider than the header fail.
    pub fn read_rows(&mut self, rows: usize) -> Result<Batch> {
        let mut batch = Vec::with_capacity(rows);
        for _ in 0..rows {
            let mut record = StringRecord::new();
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|e| Error::csv(&self.path, e))?;
            if !more {
                break;
            }
            if record.len() > self.headers.len() {
                return Err(Error::RowTooLong {
                    path: self.path.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                    fields: record.len(),
                    expected: self.headers.len(),
                });
            }
            batch.push(record);
        }
        Ok(batch)
    }

    pub fn batches(self, batch_size: usize, row_cap: Option<usize>) -> Batches {
        Batches {
            reader: self,
            batch_size,
            remaining: row_cap,
            done: false,
        }
    }
}

/// Successive fixed-size batches, stopping at end of input or at the row cap.
/// Yields at most one error, after which it is exhausted.
pub struct Batches {
    reader: TableReader,
    batch_size: usize,
    remaining: Option<usize>,
    done: bool,
}

impl Iterator for Batches {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let want = match self.remaining {
            Some(left) => left.min(self.batch_size),
            None => self.batch_size,
        };
        if want == 0 {
            self.done = true;
            return None;
        }
        match self.reader.read_rows(want) {
            Ok(batch) if batch.is_empty() => {
                self.done = true;
                None
            }
            Ok(batch) => {
                if let Some(left) = self.remaining.as_mut() {
                    *left -= batch.len();
                }
                if batch.len() < want {
                    self.done = true;
                }
                Some(Ok(batch))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Where the text column is read from and where the derived columns land.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    header: StringRecord,
    text_index: usize,
    derived: [usize; 3],
    width: usize,
    replaced: Vec<String>,
}

impl OutputLayout {
    /// Derived columns already present in the input keep their position and
    /// are overwritten; the rest are appended in `DERIVED_COLUMNS` order.
    pub fn new(input_header: &StringRecord, text_column: &str, path: &Path) -> Result<Self> {
        let mut positions: IndexMap<&str, usize> = IndexMap::new();
        for (i, name) in input_header.iter().enumerate() {
            positions.entry(name).or_insert(i);
        }
        let text_index = *positions
            .get(text_column)
            .ok_or_else(|| Error::MissingColumn {
                column: text_column.to_string(),
                path: path.to_path_buf(),
            })?;

        let mut names: Vec<&str> = input_header.iter().collect();
        let mut derived = [0usize; 3];
        let mut replaced = Vec::new();
        for (slot, name) in derived.iter_mut().zip(DERIVED_COLUMNS) {
            *slot = match positions.get(name) {
                Some(&i) => {
                    replaced.push(name.to_string());
                    i
                }
                None => {
                    names.push(name);
                    names.len() - 1
                }
            };
        }

        Ok(Self {
            width: names.len(),
            header: StringRecord::from(names),
            text_index,
            derived,
            replaced,
        })
    }

    pub fn header(&self) -> &StringRecord {
        &self.header
    }

    /// Input columns that get overwritten by derived values.
    pub fn replaced(&self) -> &[String] {
        &self.replaced
    }

    /// The row's text value; `None` when the row has no such field.
    pub fn text<'r>(&self, row: &'r StringRecord) -> Option<&'r str> {
        row.get(self.text_index)
    }

    pub fn assemble(&self, row: &StringRecord, values: [&str; 3]) -> StringRecord {
        let mut fields: Vec<&str> = row.iter().collect();
        fields.resize(self.width, "");
        for (&pos, value) in self.derived.iter().zip(values) {
            fields[pos] = value;
        }
        StringRecord::from(fields)
    }
}

pub struct TableWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl TableWriter {
    /// Truncates any existing file at `path`.
    pub fn create(path: &Path, delimiter: u8) -> Result<Self> {
        let writer = WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(Terminator::Any(b'\n'))
            .from_path(path)
            .map_err(|e| Error::csv(path, e))?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn write_header(&mut self, header: &StringRecord) -> Result<()> {
        self.writer
            .write_record(header)
            .map_err(|e| Error::csv(&self.path, e))?;
        self.flush()
    }

    /// Write a whole batch and flush it.
    pub fn write_batch(&mut self, rows: &[StringRecord]) -> Result<()> {
        for row in rows {
            self.writer
                .write_record(row)
                .map_err(|e| Error::csv(&self.path, e))?;
        }
        self.flush()
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        self.flush()?;
        Ok(self.path)
    }

    fn flush(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::csv(&self.path, e.into()))
    }
}
