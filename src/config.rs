use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_input")]
    pub input: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default = "default_text_column")]
    pub text_column: String,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Upper bound on rows read by the main pass. The sample ignores it.
    #[serde(default)]
    pub row_cap: Option<usize>,

    #[serde(default = "default_sample_rows")]
    pub sample_rows: usize,

    #[serde(default = "default_sample_width")]
    pub sample_width: usize,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default = "default_true")]
    pub keep_punctuation: bool,

    #[serde(default = "default_true")]
    pub normalize_urls: bool,

    #[serde(default = "default_true")]
    pub normalize_users: bool,

    #[serde(default = "default_true")]
    pub flatten_newlines: bool,

    #[serde(default)]
    pub unicode_nfkc: bool,

    #[serde(default)]
    pub extra_stopwords: Vec<String>,

    #[serde(default)]
    pub lemma_exceptions: HashMap<String, String>,
}

fn default_input() -> PathBuf {
    PathBuf::from("nationality.csv")
}
fn default_output() -> PathBuf {
    PathBuf::from("nationality_preprocessed.csv")
}
fn default_text_column() -> String {
    "post".to_string()
}
fn default_batch_size() -> usize {
    500
}
fn default_sample_rows() -> usize {
    3
}
fn default_sample_width() -> usize {
    200
}
fn default_delimiter() -> char {
    ','
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Config {
            input: default_input(),
            output: default_output(),
            text_column: default_text_column(),
            batch_size: 500,
            row_cap: None,
            sample_rows: 3,
            sample_width: 200,
            delimiter: ',',
            lowercase: true,
            keep_punctuation: true,
            normalize_urls: true,
            normalize_users: true,
            flatten_newlines: true,
            unicode_nfkc: false,
            extra_stopwords: Vec::new(),
            lemma_exceptions: HashMap::new(),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        if !self.delimiter.is_ascii() {
            return Err(Error::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.text_column.is_empty() {
            return Err(Error::Config("text_column must not be empty".to_string()));
        }
        Ok(())
    }

    pub(crate) fn delimiter_byte(&self) -> u8 {
        self.delimiter as u8
    }
}
