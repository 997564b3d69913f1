//! Token annotation.
//!
//! [`Annotator`] is the seam between the pipeline and whatever linguistic
//! tokenizer backs it. The pipeline only ever sees [`Token`]s: surface text,
//! three flags and a lemma. [`RuleAnnotator`] is the built-in English
//! implementation: Unicode word-boundary segmentation, the `stop-words`
//! English list, and the lookup/rule lemmatizer in [`crate::lemma`].

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lemma::Lemmatizer;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use stop_words::{get, LANGUAGE};
use unicode_segmentation::UnicodeSegmentation;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:url|user)>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub is_space: bool,
    pub is_punct: bool,
    pub is_stop: bool,
    pub lemma: String,
}

/// Batch tokenizer capability.
///
/// Implementations return exactly one token sequence per input string, in
/// input order, or fail the whole batch.
pub trait Annotator {
    fn annotate_batch(&self, texts: &[String]) -> Result<Vec<Vec<Token>>>;
}

#[derive(Debug, Clone)]
pub struct RuleAnnotator {
    stopwords: HashSet<String>,
    lemmatizer: Lemmatizer,
}

impl RuleAnnotator {
    pub fn new(config: &Config) -> Result<Self> {
        for word in &config.extra_stopwords {
            check_entry("extra stopword", word)?;
        }
        for (form, lemma) in &config.lemma_exceptions {
            check_entry("lemma exception key", form)?;
            check_entry("lemma exception value", lemma)?;
        }

        let mut stopwords: HashSet<String> = get(LANGUAGE::English)
            .iter()
            .map(|s| s.to_string().to_lowercase())
            .collect();
        stopwords.extend(config.extra_stopwords.iter().map(|w| w.to_lowercase()));

        let lemmatizer = Lemmatizer::new().with_exceptions(&config.lemma_exceptions);
        Ok(Self {
            stopwords,
            lemmatizer,
        })
    }

    pub fn annotate(&self, text: &str) -> Vec<Token> {
        segment(text).into_iter().map(|s| self.token(s)).collect()
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    fn token(&self, surface: &str) -> Token {
        let placeholder = is_placeholder(surface);
        let is_space = surface.chars().all(char::is_whitespace);
        let is_punct = !placeholder && !is_space && !surface.chars().any(char::is_alphanumeric);
        let is_stop = !placeholder && !is_space && self.is_stopword(surface);
        let lemma = if placeholder || is_space || is_punct {
            surface.to_string()
        } else {
            self.lemmatizer.lemmatize(surface)
        };
        Token {
            text: surface.to_string(),
            is_space,
            is_punct,
            is_stop,
            lemma,
        }
    }
}

impl Annotator for RuleAnnotator {
    fn annotate_batch(&self, texts: &[String]) -> Result<Vec<Vec<Token>>> {
        Ok(texts.iter().map(|t| self.annotate(t)).collect())
    }
}

fn check_entry(kind: &str, word: &str) -> Result<()> {
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        return Err(Error::Annotator(format!(
            "{} must be a single non-empty word, got {:?}",
            kind, word
        )));
    }
    Ok(())
}

fn is_placeholder(s: &str) -> bool {
    s.eq_ignore_ascii_case("<url>") || s.eq_ignore_ascii_case("<user>")
}

/// Split on Unicode word boundaries, keeping `<url>`/`<user>` whole.
fn segment(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut last = 0;
    for m in RE_PLACEHOLDER.find_iter(text) {
        out.extend(text[last..m.start()].split_word_bounds());
        out.push(m.as_str());
        last = m.end();
    }
    out.extend(text[last..].split_word_bounds());
    out
}
