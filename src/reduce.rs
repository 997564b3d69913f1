use crate::annotate::{Annotator, Token};
use crate::error::{Error, Result};

/// Stopword-filtered and lemmatized text for one batch, index-aligned with
/// the batch input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reduced {
    pub stopword: Vec<String>,
    pub lemma: Vec<String>,
}

/// Reduce a batch of normalized strings through one annotator call.
pub fn reduce_batch<A>(annotator: &A, texts: &[String], keep_punctuation: bool) -> Result<Reduced>
where
    A: Annotator + ?Sized,
{
    let docs = annotator.annotate_batch(texts)?;
    if docs.len() != texts.len() {
        return Err(Error::Annotator(format!(
            "annotator returned {} documents for {} inputs",
            docs.len(),
            texts.len()
        )));
    }

    let mut reduced = Reduced {
        stopword: Vec::with_capacity(docs.len()),
        lemma: Vec::with_capacity(docs.len()),
    };
    for tokens in &docs {
        let (stop, lemma) = reduce_tokens(tokens, keep_punctuation);
        reduced.stopword.push(stop);
        reduced.lemma.push(lemma);
    }
    Ok(reduced)
}

/// Single pass over one document's tokens.
pub fn reduce_tokens(tokens: &[Token], keep_punctuation: bool) -> (String, String) {
    let mut stop_tokens: Vec<&str> = Vec::new();
    let mut lemma_tokens: Vec<&str> = Vec::new();

    for t in tokens {
        if t.is_space {
            continue;
        }
        if !keep_punctuation && t.is_punct {
            continue;
        }
        if !t.is_stop {
            stop_tokens.push(&t.text);
        }
        lemma_tokens.push(&t.lemma);
    }

    (stop_tokens.join(" "), lemma_tokens.join(" "))
}
