//! Lookup-then-rules English lemmatizer.
//!
//! Irregular forms come from an exception table; everything else goes through
//! an ordered list of suffix rules. Without part-of-speech information the
//! rules only strip inflections (plural `-s`, `-ing`, `-ed`) and leave
//! comparatives and derivations alone.

use std::collections::HashMap;

const EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"),
    ("are", "be"),
    ("is", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("made", "make"),
    ("said", "say"),
    ("says", "say"),
    ("got", "get"),
    ("gotten", "get"),
    ("took", "take"),
    ("taken", "take"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("thought", "think"),
    ("told", "tell"),
    ("found", "find"),
    ("gave", "give"),
    ("given", "give"),
    ("left", "leave"),
    ("felt", "feel"),
    ("kept", "keep"),
    ("began", "begin"),
    ("begun", "begin"),
    ("ran", "run"),
    ("wrote", "write"),
    ("written", "write"),
    ("brought", "bring"),
    ("bought", "buy"),
    ("sat", "sit"),
    ("stood", "stand"),
    ("lost", "lose"),
    ("paid", "pay"),
    ("met", "meet"),
    ("heard", "hear"),
    ("used", "use"),
    ("freed", "free"),
    ("fled", "flee"),
    ("hundred", "hundred"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("people", "people"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("sometimes", "sometimes"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lens", "lens"),
    ("physics", "physics"),
    ("mathematics", "mathematics"),
    ("politics", "politics"),
    ("yes", "yes"),
    ("bus", "bus"),
    ("gas", "gas"),
    ("during", "during"),
    ("nothing", "nothing"),
    ("something", "something"),
    ("anything", "anything"),
    ("everything", "everything"),
    ("morning", "morning"),
    ("evening", "evening"),
    ("ceiling", "ceiling"),
    ("indeed", "indeed"),
];

/// Shortest stem a suffix rule may leave behind.
const MIN_STEM: usize = 3;

#[derive(Debug, Clone)]
pub struct Lemmatizer {
    exceptions: HashMap<String, String>,
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer {
    pub fn new() -> Self {
        let exceptions = EXCEPTIONS
            .iter()
            .map(|(form, lemma)| (form.to_string(), lemma.to_string()))
            .collect();
        Self { exceptions }
    }

    /// Add or replace exception entries. Keys are matched lower-cased.
    pub fn with_exceptions<'a, I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (form, lemma) in entries {
            self.exceptions.insert(form.to_lowercase(), lemma.clone());
        }
        self
    }

    pub fn lemmatize(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if let Some(lemma) = self.exceptions.get(&lower) {
            return lemma.clone();
        }
        if !lower.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-') {
            return lower;
        }
        apply_rules(&lower).unwrap_or(lower)
    }
}

fn apply_rules(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        return long_enough(stem, 2).then(|| format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("ied") {
        return long_enough(stem, 2).then(|| format!("{stem}y"));
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return Some(format!("{stem}ss"));
    }
    for sibilant in ["ches", "shes", "xes", "zes"] {
        if word.ends_with(sibilant) {
            let stem = &word[..word.len() - 2];
            return long_enough(stem, MIN_STEM).then(|| stem.to_string());
        }
    }
    if let Some(stem) = word.strip_suffix("ing") {
        return long_enough(stem, MIN_STEM).then(|| restore_stem(stem));
    }
    if let Some(stem) = word.strip_suffix("eed") {
        // `-ceed` verbs and `speed`/`need`-style words end in a real `eed`.
        let keep = word.ends_with("ceed") || !stem.chars().any(is_vowel);
        return (!keep).then(|| format!("{stem}ee"));
    }
    if let Some(stem) = word.strip_suffix("ed") {
        return long_enough(stem, MIN_STEM).then(|| restore_stem(stem));
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") || word.ends_with("'s")
    {
        return None;
    }
    if let Some(stem) = word.strip_suffix('s') {
        return long_enough(stem, MIN_STEM).then(|| stem.to_string());
    }
    None
}

fn long_enough(stem: &str, min: usize) -> bool {
    stem.chars().count() >= min && stem.chars().any(is_vowel)
}

/// Undo consonant doubling (`runn` -> `run`) or restore a silent `e`
/// (`mak` -> `make`) after an `-ing`/`-ed` strip.
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];
    let prev = chars[n - 2];

    if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
        return chars[..n - 1].iter().collect();
    }
    let cvc = n >= 3
        && !is_vowel(chars[n - 3])
        && is_vowel(prev)
        && !is_vowel(last)
        && !matches!(last, 'w' | 'x' | 'y');
    let vowel_groups = chars
        .windows(2)
        .filter(|w| !is_vowel(w[0]) && is_vowel(w[1]))
        .count()
        + usize::from(is_vowel(chars[0]));
    if cvc && vowel_groups <= 1 {
        return format!("{stem}e");
    }
    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
