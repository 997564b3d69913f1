use crate::config::Config;
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

pub const URL_PLACEHOLDER: &str = "<URL>";
pub const USER_PLACEHOLDER: &str = "<USER>";

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(https?://\S+|www\.\S+)").unwrap());
static RE_USER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());

/// Canonical form of one text-column value. Absent values normalize like "".
pub fn normalize(value: Option<&str>, config: &Config) -> String {
    let mut text = value.unwrap_or_default().to_string();

    if config.unicode_nfkc {
        text = text.nfkc().collect();
    }
    if config.flatten_newlines {
        text = flatten_newlines(&text);
    }
    if config.lowercase {
        text = text.to_lowercase();
    }
    if config.normalize_urls {
        text = mask_urls(&text).into_owned();
    }
    if config.normalize_users {
        text = mask_users(&text).into_owned();
    }
    text
}

pub fn normalize_all<'a, I>(values: I, config: &Config) -> Vec<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    values.into_iter().map(|v| normalize(v, config)).collect()
}

pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

pub fn mask_urls(text: &str) -> Cow<'_, str> {
    RE_URL.replace_all(text, URL_PLACEHOLDER)
}

pub fn mask_users(text: &str) -> Cow<'_, str> {
    RE_USER.replace_all(text, USER_PLACEHOLDER)
}
