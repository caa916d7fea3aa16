//! Title-casing for bank-generated text.
//!
//! Banks tend to shout (`MONTHLY SERVICE FEE`) or mix styles in one string
//! (`Same-Day ACH Payment 12232800456 to JoeExample`). Text with no lowercase
//! letters is lowercased first; then each word is capitalized unless it is an
//! override, a domain, a small word, or already carries inner capitals.
//! Uppercase initials such as `U.S.` are kept as written.

use std::collections::HashMap;

use crate::util::re;

re!(re_word, r"\S+");
re!(re_initials, r"^(?:[A-Z]\.)+[A-Z]?$");

const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "via", "vs",
];

/// Tokens kept or rewritten verbatim, keyed case-insensitively.
pub const DEFAULT_OVERRIDES: &[(&str, &str)] = &[
    ("ach", "ACH"),
    ("amzn", "AMZN"),
    ("atm", "ATM"),
    ("crd", "CRD"),
    ("eft", "EFT"),
    ("irs", "IRS"),
    ("llc", "LLC"),
    ("mktp", "MKTP"),
    ("rtp", "RTP"),
    ("usps", "USPS"),
    ("pmt", "Payment"),
    ("pymt", "Payment"),
    ("xfer", "Transfer"),
];

#[derive(Debug, Clone)]
pub struct TitleCaser {
    overrides: HashMap<String, String>,
}

impl Default for TitleCaser {
    fn default() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }
}

impl TitleCaser {
    /// Default overrides extended (and, on conflict, replaced) by `extra`.
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overrides: HashMap<String, String> = DEFAULT_OVERRIDES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (k, v) in extra {
            overrides.insert(k.as_ref().to_lowercase(), v.into());
        }
        Self { overrides }
    }

    pub fn apply(&self, text: &str) -> String {
        let shouting = !text.chars().any(char::is_lowercase);
        let words: Vec<_> = re_word().find_iter(text).collect();
        let last = words.len().saturating_sub(1);

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for (i, word) in words.iter().enumerate() {
            out.push_str(&text[cursor..word.start()]);
            out.push_str(&self.word(word.as_str(), shouting, i == 0 || i == last));
            cursor = word.end();
        }
        out.push_str(&text[cursor..]);
        out
    }

    fn word(&self, word: &str, shouting: bool, at_edge: bool) -> String {
        if re_initials().is_match(word.trim_matches(|c: char| !c.is_alphanumeric() && c != '.')) {
            return word.to_string();
        }
        let lowered;
        let word = if shouting {
            lowered = word.to_lowercase();
            lowered.as_str()
        } else {
            word
        };

        let core = word.trim_matches(|c: char| !c.is_alphanumeric());
        if core.is_empty() {
            return word.to_string();
        }
        if let Some(replacement) = self.overrides.get(&core.to_lowercase()) {
            return word.replacen(core, replacement, 1);
        }
        if looks_like_address(core) || has_inner_capital(word) {
            return word.to_string();
        }
        if !at_edge && SMALL_WORDS.contains(&core.to_lowercase().as_str()) {
            return word.to_lowercase();
        }

        word.split_inclusive(['-', '/']).map(capitalize).collect()
    }
}

/// `gumroad.com`, `billing@example.com`.
fn looks_like_address(core: &str) -> bool {
    core.contains('@')
        || core
            .split('.')
            .filter(|part| !part.is_empty())
            .count()
            > 1
}

fn has_inner_capital(word: &str) -> bool {
    word.chars()
        .skip_while(|c| !c.is_alphabetic())
        .skip(1)
        .any(char::is_uppercase)
}

/// Uppercases the first alphanumeric character when it is a letter.
fn capitalize(part: &str) -> String {
    match part.char_indices().find(|(_, c)| c.is_alphanumeric()) {
        Some((i, c)) if c.is_alphabetic() => {
            let mut out = String::with_capacity(part.len());
            out.push_str(&part[..i]);
            out.extend(c.to_uppercase());
            out.push_str(&part[i + c.len_utf8()..]);
            out
        }
        _ => part.to_string(),
    }
}
