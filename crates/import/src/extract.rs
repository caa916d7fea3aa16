//! Payee/narration extraction from bank description strings.

use regex::{Captures, Regex};

/// Payee and narration pulled out of one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub payee: String,
    pub narration: String,
}

impl Extracted {
    pub fn new(payee: impl Into<String>, narration: impl Into<String>) -> Self {
        Self {
            payee: payee.into(),
            narration: narration.into(),
        }
    }
}

/// Builds the result from a match and the full description text.
pub type Extractor = fn(&Captures<'_>, &str) -> Extracted;

pub struct ExtractionRule {
    pub name: &'static str,
    pattern: Regex,
    extract: Extractor,
}

impl ExtractionRule {
    pub fn new(name: &'static str, pattern: &str, extract: Extractor) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            pattern: Regex::new(pattern)?,
            extract,
        })
    }

    fn apply(&self, text: &str, description: &str) -> Option<Extracted> {
        self.pattern
            .captures(text)
            .map(|caps| (self.extract)(&caps, description))
    }
}

/// Ordered extraction rules; earlier rules shadow later ones.
pub struct ExtractionRules {
    rules: Vec<ExtractionRule>,
}

impl ExtractionRules {
    pub fn new(rules: Vec<ExtractionRule>) -> Self {
        Self { rules }
    }

    /// Tries each rule against `description`, then against `kind`, before
    /// moving on to the next rule. Returns the first hit with its rule name.
    pub fn resolve(&self, description: &str, kind: &str) -> Option<(&'static str, Extracted)> {
        self.rules.iter().find_map(|rule| {
            rule.apply(description, description)
                .or_else(|| rule.apply(kind, description))
                .map(|extracted| (rule.name, extracted))
        })
    }
}

// ── Extractors ────────────────────────────────────────────────────────────────

fn group(caps: &Captures<'_>, i: usize) -> String {
    caps.get(i).map_or_else(String::new, |m| m.as_str().to_string())
}

/// Both halves come from the match: `(group 1, group 2)`.
pub fn payee_and_memo(caps: &Captures<'_>, _description: &str) -> Extracted {
    Extracted::new(group(caps, 1), group(caps, 2))
}

/// Group 1 names the counterparty; the whole description is the narration.
pub fn counterparty(caps: &Captures<'_>, description: &str) -> Extracted {
    Extracted::new(group(caps, 1), description)
}

/// The description is the payee and there is no narration.
pub fn description_only(_caps: &Captures<'_>, description: &str) -> Extracted {
    Extracted::new(description, "")
}
