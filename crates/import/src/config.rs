use std::collections::BTreeMap;
use std::path::Path;

use bankfeed_core::{AccountName, DEFAULT_CURRENCY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::chase::{ChaseCheckingImporter, ChaseCreditImporter};
use crate::importer::{Importer, ImporterOptions};
use crate::mercury::MercuryImporter;
use crate::rules::{AccountClassifier, AccountRuleSpec, RuleError};
use crate::titlecase::TitleCaser;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error("Importer {index} ({kind}): last_four must be four digits, got '{value}'")]
    InvalidLastFour {
        index: usize,
        kind: ImporterKind,
        value: String,
    },
    #[error("Importer {index} ({kind}): file names carry no account number, remove last_four")]
    UnsupportedLastFour { index: usize, kind: ImporterKind },
    #[error("Importer {index} ({kind}): invalid currency '{value}'")]
    InvalidCurrency {
        index: usize,
        kind: ImporterKind,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImporterKind {
    ChaseChecking,
    ChaseCredit,
    Mercury,
}

impl std::fmt::Display for ImporterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImporterKind::ChaseChecking => write!(f, "chase-checking"),
            ImporterKind::ChaseCredit => write!(f, "chase-credit"),
            ImporterKind::Mercury => write!(f, "mercury"),
        }
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_title_case() -> bool {
    true
}

/// One `[[importer]]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImporterConfig {
    pub kind: ImporterKind,
    pub account: AccountName,
    #[serde(default)]
    pub last_four: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_title_case")]
    pub title_case: bool,
    /// Extra title-casing overrides, e.g. `{ HOA = "HOA", PMT = "Payment" }`.
    #[serde(default)]
    pub abbreviations: BTreeMap<String, String>,
    #[serde(default)]
    pub rules: Vec<AccountRuleSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "importer")]
    pub importers: Vec<ImporterConfig>,
}

impl Config {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Compiles every configured importer, in file order.
    pub fn build(&self) -> Result<Vec<Box<dyn Importer>>, ConfigError> {
        self.importers
            .iter()
            .enumerate()
            .map(|(index, importer)| importer.build(index))
            .collect()
    }
}

impl ImporterConfig {
    fn build(&self, index: usize) -> Result<Box<dyn Importer>, ConfigError> {
        self.validate(index)?;

        let title_case = self
            .title_case
            .then(|| TitleCaser::with_overrides(self.abbreviations.iter()));
        let classifier = AccountClassifier::new(self.rules.clone())?;
        tracing::debug!(
            index,
            kind = %self.kind,
            account = %self.account,
            rules = classifier.len(),
            "configured importer"
        );
        let options = ImporterOptions::new(self.account.clone())
            .with_currency(&self.currency)
            .with_classifier(classifier)
            .with_title_case(title_case);

        let last_four = self.last_four.clone();
        let importer: Box<dyn Importer> = match self.kind {
            ImporterKind::ChaseChecking => Box::new(ChaseCheckingImporter::new(options, last_four)),
            ImporterKind::ChaseCredit => Box::new(ChaseCreditImporter::new(options, last_four)),
            ImporterKind::Mercury => Box::new(MercuryImporter::new(options)),
        };
        Ok(importer)
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let kind = self.kind;
        if let Some(value) = &self.last_four {
            if kind == ImporterKind::Mercury {
                return Err(ConfigError::UnsupportedLastFour { index, kind });
            }
            if value.len() != 4 || !value.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::InvalidLastFour {
                    index,
                    kind,
                    value: value.clone(),
                });
            }
        }
        if !is_valid_currency(&self.currency) {
            return Err(ConfigError::InvalidCurrency {
                index,
                kind,
                value: self.currency.clone(),
            });
        }
        Ok(())
    }
}

/// Uppercase commodity names as the ledger accepts them: `USD`, `VBMPX`.
fn is_valid_currency(currency: &str) -> bool {
    let mut chars = currency.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && (2..=24).contains(&currency.len())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}
