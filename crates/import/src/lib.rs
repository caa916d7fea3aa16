pub mod chase;
pub mod config;
pub mod csv;
pub mod extract;
pub mod importer;
pub mod mercury;
pub mod recognize;
pub mod rules;
pub mod titlecase;
pub(crate) mod util;

pub use chase::{ChaseCheckingImporter, ChaseCreditImporter};
pub use config::{Config, ConfigError, ImporterConfig, ImporterKind};
pub use csv::ImportError;
pub use extract::{Extracted, ExtractionRule, ExtractionRules};
pub use importer::{find_importer, Importer, ImporterOptions};
pub use mercury::MercuryImporter;
pub use recognize::FilenamePattern;
pub use rules::{AccountClassifier, AccountRuleSpec, RuleError};
pub use titlecase::TitleCaser;
