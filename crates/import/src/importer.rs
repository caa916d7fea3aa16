use std::fs::File;
use std::io::Read;
use std::path::Path;

use bankfeed_core::{AccountName, Amount, Posting, Transaction, DEFAULT_CURRENCY};
use chrono::NaiveDate;

use crate::csv::ImportError;
use crate::rules::AccountClassifier;
use crate::titlecase::TitleCaser;

/// A statement importer for one institution's export format.
pub trait Importer {
    /// Short identifier such as `chase-checking`.
    fn name(&self) -> &'static str;

    /// The account this importer's files belong to.
    fn account(&self) -> &AccountName;

    /// Whether the file at `path` is one this importer understands, judged
    /// by its name alone.
    fn identify(&self, path: &Path) -> bool;

    /// Decodes every row of a CSV export. `filename` is recorded in each
    /// transaction's metadata.
    fn extract_reader(
        &self,
        reader: &mut dyn Read,
        filename: &str,
    ) -> Result<Vec<Transaction>, ImportError>;

    fn extract(&self, path: &Path) -> Result<Vec<Transaction>, ImportError> {
        let mut file = File::open(path)?;
        let transactions = self.extract_reader(&mut file, &path.display().to_string())?;
        tracing::info!(
            importer = self.name(),
            file = %path.display(),
            count = transactions.len(),
            "extracted transactions"
        );
        Ok(transactions)
    }

    /// Date of the latest transaction in the file.
    fn file_date(&self, path: &Path) -> Result<Option<NaiveDate>, ImportError> {
        Ok(self.extract(path)?.iter().map(|t| t.date).max())
    }
}

/// The first importer, in configuration order, that claims `path`.
pub fn find_importer<'a>(
    importers: &'a [Box<dyn Importer>],
    path: &Path,
) -> Option<&'a dyn Importer> {
    importers
        .iter()
        .map(|importer| &**importer)
        .find(|importer| importer.identify(path))
}

/// Settings shared by every importer instance.
#[derive(Debug, Clone)]
pub struct ImporterOptions {
    pub account: AccountName,
    pub currency: String,
    pub classifier: AccountClassifier,
    /// `None` leaves extracted text exactly as the bank wrote it.
    pub title_case: Option<TitleCaser>,
}

impl ImporterOptions {
    pub fn new(account: AccountName) -> Self {
        Self {
            account,
            currency: DEFAULT_CURRENCY.to_string(),
            classifier: AccountClassifier::default(),
            title_case: Some(TitleCaser::default()),
        }
    }

    pub fn with_currency(mut self, currency: &str) -> Self {
        self.currency = currency.to_string();
        self
    }

    pub fn with_classifier(mut self, classifier: AccountClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_title_case(mut self, title_case: Option<TitleCaser>) -> Self {
        self.title_case = title_case;
        self
    }

    pub(crate) fn case(&self, text: &str) -> String {
        match &self.title_case {
            Some(caser) => caser.apply(text),
            None => text.to_string(),
        }
    }

    /// The primary posting, followed by an offsetting posting when an
    /// account rule matches `payee`/`narration`.
    pub(crate) fn postings(&self, units: Amount, payee: &str, narration: &str) -> Vec<Posting> {
        let offset = self
            .classifier
            .classify(payee, narration)
            .map(|account| Posting::new(account.clone(), -&units));
        let mut postings = vec![Posting::new(self.account.clone(), units)];
        postings.extend(offset);
        postings
    }
}
