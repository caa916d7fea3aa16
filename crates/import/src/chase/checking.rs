use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use bankfeed_core::{AccountName, Transaction};
use csv::StringRecord;

use crate::csv::{column, decode_rows, ImportError, Row};
use crate::extract::{
    counterparty, description_only, payee_and_memo, ExtractionRule, ExtractionRules, Extractor,
};
use crate::importer::{Importer, ImporterOptions};
use crate::recognize::FilenamePattern;

const COLUMN_DATE: &str = "Posting Date";
const COLUMN_DESCRIPTION: &str = "Description";
const COLUMN_AMOUNT: &str = "Amount";
const COLUMN_TYPE: &str = "Type";
const DATE_FORMAT: &str = "%m/%d/%Y";

/// Description rules for checking exports, most specific first. Every row
/// must match one of them.
pub fn extraction_rules() -> &'static ExtractionRules {
    static RULES: OnceLock<ExtractionRules> = OnceLock::new();
    RULES.get_or_init(|| {
        let rule = |name: &'static str, pattern: &str, extract: Extractor| {
            ExtractionRule::new(name, pattern, extract).expect("invalid regex")
        };
        ExtractionRules::new(vec![
            rule(
                "ach",
                r"(?i)ORIG CO NAME:(.+?)\s*ORIG ID:.*DESC DATE:.*CO ENTRY DESCR:(.+?)\s*SEC:.*TRACE#:.*EED:.*",
                payee_and_memo,
            ),
            rule(
                "outbound-transfer",
                r"(?i)Online Transfer \d+ to (.+?)\s*transaction #",
                counterparty,
            ),
            rule(
                "inbound-transfer",
                r"(?i)Online Transfer \d+ from (.+?)\s*transaction #",
                counterparty,
            ),
            rule(
                "same-day-ach",
                r"(?i)Same-Day ACH Payment \d+ to (.+?)\s*\(",
                counterparty,
            ),
            rule(
                "zelle",
                r"(?i)^Zelle payment (?:to|from) (.+?)(?:\s+\S*\d\S*)?$",
                counterparty,
            ),
            rule("fee", r"^FEE_TRANSACTION$", description_only),
            rule("refund", r"^REFUND_TRANSACTION$", description_only),
            rule(
                "card-or-check",
                r"^(?:DEBIT_CARD|CHECK_PAID|CHECK_DEPOSIT|ATM)$",
                description_only,
            ),
        ])
    })
}

struct Columns {
    date: usize,
    description: usize,
    amount: usize,
    kind: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, ImportError> {
        Ok(Self {
            date: column(headers, COLUMN_DATE)?,
            description: column(headers, COLUMN_DESCRIPTION)?,
            amount: column(headers, COLUMN_AMOUNT)?,
            kind: column(headers, COLUMN_TYPE)?,
        })
    }
}

/// Chase checking account activity (`ChaseNNNN_Activity_YYYYMMDD.CSV`).
#[derive(Debug, Clone)]
pub struct ChaseCheckingImporter {
    options: ImporterOptions,
    filename: FilenamePattern,
}

impl ChaseCheckingImporter {
    pub fn new(options: ImporterOptions, last_four: Option<String>) -> Self {
        Self {
            options,
            filename: FilenamePattern::chase_checking(last_four),
        }
    }

    fn decode(
        &self,
        columns: &Columns,
        row: &Row<'_>,
        filename: &str,
    ) -> Result<Option<Transaction>, ImportError> {
        let date = row.date(columns.date, DATE_FORMAT)?;

        let description = row.get(columns.description);
        let unrecognized = || ImportError::UnrecognizedDescription {
            line: row.line,
            description: description.to_string(),
        };
        let (rule, extracted) = extraction_rules()
            .resolve(description, row.get(columns.kind))
            .ok_or_else(unrecognized)?;
        if extracted.payee.trim().is_empty() {
            return Err(unrecognized());
        }

        let Some(units) = row.amount(columns.amount, &self.options.currency)? else {
            tracing::debug!(line = row.line, "skipping row without an amount");
            return Ok(None);
        };

        let payee = self.options.case(&extracted.payee);
        let narration = self.options.case(&extracted.narration);
        tracing::trace!(line = row.line, rule, %payee, "decoded row");

        let postings = self.options.postings(units, &payee, &narration);
        Ok(Some(Transaction {
            meta: row.meta(filename),
            date,
            payee: Some(payee),
            narration,
            postings,
        }))
    }
}

impl Importer for ChaseCheckingImporter {
    fn name(&self) -> &'static str {
        "chase-checking"
    }

    fn account(&self) -> &AccountName {
        &self.options.account
    }

    fn identify(&self, path: &Path) -> bool {
        self.filename.matches_path(path)
    }

    fn extract_reader(
        &self,
        reader: &mut dyn Read,
        filename: &str,
    ) -> Result<Vec<Transaction>, ImportError> {
        decode_rows(reader, Columns::resolve, |columns, row| {
            self.decode(columns, row, filename)
        })
    }
}
