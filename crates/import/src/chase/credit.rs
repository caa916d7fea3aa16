use std::io::Read;
use std::path::Path;

use bankfeed_core::{AccountName, Transaction};
use csv::StringRecord;

use crate::csv::{column, decode_rows, ImportError, Row};
use crate::importer::{Importer, ImporterOptions};
use crate::recognize::FilenamePattern;

const COLUMN_DATE: &str = "Transaction Date";
const COLUMN_DESCRIPTION: &str = "Description";
const COLUMN_AMOUNT: &str = "Amount";
const DATE_FORMAT: &str = "%m/%d/%Y";

struct Columns {
    date: usize,
    description: usize,
    amount: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, ImportError> {
        Ok(Self {
            date: column(headers, COLUMN_DATE)?,
            description: column(headers, COLUMN_DESCRIPTION)?,
            amount: column(headers, COLUMN_AMOUNT)?,
        })
    }
}

/// Chase credit card activity (`ChaseNNNN_ActivityYYYYMMDD[_YYYYMMDD...].CSV`).
///
/// Card descriptions are merchant names with no structure to split, so the
/// description becomes the narration and the payee is left empty. Account
/// rules see the description as the bank wrote it.
#[derive(Debug, Clone)]
pub struct ChaseCreditImporter {
    options: ImporterOptions,
    filename: FilenamePattern,
}

impl ChaseCreditImporter {
    pub fn new(options: ImporterOptions, last_four: Option<String>) -> Self {
        Self {
            options,
            filename: FilenamePattern::chase_credit(last_four),
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

        let Some(units) = row.amount(columns.amount, &self.options.currency)? else {
            tracing::debug!(line = row.line, "skipping row without an amount");
            return Ok(None);
        };

        let postings = self.options.postings(units, description, "");
        Ok(Some(Transaction {
            meta: row.meta(filename),
            date,
            payee: None,
            narration: self.options.case(description),
            postings,
        }))
    }
}

impl Importer for ChaseCreditImporter {
    fn name(&self) -> &'static str {
        "chase-credit"
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
