use std::io::Read;
use std::path::Path;

use bankfeed_core::{AccountName, Transaction};
use csv::StringRecord;

use crate::csv::{column, decode_rows, ImportError, Row};
use crate::importer::{Importer, ImporterOptions};
use crate::recognize::FilenamePattern;

const COLUMN_DATE: &str = "Date";
const COLUMN_PAYEE: &str = "Description";
const COLUMN_DESCRIPTION: &str = "Bank Description";
const COLUMN_REFERENCE: &str = "Reference";
const COLUMN_AMOUNT: &str = "Amount";
const COLUMN_STATUS: &str = "Status";
const DATE_FORMAT: &str = "%m-%d-%Y";
const STATUS_FAILED: &str = "Failed";

struct Columns {
    date: usize,
    payee: usize,
    description: usize,
    reference: usize,
    amount: usize,
    status: usize,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, ImportError> {
        Ok(Self {
            date: column(headers, COLUMN_DATE)?,
            payee: column(headers, COLUMN_PAYEE)?,
            description: column(headers, COLUMN_DESCRIPTION)?,
            reference: column(headers, COLUMN_REFERENCE)?,
            amount: column(headers, COLUMN_AMOUNT)?,
            status: column(headers, COLUMN_STATUS)?,
        })
    }
}

/// Mercury checking exports (`transactions-*.csv`).
///
/// Mercury already separates the counterparty from the bank's own text, so
/// the `Description` column is the payee and `Bank Description` plus
/// `Reference` form the narration. Only the payee is title-cased.
#[derive(Debug, Clone)]
pub struct MercuryImporter {
    options: ImporterOptions,
    filename: FilenamePattern,
}

impl MercuryImporter {
    pub fn new(options: ImporterOptions) -> Self {
        Self {
            options,
            filename: FilenamePattern::mercury(),
        }
    }

    fn decode(
        &self,
        columns: &Columns,
        row: &Row<'_>,
        filename: &str,
    ) -> Result<Option<Transaction>, ImportError> {
        if row.get(columns.status).eq_ignore_ascii_case(STATUS_FAILED) {
            tracing::debug!(line = row.line, "skipping failed transaction");
            return Ok(None);
        }
        let date = row.date(columns.date, DATE_FORMAT)?;

        let payee = self.options.case(row.get(columns.payee));
        let narration = [row.get(columns.description), row.get(columns.reference)]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" - ");

        let Some(units) = row.amount(columns.amount, &self.options.currency)? else {
            tracing::debug!(line = row.line, "skipping row without an amount");
            return Ok(None);
        };

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

impl Importer for MercuryImporter {
    fn name(&self) -> &'static str {
        "mercury"
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

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Date,Description,Amount,Status,Bank Description,Reference,Note\n";

    fn extract(rows: &str) -> Result<Vec<Transaction>, ImportError> {
        let options = ImporterOptions::new(AccountName::parse("Assets:Checking:Mercury").unwrap());
        let data = format!("{HEADER}{rows}");
        MercuryImporter::new(options).extract_reader(&mut data.as_bytes(), "transactions-x.csv")
    }

    #[test]
    fn narration_joins_bank_description_and_reference() {
        let txs = extract(
            "02-04-2022,Joe Vendor,-550.00,Sent,Send Money transaction initiated on Mercury,\"From Dummy, LLC for bowling balls\",\n",
        )
        .unwrap();
        assert_eq!(txs[0].payee.as_deref(), Some("Joe Vendor"));
        assert_eq!(
            txs[0].narration,
            "Send Money transaction initiated on Mercury - From Dummy, LLC for bowling balls"
        );
    }

    #[test]
    fn narration_is_not_title_cased() {
        let txs = extract("01-30-2022,CHARLIE CUSTOMER,694.04,Sent,CHARLIE CUSTOMER,,\n").unwrap();
        assert_eq!(txs[0].payee.as_deref(), Some("Charlie Customer"));
        assert_eq!(txs[0].narration, "CHARLIE CUSTOMER");
    }

    #[test]
    fn failed_rows_are_skipped_regardless_of_amount() {
        let txs = extract(
            "01-29-2021,Expensivo's Diamond Emporium,-5876.95,Failed,Blocked,,\n\
             01-29-2021,Retry,-5.00,failed,Blocked,,\n\
             bad-date,Ignored,-1.00,Failed,,,\n",
        )
        .unwrap();
        assert!(txs.is_empty());
    }

    #[test]
    fn blank_lines_do_not_shift_line_numbers() {
        let txs = extract("\n01-30-2022,Charlie Customer,694.04,Sent,CHARLIE CUSTOMER,,\n").unwrap();
        assert_eq!(txs[0].meta.lineno, 3);
    }

    #[test]
    fn dollar_signs_are_accepted() {
        let txs = extract("02-05-2022,Paradise Golf,\"-$1,150.75\",Sent,PARADISE GOLF,,\n").unwrap();
        assert_eq!(txs[0].postings[0].units.number.to_string(), "-1150.75");
    }
}
