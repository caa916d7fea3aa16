use bankfeed_core::{Amount, Metadata, Transaction};
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Line {line}: invalid date '{value}'")]
    InvalidDate { line: u64, value: String },
    #[error("Line {line}: invalid amount '{value}'")]
    InvalidAmount { line: u64, value: String },
    #[error("Line {line}: unrecognized description '{description}'")]
    UnrecognizedDescription { line: u64, description: String },
}

/// One CSV record plus the line it started on.
pub(crate) struct Row<'a> {
    record: &'a StringRecord,
    pub line: u64,
}

impl<'a> Row<'a> {
    pub fn get(&self, column: usize) -> &'a str {
        self.record.get(column).unwrap_or_default()
    }

    pub fn date(&self, column: usize, format: &str) -> Result<NaiveDate, ImportError> {
        parse_date(self.get(column), format, self.line)
    }

    pub fn amount(&self, column: usize, currency: &str) -> Result<Option<Amount>, ImportError> {
        parse_amount(self.get(column), currency, self.line)
    }

    pub fn meta(&self, filename: &str) -> Metadata {
        Metadata {
            filename: filename.to_string(),
            lineno: self.line,
        }
    }
}

pub(crate) fn column(headers: &StringRecord, name: &str) -> Result<usize, ImportError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| ImportError::MissingColumn(name.to_string()))
}

/// Reads a headed CSV, resolving column positions once with `resolve` and
/// decoding every record with `decode`. Records decoding to `None` are
/// dropped; the first error aborts the whole file.
pub(crate) fn decode_rows<R, C, F>(
    mut data: R,
    resolve: impl FnOnce(&StringRecord) -> Result<C, ImportError>,
    mut decode: F,
) -> Result<Vec<Transaction>, ImportError>
where
    R: Read,
    F: FnMut(&C, &Row<'_>) -> Result<Option<Transaction>, ImportError>,
{
    let mut text = Vec::new();
    data.read_to_end(&mut text)?;

    // Chase checking exports end each data row with an extra empty field.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_slice());
    let columns = resolve(reader.headers()?)?;

    let mut lines = LineCounter::new(&text);
    let mut transactions = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let row = Row {
            line: record.position().map_or(0, |p| lines.line_at(p.byte())),
            record: &record,
        };
        if let Some(transaction) = decode(&columns, &row)? {
            transactions.push(transaction);
        }
    }

    Ok(transactions)
}

/// Maps record positions to 1-based physical lines. The csv reader skips
/// blank lines without counting them, and a record's reported position can
/// sit before the line terminators that precede it.
struct LineCounter<'a> {
    text: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
        }
    }

    /// Positions must be non-decreasing across calls.
    fn line_at(&mut self, byte: u64) -> u64 {
        let mut start = usize::try_from(byte)
            .unwrap_or(usize::MAX)
            .clamp(self.offset, self.text.len());
        while matches!(self.text.get(start), Some(b'\r' | b'\n')) {
            start += 1;
        }
        let newlines = self.text[self.offset..start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.line += newlines as u64;
        self.offset = start;
        self.line
    }
}

fn parse_date(s: &str, format: &str, line: u64) -> Result<NaiveDate, ImportError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, format).map_err(|_| ImportError::InvalidDate {
        line,
        value: s.to_string(),
    })
}

/// `Ok(None)` for an empty or zero amount: such rows are not transactions.
fn parse_amount(s: &str, currency: &str, line: u64) -> Result<Option<Amount>, ImportError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let (negative, digits) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let digits = digits.replace([',', '$', ' '], "");
    let mut number = Decimal::from_str(&digits).map_err(|_| ImportError::InvalidAmount {
        line,
        value: s.to_string(),
    })?;
    if negative {
        number = -number;
    }
    if number.is_zero() {
        return Ok(None);
    }
    Ok(Some(Amount::new(number, currency)))
}
