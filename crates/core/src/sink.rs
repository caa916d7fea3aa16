use std::convert::Infallible;
use std::io::{self, Write};

use crate::transaction::Transaction;

/// Receives decoded transactions in file order.
pub trait TransactionSink {
    type Error;

    fn accept(&mut self, transaction: Transaction) -> Result<(), Self::Error>;

    fn accept_all<I>(&mut self, transactions: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Transaction>,
        Self: Sized,
    {
        for transaction in transactions {
            self.accept(transaction)?;
        }
        Ok(())
    }
}

impl TransactionSink for Vec<Transaction> {
    type Error = Infallible;

    fn accept(&mut self, transaction: Transaction) -> Result<(), Self::Error> {
        self.push(transaction);
        Ok(())
    }
}

/// Writes transactions as beancount text, separated by blank lines.
pub struct BeancountWriter<W: Write> {
    out: W,
    written: usize,
}

impl<W: Write> BeancountWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, written: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TransactionSink for BeancountWriter<W> {
    type Error = io::Error;

    fn accept(&mut self, transaction: Transaction) -> Result<(), Self::Error> {
        if self.written > 0 {
            writeln!(self.out)?;
        }
        writeln!(self.out, "{transaction}")?;
        self.written += 1;
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesWriter<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TransactionSink for JsonLinesWriter<W> {
    type Error = io::Error;

    fn accept(&mut self, transaction: Transaction) -> Result<(), Self::Error> {
        serde_json::to_writer(&mut self.out, &transaction)?;
        writeln!(self.out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccountName, Amount, Metadata, Posting};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn txn(day: u32, narration: &str, number: &str) -> Transaction {
        Transaction {
            meta: Metadata {
                filename: "transactions-test.csv".to_string(),
                lineno: u64::from(day),
            },
            date: NaiveDate::from_ymd_opt(2022, 2, day).unwrap(),
            payee: Some("Joe Vendor".to_string()),
            narration: narration.to_string(),
            postings: vec![Posting::new(
                AccountName::parse("Assets:Checking:Mercury").unwrap(),
                Amount::new(Decimal::from_str(number).unwrap(), "USD"),
            )],
        }
    }

    #[test]
    fn vec_sink_keeps_order() {
        let mut sink: Vec<Transaction> = Vec::new();
        sink.accept_all(vec![txn(4, "first", "-1.00"), txn(5, "second", "2.00")])
            .unwrap();
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].narration, "first");
        assert_eq!(sink[1].narration, "second");
    }

    #[test]
    fn beancount_writer_separates_entries() {
        let mut writer = BeancountWriter::new(Vec::new());
        writer
            .accept_all(vec![txn(4, "first", "-1.00"), txn(5, "second", "2.00")])
            .unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(
            text,
            "2022-02-04 * \"Joe Vendor\" \"first\"\n  Assets:Checking:Mercury  -1.00 USD\n\
             \n\
             2022-02-05 * \"Joe Vendor\" \"second\"\n  Assets:Checking:Mercury  2.00 USD\n"
        );
    }

    #[test]
    fn json_lines_writer_emits_one_object_per_line() {
        let mut writer = JsonLinesWriter::new(Vec::new());
        writer.accept(txn(4, "first", "-550.00")).unwrap();
        writer.accept(txn(5, "second", "12.5")).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["date"], "2022-02-04");
        assert_eq!(first["payee"], "Joe Vendor");
        assert_eq!(first["postings"][0]["account"], "Assets:Checking:Mercury");
        assert_eq!(first["postings"][0]["units"]["number"], "-550.00");
        assert_eq!(first["meta"]["lineno"], 4);
    }
}
