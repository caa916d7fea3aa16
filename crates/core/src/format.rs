//! Beancount rendering of decoded transactions.

use std::fmt::{self, Display, Formatter};

use crate::transaction::Transaction;

const INDENT: &str = "  ";

/// Double-quoted beancount string literal.
struct Quoted<'a>(&'a str);

impl Display for Quoted<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

impl Display for Transaction {
    /// Writes the header line and one line per posting, with account names
    /// left-aligned and numbers right-aligned within the transaction.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} *", self.date)?;
        if let Some(payee) = &self.payee {
            write!(f, " {}", Quoted(payee))?;
        }
        write!(f, " {}", Quoted(&self.narration))?;

        let numbers: Vec<String> = self
            .postings
            .iter()
            .map(|p| p.units.number.to_string())
            .collect();
        let account_width = self
            .postings
            .iter()
            .map(|p| p.account.as_str().len())
            .max()
            .unwrap_or(0);
        let number_width = numbers.iter().map(String::len).max().unwrap_or(0);

        for (posting, number) in self.postings.iter().zip(&numbers) {
            write!(
                f,
                "\n{INDENT}{:<account_width$}  {:>number_width$} {}",
                posting.account.as_str(),
                number,
                posting.units.currency,
            )?;
        }
        Ok(())
    }
}
