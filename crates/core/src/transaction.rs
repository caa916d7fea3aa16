use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountName;
use super::money::Amount;

/// Where a transaction came from: the source file and its line number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub filename: String,
    pub lineno: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub account: AccountName,
    pub units: Amount,
}

impl Posting {
    pub fn new(account: AccountName, units: Amount) -> Self {
        Posting { account, units }
    }
}

/// A decoded statement row.
///
/// The first posting always belongs to the importer's primary account. A
/// second, offsetting posting is present only when an account rule matched;
/// otherwise the transaction is left unbalanced for the ledger to flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: Metadata,
    pub date: NaiveDate,
    pub payee: Option<String>,
    pub narration: String,
    pub postings: Vec<Posting>,
}

impl Transaction {
    pub fn primary(&self) -> Option<&Posting> {
        self.postings.first()
    }

    /// Sum of posting numbers, or `None` when postings mix currencies.
    pub fn residual(&self) -> Option<Decimal> {
        let currency = &self.postings.first()?.units.currency;
        if self.postings.iter().any(|p| &p.units.currency != currency) {
            return None;
        }
        Some(self.postings.iter().map(|p| p.units.number).sum())
    }

    pub fn is_balanced(&self) -> bool {
        self.residual().is_some_and(|r| r.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn account(name: &str) -> AccountName {
        AccountName::parse(name).unwrap()
    }

    fn amount(n: &str, currency: &str) -> Amount {
        Amount::new(Decimal::from_str(n).unwrap(), currency)
    }

    fn txn(postings: Vec<Posting>) -> Transaction {
        Transaction {
            meta: Metadata::default(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            payee: None,
            narration: "Test".to_string(),
            postings,
        }
    }

    #[test]
    fn single_posting_is_unbalanced() {
        let tx = txn(vec![Posting::new(
            account("Assets:Checking:Chase"),
            amount("-15.00", "USD"),
        )]);
        assert!(!tx.is_balanced());
        assert_eq!(tx.residual(), Some(Decimal::from_str("-15.00").unwrap()));
    }

    #[test]
    fn offsetting_posting_balances() {
        let units = amount("-357.51", "USD");
        let tx = txn(vec![
            Posting::new(account("Assets:Checking:Chase"), units.clone()),
            Posting::new(account("Liabilities:Credit-Cards:Chase"), -units),
        ]);
        assert!(tx.is_balanced());
        assert_eq!(
            tx.primary().map(|p| p.account.as_str()),
            Some("Assets:Checking:Chase")
        );
    }

    #[test]
    fn mixed_currencies_have_no_residual() {
        let tx = txn(vec![
            Posting::new(account("Assets:Checking"), amount("10", "USD")),
            Posting::new(account("Assets:Savings"), amount("-10", "EUR")),
        ]);
        assert_eq!(tx.residual(), None);
        assert!(!tx.is_balanced());
    }

    #[test]
    fn empty_transaction_has_no_residual() {
        assert_eq!(txn(vec![]).residual(), None);
    }
}
