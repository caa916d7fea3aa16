use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Assets,
    Liabilities,
    Equity,
    Income,
    Expenses,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Assets => write!(f, "Assets"),
            AccountType::Liabilities => write!(f, "Liabilities"),
            AccountType::Equity => write!(f, "Equity"),
            AccountType::Income => write!(f, "Income"),
            AccountType::Expenses => write!(f, "Expenses"),
        }
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Assets" => Ok(AccountType::Assets),
            "Liabilities" => Ok(AccountType::Liabilities),
            "Equity" => Ok(AccountType::Equity),
            "Income" => Ok(AccountType::Income),
            "Expenses" => Ok(AccountType::Expenses),
            other => Err(LedgerError::UnknownAccountType(other.to_string())),
        }
    }
}

/// A validated ledger account name such as `Liabilities:Credit-Cards:Chase`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName {
    name: String,
    root: AccountType,
}

impl AccountName {
    pub fn parse(name: &str) -> Result<Self, LedgerError> {
        let mut components = name.split(':');
        let root = components.next().unwrap_or_default().parse::<AccountType>()?;

        let mut depth = 0;
        for component in components {
            if !is_valid_component(component) {
                return Err(LedgerError::InvalidAccountName(name.to_string()));
            }
            depth += 1;
        }
        if depth == 0 {
            return Err(LedgerError::InvalidAccountName(name.to_string()));
        }

        Ok(AccountName {
            name: name.to_string(),
            root,
        })
    }

    pub fn account_type(&self) -> AccountType {
        self.root
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

fn is_valid_component(component: &str) -> bool {
    let mut chars = component.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '-')
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

impl TryFrom<String> for AccountName {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccountName::parse(&value)
    }
}

impl From<AccountName> for String {
    fn from(value: AccountName) -> Self {
        value.name
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Unknown account type: '{0}'")]
    UnknownAccountType(String),
    #[error("Invalid account name: '{0}'")]
    InvalidAccountName(String),
}
