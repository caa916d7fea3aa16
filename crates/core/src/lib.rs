pub mod account;
pub mod format;
pub mod money;
pub mod sink;
pub mod transaction;

pub use account::{AccountName, AccountType, LedgerError};
pub use money::{Amount, DEFAULT_CURRENCY};
pub use sink::{BeancountWriter, JsonLinesWriter, TransactionSink};
pub use transaction::{Metadata, Posting, Transaction};
