//! Chase exports: checking accounts and credit cards use different layouts.

pub mod checking;
pub mod credit;

pub use checking::ChaseCheckingImporter;
pub use credit::ChaseCreditImporter;
