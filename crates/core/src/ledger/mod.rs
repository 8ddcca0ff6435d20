//! Credit ledger.
//!
//! - Domain types for ledger rows, customers, and stores
//! - Aggregation into customer/store summaries and outstanding rankings
//! - Business rule validation
//! - Persistence contract (`CreditStore`)
//! - `CreditService` orchestrating the above

pub mod aggregate;
pub mod error;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod aggregate_props;
#[cfg(test)]
pub(crate) mod testing;

pub use error::LedgerError;
pub use service::CreditService;
pub use store::CreditStore;
pub use types::{
    BalanceSnapshot, CreateCreditInput, CreditChanges, CreditDetails, CreditEntry, CreditFilter,
    Customer, CustomerBrief, CustomerSummary, OutstandingBalance, RankedCustomer, Store,
    StoreBrief, StoreSummary, TransactionType,
};
