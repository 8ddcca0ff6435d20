//! Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `transaction_type` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_type")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Goods given on credit.
    #[sea_orm(string_value = "credit_given")]
    CreditGiven,
    /// Payment received.
    #[sea_orm(string_value = "payment_received")]
    PaymentReceived,
}

impl From<khata_core::ledger::TransactionType> for TransactionType {
    fn from(value: khata_core::ledger::TransactionType) -> Self {
        match value {
            khata_core::ledger::TransactionType::CreditGiven => Self::CreditGiven,
            khata_core::ledger::TransactionType::PaymentReceived => Self::PaymentReceived,
        }
    }
}

impl From<TransactionType> for khata_core::ledger::TransactionType {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::CreditGiven => Self::CreditGiven,
            TransactionType::PaymentReceived => Self::PaymentReceived,
        }
    }
}
