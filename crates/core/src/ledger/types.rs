//! Domain types for the credit ledger.
//!
//! Ledger aggregates (`CustomerSummary`, `StoreSummary`, `OutstandingBalance`)
//! serialize with snake_case keys; entity rows serialize camelCase. Existing
//! clients depend on both.

use chrono::{DateTime, Utc};
use khata_shared::types::{CreditId, CustomerId, StoreId, StoreOwnerId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Goods handed over on credit; increases what the customer owes.
    CreditGiven,
    /// Money received from the customer; decreases what they owe.
    PaymentReceived,
}

impl TransactionType {
    /// Returns the amount's effect on the outstanding balance.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::CreditGiven => amount,
            Self::PaymentReceived => -amount,
        }
    }

    /// Returns the wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditGiven => "credit_given",
            Self::PaymentReceived => "payment_received",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_given" => Ok(Self::CreditGiven),
            "payment_received" => Ok(Self::PaymentReceived),
            _ => Err(format!("Unknown transaction type: {s}")),
        }
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditEntry {
    /// Transaction ID.
    pub id: CreditId,
    /// Customer the transaction is recorded against.
    pub customer_id: CustomerId,
    /// Store that recorded it.
    pub store_id: StoreId,
    /// Positive amount.
    pub amount: Decimal,
    /// Credit given or payment received.
    pub transaction_type: TransactionType,
    /// What was bought on credit.
    pub items_description: Option<String>,
    /// Bank journal reference, required for payments.
    pub journal_number: Option<String>,
    /// Business date of the transaction.
    pub transaction_date: DateTime<Utc>,
    /// Owner who recorded the transaction.
    pub created_by_owner_id: Option<StoreOwnerId>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl CreditEntry {
    /// Returns this row's effect on the outstanding balance.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.transaction_type.signed(self.amount)
    }
}

/// Customer fields the ledger rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Owning store.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Phone number, unique within the store.
    pub phone_number: String,
    /// Maximum outstanding balance allowed, if any.
    pub credit_limit: Option<Decimal>,
    /// Inactive customers cannot receive new transactions.
    pub is_active: bool,
}

/// Store fields the ledger rules need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    /// Store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
}

/// Lightweight customer projection attached to listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerBrief {
    /// Customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone_number: String,
}

impl From<&Customer> for CustomerBrief {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            name: customer.name.clone(),
            phone_number: customer.phone_number.clone(),
        }
    }
}

/// Lightweight store projection attached to listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreBrief {
    /// Store ID.
    pub id: StoreId,
    /// Display name.
    pub name: String,
}

impl From<&Store> for StoreBrief {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id,
            name: store.name.clone(),
        }
    }
}

/// A ledger row with its customer and store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditDetails {
    /// The ledger row.
    #[serde(flatten)]
    pub credit: CreditEntry,
    /// Customer projection.
    pub customer: CustomerBrief,
    /// Store projection.
    pub store: StoreBrief,
}

/// Input for recording a transaction.
#[derive(Debug, Clone)]
pub struct CreateCreditInput {
    /// Customer to charge or credit.
    pub customer_id: CustomerId,
    /// Store recording the transaction.
    pub store_id: StoreId,
    /// Positive amount.
    pub amount: Decimal,
    /// Credit given or payment received.
    pub transaction_type: TransactionType,
    /// What was bought on credit.
    pub items_description: Option<String>,
    /// Bank journal reference.
    pub journal_number: Option<String>,
    /// Business date; defaults to now.
    pub transaction_date: Option<DateTime<Utc>>,
    /// Owner recording the transaction.
    pub created_by_owner_id: Option<StoreOwnerId>,
}

/// Partial update of a ledger row. `None` leaves a field untouched; for the
/// clearable text fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreditChanges {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New transaction type.
    pub transaction_type: Option<TransactionType>,
    /// New or cleared items description.
    pub items_description: Option<Option<String>>,
    /// New or cleared journal number.
    pub journal_number: Option<Option<String>>,
    /// New business date.
    pub transaction_date: Option<DateTime<Utc>>,
}

impl CreditChanges {
    /// Returns true when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true when the change can move the outstanding balance.
    #[must_use]
    pub const fn touches_balance(&self) -> bool {
        self.amount.is_some() || self.transaction_type.is_some()
    }

    /// Returns the row as it will look once the changes are applied.
    #[must_use]
    pub fn apply_to(&self, entry: &CreditEntry) -> CreditEntry {
        let mut updated = entry.clone();
        if let Some(amount) = self.amount {
            updated.amount = amount;
        }
        if let Some(transaction_type) = self.transaction_type {
            updated.transaction_type = transaction_type;
        }
        if let Some(items_description) = &self.items_description {
            updated.items_description.clone_from(items_description);
        }
        if let Some(journal_number) = &self.journal_number {
            updated.journal_number.clone_from(journal_number);
        }
        if let Some(transaction_date) = self.transaction_date {
            updated.transaction_date = transaction_date;
        }
        updated
    }
}

/// Filter for ledger queries. Every set field narrows the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFilter {
    /// Only rows for this customer.
    pub customer_id: Option<CustomerId>,
    /// Only rows for this store.
    pub store_id: Option<StoreId>,
    /// Only rows of this type.
    pub transaction_type: Option<TransactionType>,
    /// Rows on or after this instant.
    pub start_date: Option<DateTime<Utc>>,
    /// Rows on or before this instant.
    pub end_date: Option<DateTime<Utc>>,
    /// Rows with amount at least this.
    pub min_amount: Option<Decimal>,
    /// Rows with amount at most this.
    pub max_amount: Option<Decimal>,
}

/// Totals for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSummary {
    /// Sum of `credit_given` amounts.
    pub total_credit_given: Decimal,
    /// Sum of `payment_received` amounts.
    pub total_payments_received: Decimal,
    /// Given minus received.
    pub outstanding_balance: Decimal,
    /// Number of rows.
    pub transaction_count: u64,
    /// Latest `transaction_date`, if any row exists.
    pub last_transaction_date: Option<DateTime<Utc>>,
}

/// Totals for one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSummary {
    /// Distinct customers with at least one row.
    pub total_customers: u64,
    /// Sum of `credit_given` amounts.
    pub total_credit_given: Decimal,
    /// Sum of `payment_received` amounts.
    pub total_payments_received: Decimal,
    /// Given minus received.
    pub outstanding_balance: Decimal,
    /// Number of rows.
    pub transaction_count: u64,
}

/// One customer's position in the outstanding-balance ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingBalance {
    /// Customer ID.
    pub customer_id: CustomerId,
    /// Sum of `credit_given` amounts.
    pub total_credit_given: Decimal,
    /// Sum of `payment_received` amounts.
    pub total_payments_received: Decimal,
    /// Given minus received, always positive in a ranking.
    pub outstanding_balance: Decimal,
}

/// Ranking row enriched with the customer's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCustomer {
    /// Balance figures.
    #[serde(flatten)]
    pub balance: OutstandingBalance,
    /// Customer name and phone, when the customer still exists.
    pub customer: Option<CustomerBrief>,
}

/// Denormalized per-customer balance, recomputed after every ledger write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Customer ID.
    pub customer_id: CustomerId,
    /// Store ID.
    pub store_id: StoreId,
    /// Sum of `credit_given` amounts.
    pub total_credit_given: Decimal,
    /// Sum of `payment_received` amounts.
    pub total_payments_received: Decimal,
    /// Given minus received.
    pub outstanding_balance: Decimal,
    /// Latest `credit_given` date.
    pub last_credit_date: Option<DateTime<Utc>>,
    /// Latest `payment_received` date.
    pub last_payment_date: Option<DateTime<Utc>>,
    /// Latest date of either type.
    pub last_transaction_date: Option<DateTime<Utc>>,
}
