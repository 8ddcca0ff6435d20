//! `SeaORM` Entity for customer_balances table.
//!
//! Denormalized cache, rewritten from the `credits` rows after every write.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "customer_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub store_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_credit_given: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub total_payments_received: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub outstanding_balance: Decimal,
    pub last_credit_date: Option<DateTimeUtc>,
    pub last_payment_date: Option<DateTimeUtc>,
    pub last_transaction_date: Option<DateTimeUtc>,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
