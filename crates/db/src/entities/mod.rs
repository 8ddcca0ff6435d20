//! `SeaORM` entity definitions.

pub mod credits;
pub mod customer_balances;
pub mod customers;
pub mod refresh_tokens;
pub mod sea_orm_active_enums;
pub mod store_owners;
pub mod stores;
pub mod tokens;
