//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! `CreditRepository` and `StoreOwnerRepository` implement the core
//! persistence traits.

pub mod constraint;
pub mod credit;
pub mod customer;
pub mod store;
pub mod store_owner;

pub use credit::CreditRepository;
pub use customer::{CreateCustomerInput, CustomerError, CustomerRepository, UpdateCustomerInput};
pub use store::{CreateStoreInput, StoreError, StoreRepository};
pub use store_owner::StoreOwnerRepository;
