//! Customer repository for database operations.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use khata_shared::types::{CustomerId, StoreId};

use super::constraint::{Violation, violation};
use crate::entities::{customers, stores};

/// Error types for customer operations.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// Customer not found.
    #[error("Customer not found")]
    NotFound,

    /// Store not found.
    #[error("Store not found")]
    StoreNotFound,

    /// Phone number already used by another customer of the store.
    #[error("Customer with this phone number already exists in this store")]
    PhoneTaken,

    /// Credit limit below zero.
    #[error("Credit limit must be non-negative")]
    NegativeCreditLimit,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerInput {
    /// Owning store.
    pub store_id: StoreId,
    /// Display name.
    pub name: String,
    /// Phone number, unique within the store.
    pub phone_number: String,
    /// Email address.
    pub email: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Citizen ID number.
    pub cid_number: Option<String>,
    /// Maximum outstanding balance.
    pub credit_limit: Option<Decimal>,
}

/// Partial update of a customer. `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomerInput {
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New or cleared email.
    pub email: Option<Option<String>>,
    /// New or cleared address.
    pub address: Option<Option<String>>,
    /// New or cleared citizen ID number.
    pub cid_number: Option<Option<String>>,
    /// New or cleared credit limit.
    pub credit_limit: Option<Option<Decimal>>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// Classifies a failed customer write.
fn write_error(err: DbErr) -> CustomerError {
    match violation(&err) {
        Some(Violation::Unique) => CustomerError::PhoneTaken,
        Some(Violation::ForeignKey) => CustomerError::StoreNotFound,
        None => CustomerError::Database(err),
    }
}

fn check_credit_limit(limit: Option<Decimal>) -> Result<(), CustomerError> {
    if limit.is_some_and(|l| l < Decimal::ZERO) {
        return Err(CustomerError::NegativeCreditLimit);
    }
    Ok(())
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn phone_taken(
        &self,
        store_id: Uuid,
        phone_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = customers::Entity::find()
            .filter(customers::Column::StoreId.eq(store_id))
            .filter(customers::Column::PhoneNumber.eq(phone_number));
        if let Some(id) = except {
            query = query.filter(customers::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// Creates a customer.
    ///
    /// # Errors
    ///
    /// Returns `StoreNotFound`, `PhoneTaken`, or `NegativeCreditLimit` when the
    /// input is rejected.
    pub async fn create(
        &self,
        input: CreateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let store_id = input.store_id.into_inner();
        if stores::Entity::find_by_id(store_id)
            .one(&self.db)
            .await?
            .is_none()
        {
            return Err(CustomerError::StoreNotFound);
        }
        check_credit_limit(input.credit_limit)?;
        if self.phone_taken(store_id, &input.phone_number, None).await? {
            return Err(CustomerError::PhoneTaken);
        }

        let now = Utc::now();
        let customer = customers::ActiveModel {
            id: Set(Uuid::now_v7()),
            store_id: Set(store_id),
            name: Set(input.name),
            phone_number: Set(input.phone_number),
            email: Set(input.email),
            address: Set(input.address),
            cid_number: Set(input.cid_number),
            credit_limit: Set(input.credit_limit),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        tracing::info!(
            customer_id = %customer.id,
            store_id = %customer.store_id,
            "Customer created"
        );
        Ok(customer)
    }

    /// Finds a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Option<customers::Model>, DbErr> {
        customers::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Lists a store's customers by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_store(
        &self,
        store_id: StoreId,
        active_only: bool,
    ) -> Result<Vec<customers::Model>, DbErr> {
        let mut query =
            customers::Entity::find().filter(customers::Column::StoreId.eq(store_id.into_inner()));
        if active_only {
            query = query.filter(customers::Column::IsActive.eq(true));
        }
        query.order_by_asc(customers::Column::Name).all(&self.db).await
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PhoneTaken`, or `NegativeCreditLimit` when the
    /// update is rejected.
    pub async fn update(
        &self,
        id: CustomerId,
        input: UpdateCustomerInput,
    ) -> Result<customers::Model, CustomerError> {
        let existing = self.find_by_id(id).await?.ok_or(CustomerError::NotFound)?;

        if let Some(limit) = input.credit_limit {
            check_credit_limit(limit)?;
        }
        if let Some(phone) = &input.phone_number
            && self
                .phone_taken(existing.store_id, phone, Some(existing.id))
                .await?
        {
            return Err(CustomerError::PhoneTaken);
        }

        let mut model = existing.into_active_model();
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(phone) = input.phone_number {
            model.phone_number = Set(phone);
        }
        if let Some(email) = input.email {
            model.email = Set(email);
        }
        if let Some(address) = input.address {
            model.address = Set(address);
        }
        if let Some(cid_number) = input.cid_number {
            model.cid_number = Set(cid_number);
        }
        if let Some(credit_limit) = input.credit_limit {
            model.credit_limit = Set(credit_limit);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now());

        model.update(&self.db).await.map_err(write_error)
    }

    /// Deletes a customer and, through cascades, its ledger rows.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the customer does not exist.
    pub async fn delete(&self, id: CustomerId) -> Result<(), CustomerError> {
        let result = customers::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CustomerError::NotFound);
        }
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_credit_limit_must_be_non_negative() {
        assert!(check_credit_limit(None).is_ok());
        assert!(check_credit_limit(Some(dec!(0))).is_ok());
        assert!(check_credit_limit(Some(dec!(500))).is_ok());
        assert!(matches!(
            check_credit_limit(Some(dec!(-1))),
            Err(CustomerError::NegativeCreditLimit)
        ));
    }

    #[test]
    fn test_unclassified_write_error_passes_through() {
        assert!(matches!(
            write_error(DbErr::Custom("boom".to_string())),
            CustomerError::Database(_)
        ));
    }
}
