//! Demo data seeder for Khata development.
//!
//! Creates one owner (phone `0800000000`, PIN `1234`), their store, three
//! customers, and a few weeks of ledger rows. Running it twice is a no-op.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use khata_core::auth::{NewOwner, OwnerStore, hash_password};
use khata_core::ledger::{CreateCreditInput, CreditService, TransactionType};
use khata_db::repositories::{CreateCustomerInput, CreateStoreInput};
use khata_db::{CreditRepository, CustomerRepository, StoreOwnerRepository, StoreRepository};
use khata_shared::types::{CustomerId, StoreId};

const DEMO_OWNER_PHONE: &str = "0800000000";
const DEMO_OWNER_PIN: &str = "1234";

/// (name, phone, credit limit in whole units)
const DEMO_CUSTOMERS: [(&str, &str, Option<i64>); 3] = [
    ("Somchai", "0811111111", Some(2_000)),
    ("Malee", "0822222222", None),
    ("Anan", "0833333333", Some(500)),
];

/// (customer index, days ago, type, amount in cents)
const DEMO_CREDITS: [(usize, i64, TransactionType, i64); 7] = [
    (0, 21, TransactionType::CreditGiven, 85_000),
    (0, 14, TransactionType::PaymentReceived, 50_000),
    (0, 3, TransactionType::CreditGiven, 42_050),
    (1, 18, TransactionType::CreditGiven, 120_000),
    (1, 2, TransactionType::PaymentReceived, 120_000),
    (2, 10, TransactionType::CreditGiven, 30_000),
    (2, 1, TransactionType::CreditGiven, 15_000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        bail!("DATABASE_URL must be set in environment");
    };

    println!("Connecting to database...");
    let db = khata_db::connect(&database_url, 2, 1)
        .await
        .context("Failed to connect to database")?;

    let owners = StoreOwnerRepository::new(db.clone());
    if owners.phone_exists(DEMO_OWNER_PHONE).await? {
        println!("  Demo owner already exists, skipping...");
        return Ok(());
    }

    println!("Seeding demo owner...");
    let owner = owners
        .create_owner(NewOwner {
            name: "Demo Owner".to_string(),
            phone_number: DEMO_OWNER_PHONE.to_string(),
            password_hash: hash_password(DEMO_OWNER_PIN)?,
            store_id: None,
        })
        .await?;

    println!("Seeding demo store...");
    let store = StoreRepository::new(db.clone())
        .create_for_owner(
            owner.id,
            CreateStoreInput {
                name: "Demo Grocery".to_string(),
                phone_number: "0899999999".to_string(),
                address: Some("1 Market Road".to_string()),
            },
        )
        .await?;
    let store_id = StoreId::from(store.id);

    println!("Seeding customers...");
    let customers = CustomerRepository::new(db.clone());
    let mut customer_ids: Vec<CustomerId> = Vec::with_capacity(DEMO_CUSTOMERS.len());
    for (name, phone, limit) in DEMO_CUSTOMERS {
        let customer = customers
            .create(CreateCustomerInput {
                store_id,
                name: name.to_string(),
                phone_number: phone.to_string(),
                email: None,
                address: None,
                cid_number: None,
                credit_limit: limit.map(Decimal::from),
            })
            .await?;
        customer_ids.push(CustomerId::from(customer.id));
    }

    println!("Seeding ledger...");
    let ledger = CreditService::new(Arc::new(CreditRepository::new(db)));
    let now = Utc::now();
    for (index, (customer, days_ago, transaction_type, cents)) in
        DEMO_CREDITS.into_iter().enumerate()
    {
        ledger
            .create_credit(CreateCreditInput {
                customer_id: customer_ids[customer],
                store_id,
                amount: Decimal::new(cents, 2),
                transaction_type,
                items_description: (transaction_type == TransactionType::CreditGiven)
                    .then(|| "Rice, cooking oil".to_string()),
                journal_number: (transaction_type == TransactionType::PaymentReceived)
                    .then(|| format!("DEMO-{index:04}")),
                transaction_date: Some(now - Duration::days(days_ago)),
                created_by_owner_id: Some(owner.id),
            })
            .await?;
    }

    println!("Seeding complete!");
    Ok(())
}
