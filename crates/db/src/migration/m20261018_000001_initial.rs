//! Initial database migration.
//!
//! Creates the ledger tables, the transaction type enum, the balance cache,
//! and the session tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: STORES & OWNERS
        // ============================================================
        db.execute_unprepared(STORES_SQL).await?;
        db.execute_unprepared(STORE_OWNERS_SQL).await?;

        // ============================================================
        // PART 3: CUSTOMERS & LEDGER
        // ============================================================
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(CREDITS_SQL).await?;
        db.execute_unprepared(CUSTOMER_BALANCES_SQL).await?;

        // ============================================================
        // PART 4: SESSIONS
        // ============================================================
        db.execute_unprepared(REFRESH_TOKENS_SQL).await?;
        db.execute_unprepared(TOKENS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE transaction_type AS ENUM ('credit_given', 'payment_received');
";

const STORES_SQL: &str = r"
CREATE TABLE stores (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    phone_number VARCHAR(20) NOT NULL UNIQUE,
    address TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const STORE_OWNERS_SQL: &str = r"
CREATE TABLE store_owners (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    phone_number VARCHAR(20) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    store_id UUID REFERENCES stores(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    last_login_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_store_owners_store ON store_owners(store_id);
";

const CUSTOMERS_SQL: &str = r"
CREATE TABLE customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_id UUID NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    phone_number VARCHAR(20) NOT NULL,
    email VARCHAR(255),
    address TEXT,
    cid_number VARCHAR(20),
    credit_limit NUMERIC(15, 2),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_customers_store_phone UNIQUE (store_id, phone_number),
    CONSTRAINT chk_credit_limit_non_negative CHECK (credit_limit IS NULL OR credit_limit >= 0)
);

CREATE INDEX idx_customers_store ON customers(store_id, name);
";

const CREDITS_SQL: &str = r"
CREATE TABLE credits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    store_id UUID NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    amount NUMERIC(15, 2) NOT NULL,
    transaction_type transaction_type NOT NULL,
    items_description TEXT,
    journal_number VARCHAR(100),
    transaction_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    created_by_owner_id UUID REFERENCES store_owners(id) ON DELETE SET NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_payment_journal CHECK (
        transaction_type = 'credit_given'
        OR (journal_number IS NOT NULL AND btrim(journal_number) <> '')
    )
);

CREATE INDEX idx_credits_customer ON credits(customer_id, transaction_date DESC);
CREATE INDEX idx_credits_store ON credits(store_id, transaction_date DESC);
CREATE INDEX idx_credits_date ON credits(transaction_date DESC);
";

const CUSTOMER_BALANCES_SQL: &str = r"
CREATE TABLE customer_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id) ON DELETE CASCADE,
    store_id UUID NOT NULL REFERENCES stores(id) ON DELETE CASCADE,
    total_credit_given NUMERIC(15, 2) NOT NULL DEFAULT 0,
    total_payments_received NUMERIC(15, 2) NOT NULL DEFAULT 0,
    outstanding_balance NUMERIC(15, 2) NOT NULL DEFAULT 0,
    last_credit_date TIMESTAMPTZ,
    last_payment_date TIMESTAMPTZ,
    last_transaction_date TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_customer_balances_customer_store UNIQUE (customer_id, store_id)
);

CREATE INDEX idx_customer_balances_outstanding
    ON customer_balances(store_id, outstanding_balance DESC);
";

const REFRESH_TOKENS_SQL: &str = r"
CREATE TABLE refresh_tokens (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_owner_id UUID NOT NULL REFERENCES store_owners(id) ON DELETE CASCADE,
    token_hash VARCHAR(64) NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    revoked BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Active sessions of an owner (refresh lookup)
CREATE INDEX idx_refresh_tokens_owner ON refresh_tokens(store_owner_id, expires_at) WHERE NOT revoked;
";

const TOKENS_SQL: &str = r"
CREATE TABLE tokens (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    store_owner_id UUID NOT NULL REFERENCES store_owners(id) ON DELETE CASCADE,
    refresh_token_id UUID NOT NULL REFERENCES refresh_tokens(id) ON DELETE CASCADE,
    token_hash VARCHAR(64) NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_tokens_refresh ON tokens(refresh_token_id);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS tokens CASCADE;
DROP TABLE IF EXISTS refresh_tokens CASCADE;
DROP TABLE IF EXISTS customer_balances CASCADE;
DROP TABLE IF EXISTS credits CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
DROP TABLE IF EXISTS store_owners CASCADE;
DROP TABLE IF EXISTS stores CASCADE;
DROP TYPE IF EXISTS transaction_type;
";
