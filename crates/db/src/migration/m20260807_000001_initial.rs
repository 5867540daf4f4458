//! Initial database migration.
//!
//! Creates all enums, tables, and indexes for the settlement and
//! reconciliation core.

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
        // PART 2: BANK ACCOUNTS & PAYMENT CONFIGURATION
        // ============================================================
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(PAYMENT_METHOD_CONFIGS_SQL).await?;

        // ============================================================
        // PART 3: SALES & LEDGER
        // ============================================================
        db.execute_unprepared(SALES_SQL).await?;
        db.execute_unprepared(RECEIVABLES_SQL).await?;
        db.execute_unprepared(PAYABLES_SQL).await?;

        // ============================================================
        // PART 4: CASH REGISTER
        // ============================================================
        db.execute_unprepared(CASH_REGISTER_SESSIONS_SQL).await?;
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 5: REALIZED TRANSACTIONS & BANK STATEMENTS
        // ============================================================
        db.execute_unprepared(FINANCIAL_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(BANK_TRANSACTIONS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Payment methods
CREATE TYPE payment_method AS ENUM (
    'cash',
    'credit_card',
    'debit_card',
    'pix',
    'bank_transfer',
    'bank_slip'
);

-- Immediate vs deferred receivable realization
CREATE TYPE receivable_mode AS ENUM ('immediate', 'deferred');

-- Receivable lifecycle (overdue is derived, never stored)
CREATE TYPE receivable_status AS ENUM ('pending', 'paid', 'cancelled');

-- Payable lifecycle
CREATE TYPE payable_status AS ENUM ('pending', 'partial', 'paid', 'cancelled');

-- Sale lifecycle
CREATE TYPE sale_status AS ENUM ('completed', 'cancelled');

-- Cash register session lifecycle
CREATE TYPE cash_session_status AS ENUM ('open', 'closed');

-- Cash movement direction (suprimento = in, sangria = out)
CREATE TYPE movement_direction AS ENUM ('in', 'out');

-- Imported bank transaction match state
CREATE TYPE bank_transaction_status AS ENUM ('unmatched', 'matched');

-- Realized transaction direction
CREATE TYPE transaction_kind AS ENUM ('revenue', 'expense');

-- Reporting categories
CREATE TYPE transaction_category AS ENUM (
    'sales',
    'supplier',
    'rent',
    'payroll',
    'utilities',
    'taxes',
    'commission',
    'bank_fees',
    'other'
);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    current_balance NUMERIC(14,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const PAYMENT_METHOD_CONFIGS_SQL: &str = r"
CREATE TABLE payment_method_configs (
    id UUID PRIMARY KEY,
    method payment_method NOT NULL,
    provider TEXT,
    min_installments INTEGER NOT NULL DEFAULT 1,
    max_installments INTEGER NOT NULL DEFAULT 1,
    fee_percent NUMERIC(5,2) NOT NULL DEFAULT 0,
    days_to_liquidate INTEGER NOT NULL DEFAULT 0,
    receivable_mode receivable_mode NOT NULL,
    bank_account_id UUID REFERENCES bank_accounts(id) ON DELETE SET NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_config_bracket CHECK (min_installments >= 1 AND max_installments >= min_installments),
    CONSTRAINT chk_config_fee CHECK (fee_percent >= 0),
    CONSTRAINT chk_config_days CHECK (days_to_liquidate >= 0)
);

CREATE INDEX idx_payment_configs_method ON payment_method_configs (method) WHERE is_active;
";

const SALES_SQL: &str = r"
CREATE TABLE sales (
    id UUID PRIMARY KEY,
    customer_id UUID,
    total NUMERIC(14,2) NOT NULL,
    sale_date DATE NOT NULL,
    method payment_method NOT NULL,
    installments INTEGER NOT NULL DEFAULT 1,
    status sale_status NOT NULL DEFAULT 'completed',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_sale_total CHECK (total > 0)
);
";

const RECEIVABLES_SQL: &str = r"
CREATE TABLE receivables (
    id UUID PRIMARY KEY,
    sale_id UUID NOT NULL REFERENCES sales(id) ON DELETE CASCADE,
    customer_id UUID,
    gross_amount NUMERIC(14,2) NOT NULL,
    fee_amount NUMERIC(14,2) NOT NULL DEFAULT 0,
    net_amount NUMERIC(14,2) NOT NULL,
    due_date DATE NOT NULL,
    installment_number INTEGER NOT NULL,
    total_installments INTEGER NOT NULL,
    status receivable_status NOT NULL DEFAULT 'pending',
    method payment_method NOT NULL,
    payment_config_id UUID REFERENCES payment_method_configs(id),
    paid_date DATE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_receivable_net CHECK (net_amount = gross_amount - fee_amount),
    CONSTRAINT chk_receivable_installment CHECK (
        installment_number >= 1 AND installment_number <= total_installments
    )
);

CREATE INDEX idx_receivables_sale ON receivables (sale_id);
CREATE INDEX idx_receivables_due ON receivables (status, due_date);
CREATE INDEX idx_receivables_config ON receivables (payment_config_id);
";

const PAYABLES_SQL: &str = r"
CREATE TABLE payables (
    id UUID PRIMARY KEY,
    description TEXT NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    due_date DATE NOT NULL,
    category transaction_category NOT NULL,
    status payable_status NOT NULL DEFAULT 'pending',
    total_paid NUMERIC(14,2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_payable_amount CHECK (amount > 0),
    CONSTRAINT chk_payable_paid CHECK (total_paid >= 0 AND total_paid <= amount)
);

CREATE INDEX idx_payables_due ON payables (status, due_date);
";

const CASH_REGISTER_SESSIONS_SQL: &str = r"
CREATE TABLE cash_register_sessions (
    id UUID PRIMARY KEY,
    terminal_id UUID NOT NULL,
    operator_id UUID NOT NULL,
    opened_at TIMESTAMPTZ NOT NULL,
    closed_at TIMESTAMPTZ,
    opening_balance NUMERIC(14,2) NOT NULL,
    closing_balance NUMERIC(14,2),
    expected_balance NUMERIC(14,2),
    difference NUMERIC(14,2),
    status cash_session_status NOT NULL DEFAULT 'open',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_session_opening CHECK (opening_balance >= 0)
);

-- The one-open-session-per-terminal invariant lives here, not in
-- application-level check-then-act.
CREATE UNIQUE INDEX uq_cash_sessions_open_terminal
    ON cash_register_sessions (terminal_id)
    WHERE status = 'open';
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY,
    session_id UUID NOT NULL REFERENCES cash_register_sessions(id) ON DELETE CASCADE,
    direction movement_direction NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    reason TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_movement_amount CHECK (amount > 0)
);

CREATE INDEX idx_cash_movements_session ON cash_movements (session_id);
";

const FINANCIAL_TRANSACTIONS_SQL: &str = r"
CREATE TABLE financial_transactions (
    id UUID PRIMARY KEY,
    kind transaction_kind NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    transaction_date DATE NOT NULL,
    category transaction_category NOT NULL,
    description TEXT NOT NULL,
    receivable_id UUID REFERENCES receivables(id) ON DELETE SET NULL,
    payable_id UUID REFERENCES payables(id) ON DELETE SET NULL,
    cash_session_id UUID REFERENCES cash_register_sessions(id),
    bank_account_id UUID REFERENCES bank_accounts(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_transaction_amount CHECK (amount > 0)
);

CREATE INDEX idx_financial_transactions_date ON financial_transactions (transaction_date);
CREATE INDEX idx_financial_transactions_session ON financial_transactions (cash_session_id);
";

const BANK_TRANSACTIONS_SQL: &str = r"
CREATE TABLE bank_transactions (
    id UUID PRIMARY KEY,
    bank_account_id UUID NOT NULL REFERENCES bank_accounts(id) ON DELETE CASCADE,
    transaction_date DATE NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(14,2) NOT NULL,
    status bank_transaction_status NOT NULL DEFAULT 'unmatched',
    matched_transaction_id UUID REFERENCES financial_transactions(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Duplicate-import protection: the natural key of a statement line.
CREATE UNIQUE INDEX uq_bank_transactions_natural_key
    ON bank_transactions (bank_account_id, transaction_date, amount, description);

-- A financial transaction pairs with at most one statement line.
CREATE UNIQUE INDEX uq_bank_transactions_match
    ON bank_transactions (matched_transaction_id)
    WHERE matched_transaction_id IS NOT NULL;

CREATE INDEX idx_bank_transactions_status ON bank_transactions (bank_account_id, status);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS bank_transactions CASCADE;
DROP TABLE IF EXISTS financial_transactions CASCADE;
DROP TABLE IF EXISTS cash_movements CASCADE;
DROP TABLE IF EXISTS cash_register_sessions CASCADE;
DROP TABLE IF EXISTS payables CASCADE;
DROP TABLE IF EXISTS receivables CASCADE;
DROP TABLE IF EXISTS sales CASCADE;
DROP TABLE IF EXISTS payment_method_configs CASCADE;
DROP TABLE IF EXISTS bank_accounts CASCADE;

DROP TYPE IF EXISTS transaction_category;
DROP TYPE IF EXISTS transaction_kind;
DROP TYPE IF EXISTS bank_transaction_status;
DROP TYPE IF EXISTS movement_direction;
DROP TYPE IF EXISTS cash_session_status;
DROP TYPE IF EXISTS sale_status;
DROP TYPE IF EXISTS payable_status;
DROP TYPE IF EXISTS receivable_status;
DROP TYPE IF EXISTS receivable_mode;
DROP TYPE IF EXISTS payment_method;
";
