//! Payable repository: expense obligations and their payments.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    bank_accounts, financial_transactions, payables,
    sea_orm_active_enums::{PayableStatus, PaymentMethod, TransactionCategory, TransactionKind},
};
use fluxo_core::ledger::{LedgerError, LedgerService};
use fluxo_shared::types::{PayableId, TransactionId};

/// Error types for payable operations.
#[derive(Debug, thiserror::Error)]
pub enum PayableError {
    /// Payable not found.
    #[error("Payable not found: {0}")]
    NotFound(Uuid),

    /// The lifecycle state machine rejected the operation.
    #[error(transparent)]
    Lifecycle(#[from] LedgerError),

    /// Payable amounts must be strictly positive.
    #[error("Payable amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Source bank account missing at debit time.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// Someone else paid the row first.
    #[error("Concurrent modification detected for payable {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a payable.
#[derive(Debug, Clone)]
pub struct CreatePayableInput {
    /// What the obligation is for.
    pub description: String,
    /// Total amount owed.
    pub amount: Decimal,
    /// Date the obligation falls due.
    pub due_date: NaiveDate,
    /// Expense category.
    pub category: TransactionCategory,
}

/// Input for paying (part of) a payable.
#[derive(Debug, Clone)]
pub struct PayPayableInput {
    /// Amount to pay now.
    pub amount_paid: Decimal,
    /// Calendar date of the payment.
    pub payment_date: NaiveDate,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Bank account to debit atomically, if any.
    pub bank_account_id: Option<Uuid>,
}

/// Filter options for listing payables.
#[derive(Debug, Clone, Default)]
pub struct PayableFilter {
    /// Filter by stored status.
    pub status: Option<PayableStatus>,
    /// Filter by category.
    pub category: Option<TransactionCategory>,
    /// Due date range start (inclusive).
    pub due_from: Option<NaiveDate>,
    /// Due date range end (inclusive).
    pub due_to: Option<NaiveDate>,
}

/// Repository for payable operations.
#[derive(Debug, Clone)]
pub struct PayableRepository {
    db: DatabaseConnection,
}

impl PayableRepository {
    /// Creates a new payable repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new payable.
    ///
    /// # Errors
    ///
    /// Rejects non-positive amounts before any mutation.
    pub async fn create(
        &self,
        input: CreatePayableInput,
    ) -> Result<payables::Model, PayableError> {
        if input.amount <= Decimal::ZERO {
            return Err(PayableError::NonPositiveAmount(input.amount));
        }

        let now = Utc::now().into();
        let payable = payables::ActiveModel {
            id: Set(PayableId::new().into_inner()),
            description: Set(input.description),
            amount: Set(input.amount),
            due_date: Set(input.due_date),
            category: Set(input.category),
            status: Set(PayableStatus::Pending),
            total_paid: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(payable_id = %payable.id, amount = %payable.amount, "Created payable");
        Ok(payable)
    }

    /// Lists payables.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self, filter: PayableFilter) -> Result<Vec<payables::Model>, PayableError> {
        let mut query = payables::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(payables::Column::Status.eq(status));
        }
        if let Some(category) = filter.category {
            query = query.filter(payables::Column::Category.eq(category));
        }
        if let Some(from) = filter.due_from {
            query = query.filter(payables::Column::DueDate.gte(from));
        }
        if let Some(to) = filter.due_to {
            query = query.filter(payables::Column::DueDate.lte(to));
        }

        let items = query
            .order_by_asc(payables::Column::DueDate)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Gets a payable by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn get(&self, id: Uuid) -> Result<payables::Model, PayableError> {
        payables::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PayableError::NotFound(id))
    }

    /// Applies a payment to a payable.
    ///
    /// Increments `total_paid` (paid when the balance clears, partial
    /// otherwise), posts the expense transaction, and - when a source
    /// account is given - debits that bank account, all in one
    /// transaction. Overpayment beyond the remaining balance is rejected
    /// before any mutation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a lifecycle/validation error, or
    /// `ConcurrentModification` when a concurrent payment landed first.
    pub async fn pay(
        &self,
        id: Uuid,
        input: PayPayableInput,
    ) -> Result<payables::Model, PayableError> {
        let txn = self.db.begin().await?;

        let payable = payables::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PayableError::NotFound(id))?;
        LedgerService::validate_can_pay(payable.status.clone().into())?;
        let outcome =
            LedgerService::apply_payment(payable.amount, payable.total_paid, input.amount_paid)?;

        // The filter on the previous total_paid makes two concurrent
        // payments serialize instead of both applying against the same
        // remaining balance.
        let updated = payables::Entity::update_many()
            .set(payables::ActiveModel {
                total_paid: Set(outcome.total_paid),
                status: Set(outcome.status.into()),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(payables::Column::Id.eq(id))
            .filter(payables::Column::TotalPaid.eq(payable.total_paid))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(PayableError::ConcurrentModification(id));
        }

        financial_transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            kind: Set(TransactionKind::Expense),
            amount: Set(input.amount_paid),
            transaction_date: Set(input.payment_date),
            category: Set(payable.category.clone()),
            description: Set(payable.description.clone()),
            receivable_id: Set(None),
            payable_id: Set(Some(id)),
            cash_session_id: Set(None),
            bank_account_id: Set(input.bank_account_id),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        if let Some(account_id) = input.bank_account_id {
            debit_bank_account(&txn, account_id, input.amount_paid).await?;
        }

        txn.commit().await?;
        info!(
            payable_id = %id,
            amount_paid = %input.amount_paid,
            method = ?input.method,
            "Paid payable"
        );
        self.get(id).await
    }
}

/// Debits a bank account balance with an optimistic-concurrency guard.
async fn debit_bank_account(
    txn: &sea_orm::DatabaseTransaction,
    account_id: Uuid,
    amount: Decimal,
) -> Result<(), PayableError> {
    let account = bank_accounts::Entity::find_by_id(account_id)
        .one(txn)
        .await?
        .ok_or(PayableError::BankAccountNotFound(account_id))?;

    let updated = bank_accounts::Entity::update_many()
        .set(bank_accounts::ActiveModel {
            current_balance: Set(account.current_balance - amount),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(bank_accounts::Column::Id.eq(account_id))
        .filter(bank_accounts::Column::CurrentBalance.eq(account.current_balance))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(PayableError::ConcurrentModification(account_id));
    }
    Ok(())
}
