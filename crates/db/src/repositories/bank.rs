//! Bank account and reconciliation repository.
//!
//! Statement import with duplicate protection, and the user-confirmed
//! matching operations that pair statement lines with realized financial
//! transactions.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    bank_accounts, bank_transactions, financial_transactions,
    sea_orm_active_enums::{BankTransactionStatus, TransactionCategory, TransactionKind},
};
use fluxo_core::reconciliation::{
    NormalizedLine, ReconciliationError, ReconciliationService, StatementLine,
};
use fluxo_shared::types::{BankAccountId, BankTransactionId, TransactionId};

/// Error types for bank/reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum BankError {
    /// Bank account not found.
    #[error("Bank account not found: {0}")]
    AccountNotFound(Uuid),

    /// Imported bank transaction not found.
    #[error("Bank transaction not found: {0}")]
    TransactionNotFound(Uuid),

    /// Financial transaction not found.
    #[error("Financial transaction not found: {0}")]
    FinancialTransactionNotFound(Uuid),

    /// The financial transaction is already paired with another line.
    #[error("Financial transaction {0} is already matched to a bank line")]
    TargetAlreadyMatched(Uuid),

    /// The reconciliation rules rejected the operation.
    #[error(transparent)]
    Reconciliation(#[from] ReconciliationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Outcome of a statement import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Newly imported lines.
    pub imported: Vec<bank_transactions::Model>,
    /// Lines skipped because their natural key already exists.
    pub skipped_duplicates: u64,
}

/// Input for create-and-match.
#[derive(Debug, Clone, Default)]
pub struct CreateAndMatchInput {
    /// Reporting category; bank fees when omitted.
    pub category: Option<TransactionCategory>,
    /// Description override; the statement text when omitted.
    pub description: Option<String>,
}

/// Repository for bank accounts and statement reconciliation.
#[derive(Debug, Clone)]
pub struct BankRepository {
    db: DatabaseConnection,
}

impl BankRepository {
    /// Creates a new bank repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a bank account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        name: String,
        initial_balance: Decimal,
    ) -> Result<bank_accounts::Model, BankError> {
        let now = Utc::now().into();
        let account = bank_accounts::ActiveModel {
            id: Set(BankAccountId::new().into_inner()),
            name: Set(name),
            current_balance: Set(initial_balance),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(account_id = %account.id, "Created bank account");
        Ok(account)
    }

    /// Gets a bank account by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown IDs.
    pub async fn get_account(&self, id: Uuid) -> Result<bank_accounts::Model, BankError> {
        bank_accounts::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BankError::AccountNotFound(id))
    }

    /// Imports a statement for an account.
    ///
    /// Lines are normalized first (decimal separators, signs); any invalid
    /// line aborts the whole import before a row is written. Lines whose
    /// natural key (account, date, amount, description) already exists are
    /// skipped, so re-importing the identical statement is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`, a normalization error, or a database
    /// error (which rolls back the entire import).
    pub async fn import_statement(
        &self,
        account_id: Uuid,
        lines: Vec<StatementLine>,
    ) -> Result<ImportOutcome, BankError> {
        let normalized = ReconciliationService::normalize_statement(&lines)?;

        let txn = self.db.begin().await?;

        bank_accounts::Entity::find_by_id(account_id)
            .one(&txn)
            .await?
            .ok_or(BankError::AccountNotFound(account_id))?;

        let mut imported = Vec::with_capacity(normalized.len());
        let mut skipped = 0u64;
        for line in &normalized {
            if line_exists(&txn, account_id, line).await? {
                skipped += 1;
                continue;
            }

            let model = bank_transactions::ActiveModel {
                id: Set(BankTransactionId::new().into_inner()),
                bank_account_id: Set(account_id),
                transaction_date: Set(line.date),
                description: Set(line.description.clone()),
                amount: Set(line.amount),
                status: Set(BankTransactionStatus::Unmatched),
                matched_transaction_id: Set(None),
                created_at: Set(Utc::now().into()),
            }
            .insert(&txn)
            .await?;
            imported.push(model);
        }

        txn.commit().await?;
        info!(
            account_id = %account_id,
            imported = imported.len(),
            skipped_duplicates = skipped,
            "Imported bank statement"
        );

        Ok(ImportOutcome {
            imported,
            skipped_duplicates: skipped,
        })
    }

    /// Lists imported bank transactions, optionally by status.
    ///
    /// Matched lines never reappear in the unmatched listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_transactions(
        &self,
        account_id: Option<Uuid>,
        status: Option<BankTransactionStatus>,
    ) -> Result<Vec<bank_transactions::Model>, BankError> {
        let mut query = bank_transactions::Entity::find();
        if let Some(account) = account_id {
            query = query.filter(bank_transactions::Column::BankAccountId.eq(account));
        }
        if let Some(status) = status {
            query = query.filter(bank_transactions::Column::Status.eq(status));
        }

        let items = query
            .order_by_asc(bank_transactions::Column::TransactionDate)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Pairs a bank line with an existing financial transaction.
    ///
    /// Marks the line matched; the financial transaction itself is not
    /// altered. One-to-one: a matched line never pairs again, and a
    /// financial transaction pairs with at most one line.
    ///
    /// # Errors
    ///
    /// Returns not-found errors, `AlreadyMatched` for the line, or
    /// `TargetAlreadyMatched` for the financial transaction.
    pub async fn match_transaction(
        &self,
        bank_tx_id: Uuid,
        financial_tx_id: Uuid,
    ) -> Result<bank_transactions::Model, BankError> {
        let txn = self.db.begin().await?;

        let bank_tx = bank_transactions::Entity::find_by_id(bank_tx_id)
            .one(&txn)
            .await?
            .ok_or(BankError::TransactionNotFound(bank_tx_id))?;
        ReconciliationService::validate_can_match(bank_tx.status.clone().into())?;

        financial_transactions::Entity::find_by_id(financial_tx_id)
            .one(&txn)
            .await?
            .ok_or(BankError::FinancialTransactionNotFound(financial_tx_id))?;

        let taken = bank_transactions::Entity::find()
            .filter(bank_transactions::Column::MatchedTransactionId.eq(financial_tx_id))
            .one(&txn)
            .await?;
        if taken.is_some() {
            return Err(BankError::TargetAlreadyMatched(financial_tx_id));
        }

        mark_matched(&txn, bank_tx_id, financial_tx_id).await?;

        txn.commit().await?;
        info!(
            bank_tx_id = %bank_tx_id,
            financial_tx_id = %financial_tx_id,
            "Matched bank transaction"
        );
        self.get_transaction(bank_tx_id).await
    }

    /// Materializes a financial transaction from a bank line and matches
    /// it, in one transaction.
    ///
    /// For movements with no prior system record (bank fees, interest):
    /// the sign decides revenue vs expense, the amount is the line's
    /// absolute value.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` or `AlreadyMatched`.
    pub async fn create_and_match(
        &self,
        bank_tx_id: Uuid,
        input: CreateAndMatchInput,
    ) -> Result<(bank_transactions::Model, financial_transactions::Model), BankError> {
        let txn = self.db.begin().await?;

        let bank_tx = bank_transactions::Entity::find_by_id(bank_tx_id)
            .one(&txn)
            .await?
            .ok_or(BankError::TransactionNotFound(bank_tx_id))?;
        ReconciliationService::validate_can_match(bank_tx.status.clone().into())?;

        let kind: TransactionKind =
            ReconciliationService::kind_for_amount(bank_tx.amount).into();
        let created = financial_transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            kind: Set(kind),
            amount: Set(bank_tx.amount.abs()),
            transaction_date: Set(bank_tx.transaction_date),
            category: Set(input.category.unwrap_or(TransactionCategory::BankFees)),
            description: Set(input
                .description
                .unwrap_or_else(|| bank_tx.description.clone())),
            receivable_id: Set(None),
            payable_id: Set(None),
            cash_session_id: Set(None),
            bank_account_id: Set(Some(bank_tx.bank_account_id)),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        mark_matched(&txn, bank_tx_id, created.id).await?;

        txn.commit().await?;
        info!(
            bank_tx_id = %bank_tx_id,
            financial_tx_id = %created.id,
            "Created and matched financial transaction"
        );
        let bank_tx = self.get_transaction(bank_tx_id).await?;
        Ok((bank_tx, created))
    }

    /// Gets an imported bank transaction by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransactionNotFound` for unknown IDs.
    pub async fn get_transaction(
        &self,
        id: Uuid,
    ) -> Result<bank_transactions::Model, BankError> {
        bank_transactions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(BankError::TransactionNotFound(id))
    }
}

/// Checks whether a line's natural key already exists for the account.
async fn line_exists(
    txn: &DatabaseTransaction,
    account_id: Uuid,
    line: &NormalizedLine,
) -> Result<bool, DbErr> {
    let existing = bank_transactions::Entity::find()
        .filter(bank_transactions::Column::BankAccountId.eq(account_id))
        .filter(bank_transactions::Column::TransactionDate.eq(line.date))
        .filter(bank_transactions::Column::Amount.eq(line.amount))
        .filter(bank_transactions::Column::Description.eq(line.description.clone()))
        .one(txn)
        .await?;
    Ok(existing.is_some())
}

/// Flips a line to matched with the pending-state guard in the update.
async fn mark_matched(
    txn: &DatabaseTransaction,
    bank_tx_id: Uuid,
    financial_tx_id: Uuid,
) -> Result<(), BankError> {
    let updated = bank_transactions::Entity::update_many()
        .set(bank_transactions::ActiveModel {
            status: Set(BankTransactionStatus::Matched),
            matched_transaction_id: Set(Some(financial_tx_id)),
            ..Default::default()
        })
        .filter(bank_transactions::Column::Id.eq(bank_tx_id))
        .filter(bank_transactions::Column::Status.eq(BankTransactionStatus::Unmatched))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(ReconciliationError::AlreadyMatched.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_kind_bridge_for_create_and_match() {
        let credit: TransactionKind = ReconciliationService::kind_for_amount(dec!(10)).into();
        let debit: TransactionKind = ReconciliationService::kind_for_amount(dec!(-10)).into();
        assert_eq!(credit, TransactionKind::Revenue);
        assert_eq!(debit, TransactionKind::Expense);
    }
}
