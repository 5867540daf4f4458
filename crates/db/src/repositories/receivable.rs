//! Receivable repository: lifecycle operations and lazy auto-settlement.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::settlement::{SettlementError, post_realized_revenue};
use crate::entities::{
    payment_method_configs, receivables,
    sea_orm_active_enums::{PaymentMethod, ReceivableStatus},
};
use fluxo_core::ledger::{LedgerError, LedgerService};

/// Error types for receivable operations.
#[derive(Debug, thiserror::Error)]
pub enum ReceivableError {
    /// Receivable not found.
    #[error("Receivable not found: {0}")]
    NotFound(Uuid),

    /// The lifecycle state machine rejected the transition.
    #[error(transparent)]
    Lifecycle(#[from] LedgerError),

    /// Someone else settled or cancelled the row first.
    #[error("Concurrent modification detected for receivable {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Posting the realized revenue failed.
    #[error(transparent)]
    Posting(#[from] SettlementError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing receivables.
#[derive(Debug, Clone, Default)]
pub struct ReceivableFilter {
    /// Filter by stored status.
    pub status: Option<ReceivableStatus>,
    /// Filter by payment method.
    pub method: Option<PaymentMethod>,
    /// Filter by parent sale.
    pub sale_id: Option<Uuid>,
    /// Due date range start (inclusive).
    pub due_from: Option<NaiveDate>,
    /// Due date range end (inclusive).
    pub due_to: Option<NaiveDate>,
}

/// Repository for receivable lifecycle operations.
#[derive(Debug, Clone)]
pub struct ReceivableRepository {
    db: DatabaseConnection,
}

impl ReceivableRepository {
    /// Creates a new receivable repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists receivables, auto-settling matured immediate-mode items first.
    ///
    /// Listing is deliberately not a pure read: matured items settle as a
    /// side effect, each in its own transaction, so what the caller sees
    /// is what the ledger now holds. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Per-item settlement failures
    /// are logged and skipped, never aborting the listing.
    pub async fn list(
        &self,
        filter: ReceivableFilter,
    ) -> Result<Vec<receivables::Model>, ReceivableError> {
        self.settle_due().await?;

        let mut query = receivables::Entity::find();
        if let Some(status) = filter.status {
            query = query.filter(receivables::Column::Status.eq(status));
        }
        if let Some(method) = filter.method {
            query = query.filter(receivables::Column::Method.eq(method));
        }
        if let Some(sale_id) = filter.sale_id {
            query = query.filter(receivables::Column::SaleId.eq(sale_id));
        }
        if let Some(from) = filter.due_from {
            query = query.filter(receivables::Column::DueDate.gte(from));
        }
        if let Some(to) = filter.due_to {
            query = query.filter(receivables::Column::DueDate.lte(to));
        }

        let items = query
            .order_by_asc(receivables::Column::DueDate)
            .order_by_asc(receivables::Column::InstallmentNumber)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Gets a receivable by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn get(&self, id: Uuid) -> Result<receivables::Model, ReceivableError> {
        receivables::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(ReceivableError::NotFound(id))
    }

    /// Receives (settles) a receivable.
    ///
    /// Transitions pending -> paid, sets `paid_date`, posts the realized
    /// revenue for the net amount, and credits the config's linked bank
    /// account - one transaction, all or nothing. Re-receiving is a
    /// conflict, never a double-post.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a lifecycle error for terminal states, or
    /// `ConcurrentModification` when another request settled it first.
    pub async fn receive(
        &self,
        id: Uuid,
        payment_date: NaiveDate,
    ) -> Result<receivables::Model, ReceivableError> {
        let txn = self.db.begin().await?;

        let receivable = receivables::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ReceivableError::NotFound(id))?;
        LedgerService::validate_can_receive(receivable.status.clone().into())?;

        let config = find_config(&txn, receivable.payment_config_id).await?;
        settle_in_txn(&txn, &receivable, payment_date, config.as_ref()).await?;

        txn.commit().await?;
        info!(receivable_id = %id, %payment_date, "Received receivable");
        self.get(id).await
    }

    /// Cancels a receivable.
    ///
    /// Used when the parent sale is cancelled; posts nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, a lifecycle error, or `ConcurrentModification`.
    pub async fn cancel(&self, id: Uuid) -> Result<receivables::Model, ReceivableError> {
        let txn = self.db.begin().await?;

        let receivable = receivables::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(ReceivableError::NotFound(id))?;
        LedgerService::validate_can_cancel(receivable.status.clone().into())?;

        let updated = receivables::Entity::update_many()
            .set(receivables::ActiveModel {
                status: Set(ReceivableStatus::Cancelled),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(receivables::Column::Id.eq(id))
            .filter(receivables::Column::Status.eq(ReceivableStatus::Pending))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(ReceivableError::ConcurrentModification(id));
        }

        txn.commit().await?;
        info!(receivable_id = %id, "Cancelled receivable");
        self.get(id).await
    }

    /// Settles every matured, immediate-mode pending receivable.
    ///
    /// The explicit form of the lazy auto-settlement rule: invoked by the
    /// listing path and safe to invoke directly. Each item settles in its
    /// own transaction; one failure is logged and skipped so the rest of
    /// the batch - and the listing that triggered it - still succeed.
    /// Idempotent: settled items no longer qualify.
    ///
    /// # Errors
    ///
    /// Returns an error only if the candidate query itself fails.
    pub async fn settle_due(&self) -> Result<u64, ReceivableError> {
        let today = Utc::now().date_naive();

        let candidates = receivables::Entity::find()
            .find_also_related(payment_method_configs::Entity)
            .filter(receivables::Column::Status.eq(ReceivableStatus::Pending))
            .filter(receivables::Column::DueDate.lte(today))
            .all(&self.db)
            .await?;

        let mut settled = 0u64;
        for (receivable, config) in candidates {
            let mode = config
                .as_ref()
                .map(|c| c.receivable_mode.clone().into());
            if !LedgerService::should_auto_settle(
                mode,
                receivable.status.clone().into(),
                receivable.due_date,
                today,
            ) {
                continue;
            }

            match self.settle_one(&receivable, config.as_ref(), today).await {
                Ok(()) => settled += 1,
                Err(error) => {
                    warn!(
                        receivable_id = %receivable.id,
                        %error,
                        "Auto-settlement failed for item, skipping"
                    );
                }
            }
        }

        if settled > 0 {
            info!(count = settled, "Auto-settled matured receivables");
        }
        Ok(settled)
    }

    /// Settles a single matured receivable in its own transaction.
    async fn settle_one(
        &self,
        receivable: &receivables::Model,
        config: Option<&payment_method_configs::Model>,
        today: NaiveDate,
    ) -> Result<(), ReceivableError> {
        let txn = self.db.begin().await?;
        settle_in_txn(&txn, receivable, today, config).await?;
        txn.commit().await?;
        Ok(())
    }
}

/// Loads the originating config row, when the reference survives.
async fn find_config(
    txn: &DatabaseTransaction,
    config_id: Option<Uuid>,
) -> Result<Option<payment_method_configs::Model>, DbErr> {
    match config_id {
        Some(id) => payment_method_configs::Entity::find_by_id(id).one(txn).await,
        None => Ok(None),
    }
}

/// The settlement write: conditional status flip plus revenue posting.
///
/// The `status = 'pending'` guard inside the update makes concurrent
/// settles lose cleanly instead of double-posting.
async fn settle_in_txn(
    txn: &DatabaseTransaction,
    receivable: &receivables::Model,
    payment_date: NaiveDate,
    config: Option<&payment_method_configs::Model>,
) -> Result<(), ReceivableError> {
    let updated = receivables::Entity::update_many()
        .set(receivables::ActiveModel {
            status: Set(ReceivableStatus::Paid),
            paid_date: Set(Some(payment_date)),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(receivables::Column::Id.eq(receivable.id))
        .filter(receivables::Column::Status.eq(ReceivableStatus::Pending))
        .exec(txn)
        .await?;
    if updated.rows_affected == 0 {
        return Err(ReceivableError::ConcurrentModification(receivable.id));
    }

    post_realized_revenue(
        txn,
        receivable,
        receivable.net_amount,
        payment_date,
        None,
        config.and_then(|c| c.bank_account_id),
    )
    .await?;

    Ok(())
}
