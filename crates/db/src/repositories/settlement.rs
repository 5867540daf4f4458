//! Settlement repository: turns a sale into its scheduled receivables.
//!
//! The calculation itself is pure (`fluxo-core::settlement`); this
//! repository resolves the applicable config, then persists the sale, its
//! receivables, and any same-day realized revenue in one transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::payment_config::{PaymentConfigError, PaymentConfigRepository, to_core_config};
use crate::entities::{
    bank_accounts, cash_register_sessions, financial_transactions, receivables, sales,
    sea_orm_active_enums::{
        CashSessionStatus, PaymentMethod, SaleStatus, TransactionCategory, TransactionKind,
        ReceivableStatus,
    },
};
use fluxo_core::ledger::ReceivableStatus as CoreReceivableStatus;
use fluxo_core::settlement::{
    PaymentMethod as CorePaymentMethod, PaymentMethodConfig as CoreConfig,
    ScheduledReceivable, SettlementCalculator, SettlementError as CalculationError,
    SettlementInput,
};
use fluxo_shared::types::{CustomerId, ReceivableId, SaleId, TransactionId};

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementError {
    /// Config resolution failed (explicit ID missing or inactive).
    #[error(transparent)]
    Config(#[from] PaymentConfigError),

    /// The pure calculation rejected the input.
    #[error(transparent)]
    Calculation(#[from] CalculationError),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),

    /// Sale already cancelled.
    #[error("Sale {0} is already cancelled")]
    SaleAlreadyCancelled(Uuid),

    /// Linked bank account missing at credit time.
    #[error("Bank account not found: {0}")]
    BankAccountNotFound(Uuid),

    /// Concurrent balance update detected.
    #[error("Concurrent modification detected for bank account {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a settlement.
#[derive(Debug, Clone)]
pub struct CreateSettlementInput {
    /// Optional customer the receivables belong to.
    pub customer_id: Option<Uuid>,
    /// Total amount of the sale.
    pub sale_total: Decimal,
    /// Calendar date of the sale.
    pub sale_date: NaiveDate,
    /// How the sale was paid.
    pub method: PaymentMethod,
    /// Number of installments (1 = single payment).
    pub installments: u32,
    /// Explicit config override.
    pub payment_config_id: Option<Uuid>,
    /// Terminal the sale happened on; attributes cash revenue to the
    /// terminal's open register session.
    pub terminal_id: Option<Uuid>,
}

/// Result of a settlement: the sale row and its receivables.
#[derive(Debug, Clone)]
pub struct SettlementResult {
    /// The persisted sale.
    pub sale: sales::Model,
    /// One receivable per installment.
    pub receivables: Vec<receivables::Model>,
}

/// Repository for sale settlement.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the settlement for a sale.
    ///
    /// Resolves the config (explicit ID, else best bracket match, else the
    /// zero-fee same-day default), runs the pure calculation, then inserts
    /// the sale, every receivable, and - for instant configs - the
    /// realized revenue rows, all in one transaction. Never mutates
    /// inventory or any existing sale.
    ///
    /// # Errors
    ///
    /// Configuration and validation errors reject before any mutation;
    /// database failures roll back the whole settlement.
    pub async fn create_settlement(
        &self,
        input: CreateSettlementInput,
    ) -> Result<SettlementResult, SettlementError> {
        // Resolve the config before opening the transaction; failures here
        // must leave no trace.
        let config_repo = PaymentConfigRepository::new(self.db.clone());
        let resolved = config_repo
            .resolve(input.method.clone(), input.installments, input.payment_config_id)
            .await?;
        let core_method: CorePaymentMethod = input.method.clone().into();
        let config = resolved.as_ref().map_or_else(
            || CoreConfig::same_day_default(core_method),
            to_core_config,
        );
        let config_id = resolved.as_ref().map(|model| model.id);

        let sale_id = SaleId::new();
        let calculation_input = SettlementInput {
            sale_id,
            customer_id: input.customer_id.map(CustomerId::from_uuid),
            sale_total: input.sale_total,
            sale_date: input.sale_date,
            method: core_method,
            installments: input.installments,
        };
        let scheduled = SettlementCalculator::calculate(&calculation_input, &config)?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let sale = sales::ActiveModel {
            id: Set(sale_id.into_inner()),
            customer_id: Set(input.customer_id),
            total: Set(input.sale_total),
            sale_date: Set(input.sale_date),
            method: Set(input.method.clone()),
            installments: Set(i32::try_from(input.installments).unwrap_or(i32::MAX)),
            status: Set(SaleStatus::Completed),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        // Cash revenue is attributed to the terminal's open session, when
        // there is one. Resolved once per settlement.
        let cash_session_id = if input.method == PaymentMethod::Cash {
            match input.terminal_id {
                Some(terminal) => find_open_session(&txn, terminal).await?,
                None => None,
            }
        } else {
            None
        };

        let mut persisted = Vec::with_capacity(scheduled.len());
        for item in &scheduled {
            let receivable = insert_receivable(&txn, &sale, config_id, item, now).await?;

            if item.status == CoreReceivableStatus::Paid {
                post_realized_revenue(
                    &txn,
                    &receivable,
                    item.net_amount,
                    input.sale_date,
                    cash_session_id,
                    config.bank_account_id.map(fluxo_shared::types::BankAccountId::into_inner),
                )
                .await?;
            }

            persisted.push(receivable);
        }

        txn.commit().await?;
        info!(
            sale_id = %sale.id,
            installments = persisted.len(),
            method = ?input.method,
            "Created settlement"
        );

        Ok(SettlementResult {
            sale,
            receivables: persisted,
        })
    }

    /// Cancels a sale, cascading cancellation to its open receivables.
    ///
    /// Already-paid receivables are history and stay paid. Everything
    /// happens in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `SaleNotFound` or `SaleAlreadyCancelled`.
    pub async fn cancel_sale(&self, sale_id: Uuid) -> Result<sales::Model, SettlementError> {
        let txn = self.db.begin().await?;

        let sale = sales::Entity::find_by_id(sale_id)
            .one(&txn)
            .await?
            .ok_or(SettlementError::SaleNotFound(sale_id))?;
        if sale.status == SaleStatus::Cancelled {
            return Err(SettlementError::SaleAlreadyCancelled(sale_id));
        }

        let now = Utc::now().into();
        let cancelled = receivables::Entity::update_many()
            .set(receivables::ActiveModel {
                status: Set(ReceivableStatus::Cancelled),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(receivables::Column::SaleId.eq(sale_id))
            .filter(receivables::Column::Status.eq(ReceivableStatus::Pending))
            .exec(&txn)
            .await?;

        let mut active: sales::ActiveModel = sale.into();
        active.status = Set(SaleStatus::Cancelled);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await?;

        txn.commit().await?;
        info!(
            sale_id = %sale_id,
            cancelled_receivables = cancelled.rows_affected,
            "Cancelled sale"
        );
        Ok(updated)
    }
}

/// Finds the open register session for a terminal, if any.
async fn find_open_session(
    txn: &DatabaseTransaction,
    terminal_id: Uuid,
) -> Result<Option<Uuid>, DbErr> {
    let session = cash_register_sessions::Entity::find()
        .filter(cash_register_sessions::Column::TerminalId.eq(terminal_id))
        .filter(cash_register_sessions::Column::Status.eq(CashSessionStatus::Open))
        .one(txn)
        .await?;
    Ok(session.map(|s| s.id))
}

/// Inserts one receivable row from the calculator's schedule.
async fn insert_receivable(
    txn: &DatabaseTransaction,
    sale: &sales::Model,
    config_id: Option<Uuid>,
    item: &ScheduledReceivable,
    now: sea_orm::prelude::DateTimeWithTimeZone,
) -> Result<receivables::Model, DbErr> {
    receivables::ActiveModel {
        id: Set(ReceivableId::new().into_inner()),
        sale_id: Set(sale.id),
        customer_id: Set(sale.customer_id),
        gross_amount: Set(item.gross_amount),
        fee_amount: Set(item.fee_amount),
        net_amount: Set(item.net_amount),
        due_date: Set(item.due_date),
        installment_number: Set(i32::try_from(item.installment_number).unwrap_or(i32::MAX)),
        total_installments: Set(i32::try_from(item.total_installments).unwrap_or(i32::MAX)),
        status: Set(item.status.into()),
        method: Set(sale.method.clone()),
        payment_config_id: Set(config_id),
        paid_date: Set(item.paid_date),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(txn)
    .await
}

/// Posts the realized revenue row for a settled receivable and credits the
/// linked bank account, all inside the caller's transaction.
pub(crate) async fn post_realized_revenue(
    txn: &DatabaseTransaction,
    receivable: &receivables::Model,
    net_amount: Decimal,
    transaction_date: NaiveDate,
    cash_session_id: Option<Uuid>,
    bank_account_id: Option<Uuid>,
) -> Result<financial_transactions::Model, SettlementError> {
    let posted = financial_transactions::ActiveModel {
        id: Set(TransactionId::new().into_inner()),
        kind: Set(TransactionKind::Revenue),
        amount: Set(net_amount),
        transaction_date: Set(transaction_date),
        category: Set(TransactionCategory::Sales),
        description: Set(format!(
            "Sale settlement {}/{}",
            receivable.installment_number, receivable.total_installments
        )),
        receivable_id: Set(Some(receivable.id)),
        payable_id: Set(None),
        cash_session_id: Set(cash_session_id),
        bank_account_id: Set(bank_account_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    if let Some(account_id) = bank_account_id {
        credit_bank_account(txn, account_id, net_amount).await?;
    }

    Ok(posted)
}

/// Credits a bank account balance with an optimistic-concurrency guard.
pub(crate) async fn credit_bank_account(
    txn: &DatabaseTransaction,
    account_id: Uuid,
    amount: Decimal,
) -> Result<(), SettlementError> {
    let account = bank_accounts::Entity::find_by_id(account_id)
        .one(txn)
        .await?
        .ok_or(SettlementError::BankAccountNotFound(account_id))?;

    let updated = bank_accounts::Entity::update_many()
        .set(bank_accounts::ActiveModel {
            current_balance: Set(account.current_balance + amount),
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        })
        .filter(bank_accounts::Column::Id.eq(account_id))
        .filter(bank_accounts::Column::CurrentBalance.eq(account.current_balance))
        .exec(txn)
        .await?;

    if updated.rows_affected == 0 {
        return Err(SettlementError::ConcurrentModification(account_id));
    }
    Ok(())
}
