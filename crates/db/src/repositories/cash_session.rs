//! Cash-register session repository.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::{
    cash_movements, cash_register_sessions, financial_transactions,
    sea_orm_active_enums::{CashSessionStatus, MovementDirection, TransactionKind},
};
use fluxo_core::cashier::{BalanceBreakdown, CashierError, CashierService};
use fluxo_shared::types::{CashMovementId, CashSessionId};

/// Error types for cash-register session operations.
#[derive(Debug, thiserror::Error)]
pub enum CashSessionError {
    /// Session not found.
    #[error("Cash session not found: {0}")]
    NotFound(Uuid),

    /// The terminal already has an open session.
    #[error("Terminal {0} already has an open session")]
    TerminalBusy(Uuid),

    /// The cashier rules rejected the operation.
    #[error(transparent)]
    Cashier(#[from] CashierError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A session report: the stored row plus the computed balance breakdown.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// The session row.
    pub session: cash_register_sessions::Model,
    /// Movements recorded during the session.
    pub movements: Vec<cash_movements::Model>,
    /// Expected-balance components.
    pub breakdown: BalanceBreakdown,
    /// The balance the drawer should hold.
    pub expected_balance: Decimal,
    /// `closing - expected`, present once the session closed.
    pub difference: Option<Decimal>,
}

/// Repository for cash-register sessions.
#[derive(Debug, Clone)]
pub struct CashSessionRepository {
    db: DatabaseConnection,
}

impl CashSessionRepository {
    /// Creates a new cash session repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a session for a terminal.
    ///
    /// The one-open-session-per-terminal invariant is the partial unique
    /// index on the table; a violation surfaces as `TerminalBusy` instead
    /// of a race-prone check-then-act.
    ///
    /// # Errors
    ///
    /// Returns `TerminalBusy` or a validation error for negative opening
    /// balances.
    pub async fn open(
        &self,
        terminal_id: Uuid,
        operator_id: Uuid,
        opening_balance: Decimal,
    ) -> Result<cash_register_sessions::Model, CashSessionError> {
        CashierService::validate_opening_balance(opening_balance)?;

        let now = Utc::now();
        let session = cash_register_sessions::ActiveModel {
            id: Set(CashSessionId::new().into_inner()),
            terminal_id: Set(terminal_id),
            operator_id: Set(operator_id),
            opened_at: Set(now.into()),
            closed_at: Set(None),
            opening_balance: Set(opening_balance),
            closing_balance: Set(None),
            expected_balance: Set(None),
            difference: Set(None),
            status: Set(CashSessionStatus::Open),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        match session.insert(&self.db).await {
            Ok(model) => {
                info!(
                    session_id = %model.id,
                    terminal_id = %terminal_id,
                    opening_balance = %opening_balance,
                    "Opened cash session"
                );
                Ok(model)
            }
            Err(err) => {
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    Err(CashSessionError::TerminalBusy(terminal_id))
                } else {
                    Err(err.into())
                }
            }
        }
    }

    /// Records a sangria (cash withdrawal) on an open session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `SessionClosed`, or a validation error.
    pub async fn sangria(
        &self,
        session_id: Uuid,
        amount: Decimal,
        reason: String,
    ) -> Result<cash_movements::Model, CashSessionError> {
        self.add_movement(session_id, MovementDirection::Out, amount, reason)
            .await
    }

    /// Records a suprimento (cash supply) on an open session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `SessionClosed`, or a validation error.
    pub async fn suprimento(
        &self,
        session_id: Uuid,
        amount: Decimal,
        reason: Option<String>,
    ) -> Result<cash_movements::Model, CashSessionError> {
        self.add_movement(
            session_id,
            MovementDirection::In,
            amount,
            reason.unwrap_or_else(|| "suprimento".to_string()),
        )
        .await
    }

    /// Reports a session: its row, movements, and balance breakdown.
    ///
    /// For closed sessions the stored figures are authoritative; the
    /// breakdown is recomputed for display either way.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown IDs.
    pub async fn report(&self, session_id: Uuid) -> Result<SessionReport, CashSessionError> {
        let session = cash_register_sessions::Entity::find_by_id(session_id)
            .one(&self.db)
            .await?
            .ok_or(CashSessionError::NotFound(session_id))?;

        let movements = cash_movements::Entity::find()
            .filter(cash_movements::Column::SessionId.eq(session_id))
            .order_by_asc(cash_movements::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let cash_sales = sum_cash_sales(&self.db, session_id).await?;
        let breakdown = breakdown_for(&session, cash_sales, &movements);

        let expected_balance = session
            .expected_balance
            .unwrap_or_else(|| breakdown.expected_balance());

        Ok(SessionReport {
            difference: session.difference,
            session,
            movements,
            breakdown,
            expected_balance,
        })
    }

    /// Closes a session against the counted drawer balance.
    ///
    /// Computes `expected = opening + cash sales + suprimentos - sangrias`
    /// and `difference = closing - expected` inside the same transaction
    /// that seals the row. The difference is returned as data, never
    /// corrected away.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or `SessionClosed` when the session was already
    /// sealed (including by a concurrent close).
    pub async fn close(
        &self,
        session_id: Uuid,
        closing_balance: Decimal,
    ) -> Result<SessionReport, CashSessionError> {
        let txn = self.db.begin().await?;

        let session = cash_register_sessions::Entity::find_by_id(session_id)
            .one(&txn)
            .await?
            .ok_or(CashSessionError::NotFound(session_id))?;
        CashierService::validate_can_close(session.status.clone().into())?;

        let movements = cash_movements::Entity::find()
            .filter(cash_movements::Column::SessionId.eq(session_id))
            .all(&txn)
            .await?;
        let cash_sales = sum_cash_sales(&txn, session_id).await?;
        let breakdown = breakdown_for(&session, cash_sales, &movements);
        let expected = breakdown.expected_balance();
        let difference = breakdown.difference(closing_balance);

        let now = Utc::now().into();
        let updated = cash_register_sessions::Entity::update_many()
            .set(cash_register_sessions::ActiveModel {
                status: Set(CashSessionStatus::Closed),
                closed_at: Set(Some(now)),
                closing_balance: Set(Some(closing_balance)),
                expected_balance: Set(Some(expected)),
                difference: Set(Some(difference)),
                updated_at: Set(now),
                ..Default::default()
            })
            .filter(cash_register_sessions::Column::Id.eq(session_id))
            .filter(cash_register_sessions::Column::Status.eq(CashSessionStatus::Open))
            .exec(&txn)
            .await?;
        if updated.rows_affected == 0 {
            return Err(CashierError::SessionClosed.into());
        }

        txn.commit().await?;
        info!(
            session_id = %session_id,
            expected = %expected,
            %difference,
            "Closed cash session"
        );
        self.report(session_id).await
    }

    /// Inserts one movement after validating against the session state.
    async fn add_movement(
        &self,
        session_id: Uuid,
        direction: MovementDirection,
        amount: Decimal,
        reason: String,
    ) -> Result<cash_movements::Model, CashSessionError> {
        let txn = self.db.begin().await?;

        let session = cash_register_sessions::Entity::find_by_id(session_id)
            .one(&txn)
            .await?
            .ok_or(CashSessionError::NotFound(session_id))?;
        CashierService::validate_movement(session.status.clone().into(), amount)?;

        let movement = cash_movements::ActiveModel {
            id: Set(CashMovementId::new().into_inner()),
            session_id: Set(session_id),
            direction: Set(direction.clone()),
            amount: Set(amount),
            reason: Set(reason),
            created_at: Set(Utc::now().into()),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(
            session_id = %session_id,
            direction = ?direction,
            amount = %amount,
            "Recorded cash movement"
        );
        Ok(movement)
    }
}

/// Sums the cash-settled sale revenue attributed to a session.
async fn sum_cash_sales<C: sea_orm::ConnectionTrait>(
    conn: &C,
    session_id: Uuid,
) -> Result<Decimal, DbErr> {
    let rows = financial_transactions::Entity::find()
        .filter(financial_transactions::Column::CashSessionId.eq(session_id))
        .filter(financial_transactions::Column::Kind.eq(TransactionKind::Revenue))
        .all(conn)
        .await?;
    Ok(rows.iter().map(|t| t.amount).sum())
}

/// Builds the balance breakdown from a session row and its movements.
fn breakdown_for(
    session: &cash_register_sessions::Model,
    cash_sales: Decimal,
    movements: &[cash_movements::Model],
) -> BalanceBreakdown {
    let pairs: Vec<_> = movements
        .iter()
        .map(|m| (m.direction.clone().into(), m.amount))
        .collect();
    CashierService::breakdown(session.opening_balance, cash_sales, &pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn session_row(opening: Decimal) -> cash_register_sessions::Model {
        let now = Utc::now().into();
        cash_register_sessions::Model {
            id: Uuid::new_v4(),
            terminal_id: Uuid::new_v4(),
            operator_id: Uuid::new_v4(),
            opened_at: now,
            closed_at: None,
            opening_balance: opening,
            closing_balance: None,
            expected_balance: None,
            difference: None,
            status: CashSessionStatus::Open,
            created_at: now,
            updated_at: now,
        }
    }

    fn movement(direction: MovementDirection, amount: Decimal) -> cash_movements::Model {
        cash_movements::Model {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            direction,
            amount,
            reason: "test".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn test_breakdown_for_session_with_movements() {
        // Opening 1000, cash sales 100, suprimento 50, sangria 20 => 1130.
        let session = session_row(dec!(1000.00));
        let movements = vec![
            movement(MovementDirection::In, dec!(50.00)),
            movement(MovementDirection::Out, dec!(20.00)),
        ];
        let breakdown = breakdown_for(&session, dec!(100.00), &movements);
        assert_eq!(breakdown.expected_balance(), dec!(1130.00));
        assert_eq!(breakdown.difference(dec!(1130.00)), Decimal::ZERO);
        assert_eq!(breakdown.difference(dec!(1100.00)), dec!(-30.00));
    }
}
