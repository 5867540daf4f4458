//! `SeaORM` entity definitions.

pub mod bank_accounts;
pub mod bank_transactions;
pub mod cash_movements;
pub mod cash_register_sessions;
pub mod financial_transactions;
pub mod payables;
pub mod payment_method_configs;
pub mod receivables;
pub mod sales;
pub mod sea_orm_active_enums;
