//! Database seeder for Fluxo development and testing.
//!
//! Seeds a development bank account and the default payment method
//! configuration table (fees, liquidation windows, receivable modes).
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use fluxo_db::entities::{
    bank_accounts, payment_method_configs,
    sea_orm_active_enums::{PaymentMethod, ReceivableMode},
};

/// Development bank account ID (consistent for all seeds)
const DEV_BANK_ACCOUNT_ID: &str = "00000000-0000-0000-0000-000000000001";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = fluxo_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding bank account...");
    seed_bank_account(&db).await;

    println!("Seeding payment method configs...");
    seed_payment_configs(&db).await;

    println!("Seeding complete!");
}

fn dev_bank_account_id() -> Uuid {
    Uuid::parse_str(DEV_BANK_ACCOUNT_ID).unwrap()
}

async fn seed_bank_account(db: &DatabaseConnection) {
    let existing = bank_accounts::Entity::find_by_id(dev_bank_account_id())
        .one(db)
        .await
        .expect("Failed to query bank accounts");
    if existing.is_some() {
        println!("  bank account already seeded, skipping");
        return;
    }

    let now = Utc::now().into();
    bank_accounts::ActiveModel {
        id: Set(dev_bank_account_id()),
        name: Set("Conta PJ (dev)".to_string()),
        current_balance: Set(Decimal::ZERO),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed bank account");
}

struct ConfigSeed {
    method: PaymentMethod,
    provider: Option<&'static str>,
    min_installments: i32,
    max_installments: i32,
    fee_percent: Decimal,
    days_to_liquidate: i32,
    receivable_mode: ReceivableMode,
    bank_linked: bool,
}

async fn seed_payment_configs(db: &DatabaseConnection) {
    let existing = payment_method_configs::Entity::find()
        .one(db)
        .await
        .expect("Failed to query payment configs");
    if existing.is_some() {
        println!("  payment configs already seeded, skipping");
        return;
    }

    let seeds = [
        // Cash settles instantly in the drawer, never through the bank.
        ConfigSeed {
            method: PaymentMethod::Cash,
            provider: None,
            min_installments: 1,
            max_installments: 1,
            fee_percent: Decimal::ZERO,
            days_to_liquidate: 0,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: false,
        },
        ConfigSeed {
            method: PaymentMethod::DebitCard,
            provider: Some("Stone"),
            min_installments: 1,
            max_installments: 1,
            fee_percent: Decimal::new(199, 2), // 1.99%
            days_to_liquidate: 0,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: true,
        },
        ConfigSeed {
            method: PaymentMethod::Pix,
            provider: None,
            min_installments: 1,
            max_installments: 1,
            fee_percent: Decimal::new(99, 2), // 0.99%
            days_to_liquidate: 1,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: true,
        },
        ConfigSeed {
            method: PaymentMethod::CreditCard,
            provider: Some("Stone"),
            min_installments: 1,
            max_installments: 1,
            fee_percent: Decimal::new(350, 2), // 3.50%
            days_to_liquidate: 30,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: true,
        },
        ConfigSeed {
            method: PaymentMethod::CreditCard,
            provider: Some("Stone"),
            min_installments: 2,
            max_installments: 6,
            fee_percent: Decimal::new(450, 2), // 4.50%
            days_to_liquidate: 30,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: true,
        },
        ConfigSeed {
            method: PaymentMethod::CreditCard,
            provider: Some("Stone"),
            min_installments: 7,
            max_installments: 12,
            fee_percent: Decimal::new(550, 2), // 5.50%
            days_to_liquidate: 30,
            receivable_mode: ReceivableMode::Immediate,
            bank_linked: true,
        },
        // Boleto requires an explicit receive once the bank confirms it.
        ConfigSeed {
            method: PaymentMethod::BankSlip,
            provider: None,
            min_installments: 1,
            max_installments: 1,
            fee_percent: Decimal::new(150, 2), // 1.50%
            days_to_liquidate: 2,
            receivable_mode: ReceivableMode::Deferred,
            bank_linked: true,
        },
    ];

    let now = Utc::now();
    for seed in seeds {
        payment_method_configs::ActiveModel {
            id: Set(Uuid::now_v7()),
            method: Set(seed.method.clone()),
            provider: Set(seed.provider.map(String::from)),
            min_installments: Set(seed.min_installments),
            max_installments: Set(seed.max_installments),
            fee_percent: Set(seed.fee_percent),
            days_to_liquidate: Set(seed.days_to_liquidate),
            receivable_mode: Set(seed.receivable_mode.clone()),
            bank_account_id: Set(seed.bank_linked.then(dev_bank_account_id)),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .expect("Failed to seed payment config");
        println!("  seeded {:?} config", seed.method);
    }
}
