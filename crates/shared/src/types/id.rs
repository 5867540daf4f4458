//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `SaleId` where a
//! `ReceivableId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(SaleId, "Unique identifier for a sale.");
typed_id!(ReceivableId, "Unique identifier for an accounts-receivable line.");
typed_id!(PayableId, "Unique identifier for an accounts-payable line.");
typed_id!(PaymentConfigId, "Unique identifier for a payment method configuration.");
typed_id!(CashSessionId, "Unique identifier for a cash-register session.");
typed_id!(CashMovementId, "Unique identifier for a cash movement.");
typed_id!(BankAccountId, "Unique identifier for a bank account.");
typed_id!(BankTransactionId, "Unique identifier for an imported bank transaction.");
typed_id!(TransactionId, "Unique identifier for a realized financial transaction.");
typed_id!(TerminalId, "Unique identifier for a point-of-sale terminal.");
typed_id!(OperatorId, "Unique identifier for a cash-register operator.");
typed_id!(CustomerId, "Unique identifier for a customer.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_new_ids_are_unique() {
        let a = ReceivableId::new();
        let b = ReceivableId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_roundtrip_through_uuid() {
        let id = SaleId::new();
        let uuid = id.into_inner();
        assert_eq!(SaleId::from_uuid(uuid), id);
    }

    #[test]
    fn test_display_and_parse() {
        let id = BankAccountId::new();
        let parsed = BankAccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PayableId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let a = TransactionId::new();
        let b = TransactionId::new();
        // UUID v7 embeds a millisecond timestamp in the high bits.
        assert!(a.into_inner().as_u128() <= b.into_inner().as_u128());
    }
}
