//! Order Aggregate
//!
//! An order is a priced, immutable snapshot of a cart plus delivery and
//! payment metadata. Once persisted only its status moves, and only through
//! [`StatusPolicy`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::PaymentMethod;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
    Delivering,
    Delivered,
}

impl OrderStatus {
    /// Forward steps of the fulfilment flow. A same-state update is always
    /// legal so repeated patches stay idempotent.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        self == next
            || matches!(
                (self, next),
                (Pending, Accepted)
                    | (Pending, Rejected)
                    | (Accepted, Delivering)
                    | (Delivering, Delivered)
            )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Delivering => "DELIVERING",
            Self::Delivered => "DELIVERED",
        };
        f.write_str(s)
    }
}

/// Whether status updates are checked against the transition table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Any authorized overwrite is accepted, including backwards moves.
    #[default]
    Compat,
    /// Illegal transitions are rejected.
    Strict,
}

impl StatusPolicy {
    pub fn check(self, from: OrderStatus, to: OrderStatus) -> Result<(), TransitionError> {
        match self {
            Self::Compat => Ok(()),
            Self::Strict if from.can_transition_to(to) => Ok(()),
            Self::Strict => Err(TransitionError { from, to }),
        }
    }
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("illegal status transition {from} -> {to}")]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// A line frozen into an order: which product, how many, and the discounted
/// unit price at the moment of submission. Later catalog edits do not
/// reprice history.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: i64,
}

impl OrderLine {
    pub fn line_total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// Delivery and payment metadata captured at checkout.
#[derive(Clone, Debug)]
pub struct CheckoutDetails {
    pub payment_method: PaymentMethod,
    pub reference_number: i64,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub state: String,
    pub pincode: String,
    pub vehicle_number: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    #[serde(rename = "products")]
    pub lines: Vec<OrderLine>,
    /// Frozen at submission from the pricing engine.
    pub total_cost: i64,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub reference_number: i64,
    pub name: String,
    pub email: String,
    pub contact_number: String,
    pub address: String,
    pub state: String,
    pub pincode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// A freshly placed order always starts out `PENDING`.
    pub fn place(
        user_id: impl Into<String>,
        lines: Vec<OrderLine>,
        total_cost: i64,
        details: CheckoutDetails,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lines,
            total_cost,
            status: OrderStatus::Pending,
            payment_method: details.payment_method,
            reference_number: details.reference_number,
            name: details.name,
            email: details.email,
            contact_number: details.contact_number,
            address: details.address,
            state: details.state,
            pincode: details.pincode,
            vehicle_number: details.vehicle_number,
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> CheckoutDetails {
        CheckoutDetails {
            payment_method: PaymentMethod::Upi,
            reference_number: 423_117_889,
            name: "R. Sharma".into(),
            email: "r.sharma@example.com".into(),
            contact_number: "9876543210".into(),
            address: "14 MG Road, Pune".into(),
            state: "Maharashtra".into(),
            pincode: "411001".into(),
            vehicle_number: None,
        }
    }

    #[test]
    fn test_placed_order_starts_pending() {
        let order = Order::place(
            "u1",
            vec![OrderLine {
                product_id: "p1".into(),
                quantity: 2,
                unit_price: 900,
            }],
            1800,
            details(),
        );
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines[0].line_total(), 1800);
    }

    #[test]
    fn test_strict_policy_follows_the_table() {
        use OrderStatus::*;
        let strict = StatusPolicy::Strict;
        assert!(strict.check(Pending, Accepted).is_ok());
        assert!(strict.check(Pending, Rejected).is_ok());
        assert!(strict.check(Accepted, Delivering).is_ok());
        assert!(strict.check(Delivering, Delivered).is_ok());
        assert_eq!(
            strict.check(Delivered, Pending).unwrap_err(),
            TransitionError {
                from: Delivered,
                to: Pending
            }
        );
        assert!(strict.check(Rejected, Delivering).is_err());
    }

    #[test]
    fn test_same_state_is_always_legal() {
        use OrderStatus::*;
        for status in [Pending, Accepted, Rejected, Delivering, Delivered] {
            assert!(StatusPolicy::Strict.check(status, status).is_ok());
        }
    }

    #[test]
    fn test_compat_policy_allows_anything() {
        use OrderStatus::*;
        assert!(StatusPolicy::Compat.check(Delivered, Pending).is_ok());
        assert!(StatusPolicy::Compat.check(Rejected, Delivered).is_ok());
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Delivering).unwrap(),
            "\"DELIVERING\""
        );
        let status: OrderStatus = serde_json::from_str("\"ACCEPTED\"").unwrap();
        assert_eq!(status, OrderStatus::Accepted);
    }
}
