//! Domain events
//!
//! Emitted to the structured log at the service boundary; this system has no
//! downstream consumers.

use crate::domain::aggregates::order::OrderStatus;

#[derive(Clone, Debug)]
pub enum DomainEvent {
    Product(ProductEvent),
    Order(OrderEvent),
    User(UserEvent),
}

#[derive(Clone, Debug)]
pub enum ProductEvent {
    Created { product_id: String },
    Updated { product_id: String },
    Deleted { product_id: String },
}

#[derive(Clone, Debug)]
pub enum OrderEvent {
    Placed {
        order_id: String,
        total: i64,
    },
    StatusChanged {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },
}

#[derive(Clone, Debug)]
pub enum UserEvent {
    Registered { user_id: String },
}

impl DomainEvent {
    pub fn emit(self) {
        tracing::info!(event = ?self, "domain event");
    }
}
