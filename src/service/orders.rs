//! Order workflows: checkout, order history, admin reads, status updates.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config::{AccessError, AdminList};
use crate::domain::aggregates::order::{
    CheckoutDetails, Order, OrderLine, OrderStatus, StatusPolicy, TransitionError,
};
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::pricing::{self, LineInput};
use crate::domain::value_objects::PaymentMethod;
use crate::store::{CatalogStore, OrderStore, StoreError, UserStore};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: u32,
}

/// Checkout payload. Everything here is validated before any store call, so
/// a rejected request leaves no partial state behind.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[validate(length(min = 1, message = "cart is empty"))]
    pub products: Vec<LineRequest>,
    /// Client-computed total. The server recomputes from the catalog; a
    /// disagreement is logged and the computed value wins.
    pub total_cost: Option<i64>,
    pub payment_method: PaymentMethod,
    pub reference_number: i64,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10, message = "address must be at least 10 characters"))]
    pub address: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    #[validate(custom = "validate_pincode")]
    pub pincode: String,
    #[validate(length(min = 1, message = "contact number is required"))]
    pub contact_number: String,
    pub vehicle_number: Option<String>,
    /// Optional client token; a replayed submission with the same token
    /// returns the original order instead of creating a duplicate.
    pub idempotency_key: Option<String>,
}

fn validate_pincode(pincode: &str) -> Result<(), ValidationError> {
    if pincode.len() == 6 && pincode.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("pincode must be exactly 6 digits"))
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("invalid order request: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("no account for {0}")]
    UnknownUser(String),
    #[error("unknown product {0}")]
    UnknownProduct(String),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("order not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct OrderService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
    users: Arc<dyn UserStore>,
    admins: AdminList,
    policy: StatusPolicy,
}

impl OrderService {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        users: Arc<dyn UserStore>,
        admins: AdminList,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            catalog,
            orders,
            users,
            admins,
            policy,
        }
    }

    /// Runs the checkout pipeline and returns the new order's id.
    ///
    /// Validation, identity resolution and catalog joins all complete before
    /// the single insert, so the order is either fully persisted or not at
    /// all. Line prices and the total are frozen from the catalog as it is
    /// at this instant.
    pub async fn place_order(&self, req: CheckoutRequest) -> Result<String, OrderError> {
        req.validate()?;
        let user = self
            .users
            .by_email(&req.email)
            .await?
            .ok_or_else(|| OrderError::UnknownUser(req.email.clone()))?;

        let mut lines = Vec::with_capacity(req.products.len());
        let mut inputs = Vec::with_capacity(req.products.len());
        for line in &req.products {
            let product = self
                .catalog
                .get(&line.product_id)
                .await?
                .ok_or_else(|| OrderError::UnknownProduct(line.product_id.clone()))?;
            inputs.push(LineInput {
                cost: product.cost,
                discount: product.discount,
                gst_rate: product.gst_rate,
                quantity: line.quantity,
            });
            let unit_price = product.discounted_price();
            lines.push(OrderLine {
                product_id: product.id,
                quantity: line.quantity,
                unit_price,
            });
        }

        let total = pricing::final_total(&inputs);
        if let Some(claimed) = req.total_cost {
            if claimed != total {
                tracing::warn!(claimed, computed = total, "client total disagrees with pricing engine");
            }
        }

        let order = Order::place(
            user.id,
            lines,
            total,
            CheckoutDetails {
                payment_method: req.payment_method,
                reference_number: req.reference_number,
                name: req.name,
                email: req.email,
                contact_number: req.contact_number,
                address: req.address,
                state: req.state,
                pincode: req.pincode,
                vehicle_number: req.vehicle_number,
            },
        );
        let order_id = self
            .orders
            .insert(order, req.idempotency_key.as_deref())
            .await?;
        DomainEvent::Order(OrderEvent::Placed {
            order_id: order_id.clone(),
            total,
        })
        .emit();
        Ok(order_id)
    }

    pub async fn get(&self, id: &str) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::NotFound)
    }

    /// The storefront order-history query.
    pub async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.by_email(email).await?)
    }

    /// Full-collection read, allow-list gated.
    pub async fn all_orders(&self, caller: &str) -> Result<Vec<Order>, OrderError> {
        self.admins.authorize(caller)?;
        Ok(self.orders.all().await?)
    }

    pub async fn update_status(
        &self,
        caller: &str,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), OrderError> {
        self.admins.authorize(caller)?;
        let order = self.orders.get(order_id).await?.ok_or(OrderError::NotFound)?;
        self.policy.check(order.status, status)?;
        self.orders.set_status(order_id, status).await?;
        if order.status != status {
            DomainEvent::Order(OrderEvent::StatusChanged {
                order_id: order_id.to_owned(),
                from: order.status,
                to: status,
            })
            .emit();
        }
        Ok(())
    }
}
