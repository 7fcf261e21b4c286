//! Ports onto the external document store and image object storage.
//!
//! The document store exposes get-by-id, full scans, single-field equality
//! filters, inserts, partial patches, and deletes; every trait method below
//! maps onto exactly one of those primitives. Each call is an await point
//! that can fail; callers surface the failure instead of retrying.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::order::{Order, OrderStatus};
use crate::domain::aggregates::product::Product;
use crate::domain::aggregates::user::User;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError>;
    async fn all(&self) -> Result<Vec<Product>, StoreError>;
    async fn insert(&self, product: Product) -> Result<String, StoreError>;
    /// Writes a merged record over the document at its id. The caller builds
    /// the merge; the store only needs the patch primitive.
    async fn patch(&self, product: Product) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts the order and returns its id. With an idempotency key the
    /// contract is insert-if-absent: a replay returns the id stored for that
    /// key and writes nothing.
    async fn insert(&self, order: Order, idempotency_key: Option<&str>)
        -> Result<String, StoreError>;
    async fn get(&self, id: &str) -> Result<Option<Order>, StoreError>;
    /// Single-field equality filter, newest first.
    async fn by_email(&self, email: &str) -> Result<Vec<Order>, StoreError>;
    /// Full scan, newest first.
    async fn all(&self) -> Result<Vec<Order>, StoreError>;
    async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<User>, StoreError>;
    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn all(&self) -> Result<Vec<User>, StoreError>;
    async fn insert(&self, user: User) -> Result<String, StoreError>;
    async fn set_phone(&self, id: &str, phone: String) -> Result<(), StoreError>;
    async fn set_vehicle_number(&self, id: &str, vehicle_number: String)
        -> Result<(), StoreError>;
}

/// Object storage backing product images. Deletes are advisory cleanup:
/// callers log a failure and move on, they never fail the surrounding
/// operation over it.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Storage key derived from an image URL: its last path segment.
pub fn object_key(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_is_last_path_segment() {
        assert_eq!(
            object_key("https://cdn.example/f/abc123.webp"),
            Some("abc123.webp")
        );
        assert_eq!(object_key("https://cdn.example/f/"), None);
        assert_eq!(object_key(""), None);
    }
}
