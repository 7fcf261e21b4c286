//! In-memory document store.
//!
//! Backs the binary when no external store is wired, and every test. Write
//! semantics match the collaborator contract: single-document operations,
//! last write wins, no optimistic concurrency token.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::aggregates::order::{Order, OrderStatus};
use crate::domain::aggregates::product::Product;
use crate::domain::aggregates::user::User;
use crate::store::{CatalogStore, ObjectStore, OrderStore, StoreError, UserStore};

#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<HashMap<String, Product>>,
    orders: RwLock<HashMap<String, Order>>,
    users: RwLock<HashMap<String, User>>,
    // idempotency key -> order id
    order_keys: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        let mut products: Vec<Product> = self.products.read().await.values().cloned().collect();
        products.sort_by_key(|p| p.created_at);
        Ok(products)
    }

    async fn insert(&self, product: Product) -> Result<String, StoreError> {
        let id = product.id.clone();
        self.products.write().await.insert(id.clone(), product);
        Ok(id)
    }

    async fn patch(&self, product: Product) -> Result<(), StoreError> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(StoreError::NotFound);
        }
        products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.products
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert(
        &self,
        order: Order,
        idempotency_key: Option<&str>,
    ) -> Result<String, StoreError> {
        if let Some(key) = idempotency_key {
            let mut keys = self.order_keys.write().await;
            if let Some(existing) = keys.get(key) {
                return Ok(existing.clone());
            }
            keys.insert(key.to_owned(), order.id.clone());
        }
        let id = order.id.clone();
        self.orders.write().await.insert(id.clone(), order);
        Ok(id)
    }

    async fn get(&self, id: &str) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| o.email == email)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn all(&self) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self.orders.read().await.values().cloned().collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn set_status(&self, id: &str, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders.get_mut(id).ok_or(StoreError::NotFound)?;
        order.status = status;
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn insert(&self, user: User) -> Result<String, StoreError> {
        let id = user.id.clone();
        self.users.write().await.insert(id.clone(), user);
        Ok(id)
    }

    async fn set_phone(&self, id: &str, phone: String) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.phone = Some(phone);
        Ok(())
    }

    async fn set_vehicle_number(&self, id: &str, vehicle_number: String) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(id).ok_or(StoreError::NotFound)?;
        user.vehicle_number = Some(vehicle_number);
        Ok(())
    }
}

/// In-memory stand-in for the image object store; remembers deleted keys so
/// tests can assert on the cleanup.
#[derive(Default)]
pub struct MemoryObjectStore {
    deleted: RwLock<Vec<String>>,
}

impl MemoryObjectStore {
    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.deleted.write().await.push(key.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::order::{CheckoutDetails, OrderLine};
    use crate::domain::aggregates::product::NewProduct;
    use crate::domain::value_objects::{GstRate, PaymentMethod};

    fn order_for(email: &str) -> Order {
        Order::place(
            "u1",
            vec![OrderLine {
                product_id: "p1".into(),
                quantity: 1,
                unit_price: 500,
            }],
            500,
            CheckoutDetails {
                payment_method: PaymentMethod::Upi,
                reference_number: 1,
                name: "X".into(),
                email: email.into(),
                contact_number: "9876543210".into(),
                address: "14 MG Road, Pune".into(),
                state: "Maharashtra".into(),
                pincode: "411001".into(),
                vehicle_number: None,
            },
        )
    }

    #[tokio::test]
    async fn test_product_roundtrip_preserves_image_order() {
        let store = MemoryStore::new();
        let product = Product::create(NewProduct {
            title: "Tyre".into(),
            description: String::new(),
            images: vec!["u/a.webp".into(), "u/b.webp".into(), "u/c.webp".into()],
            cost: 4000,
            category: "Tyres".into(),
            discount: 0,
            gst_rate: GstRate::Gst18,
            size: "195/65R15".into(),
            models: vec!["Swift".into()],
        })
        .unwrap();
        let id = CatalogStore::insert(&store, product).await.unwrap();
        let read = CatalogStore::get(&store, &id).await.unwrap().unwrap();
        assert_eq!(read.images, vec!["u/a.webp", "u/b.webp", "u/c.webp"]);
        assert_eq!(read.main_image(), "u/a.webp");
    }

    #[tokio::test]
    async fn test_patch_missing_product_is_not_found() {
        let store = MemoryStore::new();
        let product = Product::create(NewProduct {
            title: "Tyre".into(),
            description: String::new(),
            images: vec!["u/a.webp".into()],
            cost: 4000,
            category: "Lubricants".into(),
            discount: 0,
            gst_rate: GstRate::Gst18,
            size: String::new(),
            models: vec![],
        })
        .unwrap();
        assert!(matches!(
            CatalogStore::patch(&store, product).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_order_email_filter_and_ordering() {
        let store = MemoryStore::new();
        OrderStore::insert(&store, order_for("a@example.com"), None)
            .await
            .unwrap();
        OrderStore::insert(&store, order_for("b@example.com"), None)
            .await
            .unwrap();
        OrderStore::insert(&store, order_for("a@example.com"), None)
            .await
            .unwrap();
        let mine = OrderStore::by_email(&store, "a@example.com").await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine[0].created_at >= mine[1].created_at); // newest first
        assert_eq!(OrderStore::all(&store).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_idempotency_key_dedupes_insert() {
        let store = MemoryStore::new();
        let first = OrderStore::insert(&store, order_for("a@example.com"), Some("ck-1"))
            .await
            .unwrap();
        let replay = OrderStore::insert(&store, order_for("a@example.com"), Some("ck-1"))
            .await
            .unwrap();
        assert_eq!(first, replay);
        assert_eq!(OrderStore::all(&store).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_status_missing_order() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.set_status("nope", OrderStatus::Accepted).await,
            Err(StoreError::NotFound)
        ));
    }
}
