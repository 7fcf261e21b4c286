//! Catalog administration and faceted browsing.

use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::aggregates::product::{NewProduct, Product, ProductError, ProductPatch};
use crate::domain::events::{DomainEvent, ProductEvent};
use crate::domain::facets::{self, FacetResult, FacetSelection};
use crate::store::{object_key, CatalogStore, ObjectStore, StoreError};

/// The storefront grid payload: every product plus the distinct category
/// labels derived from them.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogListing {
    pub products: Vec<Product>,
    pub all_categories: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Invalid(#[from] ProductError),
    #[error("product not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct ProductService {
    catalog: Arc<dyn CatalogStore>,
    objects: Arc<dyn ObjectStore>,
}

impl ProductService {
    pub fn new(catalog: Arc<dyn CatalogStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { catalog, objects }
    }

    pub async fn create(&self, input: NewProduct) -> Result<String, CatalogError> {
        let product = Product::create(input)?;
        let id = self.catalog.insert(product).await?;
        DomainEvent::Product(ProductEvent::Created {
            product_id: id.clone(),
        })
        .emit();
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> Result<Product, CatalogError> {
        self.catalog.get(id).await?.ok_or(CatalogError::NotFound)
    }

    pub async fn list(&self) -> Result<CatalogListing, CatalogError> {
        let products = self.catalog.all().await?;
        let all_categories = facets::distinct(
            products
                .iter()
                .map(|p| p.category.as_str())
                .filter(|c| !c.is_empty()),
        );
        Ok(CatalogListing {
            products,
            all_categories,
        })
    }

    /// Partial update: absent fields keep their stored values, and the merged
    /// record is validated before anything is written.
    pub async fn update(&self, id: &str, patch: ProductPatch) -> Result<(), CatalogError> {
        let existing = self.catalog.get(id).await?.ok_or(CatalogError::NotFound)?;
        let merged = existing.apply(patch)?;
        self.catalog.patch(merged).await?;
        DomainEvent::Product(ProductEvent::Updated {
            product_id: id.to_owned(),
        })
        .emit();
        Ok(())
    }

    /// Deletes the document, then cleans up the backing images best-effort:
    /// a failed object-store delete is logged, not fatal.
    pub async fn delete(&self, id: &str) -> Result<(), CatalogError> {
        let product = self.catalog.get(id).await?.ok_or(CatalogError::NotFound)?;
        self.catalog.delete(id).await?;
        for url in &product.images {
            let Some(key) = object_key(url) else { continue };
            if let Err(err) = self.objects.delete(key).await {
                tracing::warn!(%key, %err, "image cleanup failed");
            }
        }
        DomainEvent::Product(ProductEvent::Deleted {
            product_id: id.to_owned(),
        })
        .emit();
        Ok(())
    }

    pub async fn facets(&self, selection: &FacetSelection) -> Result<FacetResult, CatalogError> {
        let products = self.catalog.all().await?;
        Ok(facets::resolve(&products, selection))
    }
}
