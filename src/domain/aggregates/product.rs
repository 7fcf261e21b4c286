//! Product Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::pricing;
use crate::domain::value_objects::GstRate;

/// Category label that triggers the compatible-model requirement. Categories
/// are otherwise free text and created ad hoc by the admin.
pub const TYRE_CATEGORY: &str = "Tyres";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Ordered; the first entry is the canonical display image.
    #[serde(rename = "imageUrl")]
    pub images: Vec<String>,
    /// Listed price in whole rupees, GST-inclusive.
    pub cost: i64,
    pub category: String,
    pub discount: i64,
    pub gst_rate: GstRate,
    /// Tyre size code, empty for non-tyre categories.
    #[serde(default)]
    pub size: String,
    /// Compatible vehicle models.
    #[serde(rename = "model", default)]
    pub models: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Creation payload: the product fields minus id and timestamp.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub images: Vec<String>,
    pub cost: i64,
    pub category: String,
    #[serde(default)]
    pub discount: i64,
    pub gst_rate: GstRate,
    #[serde(default)]
    pub size: String,
    #[serde(rename = "model", default)]
    pub models: Vec<String>,
}

/// Partial update; absent fields keep their current values.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "imageUrl")]
    pub images: Option<Vec<String>>,
    pub cost: Option<i64>,
    pub category: Option<String>,
    pub discount: Option<i64>,
    pub gst_rate: Option<GstRate>,
    pub size: Option<String>,
    #[serde(rename = "model")]
    pub models: Option<Vec<String>>,
}

impl Product {
    pub fn create(input: NewProduct) -> Result<Self, ProductError> {
        let product = Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            images: input.images,
            cost: input.cost,
            category: input.category,
            discount: input.discount,
            gst_rate: input.gst_rate,
            size: input.size,
            models: input.models,
            created_at: Utc::now(),
        };
        product.validate()?;
        Ok(product)
    }

    /// Invariants checked on creation and again after every patch merge.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.images.is_empty() {
            return Err(ProductError::NoImages);
        }
        if self.cost < 1 {
            return Err(ProductError::CostTooLow);
        }
        if self.discount < 0 {
            return Err(ProductError::NegativeDiscount);
        }
        if self.discount > self.cost {
            return Err(ProductError::DiscountExceedsCost);
        }
        if self.category == TYRE_CATEGORY && self.models.is_empty() {
            return Err(ProductError::NoCompatibleModels);
        }
        Ok(())
    }

    /// Merges a partial update into a new record, keeping id and creation
    /// time, and re-validates the result. The original is untouched on error.
    pub fn apply(&self, patch: ProductPatch) -> Result<Product, ProductError> {
        let merged = Product {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            images: patch.images.unwrap_or_else(|| self.images.clone()),
            cost: patch.cost.unwrap_or(self.cost),
            category: patch.category.unwrap_or_else(|| self.category.clone()),
            discount: patch.discount.unwrap_or(self.discount),
            gst_rate: patch.gst_rate.unwrap_or(self.gst_rate),
            size: patch.size.unwrap_or_else(|| self.size.clone()),
            models: patch.models.unwrap_or_else(|| self.models.clone()),
            created_at: self.created_at,
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn main_image(&self) -> &str {
        self.images.first().map_or("", String::as_str)
    }

    pub fn discounted_price(&self) -> i64 {
        pricing::discounted_price(self.cost, self.discount)
    }

    pub fn discount_percentage(&self) -> u32 {
        pricing::discount_percentage(self.cost, self.discount)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("at least one image is required")]
    NoImages,
    #[error("cost must be at least ₹1")]
    CostTooLow,
    #[error("discount cannot be negative")]
    NegativeDiscount,
    #[error("discount cannot exceed cost")]
    DiscountExceedsCost,
    #[error("a tyre needs at least one compatible model")]
    NoCompatibleModels,
}
