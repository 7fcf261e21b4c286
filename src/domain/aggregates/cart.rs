//! Cart Aggregate
//!
//! Client-held and session-scoped; nothing here is persisted server-side.
//! Totals are derived on demand through the pricing engine, never stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::product::Product;
use crate::domain::pricing::{self, CartTotals, LineInput};
use crate::domain::value_objects::GstRate;

/// Product snapshot captured when a line is added. Display fields are frozen
/// at add-time so the cart renders without further catalog lookups.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: String,
    pub title: String,
    pub cost: i64,
    pub discount: i64,
    pub gst_rate: GstRate,
    pub image: String,
    pub category: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.title.clone(),
            cost: product.cost,
            discount: product.discount,
            gst_rate: product.gst_rate,
            image: product.main_image().to_owned(),
            category: product.category.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> i64 {
        pricing::line_total(&self.pricing_input())
    }

    fn pricing_input(&self) -> LineInput {
        LineInput {
            cost: self.cost,
            discount: self.discount,
            gst_rate: self.gst_rate,
            quantity: self.quantity,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds a product; an existing line for the same product has its quantity
    /// incremented instead of a duplicate line appearing.
    pub fn add(&mut self, product: &Product, quantity: u32) {
        if let Some(existing) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            existing.quantity += quantity.max(1);
        } else {
            self.lines.push(CartLine::from_product(product, quantity.max(1)));
        }
    }

    /// Zero or negative quantity is a delete signal.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i32) -> Result<(), CartError> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(CartError::LineNotFound)?;
        if quantity <= 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity as u32;
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() == before {
            return Err(CartError::LineNotFound);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn totals(&self) -> CartTotals {
        let inputs: Vec<LineInput> = self.lines.iter().map(CartLine::pricing_input).collect();
        pricing::totals(&inputs)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("cart line not found")]
    LineNotFound,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::NewProduct;

    fn product(id_hint: &str, cost: i64, discount: i64, gst_rate: GstRate) -> Product {
        Product::create(NewProduct {
            title: id_hint.into(),
            description: String::new(),
            images: vec![format!("https://cdn.example/{id_hint}.webp")],
            cost,
            category: "Lubricants".into(),
            discount,
            gst_rate,
            size: String::new(),
            models: vec![],
        })
        .unwrap()
    }

    #[test]
    fn test_add_merges_same_product() {
        let p = product("oil", 500, 0, GstRate::Gst18);
        let mut cart = Cart::new();
        cart.add(&p, 1);
        cart.add(&p, 1);
        assert_eq!(cart.len(), 1); // merged
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let p = product("oil", 500, 0, GstRate::Gst18);
        let mut cart = Cart::new();
        cart.add(&p, 3);
        cart.update_quantity(&p.id, 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes_line() {
        let p = product("oil", 500, 0, GstRate::Gst18);
        let mut cart = Cart::new();
        cart.add(&p, 3);
        cart.update_quantity(&p.id, -2).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_missing_line_errors() {
        let mut cart = Cart::new();
        assert_eq!(
            cart.update_quantity("nope", 1).unwrap_err(),
            CartError::LineNotFound
        );
    }

    #[test]
    fn test_totals_derive_from_current_lines() {
        let a = product("a", 1180, 0, GstRate::Gst18);
        let b = product("b", 1000, 100, GstRate::Gst5);
        let mut cart = Cart::new();
        cart.add(&a, 1);
        cart.add(&b, 2);
        assert_eq!(cart.totals().total, 2980);
        cart.remove(&b.id).unwrap();
        assert_eq!(cart.totals().total, 1180);
    }
}
