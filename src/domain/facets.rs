//! Faceted filtering over the product catalog.
//!
//! Facet lists are derived from the post-filter result set, so selecting a
//! model narrows the size list to sizes still reachable (and the other way
//! round). Unmatched selections produce empty results, never errors.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::aggregates::product::Product;

/// A `None` or `"All"` category means no category restriction.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FacetSelection {
    pub category: Option<String>,
    pub size: Option<String>,
    pub model: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetResult {
    pub products: Vec<Product>,
    pub unique_sizes: Vec<String>,
    pub unique_models: Vec<String>,
}

pub fn resolve(products: &[Product], selection: &FacetSelection) -> FacetResult {
    let category = selection
        .category
        .as_deref()
        .filter(|c| !c.is_empty() && *c != "All");
    let size = selection.size.as_deref().filter(|s| !s.is_empty());
    let model = selection.model.as_deref().filter(|m| !m.is_empty());

    let filtered: Vec<Product> = products
        .iter()
        .filter(|p| category.is_none_or(|c| p.category == c))
        .filter(|p| size.is_none_or(|s| p.size == s))
        .filter(|p| model.is_none_or(|m| p.models.iter().any(|pm| pm == m)))
        .cloned()
        .collect();

    let unique_sizes = distinct(
        filtered
            .iter()
            .map(|p| p.size.as_str())
            .filter(|s| !s.is_empty()),
    );
    let unique_models = distinct(filtered.iter().flat_map(|p| p.models.iter().map(String::as_str)));

    FacetResult {
        products: filtered,
        unique_sizes,
        unique_models,
    }
}

/// First-seen order, duplicates dropped.
pub(crate) fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::product::{NewProduct, TYRE_CATEGORY};
    use crate::domain::value_objects::GstRate;

    fn tyre(title: &str, size: &str, models: &[&str]) -> Product {
        Product::create(NewProduct {
            title: title.into(),
            description: String::new(),
            images: vec![format!("https://cdn.example/{title}.webp")],
            cost: 4000,
            category: TYRE_CATEGORY.into(),
            discount: 0,
            gst_rate: GstRate::Gst18,
            size: size.into(),
            models: models.iter().map(|m| (*m).to_string()).collect(),
        })
        .unwrap()
    }

    fn lubricant(title: &str) -> Product {
        Product::create(NewProduct {
            title: title.into(),
            description: String::new(),
            images: vec![format!("https://cdn.example/{title}.webp")],
            cost: 600,
            category: "Lubricants".into(),
            discount: 0,
            gst_rate: GstRate::Gst18,
            size: String::new(),
            models: vec![],
        })
        .unwrap()
    }

    fn catalog() -> Vec<Product> {
        vec![
            tyre("a", "195/65R15", &["Swift", "Baleno"]),
            tyre("b", "185/70R14", &["Alto"]),
            lubricant("engine-oil"),
        ]
    }

    #[test]
    fn test_category_restricts_set() {
        let result = resolve(
            &catalog(),
            &FacetSelection {
                category: Some(TYRE_CATEGORY.into()),
                ..FacetSelection::default()
            },
        );
        assert_eq!(result.products.len(), 2);
        assert_eq!(result.unique_sizes, vec!["195/65R15", "185/70R14"]);
        assert_eq!(result.unique_models, vec!["Swift", "Baleno", "Alto"]);
    }

    #[test]
    fn test_all_category_means_no_restriction() {
        let result = resolve(
            &catalog(),
            &FacetSelection {
                category: Some("All".into()),
                ..FacetSelection::default()
            },
        );
        assert_eq!(result.products.len(), 3);
        // the lubricant's empty size is not a facet
        assert_eq!(result.unique_sizes.len(), 2);
    }

    #[test]
    fn test_size_then_model_narrows() {
        let result = resolve(
            &catalog(),
            &FacetSelection {
                category: Some(TYRE_CATEGORY.into()),
                size: Some("195/65R15".into()),
                ..FacetSelection::default()
            },
        );
        assert_eq!(result.products.len(), 1);
        assert_eq!(result.products[0].title, "a");
    }

    #[test]
    fn test_facets_come_from_post_filter_set() {
        let result = resolve(
            &catalog(),
            &FacetSelection {
                model: Some("Swift".into()),
                ..FacetSelection::default()
            },
        );
        // selecting a model narrows the reachable sizes
        assert_eq!(result.unique_sizes, vec!["195/65R15"]);
        assert_eq!(result.unique_models, vec!["Swift", "Baleno"]);
    }

    #[test]
    fn test_unmatched_selection_yields_empty_not_error() {
        let result = resolve(
            &catalog(),
            &FacetSelection {
                category: Some(TYRE_CATEGORY.into()),
                size: Some("195/65R15".into()),
                model: Some("Nano".into()),
                ..FacetSelection::default()
            },
        );
        assert!(result.products.is_empty());
        assert!(result.unique_sizes.is_empty());
        assert!(result.unique_models.is_empty());
    }
}
