//! Catalog price/category filter.
//!
//! Parsed from the listing page query string, where `category` may repeat:
//!
//! ```text
//! /products?q=headphones&min=10&max=200&category=Books&category=Beauty
//! ```

use rust_decimal::Decimal;

use crate::types::{Price, Product};

/// Default upper bound of the price range.
const DEFAULT_MAX: i64 = 1000;

/// Filter applied to the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub min: Price,
    pub max: Price,
    /// Selected categories; empty means every category.
    pub categories: Vec<String>,
    /// Navbar search text matched against title, store and description.
    pub search: Option<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            min: Price::ZERO,
            max: Price::new(Decimal::from(DEFAULT_MAX)),
            categories: Vec::new(),
            search: None,
        }
    }
}

impl ProductFilter {
    /// Build a filter from a raw query string.
    ///
    /// Unparseable prices keep their defaults; blank and repeated categories
    /// are ignored.
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let mut filter = Self::default();

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "min" => {
                    if let Ok(min) = value.parse() {
                        filter.min = min;
                    }
                }
                "max" => {
                    if let Ok(max) = value.parse() {
                        filter.max = max;
                    }
                }
                "q" => {
                    let search = value.trim();
                    if !search.is_empty() {
                        filter.search = Some(search.to_owned());
                    }
                }
                "category" => {
                    let category = value.trim();
                    if !category.is_empty() && !filter.is_selected(category) {
                        filter.categories.push(category.to_owned());
                    }
                }
                _ => {}
            }
        }

        filter
    }

    /// Whether `category` is currently selected.
    #[must_use]
    pub fn is_selected(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Select `category` if unselected, otherwise unselect it.
    pub fn toggle_category(&mut self, category: &str) {
        if self.is_selected(category) {
            self.categories.retain(|c| c != category);
        } else {
            self.categories.push(category.to_owned());
        }
    }

    /// Whether the filter differs from the defaults.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Whether `product` passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let in_range = self.min <= product.sale_price && product.sale_price <= self.max;
        let in_category = self.categories.is_empty()
            || product
                .category
                .as_deref()
                .is_some_and(|c| self.is_selected(c));
        in_range && in_category && self.matches_search(product)
    }

    /// Case-insensitive substring match on title, store and description.
    fn matches_search(&self, product: &Product) -> bool {
        let Some(search) = &self.search else {
            return true;
        };
        let needle = search.to_lowercase();
        [
            Some(product.title.as_str()),
            product.store.as_deref(),
            Some(product.description.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Keep only the products that pass the filter, preserving order.
    #[must_use]
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}
