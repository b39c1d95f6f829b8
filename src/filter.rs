//! Catalog filtering by category and free-text query.
//!
//! Linear scan, catalog order preserved. A query matches when it is a
//! case-insensitive substring of any of name, brand, category or description.

use crate::catalog::{Catalog, Product};

/// Transient filter state derived from the category selector and search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    category: String,
    query: String,
}

impl FilterCriteria {
    /// Build criteria from raw control values. The query is trimmed and
    /// lowercased; the category is compared exactly.
    #[must_use]
    pub fn new(category: impl Into<String>, query: &str) -> Self {
        Self { category: category.into(), query: query.trim().to_lowercase() }
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// The normalized (trimmed, lowercased) query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Neither a category nor a query is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.category.is_empty() && self.query.is_empty()
    }

    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category_matches(product) && self.query_matches(product)
    }

    fn category_matches(&self, product: &Product) -> bool {
        self.category.is_empty() || product.category == self.category
    }

    fn query_matches(&self, product: &Product) -> bool {
        if self.query.is_empty() {
            return true;
        }
        [&product.name, &product.brand, &product.category, &product.description]
            .iter()
            .any(|field| field.to_lowercase().contains(&self.query))
    }
}

/// Result of filtering: either a product list or a request to show the
/// "select a category or search" placeholder.
#[derive(Debug, PartialEq, Eq)]
pub enum FilterOutcome<'a> {
    Placeholder,
    Products(Vec<&'a Product>),
}

/// Apply `criteria` to `catalog`.
///
/// Empty criteria yield [`FilterOutcome::Placeholder`], never an empty list.
#[must_use]
pub fn filter_products<'a>(catalog: &'a Catalog, criteria: &FilterCriteria) -> FilterOutcome<'a> {
    if criteria.is_empty() {
        return FilterOutcome::Placeholder;
    }
    FilterOutcome::Products(
        catalog
            .products()
            .iter()
            .filter(|p| criteria.matches(p))
            .collect(),
    )
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
