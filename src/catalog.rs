//! Product catalog records and the cached loader.
//!
//! DESIGN
//! ======
//! The catalog is a static JSON document (`{ "products": [...] }`) fetched
//! once per session from either an HTTP(S) URL or a local file. The loader
//! caches the parsed [`Catalog`] behind an `Arc` so filtering and selection
//! share one immutable copy.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::is_http_url;
use crate::error::ErrorCode;

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The HTTP request for the catalog could not be completed.
    #[error("catalog fetch failed: {0}")]
    Fetch(String),

    /// The catalog server answered with a non-success status.
    #[error("catalog fetch returned status {0}")]
    Status(u16),

    /// The local catalog file could not be read.
    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog document was not `{ "products": [...] }`.
    #[error("catalog parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "E_CATALOG_FETCH",
            Self::Status(_) => "E_CATALOG_STATUS",
            Self::Io(_) => "E_CATALOG_IO",
            Self::Parse(_) => "E_CATALOG_PARSE",
        }
    }
}

// =============================================================================
// PRODUCT
// =============================================================================

/// Catalog-unique product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// One catalog record. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
}

// =============================================================================
// CATALOG
// =============================================================================

#[derive(Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// The ordered product list for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the first record for any repeated id.
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(products.len());
        for product in products {
            if seen.insert(product.id) {
                kept.push(product);
            } else {
                tracing::warn!(id = %product.id, "duplicate product id in catalog; keeping first");
            }
        }
        Self { products: kept }
    }

    /// Parse a `{ "products": [...] }` document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] when the text is not that shape.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(text).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Ok(Self::new(doc.products))
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct non-empty categories in first-seen order, for the category selector.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| !c.is_empty() && seen.insert(*c))
            .collect()
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Remote(String),
    File(PathBuf),
}

impl CatalogSource {
    /// Treat `http://` and `https://` values as URLs and anything else as a path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if is_http_url(raw) { Self::Remote(raw.to_string()) } else { Self::File(PathBuf::from(raw)) }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the catalog once and hands out the cached copy afterwards.
pub struct CatalogLoader {
    http: reqwest::Client,
    source: CatalogSource,
    cached: Option<Arc<Catalog>>,
}

impl CatalogLoader {
    /// # Errors
    ///
    /// Returns [`CatalogError::Fetch`] if the HTTP client cannot be built.
    pub fn new(source: CatalogSource) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| CatalogError::Fetch(e.to_string()))?;
        Ok(Self { http, source, cached: None })
    }

    #[must_use]
    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// The catalog if it has already been loaded.
    #[must_use]
    pub fn cached(&self) -> Option<Arc<Catalog>> {
        self.cached.clone()
    }

    /// Return the cached catalog, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if the source cannot be read or parsed.
    /// A failed load is not cached; the next call tries again.
    pub async fn load(&mut self) -> Result<Arc<Catalog>, CatalogError> {
        if let Some(catalog) = &self.cached {
            return Ok(Arc::clone(catalog));
        }
        let catalog = Arc::new(self.fetch().await?);
        tracing::info!(source = %self.source, products = catalog.len(), "catalog loaded");
        self.cached = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    async fn fetch(&self) -> Result<Catalog, CatalogError> {
        let text = match &self.source {
            CatalogSource::Remote(url) => {
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| CatalogError::Fetch(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status(status.as_u16()));
                }
                response
                    .text()
                    .await
                    .map_err(|e| CatalogError::Fetch(e.to_string()))?
            }
            CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        };
        Catalog::from_json(&text)
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
