//! Cache types for catalog responses.

use market360_core::{Product, ProductId, ProductStatus};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products(Option<ProductStatus>),
}

impl CacheKey {
    /// Listing keys that are ever cached.
    pub const LISTINGS: [Self; 2] = [
        Self::Products(None),
        Self::Products(Some(ProductStatus::Approved)),
    ];

    /// Whether a listing with `status` may be served from cache.
    ///
    /// Moderation queues are always read fresh.
    #[must_use]
    pub const fn is_cacheable_listing(status: Option<ProductStatus>) -> bool {
        matches!(status, None | Some(ProductStatus::Approved))
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}
