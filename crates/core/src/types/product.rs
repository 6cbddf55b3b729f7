//! The product (deal) resource as returned by the remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::{Price, ProductId, ProductStatus, UserId, discount_percent};
use crate::forms::deal::is_web_url;
use crate::rating::{self, RatingAction};

/// Categories a deal can be filed under.
pub const CATEGORIES: [&str; 8] = [
    "Electronics",
    "Fashion",
    "Home & Garden",
    "Books",
    "Sports & Outdoors",
    "Toys & Games",
    "Beauty",
    "Automotive",
];

/// Shown in place of a missing creator.
const UNKNOWN_CREATOR: &str = "User Unknown";

/// An uploaded product photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Public URL of the image.
    pub url: String,
    /// Identifier in the image host, when the API exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

/// The user who submitted a deal, when the API populates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
}

/// `createdBy` is either a populated user document or a bare ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedBy {
    User(Creator),
    Id(UserId),
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A deal listed on Market360.
///
/// Missing or `null` scalar and collection fields fall back to their
/// defaults, so one sparse document never fails a whole listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sale_price: Price,
    #[serde(default, deserialize_with = "null_as_default")]
    pub list_price: Price,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub deal_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: Vec<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dislikes: Vec<UserId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: ProductStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<CreatedBy>,
}

impl Product {
    /// Whole-percent discount of the sale price against the list price.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        discount_percent(self.list_price, self.sale_price)
    }

    /// URL of the first image, if the deal has any.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(|img| img.url.as_str())
    }

    /// Image at `index`, falling back to the first image when out of range.
    #[must_use]
    pub fn image_at(&self, index: usize) -> Option<&ProductImage> {
        self.images.get(index).or_else(|| self.images.first())
    }

    /// The outbound deal link, only when it is an `http(s)` URL.
    #[must_use]
    pub fn deal_link(&self) -> Option<&str> {
        self.deal_url.as_deref().filter(|url| is_web_url(url))
    }

    /// First `max_chars` characters of the description followed by `...`.
    #[must_use]
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut out: String = self.description.chars().take(max_chars).collect();
        out.push_str("...");
        out
    }

    /// Username of the submitter or a placeholder.
    #[must_use]
    pub fn creator_name(&self) -> &str {
        match &self.created_by {
            Some(CreatedBy::User(Creator {
                username: Some(name),
                ..
            })) if !name.is_empty() => name.as_str(),
            _ => UNKNOWN_CREATOR,
        }
    }

    /// Whether `user` has liked this deal.
    #[must_use]
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Whether `user` has disliked this deal.
    #[must_use]
    pub fn is_disliked_by(&self, user: &UserId) -> bool {
        self.dislikes.contains(user)
    }

    /// Apply a like/dislike toggle locally.
    ///
    /// Used for the optimistic view shown while the API call is in flight;
    /// the API's answer replaces it.
    pub fn apply_rating(&mut self, action: RatingAction, user: &UserId) {
        rating::apply(&mut self.likes, &mut self.dislikes, action, user);
    }
}
