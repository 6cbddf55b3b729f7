//! "Add New Deal" submission form.

use serde::{Deserialize, Serialize};
use url::Url;

use super::{FieldErrors, required};
use crate::types::{CATEGORIES, Price};

/// Raw form fields as posted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DealForm {
    pub deal_url: String,
    pub title: String,
    pub sale_price: String,
    pub list_price: String,
    pub description: String,
    pub category: String,
    pub store: String,
}

/// A validated deal ready to be sent to `POST /products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub deal_url: String,
    pub title: String,
    pub sale_price: Price,
    pub list_price: Price,
    pub description: String,
    pub category: String,
    pub store: String,
}

impl DealForm {
    /// Validate every field.
    ///
    /// # Errors
    ///
    /// Returns all field errors when any field is missing or malformed.
    pub fn validate(&self) -> Result<NewDeal, FieldErrors> {
        let mut errors = FieldErrors::new();

        let deal_url = required(&mut errors, "deal_url", &self.deal_url, "Deal URL is required");
        if !deal_url.is_empty() && !is_web_url(&deal_url) {
            errors.add("deal_url", "Deal URL must be a valid http(s) link");
        }

        let title = required(&mut errors, "title", &self.title, "Deal title is required");
        let sale_price = parse_price(&mut errors, "sale_price", &self.sale_price, "Sale price");
        let list_price = parse_price(&mut errors, "list_price", &self.list_price, "List price");
        let description = required(
            &mut errors,
            "description",
            &self.description,
            "Description is required",
        );

        let category = self.category.trim().to_owned();
        if category.is_empty() {
            errors.add("category", "Select a category");
        } else if !CATEGORIES.contains(&category.as_str()) {
            errors.add("category", "Unknown category");
        }

        let store = required(&mut errors, "store", &self.store, "Store is required");

        errors.into_result(NewDeal {
            deal_url,
            title,
            sale_price,
            list_price,
            description,
            category,
            store,
        })
    }
}

/// Whether `raw` is an absolute `http` or `https` URL.
pub(crate) fn is_web_url(raw: &str) -> bool {
    Url::parse(raw).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn parse_price(errors: &mut FieldErrors, field: &'static str, raw: &str, label: &str) -> Price {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.add(field, format!("{label} is required"));
        return Price::ZERO;
    }

    match raw.parse::<Price>() {
        Ok(price) if price.amount().is_sign_negative() => {
            errors.add(field, format!("{label} cannot be negative"));
            Price::ZERO
        }
        Ok(price) => price,
        Err(_) => {
            errors.add(field, format!("{label} must be a number"));
            Price::ZERO
        }
    }
}
