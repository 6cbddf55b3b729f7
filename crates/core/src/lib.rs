//! Market360 Core - Shared domain types and form rules.
//!
//! This crate provides the types shared by every Market360 component:
//! - `storefront` - Server-rendered deals storefront
//! - `cli` - Moderation command-line tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure rules - no I/O, no HTTP
//! clients. The remote API owns the data; these types are the client-side
//! copies of its resources plus the validation applied before anything is
//! sent to it.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, statuses and the product resource
//! - [`rating`] - Like/dislike toggling
//! - [`filter`] - Catalog price/category filter
//! - [`forms`] - Deal submission, password policy and profile validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod forms;
pub mod rating;
pub mod types;

pub use filter::ProductFilter;
pub use rating::RatingAction;
pub use types::*;
