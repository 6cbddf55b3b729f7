//! Core types for Market360.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, discount_percent};
pub use product::{CATEGORIES, CreatedBy, Creator, Product, ProductImage};
pub use status::*;
