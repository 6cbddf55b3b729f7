//! Session-held models for the storefront.
//!
//! Catalog data lives in the remote API and is rendered straight from
//! `market360_core` types; only identity and pending notices are kept here.

pub mod flash;
pub mod page;
pub mod session;

pub use flash::{Flash, FlashKind, push_flash, take_flashes};
pub use page::PageContext;
pub use session::{CurrentUser, keys as session_keys};
