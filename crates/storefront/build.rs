//! Build script for storefront crate.
//!
//! Fingerprints the stylesheet so it can be served with immutable caching
//! under a content-addressed URL.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hex characters of the digest kept in the asset URL.
const HASH_LEN: usize = 8;

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    let content = fs::read(&css_path).expect("static/css/main.css must exist");
    let digest = format!("{:x}", Sha256::digest(&content));

    println!("cargo:rustc-env=CSS_HASH={}", &digest[..HASH_LEN]);
}
