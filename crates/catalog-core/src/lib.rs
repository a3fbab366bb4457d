//! # catalog-core: Pure Domain Logic for the Catalog
//!
//! This crate defines what a Product is and which field values are
//! acceptable. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    catalog-web (axum)                           │   │
//! │  │    List ─ New-form ─ Create ─ Search ─ Details ─ Delete         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ catalog-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   types   │  │   money   │  │ validation│                  │   │
//! │  │   │  Product  │  │   Money   │  │ candidate │                  │   │
//! │  │   │NewProduct │  │  parsing  │  │  checks   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    catalog-db (Record Store)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CandidateProduct, NewProduct)
//! - [`money`] - Money type with integer cents
//! - [`error`] - Domain error types
//! - [`validation`] - Field constraint checks
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::{validate_candidate, CandidateProduct};
//!
//! let candidate = CandidateProduct {
//!     name: Some("Pen".to_string()),
//!     description: Some("Blue ink pen".to_string()),
//!     price: Some("1.50".to_string()),
//!     image_url: None,
//! };
//!
//! let product = validate_candidate(&candidate).unwrap();
//! assert_eq!(product.price.cents(), 150);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError, ValidationErrors};
pub use money::Money;
pub use types::*;
pub use validation::validate_candidate;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name, in characters.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a product description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Maximum length of a product image URL, in characters.
pub const MAX_IMAGE_URL_LEN: usize = 200;

/// Prices must be strictly greater than this (0.01).
pub const MIN_PRICE_EXCLUSIVE: Money = Money::from_cents(1);

/// Prices must be at most this (1 000 000.00).
pub const MAX_PRICE: Money = Money::from_cents(100_000_000);
