//! # Domain Types
//!
//! The catalog has a single entity, [`Product`], and two shapes of it on
//! the way in:
//!
//! ```text
//! ┌───────────────────┐  validate_candidate  ┌───────────────┐  insert  ┌───────────┐
//! │ CandidateProduct  │ ───────────────────► │  NewProduct   │ ───────► │  Product  │
//! │ raw form strings  │                      │ checked, no id│          │ id assigned│
//! └───────────────────┘                      └───────────────┘          └───────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A persisted catalog product.
///
/// Serialized with camelCase keys: `id`, `name`, `description`, `price`,
/// `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Store-assigned identifier. Never reused.
    #[ts(type = "number")]
    pub id: i64,

    /// Display name, 1-100 characters.
    pub name: String,

    /// Description, 1-1000 characters.
    pub description: String,

    /// Price in (0.01, 1 000 000].
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price_cents"))]
    #[ts(type = "number")]
    #[schema(value_type = f64, example = 1.5)]
    pub price: Money,

    /// Optional image URL, at most 200 characters.
    pub image_url: Option<String>,
}

impl Product {
    /// Case-sensitive substring match on name or description.
    ///
    /// Same predicate as the store's search query.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        self.name.contains(keyword) || self.description.contains(keyword)
    }
}

// =============================================================================
// Candidate Product
// =============================================================================

/// An unvalidated set of field values submitted for creation.
///
/// Every field is optional text so that missing and malformed input can be
/// reported back field by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CandidateProduct {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Decimal text, e.g. `"1.50"`.
    #[serde(default)]
    #[schema(example = "1.50")]
    pub price: Option<String>,

    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// New Product
// =============================================================================

/// A candidate that passed validation and is ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image_url: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
