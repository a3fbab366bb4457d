//! # Validation Module
//!
//! Field constraint checks for products.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTML form                                                    │
//! │  └── maxlength / required hints (advisory only)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: validate_candidate (THIS MODULE)                             │
//! │  ├── Required, length, and range checks                                │
//! │  └── Collects EVERY failing field, not just the first                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  └── NOT NULL and CHECK constraints                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lengths are counted in characters, not bytes.

use crate::error::{ValidationError, ValidationErrors};
use crate::money::{Money, MoneyParseError};
use crate::types::{CandidateProduct, NewProduct};
use crate::{MAX_DESCRIPTION_LEN, MAX_IMAGE_URL_LEN, MAX_NAME_LEN, MAX_PRICE, MIN_PRICE_EXCLUSIVE};

/// Result type for single-field validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Candidate Validation
// =============================================================================

/// Validates a candidate product and converts it into a [`NewProduct`].
///
/// ## Rules
/// - `name`: required, at most 100 characters
/// - `description`: required, at most 1000 characters
/// - `price`: required decimal in (0.01, 1 000 000]
/// - `imageUrl`: optional, at most 200 characters; empty counts as absent
///
/// ## Example
/// ```rust
/// use catalog_core::{validate_candidate, CandidateProduct};
///
/// let candidate = CandidateProduct {
///     name: Some(String::new()),
///     description: Some("x".to_string()),
///     price: Some("5.00".to_string()),
///     image_url: None,
/// };
///
/// let errors = validate_candidate(&candidate).unwrap_err();
/// assert!(errors.has_field("name"));
/// assert_eq!(errors.len(), 1);
/// ```
pub fn validate_candidate(candidate: &CandidateProduct) -> Result<NewProduct, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = validate_product_name(candidate.name.as_deref()).map_err(|e| errors.push(e));
    let description =
        validate_description(candidate.description.as_deref()).map_err(|e| errors.push(e));
    let price = validate_price(candidate.price.as_deref()).map_err(|e| errors.push(e));
    let image_url = validate_image_url(candidate.image_url.as_deref()).map_err(|e| errors.push(e));

    match (name, description, price, image_url) {
        (Ok(name), Ok(description), Ok(price), Ok(image_url)) => Ok(NewProduct {
            name,
            description,
            price,
            image_url,
        }),
        _ => Err(errors),
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be missing or blank
/// - Must be at most 100 characters
pub fn validate_product_name(name: Option<&str>) -> ValidationResult<String> {
    required_text("name", name, MAX_NAME_LEN)
}

/// Validates a product description.
///
/// ## Rules
/// - Must not be missing or blank
/// - Must be at most 1000 characters
pub fn validate_description(description: Option<&str>) -> ValidationResult<String> {
    required_text("description", description, MAX_DESCRIPTION_LEN)
}

/// Validates an optional image URL.
///
/// Only the length is checked; the value is not parsed as a URL.
pub fn validate_image_url(image_url: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(url) = image_url.filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    if url.chars().count() > MAX_IMAGE_URL_LEN {
        return Err(ValidationError::TooLong {
            field: "imageUrl".to_string(),
            max: MAX_IMAGE_URL_LEN,
        });
    }

    Ok(Some(url.to_string()))
}

fn required_text(field: &str, value: Option<&str>, max: usize) -> ValidationResult<String> {
    let value = value.unwrap_or_default();

    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a price given as decimal text.
///
/// ## Rules
/// - Must be present and parse as a decimal with at most two places
/// - Must be greater than 0.01
/// - Must not exceed 1 000 000
///
/// ## Example
/// ```rust
/// use catalog_core::validation::validate_price;
///
/// assert!(validate_price(Some("1.50")).is_ok());
/// assert!(validate_price(Some("0.01")).is_err());
/// assert!(validate_price(Some("1000000.01")).is_err());
/// assert!(validate_price(None).is_err());
/// ```
pub fn validate_price(price: Option<&str>) -> ValidationResult<Money> {
    let parsed = match price.map(str::parse::<Money>) {
        None | Some(Err(MoneyParseError::Empty)) => {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            })
        }
        Some(Err(MoneyParseError::TooLarge)) => return Err(price_out_of_range()),
        Some(Err(e)) => {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: e.to_string(),
            })
        }
        Some(Ok(money)) => money,
    };

    validate_price_range(parsed)
}

/// Checks that an already-parsed price lies in (0.01, 1 000 000].
pub fn validate_price_range(price: Money) -> ValidationResult<Money> {
    if price <= MIN_PRICE_EXCLUSIVE || price > MAX_PRICE {
        return Err(price_out_of_range());
    }
    Ok(price)
}

fn price_out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "price".to_string(),
        min: MIN_PRICE_EXCLUSIVE.to_string(),
        max: MAX_PRICE.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
