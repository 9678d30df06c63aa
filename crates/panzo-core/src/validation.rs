//! # Validation Module
//!
//! Validation for the data the ordering page feeds into the engine: catalog
//! entries and the order/storage settings.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Catalog load                                                 │
//! │  ├── Names, variant labels, prices                                     │
//! │  └── THIS MODULE, via Catalog::validate                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Config load                                                  │
//! │  └── THIS MODULE: WhatsApp number, storage key                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart operations                                              │
//! │  └── No validation: inputs are already resolved, bad keys are no-ops   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use panzo_core::validation::{validate_product_name, validate_whatsapp_number};
//!
//! assert!(validate_product_name("Milanesa").is_ok());
//! assert!(validate_whatsapp_number("5493442678312").is_ok());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Variant;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name or variant label the menu cards can lay out.
pub const MAX_NAME_LEN: usize = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product or beverage name.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name)
}

/// Validates a variant label ("Pan Árabe", "Doble").
pub fn validate_variant_label(label: &str) -> ValidationResult<()> {
    validate_label("variant type", label)
}

fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a WhatsApp number in international format without `+`.
///
/// ## Rules
/// - Digits only (wa.me rejects spaces, dashes and `+`)
/// - Between 8 and 15 digits (E.164 limit)
///
/// ## Example
/// ```rust
/// use panzo_core::validation::validate_whatsapp_number;
///
/// assert!(validate_whatsapp_number("5493442678312").is_ok());
/// assert!(validate_whatsapp_number("+54 9 3442").is_err());
/// ```
pub fn validate_whatsapp_number(number: &str) -> ValidationResult<()> {
    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "whatsapp number".to_string(),
        });
    }

    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "whatsapp number".to_string(),
            reason: "must contain digits only, country code first".to_string(),
        });
    }

    if !(8..=15).contains(&number.len()) {
        return Err(ValidationError::InvalidFormat {
            field: "whatsapp number".to_string(),
            reason: "must have between 8 and 15 digits".to_string(),
        });
    }

    Ok(())
}

/// Validates the durable storage key the cart snapshot lives under.
pub fn validate_storage_key(key: &str) -> ValidationResult<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "storage key".to_string(),
        });
    }

    // The file backend turns the key into a file name.
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(ValidationError::InvalidFormat {
            field: "storage key".to_string(),
            reason: "must not contain path separators".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free extras)
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the variant list of a product.
///
/// ## Rules
/// - At least one variant (the first one is preselected on the menu)
/// - Every label and price valid
/// - Labels unique once normalized, otherwise two variants share a cart line
pub fn validate_variants(variants: &[Variant]) -> ValidationResult<()> {
    if variants.is_empty() {
        return Err(ValidationError::Required {
            field: "variants".to_string(),
        });
    }

    let mut seen = Vec::with_capacity(variants.len());
    for variant in variants {
        validate_variant_label(&variant.variant_type)?;
        validate_price(variant.price)?;

        let normalized = crate::cart::normalize_variant(&variant.variant_type);
        if seen.contains(&normalized) {
            return Err(ValidationError::Duplicate {
                field: "variant type".to_string(),
                value: variant.variant_type.clone(),
            });
        }
        seen.push(normalized);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
