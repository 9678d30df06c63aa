//! # Error Types
//!
//! Domain-specific error types for panzo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  panzo-core errors (this file)                                         │
//! │  ├── CoreError        - Catalog resolution failures                    │
//! │  └── ValidationError  - Catalog/config data that breaks the rules      │
//! │                                                                         │
//! │  panzo-store errors (separate crate)                                   │
//! │  ├── StorageError     - Durable storage read/write failures            │
//! │  ├── StoreError       - Snapshot encode/decode failures                │
//! │  └── ConfigError      - Config file/env problems                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cart mutations themselves never fail: an unknown key is a no-op. Errors
//! here come from resolving what the page asks to add, before the cart is
//! touched.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No product with variants has this id.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// No beverage has this id.
    #[error("Beverage not found: {0}")]
    BeverageNotFound(ProductId),

    /// The remembered variant index does not exist on the product.
    ///
    /// ## When This Occurs
    /// - Catalog was edited while the page kept an old selection
    /// - A pill carried a bad `data-variant-index`
    #[error("Product {product_id} has {available} variants, index {index} is out of range")]
    VariantOutOfRange {
        product_id: ProductId,
        index: usize,
        available: usize,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. phone number with letters).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g. two products with the same id).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
