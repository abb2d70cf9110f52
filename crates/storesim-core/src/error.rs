//! # Error Types
//!
//! Domain-specific error types for storesim-core.
//!
//! ## Failure Styles
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Failure Styles                                  │
//! │                                                                         │
//! │  Sentinel returns (not errors)                                         │
//! │  ├── find_product / find_member   → Option<&T>                         │
//! │  └── add_product_to_member_cart   → CartAddStatus                      │
//! │                                                                         │
//! │  Checked failures (this file)                                          │
//! │  └── checkout_member              → Result<Money, StoreError>          │
//! │                                                                         │
//! │  storesim-cli errors (separate crate)                                  │
//! │  └── AppError                     - config, I/O, wraps StoreError      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Store Error
// =============================================================================

/// Checkout failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The member id did not resolve to a member of the store.
    ///
    /// Raised before anything is touched, so the store is unchanged.
    #[error("Invalid checkout: member ID {member_id} not found")]
    InvalidCheckout { member_id: String },

    /// A cart entry did not resolve to a product during checkout.
    ///
    /// ## State After Failure
    /// ```text
    /// cart: [830, 835, 999]
    ///         │    │    │
    ///         ▼    ▼    ▼
    ///       charged ✓  ✗ UnresolvedCartItem
    ///
    /// Stock of 830 and 835 stays decremented (no rollback).
    /// The cart is left as it was.
    /// ```
    #[error("Checkout for member {member_id} failed: product ID {product_id} in cart not found")]
    UnresolvedCartItem {
        member_id: String,
        product_id: String,
    },
}

// =============================================================================
// Policy Parse Error
// =============================================================================

/// A checkout policy name that did not match any known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown {kind}: '{value}'. Valid options: {expected}")]
pub struct PolicyParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
