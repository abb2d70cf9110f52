//! # storesim-core: Store Simulation Domain Logic
//!
//! Products with stock levels, customers with carts, and a store that
//! mediates search, cart additions, and checkout pricing. Everything is
//! in-memory and synchronous.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StoreSim Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storesim-cli (demo binary)                      │   │
//! │  │       config (TOML + env) ──► tracing ──► sample flow           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storesim-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   store   │  │   error   │  │   │
//! │  │   │  Product  │  │   Money   │  │  lookup   │  │StoreError │  │   │
//! │  │   │ Customer  │  │ surcharge │  │  search   │  │           │  │   │
//! │  │   │  Policy   │  │           │  │ checkout  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │            NO I/O • NO DATABASE • NO NETWORK                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, Customer, checkout policy, receipts
//! - [`money`] - Money type with integer arithmetic
//! - [`store`] - The Store and its operations
//! - [`error`] - Checkout error types
//!
//! ## Example Usage
//!
//! ```rust
//! use storesim_core::{CartAddStatus, Customer, Money, Product, Store};
//!
//! let mut store = Store::new();
//! store.add_product(Product::new("830", "Nintendo Switch", "console", Money::from_dollars(300), 9));
//! store.add_member(Customer::new("David", "ABC", false));
//!
//! assert_eq!(store.add_product_to_member_cart("830", "ABC"), CartAddStatus::Added);
//!
//! // Non-premium members pay a 7% surcharge.
//! let total = store.checkout_member("ABC").unwrap();
//! assert_eq!(total.to_string(), "$321.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod store;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{PolicyParseError, StoreError, StoreResult};
pub use money::{Money, RunningTotal};
pub use store::Store;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Surcharge charged to non-premium members, in basis points (7%).
pub const DEFAULT_SURCHARGE_BPS: u32 = 700;

/// Upper bound for a surcharge rate, in basis points (100%).
pub const MAX_SURCHARGE_BPS: u32 = 10_000;
