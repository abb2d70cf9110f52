//! # Domain Types
//!
//! Core domain types used throughout StoreSim.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │      Product        │   │      Customer       │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  id                 │◄──│  cart: Vec<id>      │  (weak, by id)      │
//! │  │  title              │   │  name               │                     │
//! │  │  description        │   │  account_id         │                     │
//! │  │  price (Money)      │   │  is_premium         │                     │
//! │  │  quantity_available │   └─────────────────────┘                     │
//! │  └─────────────────────┘                                               │
//! │                                                                         │
//! │  ┌─────────────────────┐   ┌─────────────────────┐                     │
//! │  │   CheckoutPolicy    │   │      Receipt        │                     │
//! │  │  ─────────────────  │   │  ─────────────────  │                     │
//! │  │  LookupStrategy     │   │  lines / skipped    │                     │
//! │  │  SurchargeMode      │   │  total (Money)      │                     │
//! │  │  SurchargeRate      │   │  completed_at       │                     │
//! │  └─────────────────────┘   └─────────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PolicyParseError;
use crate::money::Money;
use crate::DEFAULT_SURCHARGE_BPS;

// =============================================================================
// Surcharge Rate
// =============================================================================

/// Surcharge rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 700 bps = 7%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeRate(u32);

impl SurchargeRate {
    /// Creates a surcharge rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        SurchargeRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero surcharge.
    #[inline]
    pub const fn zero() -> Self {
        SurchargeRate(0)
    }
}

impl Default for SurchargeRate {
    fn default() -> Self {
        SurchargeRate(DEFAULT_SURCHARGE_BPS)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the store's inventory.
///
/// Identity and catalog data are fixed at construction; the only mutation
/// is [`Product::decrease_quantity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: String,
    title: String,
    description: String,
    price: Money,
    quantity_available: i64,
}

impl Product {
    /// Creates a product with its full catalog data.
    ///
    /// ```rust
    /// use storesim_core::{Money, Product};
    ///
    /// let p = Product::new("5", "iPhone", "cellular phone made by apple", Money::from_dollars(500), 5);
    /// assert_eq!(p.id(), "5");
    /// assert_eq!(p.title(), "iPhone");
    /// assert_ne!(p.price(), Money::from_dollars(400));
    /// ```
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        price: Money,
        quantity_available: i64,
    ) -> Self {
        Product {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            price,
            quantity_available,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }

    #[inline]
    pub fn quantity_available(&self) -> i64 {
        self.quantity_available
    }

    /// Checks if at least one unit is available.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.quantity_available > 0
    }

    /// Decreases the quantity available by one.
    ///
    /// Unguarded: callers check [`Product::is_in_stock`] first.
    pub fn decrease_quantity(&mut self) {
        self.quantity_available -= 1;
    }

    /// Checks whether the title or description contains `query_lower`,
    /// ignoring case. The query must already be lowercased.
    pub fn matches(&self, query_lower: &str) -> bool {
        self.title.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A store member with a shopping cart.
///
/// ## Cart Semantics
/// The cart holds product ids, not products. Ids are resolved through the
/// store at checkout, so a cart may name products the store cannot find.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    name: String,
    account_id: String,
    is_premium: bool,
    cart: Vec<String>,
}

impl Customer {
    /// Creates a customer with an empty cart.
    ///
    /// ```rust
    /// use storesim_core::Customer;
    ///
    /// let c = Customer::new("Cindy", "XYZ", true);
    /// assert_eq!(c.name(), "Cindy");
    /// assert!(c.is_premium());
    /// assert!(c.cart().is_empty());
    /// ```
    pub fn new(name: impl Into<String>, account_id: impl Into<String>, is_premium: bool) -> Self {
        Customer {
            name: name.into(),
            account_id: account_id.into(),
            is_premium,
            cart: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    #[inline]
    pub fn is_premium(&self) -> bool {
        self.is_premium
    }

    /// Product ids in the order they were added.
    #[inline]
    pub fn cart(&self) -> &[String] {
        &self.cart
    }

    /// Appends a product id. No dedup, no limit, no existence check.
    pub fn add_to_cart(&mut self, product_id: impl Into<String>) {
        self.cart.push(product_id.into());
    }

    pub fn empty_cart(&mut self) {
        self.cart = Vec::new();
    }
}

// =============================================================================
// Checkout Policy
// =============================================================================

/// How the store resolves an id to a product or member.
///
/// The default, [`LookupStrategy::FullScan`], deviates from the legacy store,
/// which only ever compared the first entry of each collection. Select
/// [`LookupStrategy::FirstEntryOnly`] (or [`CheckoutPolicy::legacy`]) to
/// reproduce that behavior.
///
/// ## Strategies
/// ```text
/// inventory: [830, 835, 5]      find_product("835")
///
/// FULL SCAN (default)           FIRST ENTRY ONLY
/// ───────────────────           ────────────────
/// 830? no → 835? yes            830? no → None
/// → Some(835)                   (later entries never compared)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStrategy {
    /// Compare every entry and return the first match. Deviates from the
    /// legacy store.
    #[default]
    FullScan,

    /// Compare only the first entry; any other id reports "not found".
    FirstEntryOnly,
}

impl fmt::Display for LookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupStrategy::FullScan => write!(f, "full_scan"),
            LookupStrategy::FirstEntryOnly => write!(f, "first_entry_only"),
        }
    }
}

impl FromStr for LookupStrategy {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full_scan" | "full" => Ok(LookupStrategy::FullScan),
            "first_entry_only" | "first_entry" | "legacy" => Ok(LookupStrategy::FirstEntryOnly),
            other => Err(PolicyParseError {
                kind: "lookup strategy",
                value: other.to_string(),
                expected: "full_scan, first_entry_only",
            }),
        }
    }
}

/// How the non-premium surcharge is applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeMode {
    /// After each charged cart line, the whole running total is multiplied
    /// by `1 + rate`.
    #[default]
    Compounding,

    /// The final total is multiplied by `1 + rate` once.
    Flat,
}

impl fmt::Display for SurchargeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurchargeMode::Compounding => write!(f, "compounding"),
            SurchargeMode::Flat => write!(f, "flat"),
        }
    }
}

impl FromStr for SurchargeMode {
    type Err = PolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compounding" | "per_line" => Ok(SurchargeMode::Compounding),
            "flat" | "once" => Ok(SurchargeMode::Flat),
            other => Err(PolicyParseError {
                kind: "surcharge mode",
                value: other.to_string(),
                expected: "compounding, flat",
            }),
        }
    }
}

/// The knobs that shape lookup and checkout pricing for a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutPolicy {
    pub lookup: LookupStrategy,
    pub surcharge_mode: SurchargeMode,
    pub surcharge_rate: SurchargeRate,
}

impl CheckoutPolicy {
    /// First-entry lookup with a compounding 7% surcharge.
    pub fn legacy() -> Self {
        CheckoutPolicy {
            lookup: LookupStrategy::FirstEntryOnly,
            ..CheckoutPolicy::default()
        }
    }
}

// =============================================================================
// Cart Add Status
// =============================================================================

/// Outcome of [`crate::Store::add_product_to_member_cart`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartAddStatus {
    Added,
    OutOfStock,
    ProductNotFound,
    MemberNotFound,
}

impl CartAddStatus {
    #[inline]
    pub fn is_added(&self) -> bool {
        matches!(self, CartAddStatus::Added)
    }
}

impl fmt::Display for CartAddStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartAddStatus::Added => write!(f, "product added to cart"),
            CartAddStatus::OutOfStock => write!(f, "product out of stock"),
            CartAddStatus::ProductNotFound => write!(f, "product ID not found"),
            CartAddStatus::MemberNotFound => write!(f, "member ID not found"),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A charged cart line, frozen at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub product_id: String,
    pub title: String,
    pub unit_price: Money,
    /// Running total after this line (and its surcharge, when compounding).
    pub running_total: Money,
}

/// The result of a completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub member_id: String,
    pub premium: bool,
    pub lines: Vec<ReceiptLine>,
    /// Cart entries skipped because the product had no stock left.
    pub skipped: Vec<String>,
    pub total: Money,
    pub completed_at: DateTime<Utc>,
}

impl Receipt {
    /// Number of cart lines actually charged.
    #[inline]
    pub fn charged_count(&self) -> usize {
        self.lines.len()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
