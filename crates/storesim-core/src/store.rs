//! # Store
//!
//! The store owns the inventory and the membership and implements every
//! operation that crosses between them.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        checkout_member(id)                              │
//! │                                                                         │
//! │  find_member(id) ──── None ──► Err(InvalidCheckout)   (nothing touched) │
//! │       │                                                                 │
//! │     Some                                                                │
//! │       ▼                                                                 │
//! │  for product_id in cart (insertion order):                             │
//! │       │                                                                 │
//! │       ├── find_product → None ──► Err(UnresolvedCartItem)  (no rollback)│
//! │       ├── out of stock ──► skip                                        │
//! │       └── in stock ──► total += price; stock -= 1;                     │
//! │                        compounding? total ×= 1.07 (premium: × 1)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  flat? total ×= 1.07 (premium: × 1)                                    │
//! │  empty cart ──► Ok(total rounded to the cent)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::money::{Money, RunningTotal};
use crate::types::{
    CartAddStatus, CheckoutPolicy, Customer, LookupStrategy, Product, Receipt, ReceiptLine,
    SurchargeMode, SurchargeRate,
};

/// In-memory store: inventory, membership, and the checkout policy.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inventory: Vec<Product>,
    members: Vec<Customer>,
    policy: CheckoutPolicy,
}

impl Store {
    /// Creates an empty store with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with the given policy.
    pub fn with_policy(policy: CheckoutPolicy) -> Self {
        Store {
            inventory: Vec::new(),
            members: Vec::new(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> CheckoutPolicy {
        self.policy
    }

    pub fn add_product(&mut self, product: Product) {
        debug!(product_id = %product.id(), "Adding product to inventory");
        self.inventory.push(product);
    }

    pub fn add_member(&mut self, customer: Customer) {
        debug!(member_id = %customer.account_id(), "Adding member");
        self.members.push(customer);
    }

    /// Products in the order they were added.
    #[inline]
    pub fn inventory(&self) -> &[Product] {
        &self.inventory
    }

    /// Members in the order they were added.
    #[inline]
    pub fn members(&self) -> &[Customer] {
        &self.members
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Finds a product by id using the configured [`LookupStrategy`].
    ///
    /// ```rust
    /// use storesim_core::{CheckoutPolicy, Money, Product, Store};
    ///
    /// let mut store = Store::with_policy(CheckoutPolicy::legacy());
    /// store.add_product(Product::new("830", "Nintendo Switch", "console", Money::from_dollars(300), 9));
    /// store.add_product(Product::new("835", "Playstation", "console", Money::from_dollars(400), 5));
    ///
    /// assert!(store.find_product("830").is_some());
    /// // Only the first entry is compared under the legacy policy.
    /// assert!(store.find_product("835").is_none());
    /// ```
    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.product_index(product_id).map(|i| &self.inventory[i])
    }

    pub fn find_product_mut(&mut self, product_id: &str) -> Option<&mut Product> {
        self.product_index(product_id).map(move |i| &mut self.inventory[i])
    }

    /// Finds a member by account id using the configured [`LookupStrategy`].
    pub fn find_member(&self, member_id: &str) -> Option<&Customer> {
        self.member_index(member_id).map(|i| &self.members[i])
    }

    pub fn find_member_mut(&mut self, member_id: &str) -> Option<&mut Customer> {
        self.member_index(member_id).map(move |i| &mut self.members[i])
    }

    fn product_index(&self, product_id: &str) -> Option<usize> {
        locate(&self.inventory, self.policy.lookup, |p| p.id() == product_id)
    }

    fn member_index(&self, member_id: &str) -> Option<usize> {
        locate(&self.members, self.policy.lookup, |c| c.account_id() == member_id)
    }

    // =========================================================================
    // Search
    // =========================================================================

    /// Returns the sorted ids of every product whose title or description
    /// contains `query`, ignoring case. An empty query matches everything.
    ///
    /// ```rust
    /// use storesim_core::{Money, Product, Store};
    ///
    /// let mut store = Store::new();
    /// store.add_product(Product::new("835", "Playstation", "Sony videogame console", Money::from_dollars(400), 5));
    /// store.add_product(Product::new("5", "Xbox one", "Microsoft videogame console", Money::from_dollars(350), 7));
    ///
    /// assert_eq!(store.product_search("VIDEOGAME"), ["5", "835"]);
    /// ```
    pub fn product_search(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let mut matched: Vec<String> = self
            .inventory
            .iter()
            .filter(|p| p.matches(&query))
            .map(|p| p.id().to_string())
            .collect();
        matched.sort();
        debug!(query = %query, matches = matched.len(), "Product search");
        matched
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a product to a member's cart if both resolve and the product is
    /// in stock. Stock is not reserved; it is decremented at checkout.
    pub fn add_product_to_member_cart(&mut self, product_id: &str, member_id: &str) -> CartAddStatus {
        let product = self.product_index(product_id);
        let member = self.member_index(member_id);

        let status = match (product, member) {
            (None, _) => CartAddStatus::ProductNotFound,
            (Some(_), None) => CartAddStatus::MemberNotFound,
            (Some(p), Some(m)) => {
                if self.inventory[p].is_in_stock() {
                    self.members[m].add_to_cart(product_id);
                    CartAddStatus::Added
                } else {
                    CartAddStatus::OutOfStock
                }
            }
        };

        debug!(%product_id, %member_id, ?status, "Add to cart");
        status
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Charges a member's cart and returns the total.
    ///
    /// See [`Store::checkout_member_with_receipt`] for the itemized result.
    pub fn checkout_member(&mut self, member_id: &str) -> StoreResult<Money> {
        self.checkout_member_with_receipt(member_id)
            .map(|receipt| receipt.total)
    }

    /// Charges a member's cart and returns an itemized receipt.
    ///
    /// ## Pricing
    /// Each in-stock cart line adds its price to the running total and
    /// consumes one unit of stock. For non-premium members the surcharge is
    /// applied per the policy's [`SurchargeMode`]: after every charged line
    /// to the whole running total (`Compounding`), or once to the final
    /// total (`Flat`).
    ///
    /// ## Errors
    /// - [`StoreError::InvalidCheckout`] if the member does not resolve.
    ///   The store is unchanged.
    /// - [`StoreError::UnresolvedCartItem`] if a cart entry does not
    ///   resolve. Lines charged before it keep their decremented stock and
    ///   the cart is not cleared.
    ///
    /// ```rust
    /// use storesim_core::{Customer, Money, Product, Store};
    ///
    /// let mut store = Store::new();
    /// store.add_product(Product::new("830", "Nintendo Switch", "console", Money::from_dollars(300), 9));
    /// store.add_member(Customer::new("David", "ABC", false));
    /// store.add_product_to_member_cart("830", "ABC");
    ///
    /// let receipt = store.checkout_member_with_receipt("ABC").unwrap();
    /// assert_eq!(receipt.total, Money::from_dollars(321));
    /// assert!(store.find_member("ABC").unwrap().cart().is_empty());
    /// ```
    pub fn checkout_member_with_receipt(&mut self, member_id: &str) -> StoreResult<Receipt> {
        let Some(m) = self.member_index(member_id) else {
            warn!(%member_id, "Checkout rejected: member not found");
            return Err(StoreError::InvalidCheckout {
                member_id: member_id.to_string(),
            });
        };

        let premium = self.members[m].is_premium();
        let cart = self.members[m].cart().to_vec();
        let rate = if premium {
            SurchargeRate::zero()
        } else {
            self.policy.surcharge_rate
        };
        let mode = self.policy.surcharge_mode;

        let mut total = RunningTotal::zero();
        let mut lines = Vec::with_capacity(cart.len());
        let mut skipped = Vec::new();

        for product_id in cart {
            let Some(p) = self.product_index(&product_id) else {
                warn!(%member_id, %product_id, charged = lines.len(), "Checkout aborted: cart item not found");
                return Err(StoreError::UnresolvedCartItem {
                    member_id: member_id.to_string(),
                    product_id,
                });
            };

            let product = &mut self.inventory[p];
            if !product.is_in_stock() {
                warn!(%member_id, %product_id, "Skipping out-of-stock cart line");
                skipped.push(product_id);
                continue;
            }

            total += product.price();
            product.decrease_quantity();
            if mode == SurchargeMode::Compounding {
                total.apply_surcharge(rate);
            }

            lines.push(ReceiptLine {
                title: product.title().to_string(),
                unit_price: product.price(),
                running_total: total.to_money(),
                product_id,
            });
        }

        if mode == SurchargeMode::Flat {
            total.apply_surcharge(rate);
        }
        let total = total.to_money();

        self.members[m].empty_cart();

        info!(
            %member_id,
            premium,
            charged = lines.len(),
            skipped = skipped.len(),
            %total,
            "Checkout completed"
        );

        Ok(Receipt {
            id: Uuid::new_v4().to_string(),
            member_id: member_id.to_string(),
            premium,
            lines,
            skipped,
            total,
            completed_at: Utc::now(),
        })
    }
}

/// Resolves the index of the entry matching `is_match` under `strategy`.
fn locate<T>(items: &[T], strategy: LookupStrategy, is_match: impl Fn(&T) -> bool) -> Option<usize> {
    match strategy {
        LookupStrategy::FullScan => items.iter().position(is_match),
        LookupStrategy::FirstEntryOnly => items.first().filter(|first| is_match(*first)).map(|_| 0),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// The sample inventory: Switch "830" $300 ×9, Playstation "835" $400 ×5,
    /// Xbox "5" $350 ×7.
    fn sample_store(policy: CheckoutPolicy) -> Store {
        let mut store = Store::with_policy(policy);
        store.add_product(Product::new(
            "830",
            "Nintendo Switch",
            "console and handheld in one video game platform made by nintendo",
            Money::from_dollars(300),
            9,
        ));
        store.add_product(Product::new(
            "835",
            "Playstation",
            "Sony videogame console",
            Money::from_dollars(400),
            5,
        ));
        store.add_product(Product::new(
            "5",
            "Xbox one",
            "Microsoft videogame console",
            Money::from_dollars(350),
            7,
        ));
        store.add_member(Customer::new("David", "ABC", false));
        store.add_member(Customer::new("Cindy", "XYZ", true));
        store
    }

    fn fill_cart(store: &mut Store, member_id: &str, ids: &[&str]) {
        for id in ids {
            assert_eq!(store.add_product_to_member_cart(id, member_id), CartAddStatus::Added);
        }
    }

    fn stock(store: &Store, product_id: &str) -> i64 {
        store
            .inventory()
            .iter()
            .find(|p| p.id() == product_id)
            .map(Product::quantity_available)
            .unwrap()
    }

    #[test]
    fn test_full_scan_lookup() {
        let store = sample_store(CheckoutPolicy::default());
        assert_eq!(store.find_product("835").unwrap().title(), "Playstation");
        assert_eq!(store.find_product("5").unwrap().title(), "Xbox one");
        assert!(store.find_product("999").is_none());

        assert_eq!(store.find_member("XYZ").unwrap().name(), "Cindy");
        assert!(store.find_member("NOPE").is_none());
    }

    #[test]
    fn test_first_entry_only_lookup() {
        let store = sample_store(CheckoutPolicy::legacy());
        assert!(store.find_product("830").is_some());
        assert!(store.find_product("835").is_none());
        assert!(store.find_product("5").is_none());

        assert!(store.find_member("ABC").is_some());
        assert!(store.find_member("XYZ").is_none());

        let empty = Store::with_policy(CheckoutPolicy::legacy());
        assert!(empty.find_product("830").is_none());
        assert!(empty.find_member("ABC").is_none());
    }

    #[test]
    fn test_find_mut_follows_strategy() {
        let mut store = sample_store(CheckoutPolicy::default());
        store.find_product_mut("835").unwrap().decrease_quantity();
        assert_eq!(stock(&store, "835"), 4);
        store.find_member_mut("XYZ").unwrap().add_to_cart("manual");
        assert_eq!(store.find_member("XYZ").unwrap().cart(), ["manual"]);

        let mut legacy = sample_store(CheckoutPolicy::legacy());
        assert!(legacy.find_product_mut("835").is_none());
        assert!(legacy.find_member_mut("XYZ").is_none());
    }

    #[test]
    fn test_product_search_sorted_case_insensitive() {
        let store = sample_store(CheckoutPolicy::default());

        assert_eq!(store.product_search("console"), ["5", "830", "835"]);
        assert_eq!(store.product_search("PLAYSTATION"), ["835"]);
        // Description-only match
        assert_eq!(store.product_search("nintendo"), ["830"]);
        assert_eq!(store.product_search("sony"), ["835"]);
        assert!(store.product_search("laptop").is_empty());
        assert_eq!(store.product_search(""), ["5", "830", "835"]);
    }

    #[test]
    fn test_product_search_ignores_lookup_strategy() {
        let store = sample_store(CheckoutPolicy::legacy());
        assert_eq!(store.product_search("videogame"), ["5", "835"]);
    }

    #[test]
    fn test_add_to_cart_statuses() {
        let mut store = sample_store(CheckoutPolicy::default());

        assert_eq!(store.add_product_to_member_cart("830", "ABC"), CartAddStatus::Added);
        assert_eq!(store.add_product_to_member_cart("999", "ABC"), CartAddStatus::ProductNotFound);
        assert_eq!(store.add_product_to_member_cart("830", "NOPE"), CartAddStatus::MemberNotFound);
        // Product is checked before member.
        assert_eq!(store.add_product_to_member_cart("999", "NOPE"), CartAddStatus::ProductNotFound);

        assert_eq!(store.find_member("ABC").unwrap().cart(), ["830"]);
        // Adding to the cart does not reserve stock.
        assert_eq!(stock(&store, "830"), 9);
    }

    #[test]
    fn test_add_out_of_stock_leaves_cart_unchanged() {
        let mut store = Store::new();
        store.add_product(Product::new("1", "Gone", "sold out", Money::from_dollars(10), 0));
        store.add_member(Customer::new("David", "ABC", false));

        assert_eq!(store.add_product_to_member_cart("1", "ABC"), CartAddStatus::OutOfStock);
        assert!(store.find_member("ABC").unwrap().cart().is_empty());
    }

    #[test]
    fn test_add_to_cart_with_first_entry_lookup() {
        let mut store = sample_store(CheckoutPolicy::legacy());
        assert_eq!(store.add_product_to_member_cart("830", "ABC"), CartAddStatus::Added);
        assert_eq!(store.add_product_to_member_cart("835", "ABC"), CartAddStatus::ProductNotFound);
        assert_eq!(store.add_product_to_member_cart("830", "XYZ"), CartAddStatus::MemberNotFound);
        assert_eq!(store.find_member("ABC").unwrap().cart(), ["830"]);
    }

    #[test]
    fn test_non_premium_checkout_compounds_per_line() {
        let mut store = sample_store(CheckoutPolicy::default());
        fill_cart(&mut store, "ABC", &["830", "835", "5"]);

        let total = store.checkout_member("ABC").unwrap();

        // ((300 × 1.07 + 400) × 1.07 + 350) × 1.07 = 1199.9729
        assert_eq!(total.cents(), 119_997);
        let float = ((300.0 * 1.07 + 400.0) * 1.07 + 350.0) * 1.07;
        assert!((total.cents() as f64 / 100.0 - float).abs() < 0.01);

        assert_eq!(stock(&store, "830"), 8);
        assert_eq!(stock(&store, "835"), 4);
        assert_eq!(stock(&store, "5"), 6);
        assert!(store.find_member("ABC").unwrap().cart().is_empty());
    }

    #[test]
    fn test_compounding_total_matches_formula_for_long_carts() {
        let mut store = Store::new();
        store.add_product(Product::new("1", "Sticker", "vinyl sticker", Money::from_cents(1), 20));
        store.add_member(Customer::new("David", "ABC", false));
        fill_cart(&mut store, "ABC", &["1"; 10]);

        let total = store.checkout_member("ABC").unwrap();

        let formula: f64 = (1..=10).map(|k| 0.01 * 1.07f64.powi(k)).sum();
        assert!((total.cents() as f64 / 100.0 - formula).abs() < 0.005);
        assert_eq!(total.cents(), 15);
        assert_eq!(stock(&store, "1"), 10);
    }

    #[test]
    fn test_premium_checkout_has_no_surcharge() {
        let mut store = sample_store(CheckoutPolicy::default());
        fill_cart(&mut store, "XYZ", &["830", "835", "5"]);

        let total = store.checkout_member("XYZ").unwrap();
        assert_eq!(total, Money::from_dollars(1050));
    }

    #[test]
    fn test_flat_surcharge_applies_once() {
        let policy = CheckoutPolicy {
            surcharge_mode: SurchargeMode::Flat,
            ..CheckoutPolicy::default()
        };
        let mut store = sample_store(policy);
        fill_cart(&mut store, "ABC", &["830", "835", "5"]);

        // $1050 × 1.07
        assert_eq!(store.checkout_member("ABC").unwrap(), Money::from_cents(112_350));
    }

    #[test]
    fn test_custom_surcharge_rate() {
        let policy = CheckoutPolicy {
            surcharge_rate: SurchargeRate::from_bps(1000),
            ..CheckoutPolicy::default()
        };
        let mut store = sample_store(policy);
        fill_cart(&mut store, "ABC", &["830", "830"]);

        // (300 × 1.1 + 300) × 1.1 = 693
        assert_eq!(store.checkout_member("ABC").unwrap(), Money::from_dollars(693));
    }

    #[test]
    fn test_checkout_unknown_member_is_invalid() {
        let mut store = sample_store(CheckoutPolicy::default());
        fill_cart(&mut store, "ABC", &["830"]);
        let before = store.clone();

        let err = store.checkout_member("NOPE").unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidCheckout {
                member_id: "NOPE".to_string()
            }
        );
        assert_eq!(store.inventory(), before.inventory());
        assert_eq!(store.members(), before.members());
    }

    #[test]
    fn test_checkout_skips_out_of_stock_and_clears_cart() {
        let mut store = Store::new();
        store.add_product(Product::new("1", "Last One", "only one left", Money::from_dollars(100), 1));
        store.add_member(Customer::new("David", "ABC", true));
        fill_cart(&mut store, "ABC", &["1", "1", "1"]);

        let receipt = store.checkout_member_with_receipt("ABC").unwrap();
        assert_eq!(receipt.total, Money::from_dollars(100));
        assert_eq!(receipt.charged_count(), 1);
        assert_eq!(receipt.skipped, ["1", "1"]);
        assert_eq!(stock(&store, "1"), 0);
        assert!(store.find_member("ABC").unwrap().cart().is_empty());
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut store = sample_store(CheckoutPolicy::default());
        assert_eq!(store.checkout_member("ABC").unwrap(), Money::zero());
    }

    #[test]
    fn test_checkout_unresolved_cart_item_keeps_prior_decrements() {
        let mut store = sample_store(CheckoutPolicy::default());
        fill_cart(&mut store, "ABC", &["830"]);
        store.find_member_mut("ABC").unwrap().add_to_cart("999");
        fill_cart(&mut store, "ABC", &["835"]);

        let err = store.checkout_member("ABC").unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnresolvedCartItem { ref product_id, .. } if product_id == "999"
        ));

        // No rollback for the line charged before the failure.
        assert_eq!(stock(&store, "830"), 8);
        assert_eq!(stock(&store, "835"), 5);
        assert_eq!(store.find_member("ABC").unwrap().cart(), ["830", "999", "835"]);
    }

    #[test]
    fn test_legacy_checkout_cannot_resolve_later_products() {
        let mut store = sample_store(CheckoutPolicy::legacy());
        fill_cart(&mut store, "ABC", &["830"]);
        store.find_member_mut("ABC").unwrap().add_to_cart("835");

        assert!(matches!(
            store.checkout_member("ABC"),
            Err(StoreError::UnresolvedCartItem { .. })
        ));
    }

    #[test]
    fn test_legacy_sample_flow() {
        // Only "830" makes it into the cart under first-entry lookup.
        let mut store = sample_store(CheckoutPolicy::legacy());
        for id in ["830", "835", "5"] {
            store.add_product_to_member_cart(id, "ABC");
        }
        assert_eq!(store.find_member("ABC").unwrap().cart(), ["830"]);
        assert_eq!(store.checkout_member("ABC").unwrap(), Money::from_dollars(321));
    }

    #[test]
    fn test_receipt_lines_track_running_total() {
        let mut store = sample_store(CheckoutPolicy::default());
        fill_cart(&mut store, "ABC", &["830", "835"]);

        let receipt = store.checkout_member_with_receipt("ABC").unwrap();
        assert_eq!(receipt.member_id, "ABC");
        assert!(!receipt.premium);
        assert_eq!(receipt.lines[0].product_id, "830");
        assert_eq!(receipt.lines[0].running_total, Money::from_cents(32_100));
        assert_eq!(receipt.lines[1].title, "Playstation");
        assert_eq!(receipt.lines[1].unit_price, Money::from_dollars(400));
        assert_eq!(receipt.lines[1].running_total, Money::from_cents(77_147));
        assert_eq!(receipt.total, Money::from_cents(77_147));
        assert!(receipt.skipped.is_empty());
    }
}
