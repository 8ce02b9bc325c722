//! Shopping cart line items and the grouped-by-store projection.
//!
//! A [`Cart`] holds one [`CartLineItem`] per distinct product, in the order
//! products were first added. Quantities never drop below 1: removing the
//! last unit deletes the line.

use serde::{Deserialize, Serialize};

use crate::types::{Kroner, Product, ProductId};

/// Store code used for products that carry no store reference.
pub const UNKNOWN_STORE_CODE: &str = "unknown_code";

/// Display name of the [`UNKNOWN_STORE_CODE`] group.
pub const UNKNOWN_STORE_NAME: &str = "Ukjent Butikk";

/// One product and its requested quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartLineItem {
    /// Shelf price times quantity. A product without a price counts as zero.
    #[must_use]
    pub fn line_total(&self) -> Kroner {
        self.product.current_price.unwrap_or(Kroner::ZERO) * self.quantity
    }

    fn store_code(&self) -> &str {
        self.product
            .store
            .as_ref()
            .map_or(UNKNOWN_STORE_CODE, |store| store.code.as_str())
    }

    fn store_name(&self) -> &str {
        self.product
            .store
            .as_ref()
            .map_or(UNKNOWN_STORE_NAME, |store| store.name.as_str())
    }
}

/// Insertion-ordered cart keyed by product ID.
///
/// Serializes as a JSON array of `{ product, quantity }`. Deserializing
/// normalizes the input: zero-quantity entries are dropped and repeated
/// product IDs are merged into their first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

/// Cart lines sharing one store, as shown on the shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreGroup<'a> {
    pub store_code: &'a str,
    pub store_name: &'a str,
    pub items: Vec<&'a CartLineItem>,
}

impl StoreGroup<'_> {
    /// Sum of the group's line totals.
    #[must_use]
    pub fn total(&self) -> Kroner {
        self.items.iter().map(|item| item.line_total()).sum()
    }
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from arbitrary line items, restoring the cart invariants.
    #[must_use]
    pub fn from_line_items(line_items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in line_items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(item.product.id) {
                Some(index) => {
                    if let Some(existing) = cart.items.get_mut(index) {
                        existing.quantity = existing.quantity.saturating_add(item.quantity);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Add one unit of `product`. Returns the new quantity.
    pub fn add(&mut self, product: Product) -> u32 {
        if let Some(item) = self.get_mut(product.id) {
            item.quantity = item.quantity.saturating_add(1);
            return item.quantity;
        }
        self.items.push(CartLineItem {
            product,
            quantity: 1,
        });
        1
    }

    /// Remove one unit of `product_id`.
    ///
    /// Returns the remaining quantity (`Some(0)` when the line was deleted),
    /// or `None` if the product was not in the cart.
    pub fn remove_one(&mut self, product_id: ProductId) -> Option<u32> {
        let index = self.position(product_id)?;
        let item = self.items.get_mut(index)?;
        item.quantity -= 1;
        let remaining = item.quantity;
        if remaining == 0 {
            self.items.remove(index);
        }
        Some(remaining)
    }

    /// Delete the line for `product_id` regardless of quantity.
    ///
    /// Returns whether a line was deleted.
    pub fn remove_all(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.id != product_id);
        self.items.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Look up the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.product.id == product_id)
    }

    /// Quantity of `product_id`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |item| item.quantity)
    }

    /// Whether the cart has a line for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn total(&self) -> Kroner {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Distinct store codes of products that carry a store, in first-seen order.
    #[must_use]
    pub fn store_codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = Vec::new();
        for store in self.items.iter().filter_map(|item| item.product.store.as_ref()) {
            if !codes.contains(&store.code.as_str()) {
                codes.push(store.code.as_str());
            }
        }
        codes
    }

    /// Partition the cart by store.
    ///
    /// Groups appear in the order their store code was first seen; items
    /// keep cart order. Products without a store land in the
    /// [`UNKNOWN_STORE_CODE`] group. Every line appears in exactly one group.
    #[must_use]
    pub fn group_by_store(&self) -> Vec<StoreGroup<'_>> {
        let mut groups: Vec<StoreGroup<'_>> = Vec::new();
        for item in &self.items {
            let code = item.store_code();
            match groups.iter_mut().find(|group| group.store_code == code) {
                Some(group) => group.items.push(item),
                None => groups.push(StoreGroup {
                    store_code: code,
                    store_name: item.store_name(),
                    items: vec![item],
                }),
            }
        }
        groups
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product.id == product_id)
    }

    fn get_mut(&mut self, product_id: ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product.id == product_id)
    }
}

impl From<Vec<CartLineItem>> for Cart {
    fn from(items: Vec<CartLineItem>) -> Self {
        Self::from_line_items(items)
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn milk() -> Product {
        Product::new(ProductId::new(1), "Lettmelk", Kroner::whole(22)).with_store("KIWI", "Kiwi")
    }

    fn bread() -> Product {
        Product::new(ProductId::new(2), "Grovbrød", Kroner::whole(35)).with_store("MENY_NO", "Meny")
    }

    fn cheese() -> Product {
        Product::new(ProductId::new(3), "Norvegia", Kroner::whole(110)).with_store("KIWI", "Kiwi")
    }

    fn apples() -> Product {
        Product::new(ProductId::new(4), "Epler", Kroner::whole(30))
    }

    #[test]
    fn test_add_counts_calls() {
        let mut cart = Cart::new();
        for expected in 1..=5 {
            assert_eq!(cart.add(milk()), expected);
        }
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);
    }

    #[test]
    fn test_remove_after_adds_deletes_line_at_zero() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(milk());
        }
        assert_eq!(cart.remove_one(ProductId::new(1)), Some(2));
        assert_eq!(cart.remove_one(ProductId::new(1)), Some(1));
        assert_eq!(cart.remove_one(ProductId::new(1)), Some(0));
        assert!(!cart.contains(ProductId::new(1)));
        assert_eq!(cart.remove_one(ProductId::new(1)), None);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut cart = Cart::new();
        cart.add(milk());
        assert_eq!(cart.remove_one(ProductId::new(99)), None);
        assert!(!cart.remove_all(ProductId::new(99)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_remove_all_is_idempotent() {
        let mut cart = Cart::new();
        cart.add(milk());
        cart.add(milk());
        cart.add(bread());

        assert!(cart.remove_all(ProductId::new(1)));
        assert!(!cart.contains(ProductId::new(1)));
        let after_first = cart.clone();

        assert!(!cart.remove_all(ProductId::new(1)));
        assert_eq!(cart, after_first);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(bread());
        cart.add(milk());
        cart.add(bread());

        let ids: Vec<i64> = cart.items().iter().map(|i| i.product.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(milk());
        cart.add(bread());
        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_group_by_store_order_and_sentinel() {
        let mut cart = Cart::new();
        cart.add(milk());
        cart.add(apples());
        cart.add(bread());
        cart.add(cheese());

        let groups = cart.group_by_store();
        let codes: Vec<&str> = groups.iter().map(|g| g.store_code).collect();
        assert_eq!(codes, vec!["KIWI", UNKNOWN_STORE_CODE, "MENY_NO"]);

        let kiwi = &groups[0];
        assert_eq!(kiwi.store_name, "Kiwi");
        let kiwi_ids: Vec<i64> = kiwi.items.iter().map(|i| i.product.id.as_i64()).collect();
        assert_eq!(kiwi_ids, vec![1, 3]);

        assert_eq!(groups[1].store_name, UNKNOWN_STORE_NAME);
        assert_eq!(groups[1].items.len(), 1);
    }

    #[test]
    fn test_group_by_store_covers_every_item_once() {
        let mut cart = Cart::new();
        for product in [milk(), bread(), cheese(), apples(), milk()] {
            cart.add(product);
        }
        let groups = cart.group_by_store();
        let grouped: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(grouped, cart.len());
        assert_eq!(groups, cart.group_by_store());
    }

    #[test]
    fn test_no_sentinel_group_when_all_have_store() {
        let mut cart = Cart::new();
        cart.add(milk());
        cart.add(bread());
        assert!(
            cart.group_by_store()
                .iter()
                .all(|g| g.store_code != UNKNOWN_STORE_CODE)
        );
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::new();
        cart.add(milk());
        cart.add(milk());
        cart.add(cheese());

        assert_eq!(cart.get(ProductId::new(1)).unwrap().line_total(), Kroner::whole(44));
        assert_eq!(cart.total(), Kroner::whole(154));
        assert_eq!(cart.unit_count(), 3);
        assert_eq!(cart.group_by_store()[0].total(), Kroner::whole(154));
    }

    #[test]
    fn test_unpriced_product_counts_as_zero() {
        let mut unpriced = apples();
        unpriced.current_price = None;

        let mut cart = Cart::new();
        cart.add(unpriced.clone());
        cart.add(unpriced);
        cart.add(milk());

        assert_eq!(cart.get(ProductId::new(4)).unwrap().line_total(), Kroner::ZERO);
        assert_eq!(cart.total(), Kroner::whole(22));
    }

    #[test]
    fn test_store_codes_unique_in_order() {
        let mut cart = Cart::new();
        cart.add(cheese());
        cart.add(apples());
        cart.add(bread());
        cart.add(milk());
        assert_eq!(cart.store_codes(), vec!["KIWI", "MENY_NO"]);
    }

    #[test]
    fn test_json_round_trip_preserves_order_and_quantities() {
        let mut cart = Cart::new();
        cart.add(bread());
        cart.add(milk());
        cart.add(milk());
        cart.add(apples());

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);

        let json_again = serde_json::to_string(&restored).unwrap();
        assert_eq!(json_again, json);
    }

    #[test]
    fn test_json_shape_is_array_of_product_and_quantity() {
        let mut cart = Cart::new();
        cart.add(milk());
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["quantity"], 1);
        assert_eq!(value[0]["product"]["id"], 1);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"[
            {"product": {"id": 1, "name": "Lettmelk", "current_price": 22}, "quantity": 2},
            {"product": {"id": 2, "name": "Grovbrød", "current_price": 35}, "quantity": 0},
            {"product": {"id": 1, "name": "Lettmelk", "current_price": 22}, "quantity": 3}
        ]"#;
        let cart: Cart = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 5);
    }
}
