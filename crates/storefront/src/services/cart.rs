//! Cart state container.
//!
//! The cart lives entirely on the client: it is loaded once from the store
//! and every mutation writes the whole serialized cart back before the new
//! state becomes visible. There is no debouncing and no server copy.
//!
//! Lines are merged on add only when product, color and size all match.
//! Removal and quantity updates treat an omitted color or size as "any".

use std::sync::{Arc, PoisonError, RwLock};

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use dokan_core::{Price, ProductId};

use crate::error::add_breadcrumb;
use crate::models::{CartItem, storage_keys};
use crate::storage::{KeyValueStore, StorageError, StoreExt};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// An added line must carry at least one unit.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Merging quantities would overflow.
    #[error("quantity too large")]
    QuantityOverflow,

    /// The cart total would not fit a `Decimal`.
    #[error("cart total too large")]
    TotalOverflow,

    /// The cart could not be persisted; the previous cart is still in place.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),
}

/// Cart state container.
pub struct CartContainer {
    store: Arc<dyn KeyValueStore>,
    items: RwLock<Vec<CartItem>>,
}

impl CartContainer {
    /// Load the cart from the store.
    ///
    /// Missing or unreadable data yields an empty cart.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let items = match store.get_json::<Vec<CartItem>>(storage_keys::CART) {
            Ok(Some(items)) => items.into_iter().filter(|i| i.quantity > 0).collect(),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Stored cart is unreadable, starting empty");
                Vec::new()
            }
        };
        debug!(lines = items.len(), "Loaded cart");

        Self {
            store,
            items: RwLock::new(items),
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Snapshot of the line items in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.read().clone()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether any line matches the filter (absent color/size match anything).
    #[must_use]
    pub fn contains(&self, product_id: &ProductId, color: Option<&str>, size: Option<&str>) -> bool {
        self.read()
            .iter()
            .any(|item| item.matches_filter(product_id, color, size))
    }

    /// Sum of price × quantity over all lines.
    #[must_use]
    pub fn get_cart_total(&self) -> Decimal {
        self.read()
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The cart total as a toman [`Price`].
    #[must_use]
    pub fn total_price(&self) -> Price {
        Price::toman(self.get_cart_total())
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn get_cart_items_count(&self) -> u64 {
        self.read().iter().map(|item| u64::from(item.quantity)).sum()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add an item, merging into an identical (product, color, size) line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` for a zero quantity,
    /// `CartError::QuantityOverflow` if the merged quantity overflows,
    /// `CartError::TotalOverflow` if the cart total would not fit, or
    /// `CartError::Storage` if the cart cannot be persisted.
    pub fn add_to_cart(&self, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let product_id = item.product_id.to_string();

        self.mutate(|items| {
            if let Some(line) = items.iter_mut().find(|line| line.same_line(&item)) {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or(CartError::QuantityOverflow)?;
            } else {
                items.push(item);
            }
            Ok(())
        })?;

        add_breadcrumb("cart", "Added item", Some(&[("product_id", &product_id)]));
        Ok(())
    }

    /// Remove every line matching the product and, when given, color and size.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be persisted.
    pub fn remove_from_cart(
        &self,
        product_id: &ProductId,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), CartError> {
        self.mutate(|items| {
            items.retain(|item| !item.matches_filter(product_id, color, size));
            Ok(())
        })?;
        add_breadcrumb(
            "cart",
            "Removed item",
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(())
    }

    /// Set the quantity on every matching line; zero or less removes them.
    ///
    /// # Errors
    ///
    /// Returns `CartError::QuantityOverflow` if `quantity` does not fit a
    /// line quantity, `CartError::TotalOverflow` if the cart total would not
    /// fit, or `CartError::Storage` if the cart cannot be persisted.
    pub fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
        color: Option<&str>,
        size: Option<&str>,
    ) -> Result<(), CartError> {
        if quantity <= 0 {
            return self.remove_from_cart(product_id, color, size);
        }
        let quantity = u32::try_from(quantity).map_err(|_| CartError::QuantityOverflow)?;

        self.mutate(|items| {
            items
                .iter_mut()
                .filter(|item| item.matches_filter(product_id, color, size))
                .for_each(|item| item.quantity = quantity);
            Ok(())
        })
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` if the cart cannot be persisted.
    pub fn clear_cart(&self) -> Result<(), CartError> {
        self.mutate(|items| {
            items.clear();
            Ok(())
        })?;
        add_breadcrumb("cart", "Cleared cart", None);
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Apply `change` to a copy, persist the copy, then publish it.
    fn mutate(
        &self,
        change: impl FnOnce(&mut Vec<CartItem>) -> Result<(), CartError>,
    ) -> Result<(), CartError> {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = items.clone();
        change(&mut next)?;
        if checked_total(&next).is_none() {
            return Err(CartError::TotalOverflow);
        }
        self.store.set_json(storage_keys::CART, &next)?;
        debug!(lines = next.len(), "Persisted cart");
        *items = next;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<CartItem>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sum of line totals, or `None` on overflow.
fn checked_total(items: &[CartItem]) -> Option<Decimal> {
    items.iter().try_fold(Decimal::ZERO, |total, item| {
        total.checked_add(item.checked_line_total()?)
    })
}

impl std::fmt::Debug for CartContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartContainer")
            .field("items", &*self.read())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn item(product: &str, price: i64, quantity: u32, color: Option<&str>, size: Option<&str>) -> CartItem {
        CartItem {
            product_id: ProductId::new(product),
            name: format!("محصول {product}"),
            price: Decimal::new(price, 0),
            image: format!("/images/{product}.jpg"),
            quantity,
            color: color.map(String::from),
            size: size.map(String::from),
        }
    }

    fn empty_cart() -> (CartContainer, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CartContainer::load(store.clone()), store)
    }

    fn stored_items(store: &MemoryStore) -> Vec<CartItem> {
        store.get_json(storage_keys::CART).unwrap().unwrap_or_default()
    }

    #[test]
    fn test_add_same_line_merges_quantities() {
        let (cart, store) = empty_cart();
        cart.add_to_cart(item("p1", 100, 2, Some("red"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 3, Some("red"), Some("M")))
            .unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(stored_items(&store), items);
    }

    #[test]
    fn test_repeated_adds_sum_quantities() {
        let (cart, _) = empty_cart();
        let quantities = [1, 4, 2, 7, 3];
        for q in quantities {
            cart.add_to_cart(item("p9", 10, q, None, Some("XL"))).unwrap();
        }
        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, quantities.iter().sum::<u32>());
    }

    #[test]
    fn test_different_variants_are_distinct_lines() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(item("p1", 100, 1, Some("red"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, Some("blue"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, None, None)).unwrap();

        let colors: Vec<_> = cart.items().into_iter().map(|i| i.color).collect();
        assert_eq!(
            colors,
            vec![Some("red".to_string()), Some("blue".to_string()), None]
        );
    }

    #[test]
    fn test_add_zero_quantity_is_rejected() {
        let (cart, store) = empty_cart();
        let err = cart.add_to_cart(item("p1", 100, 0, None, None)).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity));
        assert!(cart.is_empty());
        assert!(!store.contains(storage_keys::CART));
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(item("p1", 100, 2, Some("red"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, Some("red"), Some("L")))
            .unwrap();

        cart.update_quantity(&ProductId::new("p1"), 0, Some("red"), Some("M"))
            .unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].size.as_deref(), Some("L"));
        assert!(!cart.contains(&ProductId::new("p1"), Some("red"), Some("M")));
    }

    #[test]
    fn test_update_quantity_uses_wildcards() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(item("p1", 100, 2, Some("red"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, Some("blue"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p2", 100, 1, None, None)).unwrap();

        cart.update_quantity(&ProductId::new("p1"), 4, None, Some("M"))
            .unwrap();

        let quantities: Vec<_> = cart.items().iter().map(|i| i.quantity).collect();
        assert_eq!(quantities, vec![4, 4, 1]);
    }

    #[test]
    fn test_remove_without_variant_removes_all_lines_of_product() {
        let (cart, store) = empty_cart();
        cart.add_to_cart(item("p1", 100, 1, Some("red"), Some("M")))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, Some("blue"), None))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, None, None)).unwrap();
        cart.add_to_cart(item("p2", 50, 1, None, None)).unwrap();

        cart.remove_from_cart(&ProductId::new("p1"), None, None)
            .unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].product_id.as_str(), "p2");
        assert_eq!(stored_items(&store), items);
    }

    #[test]
    fn test_remove_with_color_requires_exact_color() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(item("p1", 100, 1, Some("red"), None))
            .unwrap();
        cart.add_to_cart(item("p1", 100, 1, None, None)).unwrap();

        cart.remove_from_cart(&ProductId::new("p1"), Some("red"), None)
            .unwrap();

        let items = cart.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].color, None);
    }

    #[test]
    fn test_total_and_count() {
        let (cart, _) = empty_cart();
        cart.add_to_cart(item("p1", 100, 2, None, None)).unwrap();
        cart.add_to_cart(item("p2", 50, 1, None, None)).unwrap();

        assert_eq!(cart.get_cart_total(), Decimal::new(250, 0));
        assert_eq!(cart.get_cart_items_count(), 3);
        assert_eq!(cart.total_price().display(), "250 تومان");
    }

    #[test]
    fn test_total_overflow_is_rejected() {
        let (cart, store) = empty_cart();
        let mut pricey = item("p1", 0, 1, None, None);
        pricey.price = Decimal::MAX;
        cart.add_to_cart(pricey.clone()).unwrap();

        let err = cart.add_to_cart(pricey.clone()).unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));
        let err = cart
            .update_quantity(&ProductId::new("p1"), 2, None, None)
            .unwrap_err();
        assert!(matches!(err, CartError::TotalOverflow));

        assert_eq!(cart.items(), vec![pricey.clone()]);
        assert_eq!(stored_items(&store), vec![pricey]);
        assert_eq!(cart.get_cart_total(), Decimal::MAX);
    }

    #[test]
    fn test_oversized_stored_cart_total_saturates() {
        let store = Arc::new(MemoryStore::new());
        let mut pricey = item("p1", 0, 3, None, None);
        pricey.price = Decimal::MAX;
        store
            .set_json(storage_keys::CART, &vec![pricey, item("p2", 10, 1, None, None)])
            .unwrap();

        let cart = CartContainer::load(store);

        assert_eq!(cart.get_cart_total(), Decimal::MAX);
        assert_eq!(cart.get_cart_items_count(), 4);
    }

    #[test]
    fn test_clear_cart_empties_store() {
        let (cart, store) = empty_cart();
        cart.add_to_cart(item("p1", 100, 2, None, None)).unwrap();

        cart.clear_cart().unwrap();

        assert_eq!(cart.get_cart_items_count(), 0);
        assert!(stored_items(&store).is_empty());
    }

    #[test]
    fn test_cart_survives_reload() {
        let store = Arc::new(MemoryStore::new());
        {
            let cart = CartContainer::load(store.clone());
            cart.add_to_cart(item("p1", 120, 2, Some("مشکی"), Some("42")))
                .unwrap();
        }
        let reloaded = CartContainer::load(store);
        assert_eq!(reloaded.get_cart_items_count(), 2);
        assert_eq!(reloaded.items()[0].color.as_deref(), Some("مشکی"));
    }

    #[test]
    fn test_corrupt_stored_cart_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(storage_keys::CART, "{\"oops\":").unwrap();
        let cart = CartContainer::load(store);
        assert!(cart.is_empty());
    }
}
