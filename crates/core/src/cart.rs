//! Shopping cart kept in a key-value store.
//!
//! The cart is the only state the frontend owns. It is a list of product
//! snapshots with quantities, keyed by product id, and is only sent to the
//! backend at checkout. Adding a product that is already in the cart
//! increments that line instead of adding a second one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{OrderLine, Product};
use crate::storage::{KeyValueStore, StorageError};
use crate::types::{Price, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Requested quantity exceeds known stock.
    #[error("only {available} left in stock")]
    InsufficientStock {
        /// Units the product has.
        available: u32,
    },

    /// The product is not for sale.
    #[error("{0} is not available")]
    Unavailable(String),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One cart line: a snapshot of the product plus a quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Stock at the time the product was added; 0 means unknown.
    #[serde(default)]
    pub stock: u32,
    pub quantity: u32,
}

impl CartItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    fn check_stock(&self, quantity: u32) -> Result<(), CartError> {
        check_stock(self.stock, quantity)
    }
}

/// Stock of 0 is unknown and never caps.
const fn check_stock(stock: u32, quantity: u32) -> Result<(), CartError> {
    if stock > 0 && quantity > stock {
        return Err(CartError::InsufficientStock { available: stock });
    }
    Ok(())
}

/// The cart contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Add `quantity` units of `product`, merging with an existing line.
    /// Returns the line's quantity afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero, the product is off sale, or
    /// the merged quantity would exceed the product's known stock. A refused
    /// add leaves the cart unchanged.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !product.purchasable() {
            return Err(CartError::Unavailable(product.name.clone()));
        }
        let stock = u32::try_from(product.stock).unwrap_or(0);

        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            let merged = item.quantity.saturating_add(quantity);
            check_stock(stock, merged)?;
            // Refresh the snapshot so the cart shows current price and stock.
            item.name.clone_from(&product.name);
            item.price = product.price;
            item.image_url.clone_from(&product.image_url);
            item.stock = stock;
            item.quantity = merged;
            return Ok(merged);
        }

        check_stock(stock, quantity)?;
        self.items.push(CartItem {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            stock,
            quantity,
        });
        Ok(quantity)
    }

    /// Set a line's quantity. Zero removes the line.
    ///
    /// Returns `false` when the product is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity exceeds the line's known stock.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove(product_id));
        }
        let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) else {
            return Ok(false);
        };
        item.check_stock(quantity)?;
        item.quantity = quantity;
        Ok(true)
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() < before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Subtotal for display.
    #[must_use]
    pub fn display_subtotal(&self) -> String {
        Price::of(self.subtotal()).display()
    }

    /// Lines to send with `POST /api/orders`.
    #[must_use]
    pub fn checkout_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
            })
            .collect()
    }
}

/// Loads and saves a [`Cart`] as JSON in a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct CartStore<S> {
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Storage key the cart lives under.
    pub const KEY: &'static str = "cart";

    /// Wrap a store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the cart. Missing or corrupt data reads as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself fails.
    pub async fn load(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.store.get(Self::KEY).await? else {
            return Ok(Cart::new());
        };
        match serde_json::from_str(&raw) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable cart");
                Ok(Cart::new())
            }
        }
    }

    /// Write the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the store fails.
    pub async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        if cart.is_empty() {
            return self.store.remove(Self::KEY).await;
        }
        let raw = serde_json::to_string(cart)?;
        self.store.set(Self::KEY, raw).await
    }

    /// Load, apply `f`, and save if `f` succeeded.
    ///
    /// # Errors
    ///
    /// Returns the error from `f` (nothing is saved) or from the store.
    pub async fn update<T, F>(&self, f: F) -> Result<(Cart, T), CartError>
    where
        F: FnOnce(&mut Cart) -> Result<T, CartError> + Send,
    {
        let mut cart = self.load().await?;
        let out = f(&mut cart)?;
        self.save(&cart).await?;
        Ok((cart, out))
    }

    /// Drop the cart, e.g. after checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(Self::KEY).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::ProductStatus;

    fn product(id: i64, price_cents: i64, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Snack {id}"),
            description: None,
            price: Decimal::new(price_cents, 2),
            stock,
            image_url: None,
            category_id: None,
            category_name: None,
            status: ProductStatus::OnSale,
            sales: 0,
        }
    }

    #[test]
    fn test_add_same_product_merges_quantity() {
        let mut cart = Cart::new();
        cart.add(&product(1, 250, 10), 1).unwrap();
        cart.add(&product(2, 100, 10), 1).unwrap();
        assert_eq!(cart.add(&product(1, 250, 10), 2).unwrap(), 3);
        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].product_id, ProductId::new(1));
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), Decimal::new(850, 2));
        assert_eq!(cart.display_subtotal(), "$8.50");
    }

    #[test]
    fn test_add_rejects_zero_and_unavailable() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add(&product(1, 100, 5), 0),
            Err(CartError::InvalidQuantity)
        ));

        let mut off = product(2, 100, 5);
        off.status = ProductStatus::OffSale;
        assert!(matches!(cart.add(&off, 1), Err(CartError::Unavailable(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_unknown_stock_is_not_capped() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Pocky",
            "price": "2.50",
            "status": "ON_SALE"
        }))
        .unwrap();
        let mut cart = Cart::new();
        assert_eq!(cart.add(&product, 1).unwrap(), 1);
        assert_eq!(cart.add(&product, 40).unwrap(), 41);
        assert!(cart.set_quantity(ProductId::new(1), 500).unwrap());
        assert_eq!(cart.items()[0].stock, 0);
    }

    #[test]
    fn test_add_enforces_stock_on_merge() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 3), 2).unwrap();
        let err = cart.add(&product(1, 100, 3), 2).unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { available: 3 }));
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_refused_merge_leaves_line_untouched() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 10), 2).unwrap();
        let before = cart.clone();

        let mut repriced = product(1, 150, 3);
        repriced.name = "Renamed".to_string();
        assert!(matches!(
            cart.add(&repriced, 2),
            Err(CartError::InsufficientStock { available: 3 })
        ));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(&product(1, 100, 10), 1).unwrap();
        assert!(cart.set_quantity(ProductId::new(1), 4).unwrap());
        assert_eq!(cart.item_count(), 4);
        assert!(!cart.set_quantity(ProductId::new(9), 1).unwrap());
        assert!(cart.set_quantity(ProductId::new(1), 11).is_err());
        assert!(cart.set_quantity(ProductId::new(1), 0).unwrap());
        assert!(cart.is_empty());
        assert!(!cart.remove(ProductId::new(1)));
    }

    #[test]
    fn test_checkout_lines() {
        let mut cart = Cart::new();
        cart.add(&product(5, 100, 10), 2).unwrap();
        assert_eq!(
            cart.checkout_lines(),
            vec![OrderLine {
                product_id: ProductId::new(5),
                quantity: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_store_round_trip_and_clear() {
        let store = CartStore::new(MemoryStore::new());
        let (cart, ()) = store
            .update(|cart| cart.add(&product(1, 199, 10), 2).map(|_| ()))
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap(), cart);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_update_is_not_saved() {
        let backing = MemoryStore::new();
        let store = CartStore::new(backing.clone());
        store
            .update(|cart| cart.add(&product(1, 100, 1), 1).map(|_| ()))
            .await
            .unwrap();
        let result = store
            .update(|cart| cart.add(&product(1, 100, 1), 1).map(|_| ()))
            .await;
        assert!(result.is_err());
        assert_eq!(store.load().await.unwrap().item_count(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_cart_loads_empty() {
        let backing = MemoryStore::new();
        backing
            .set(CartStore::<MemoryStore>::KEY, "{not json".to_string())
            .await
            .unwrap();
        let store = CartStore::new(backing);
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_emptying_cart_removes_key() {
        let backing = MemoryStore::new();
        let store = CartStore::new(backing.clone());
        store
            .update(|cart| cart.add(&product(1, 100, 5), 1).map(|_| ()))
            .await
            .unwrap();
        assert_eq!(backing.len(), 1);
        store
            .update(|cart| cart.set_quantity(ProductId::new(1), 0).map(|_| ()))
            .await
            .unwrap();
        assert!(backing.is_empty());
    }
}
