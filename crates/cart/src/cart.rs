use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use storefront_core::{CartId, Entity, ProductId, UserId};

/// One line of a cart: a product and how many of it.
///
/// Unique per `(cart, product)` pair. Quantity is at least 1 — zero and
/// negative quantities are rejected at the service boundary before they
/// reach the aggregate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    product_id: ProductId,
    quantity: u32,
}

impl CartItem {
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Aggregate root: one user's pending selections.
///
/// Items are keyed by product in a `BTreeMap`, which both enforces the
/// one-item-per-product rule and yields iteration in ascending product id
/// order — the fixed global order checkout uses when acquiring row locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    id: CartId,
    user_id: UserId,
    items: BTreeMap<ProductId, CartItem>,
}

impl Cart {
    pub fn new(id: CartId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            items: BTreeMap::new(),
        }
    }

    pub fn id_typed(&self) -> CartId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities (the storefront's cart badge count).
    ///
    /// Recomputed on every call; never cached on the aggregate.
    pub fn item_count(&self) -> u32 {
        self.items.values().map(CartItem::quantity).sum()
    }

    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.items.get(&product_id).map_or(0, CartItem::quantity)
    }

    /// Items in ascending product id order.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Add `quantity` of a product.
    ///
    /// Merge rule: if an item for this product already exists its quantity
    /// is incremented; otherwise a new item is created. Returns the
    /// resulting line.
    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> CartItem {
        let item = self
            .items
            .entry(product_id)
            .and_modify(|item| item.quantity += quantity)
            .or_insert(CartItem {
                product_id,
                quantity,
            });
        *item
    }

    /// Replace a line's quantity outright (no merge).
    ///
    /// Returns `None` when the product is not in the cart; the boundary
    /// maps that to a not-found error.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Option<CartItem> {
        let item = self.items.get_mut(&product_id)?;
        item.quantity = quantity;
        Some(*item)
    }

    /// Remove a line. Removing an absent line is a no-op success.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.remove(&product_id);
    }

    /// Drop every line. Idempotent.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl Entity for Cart {
    type Id = CartId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
