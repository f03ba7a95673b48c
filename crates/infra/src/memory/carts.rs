use std::collections::HashMap;

use parking_lot::RwLock;

use storefront_cart::Cart;
use storefront_checkout::store::{CartStore, StoreError};
use storefront_core::{CartId, UserId};

/// In-memory cart store. One cart per user; the whole aggregate is the
/// persistence unit.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<UserId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for InMemoryCartStore {
    fn load(&self, user: UserId) -> Result<Option<Cart>, StoreError> {
        Ok(self.carts.read().get(&user).cloned())
    }

    fn get_or_create(&self, user: UserId) -> Result<Cart, StoreError> {
        Ok(self
            .carts
            .write()
            .entry(user)
            .or_insert_with(|| Cart::new(CartId::new(), user))
            .clone())
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        self.carts.write().insert(cart.user_id(), cart.clone());
        Ok(())
    }

    fn clear(&self, cart_id: CartId) -> Result<(), StoreError> {
        let mut carts = self.carts.write();
        if let Some(cart) = carts.values_mut().find(|cart| cart.id_typed() == cart_id) {
            cart.clear();
        }
        // Unknown cart: already nothing to clear.
        Ok(())
    }
}
