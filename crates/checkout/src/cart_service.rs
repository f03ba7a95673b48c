//! Cart boundary: validation, early stock checks, derived reads.

use storefront_cart::CartItem;
use storefront_catalog::Product;
use storefront_core::{DomainError, Money, ProductId, UserId};

use crate::error::ServiceResult;
use crate::store::{CartStore, ProductStore};

/// Cart operations for one storefront user.
///
/// Stock checks here are an early UX courtesy against the currently-known
/// counter — they keep obviously-unfulfillable carts out, but the stock
/// ledger re-validates under its row lock at checkout time, which is what
/// actually closes the race window.
#[derive(Debug)]
pub struct CartService<P, C> {
    products: P,
    carts: C,
}

impl<P, C> CartService<P, C>
where
    P: ProductStore,
    C: CartStore,
{
    pub fn new(products: P, carts: C) -> Self {
        Self { products, carts }
    }

    /// Add `quantity` of a product to the user's cart, creating the cart
    /// lazily. Adding a product already in the cart merges by incrementing
    /// its quantity; the stock check covers the merged amount.
    pub fn add_item(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<CartItem> {
        ensure_positive(quantity)?;
        let product = self.fetch_product(product_id)?;

        let mut cart = self.carts.get_or_create(user)?;
        let merged = cart.quantity_of(product_id) + quantity;
        ensure_available(&product, merged)?;

        let item = cart.add(product_id, quantity);
        self.carts.save(&cart)?;

        tracing::debug!(%user, %product_id, quantity = item.quantity(), "cart item added");
        Ok(item)
    }

    /// Replace a cart line's quantity outright (no merge), after the same
    /// stock check. Zero quantities are rejected here, at the boundary.
    pub fn update_quantity(
        &self,
        user: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> ServiceResult<CartItem> {
        ensure_positive(quantity)?;
        let product = self.fetch_product(product_id)?;

        let mut cart = self
            .carts
            .load(user)?
            .ok_or_else(DomainError::not_found)?;
        ensure_available(&product, quantity)?;

        let item = cart
            .set_quantity(product_id, quantity)
            .ok_or_else(DomainError::not_found)?;
        self.carts.save(&cart)?;

        Ok(item)
    }

    /// Remove a line. Removing an absent line (or from an absent cart) is
    /// a no-op success — a stale handle simply affects zero rows.
    pub fn remove_item(&self, user: UserId, product_id: ProductId) -> ServiceResult<()> {
        if let Some(mut cart) = self.carts.load(user)? {
            cart.remove(product_id);
            self.carts.save(&cart)?;
        }
        Ok(())
    }

    /// Drop every line of the user's cart. Idempotent.
    pub fn clear(&self, user: UserId) -> ServiceResult<()> {
        if let Some(cart) = self.carts.load(user)? {
            self.carts.clear(cart.id_typed())?;
        }
        Ok(())
    }

    /// Current cart total, recomputed on every read from current product
    /// prices. Never cached: both stock and price can change between
    /// reads.
    pub fn cart_total(&self, user: UserId) -> ServiceResult<Money> {
        let Some(cart) = self.carts.load(user)? else {
            return Ok(Money::ZERO);
        };

        let mut total = Money::ZERO;
        for item in cart.items() {
            let product = self.fetch_product(item.product_id())?;
            total += product.unit_price() * item.quantity();
        }
        Ok(total)
    }

    /// Total quantity across all lines; zero for a missing cart.
    pub fn item_count(&self, user: UserId) -> ServiceResult<u32> {
        Ok(self.carts.load(user)?.map_or(0, |cart| cart.item_count()))
    }

    fn fetch_product(&self, product_id: ProductId) -> ServiceResult<Product> {
        Ok(self
            .products
            .get(product_id)?
            .ok_or_else(DomainError::not_found)?)
    }
}

fn ensure_positive(quantity: u32) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(DomainError::validation("quantity must be at least 1"));
    }
    Ok(())
}

fn ensure_available(product: &Product, requested: u32) -> Result<(), DomainError> {
    if product.stock() < requested {
        return Err(DomainError::insufficient_stock(
            product.id_typed(),
            product.name(),
            requested,
            product.stock(),
        ));
    }
    Ok(())
}
