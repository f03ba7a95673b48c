//! Port traits the engine runs against.
//!
//! The engine makes no storage assumptions: anything that can hand out an
//! exclusive per-product row guard and persist carts and orders can back
//! it. The in-memory implementations live in `storefront-infra`; a SQL
//! backend would map `lock_for_update` to `SELECT ... FOR UPDATE` and the
//! guard's lifetime to the surrounding transaction.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use storefront_cart::Cart;
use storefront_catalog::Product;
use storefront_core::{CartId, OrderId, ProductId, UserId};
use storefront_orders::Order;

/// Storage-layer error.
///
/// Infrastructure faults, as opposed to the deterministic domain failures
/// in `DomainError`. Any of these aborts the surrounding unit of work.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not complete the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A referenced product row does not exist.
    #[error("unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Row locks were requested out of the fixed global order.
    #[error("lock ordering violated: {0}")]
    LockOrder(String),
}

/// An exclusively held product row.
///
/// While a guard is alive no other caller can read-modify-write the same
/// row; dropping it releases the lock. All stock mutation flows through
/// `product_mut`, which is only reachable through a held guard.
pub trait ProductGuard: Send {
    fn product(&self) -> &Product;

    fn product_mut(&mut self) -> &mut Product;
}

/// Product rows with exclusive row-level locking.
pub trait ProductStore: Send + Sync {
    /// Current snapshot of a product, if it exists.
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert or replace a product row.
    fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// All products, ordered by display name (catalog listing order).
    fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Acquire the exclusive row lock for `id`, blocking until the current
    /// holder commits or rolls back.
    fn lock_for_update(&self, id: ProductId) -> Result<Box<dyn ProductGuard>, StoreError>;
}

/// Cart persistence. One cart per user; items travel with the aggregate.
pub trait CartStore: Send + Sync {
    fn load(&self, user: UserId) -> Result<Option<Cart>, StoreError>;

    /// The user's cart, created lazily on first use.
    fn get_or_create(&self, user: UserId) -> Result<Cart, StoreError>;

    fn save(&self, cart: &Cart) -> Result<(), StoreError>;

    /// Delete all items of the cart. The cart row itself survives.
    /// Clearing an unknown or already-empty cart is a no-op success.
    fn clear(&self, cart_id: CartId) -> Result<(), StoreError>;
}

/// Order persistence. Orders are immutable once created.
pub trait OrderStore: Send + Sync {
    fn create(&self, order: Order) -> Result<Order, StoreError>;

    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError>;

    /// Orders created on the given calendar date (daily sales report).
    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError>;

    /// Compensation path only: removes an order created inside a unit of
    /// work that subsequently failed. Never part of normal operation.
    fn delete(&self, id: OrderId) -> Result<(), StoreError>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product)
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list()
    }

    fn lock_for_update(&self, id: ProductId) -> Result<Box<dyn ProductGuard>, StoreError> {
        (**self).lock_for_update(id)
    }
}

impl<S> CartStore for Arc<S>
where
    S: CartStore + ?Sized,
{
    fn load(&self, user: UserId) -> Result<Option<Cart>, StoreError> {
        (**self).load(user)
    }

    fn get_or_create(&self, user: UserId) -> Result<Cart, StoreError> {
        (**self).get_or_create(user)
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        (**self).save(cart)
    }

    fn clear(&self, cart_id: CartId) -> Result<(), StoreError> {
        (**self).clear(cart_id)
    }
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn create(&self, order: Order) -> Result<Order, StoreError> {
        (**self).create(order)
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(id)
    }

    fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        (**self).list_for_user(user)
    }

    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError> {
        (**self).list_for_date(date)
    }

    fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        (**self).delete(id)
    }
}
