use chrono::NaiveDate;
use parking_lot::RwLock;

use storefront_checkout::store::{OrderStore, StoreError};
use storefront_core::{OrderId, UserId};
use storefront_orders::Order;

/// In-memory order store. Insertion order is creation order.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.orders.read().len()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create(&self, order: Order) -> Result<Order, StoreError> {
        self.orders.write().push(order.clone());
        Ok(order)
    }

    fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .iter()
            .find(|order| order.id_typed() == id)
            .cloned())
    }

    fn list_for_user(&self, user: UserId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|order| order.user_id() == user)
            .cloned()
            .collect())
    }

    fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .orders
            .read()
            .iter()
            .filter(|order| order.created_at().date_naive() == date)
            .cloned()
            .collect())
    }

    fn delete(&self, id: OrderId) -> Result<(), StoreError> {
        self.orders.write().retain(|order| order.id_typed() != id);
        Ok(())
    }
}
