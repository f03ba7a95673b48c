use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex, RwLock};

use storefront_catalog::Product;
use storefront_checkout::store::{ProductGuard, ProductStore, StoreError};
use storefront_core::ProductId;

type Row = Arc<Mutex<Product>>;

/// In-memory product store with per-row locking.
///
/// Layout mirrors a row-locked table: an outer map from id to row, and an
/// independent mutex per row. The outer `RwLock` is only held long enough
/// to clone the row handle out, so a checkout blocked on one product's
/// row never stalls access to the rest of the catalog.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<ProductId, Row>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `products`.
    pub fn seeded(products: impl IntoIterator<Item = Product>) -> Self {
        let store = Self::new();
        {
            let mut rows = store.rows.write();
            for product in products {
                rows.insert(product.id_typed(), Arc::new(Mutex::new(product)));
            }
        }
        store
    }
}

/// An exclusively held row. The owned guard keeps the row's mutex locked
/// for as long as the value lives — the in-memory equivalent of
/// `SELECT ... FOR UPDATE` lasting until commit/rollback.
struct RowGuard {
    row: ArcMutexGuard<RawMutex, Product>,
}

impl ProductGuard for RowGuard {
    fn product(&self) -> &Product {
        &self.row
    }

    fn product_mut(&mut self) -> &mut Product {
        &mut self.row
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = self.rows.read().get(&id).cloned();
        // Reading through the row lock: a row mid-checkout is observed
        // only after its holder commits or rolls back.
        Ok(row.map(|row| row.lock().clone()))
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        self.rows
            .write()
            .insert(product.id_typed(), Arc::new(Mutex::new(product)));
        Ok(())
    }

    fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows: Vec<Row> = self.rows.read().values().cloned().collect();
        let mut products: Vec<Product> = rows.iter().map(|row| row.lock().clone()).collect();
        products.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(products)
    }

    fn lock_for_update(&self, id: ProductId) -> Result<Box<dyn ProductGuard>, StoreError> {
        let row = self
            .rows
            .read()
            .get(&id)
            .cloned()
            .ok_or(StoreError::UnknownProduct(id))?;

        // The outer map lock is released by now; only this row's lock is
        // awaited, so disjoint-product checkouts proceed in parallel.
        Ok(Box::new(RowGuard {
            row: row.lock_arc(),
        }))
    }
}
