//! Integration tests for the full checkout pipeline.
//!
//! Tests: Cart → StockLedger → Order → cart clear → side effects,
//! wired over the real in-memory stores and bus.
//!
//! Verifies:
//! - Stock never goes negative, even under concurrent checkouts
//! - Failures roll back atomically (no partial decrements, no orders)
//! - Side effects fire only after commit

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Utc;
use uuid::Uuid;

use storefront_cart::Cart;
use storefront_catalog::Product;
use storefront_checkout::store::{CartStore, OrderStore, ProductStore, StoreError};
use storefront_checkout::{
    CartService, CheckoutService, ServiceError, SideEffect, StockLedger, daily_sales_report,
};
use storefront_core::{CartId, DomainError, Money, ProductId, UserId};
use storefront_events::{EventBus, InMemoryEventBus};

use crate::memory::{InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore};

type Products = Arc<InMemoryProductStore>;
type Carts = Arc<InMemoryCartStore>;
type Orders = Arc<InMemoryOrderStore>;
type Bus = Arc<InMemoryEventBus<SideEffect>>;

struct Shop {
    products: Products,
    carts: Carts,
    orders: Orders,
    bus: Bus,
    cart_service: CartService<Products, Carts>,
    checkout: Arc<CheckoutService<Products, Carts, Orders, Bus>>,
}

fn shop() -> Shop {
    shop_with_threshold(5)
}

fn shop_with_threshold(low_stock_threshold: u32) -> Shop {
    let products: Products = Arc::new(InMemoryProductStore::new());
    let carts: Carts = Arc::new(InMemoryCartStore::new());
    let orders: Orders = Arc::new(InMemoryOrderStore::new());
    let bus: Bus = Arc::new(InMemoryEventBus::new());

    let cart_service = CartService::new(products.clone(), carts.clone());
    let checkout = Arc::new(CheckoutService::new(
        products.clone(),
        carts.clone(),
        orders.clone(),
        bus.clone(),
        low_stock_threshold,
    ));

    Shop {
        products,
        carts,
        orders,
        bus,
        cart_service,
        checkout,
    }
}

impl Shop {
    fn seed(&self, name: &str, price_cents: u64, stock: u32) -> ProductId {
        self.seed_with_id(ProductId::new(), name, price_cents, stock)
    }

    /// Seed with a chosen id; tests that care about lock order pick ids
    /// with a known ordering.
    fn seed_with_id(&self, id: ProductId, name: &str, price_cents: u64, stock: u32) -> ProductId {
        let product = Product::new(id, name, Money::from_cents(price_cents), stock).unwrap();
        self.products.insert(product).unwrap();
        id
    }

    fn stock_of(&self, id: ProductId) -> u32 {
        self.products.get(id).unwrap().unwrap().stock()
    }

    /// Put quantities straight into a cart, bypassing the add-time stock
    /// check (the ledger must still refuse them at checkout).
    fn force_cart(&self, user: UserId, lines: &[(ProductId, u32)]) {
        let mut cart = self.carts.get_or_create(user).unwrap();
        for (product_id, quantity) in lines {
            cart.add(*product_id, *quantity);
        }
        self.carts.save(&cart).unwrap();
    }
}

fn product_id(n: u128) -> ProductId {
    ProductId::from_uuid(Uuid::from_u128(n))
}

#[test]
fn checkout_creates_order_decrements_stock_and_clears_cart() {
    let shop = shop();
    let product = shop.seed("Espresso Grinder", 2500, 10);
    let user = UserId::new();

    shop.cart_service.add_item(user, product, 3).unwrap();
    let receipt = shop.checkout.process_checkout(user).unwrap();

    assert_eq!(receipt.order.total(), Money::from_cents(7500));
    assert_eq!(receipt.order.items().len(), 1);
    assert_eq!(receipt.order.items()[0].quantity(), 3);
    assert_eq!(receipt.order.items()[0].unit_price(), Money::from_cents(2500));
    assert_eq!(receipt.products[0].stock(), 7);

    assert_eq!(shop.stock_of(product), 7);
    assert_eq!(shop.cart_service.item_count(user).unwrap(), 0);
    assert_eq!(shop.orders.count(), 1);
    assert_eq!(shop.orders.list_for_user(user).unwrap().len(), 1);
}

#[test]
fn checkout_fails_with_empty_cart() {
    let shop = shop();
    let user = UserId::new();

    // No cart at all.
    let err = shop.checkout.process_checkout(user).unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::EmptyCart)));

    // Cart exists but has no items.
    shop.carts.get_or_create(user).unwrap();
    let err = shop.checkout.process_checkout(user).unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::EmptyCart)));

    assert_eq!(shop.orders.count(), 0);
}

#[test]
fn checkout_fails_on_insufficient_stock_without_touching_anything() {
    let shop = shop();
    let product = shop.seed("Gooseneck Kettle", 2500, 2);
    let user = UserId::new();

    // Bypasses the add-time check; the ledger is the authority.
    shop.force_cart(user, &[(product, 5)]);

    let subscription = shop.bus.subscribe();
    let err = shop.checkout.process_checkout(user).unwrap_err();

    match err {
        ServiceError::Domain(DomainError::InsufficientStock {
            product_id,
            requested,
            available,
            ..
        }) => {
            assert_eq!(product_id, product);
            assert_eq!(requested, 5);
            assert_eq!(available, 2);
        }
        other => panic!("expected InsufficientStock, got {other:?}"),
    }

    assert_eq!(shop.stock_of(product), 2);
    assert_eq!(shop.orders.count(), 0);
    // Cart stays intact for the user to correct.
    assert_eq!(shop.cart_service.item_count(user).unwrap(), 5);
    // And nothing was published for the aborted checkout.
    assert!(subscription.try_recv().is_err());
}

#[test]
fn low_stock_alert_queued_when_stock_falls_below_threshold() {
    let shop = shop_with_threshold(5);
    let product = shop.seed("Ceramic Dripper", 2500, 6);
    let user = UserId::new();

    shop.cart_service.add_item(user, product, 3).unwrap();
    let subscription = shop.bus.subscribe();
    shop.checkout.process_checkout(user).unwrap();

    // Order placed first, then exactly one low-stock alert for stock 3.
    match subscription.try_recv().unwrap() {
        SideEffect::OrderPlaced(event) => {
            assert_eq!(event.order().total(), Money::from_cents(7500));
        }
        other => panic!("expected OrderPlaced first, got {other:?}"),
    }
    match subscription.try_recv().unwrap() {
        SideEffect::LowStock(event) => {
            assert_eq!(event.product().id_typed(), product);
            assert_eq!(event.remaining(), 3);
        }
        other => panic!("expected LowStock, got {other:?}"),
    }
    assert!(subscription.try_recv().is_err());
}

#[test]
fn no_low_stock_alert_when_stock_stays_at_or_above_threshold() {
    let shop = shop_with_threshold(5);
    let product = shop.seed("French Press", 2500, 20);
    let user = UserId::new();

    shop.cart_service.add_item(user, product, 5).unwrap();
    let subscription = shop.bus.subscribe();
    shop.checkout.process_checkout(user).unwrap();

    assert!(matches!(
        subscription.try_recv().unwrap(),
        SideEffect::OrderPlaced(_)
    ));
    assert!(subscription.try_recv().is_err());
}

#[test]
fn selling_out_still_raises_a_low_stock_alert() {
    let shop = shop_with_threshold(5);
    let product = shop.seed("Hand Mill", 2500, 2);
    let user = UserId::new();

    shop.cart_service.add_item(user, product, 2).unwrap();
    let subscription = shop.bus.subscribe();
    shop.checkout.process_checkout(user).unwrap();

    let mut low_stock_alerts = 0;
    while let Ok(effect) = subscription.try_recv() {
        if let SideEffect::LowStock(event) = effect {
            assert_eq!(event.remaining(), 0);
            low_stock_alerts += 1;
        }
    }
    assert_eq!(low_stock_alerts, 1);
}

#[test]
fn checkout_handles_multiple_products() {
    let shop = shop();
    let first = shop.seed_with_id(product_id(1), "Burr Grinder", 2000, 10);
    let second = shop.seed_with_id(product_id(2), "Scale", 3000, 15);
    let user = UserId::new();

    shop.cart_service.add_item(user, first, 2).unwrap();
    shop.cart_service.add_item(user, second, 3).unwrap();
    let receipt = shop.checkout.process_checkout(user).unwrap();

    // (20.00 * 2) + (30.00 * 3) = 130.00
    assert_eq!(receipt.order.total(), Money::from_cents(13_000));
    assert_eq!(shop.stock_of(first), 8);
    assert_eq!(shop.stock_of(second), 12);

    // Order lines follow the cart's ascending product id order.
    let line_products: Vec<ProductId> = receipt
        .order
        .items()
        .iter()
        .map(|item| item.product_id())
        .collect();
    assert_eq!(line_products, vec![first, second]);
}

#[test]
fn failure_at_a_later_item_rolls_back_earlier_decrements() {
    let shop = shop();
    let first = shop.seed_with_id(product_id(1), "Burr Grinder", 2000, 10);
    let second = shop.seed_with_id(product_id(2), "Scale", 3000, 1);
    let user = UserId::new();

    // First line is satisfiable, second is not.
    shop.force_cart(user, &[(first, 2), (second, 5)]);

    let err = shop.checkout.process_checkout(user).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::InsufficientStock { requested: 5, available: 1, .. })
    ));

    // The first item's decrement did not survive.
    assert_eq!(shop.stock_of(first), 10);
    assert_eq!(shop.stock_of(second), 1);
    assert_eq!(shop.orders.count(), 0);
    assert_eq!(shop.cart_service.item_count(user).unwrap(), 7);
}

#[test]
fn checkout_charges_current_price_not_cart_time_price() {
    let shop = shop();
    let product = shop.seed("Kettle", 2000, 10);
    let user = UserId::new();

    shop.cart_service.add_item(user, product, 2).unwrap();

    // Reprice after the item went into the cart.
    let mut repriced = shop.products.get(product).unwrap().unwrap();
    repriced.set_unit_price(Money::from_cents(2500));
    shop.products.insert(repriced).unwrap();

    let receipt = shop.checkout.process_checkout(user).unwrap();

    assert_eq!(receipt.order.total(), Money::from_cents(5000));
    assert_eq!(receipt.order.items()[0].unit_price(), Money::from_cents(2500));
}

/// Cart store wrapper that fails `clear` on demand, standing in for
/// storage dying mid-transaction.
struct FlakyCartStore {
    inner: Carts,
    fail_clear: Arc<AtomicBool>,
}

impl CartStore for FlakyCartStore {
    fn load(&self, user: UserId) -> Result<Option<Cart>, StoreError> {
        self.inner.load(user)
    }

    fn get_or_create(&self, user: UserId) -> Result<Cart, StoreError> {
        self.inner.get_or_create(user)
    }

    fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        self.inner.save(cart)
    }

    fn clear(&self, cart_id: CartId) -> Result<(), StoreError> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected clear failure".to_string()));
        }
        self.inner.clear(cart_id)
    }
}

#[test]
fn storage_failure_after_order_creation_rolls_everything_back() {
    let products: Products = Arc::new(InMemoryProductStore::new());
    let carts: Carts = Arc::new(InMemoryCartStore::new());
    let orders: Orders = Arc::new(InMemoryOrderStore::new());
    let bus: Bus = Arc::new(InMemoryEventBus::new());
    let fail_clear = Arc::new(AtomicBool::new(false));

    let product = Product::new(
        ProductId::new(),
        "Espresso Grinder",
        Money::from_cents(2500),
        10,
    )
    .unwrap();
    let product_id = product.id_typed();
    products.insert(product).unwrap();

    let cart_service = CartService::new(products.clone(), carts.clone());
    let checkout = CheckoutService::new(
        products.clone(),
        FlakyCartStore {
            inner: carts.clone(),
            fail_clear: fail_clear.clone(),
        },
        orders.clone(),
        bus.clone(),
        5,
    );

    let user = UserId::new();
    cart_service.add_item(user, product_id, 3).unwrap();

    fail_clear.store(true, Ordering::SeqCst);
    let subscription = bus.subscribe();
    let err = checkout.process_checkout(user).unwrap_err();

    assert!(matches!(err, ServiceError::Store(StoreError::Unavailable(_))));
    // Stock rolled back, the order was compensated, nothing published.
    assert_eq!(products.get(product_id).unwrap().unwrap().stock(), 10);
    assert_eq!(orders.count(), 0);
    assert!(subscription.try_recv().is_err());

    // The same checkout succeeds once storage recovers.
    fail_clear.store(false, Ordering::SeqCst);
    let receipt = checkout.process_checkout(user).unwrap();
    assert_eq!(receipt.order.total(), Money::from_cents(7500));
    assert_eq!(products.get(product_id).unwrap().unwrap().stock(), 7);
}

#[test]
fn concurrent_checkouts_for_the_last_unit_sell_exactly_one() {
    let shop = shop();
    let product = shop.seed("Limited Pour-Over Stand", 9900, 1);

    let buyers = [UserId::new(), UserId::new()];
    for buyer in buyers {
        shop.cart_service.add_item(buyer, product, 1).unwrap();
    }

    let barrier = Arc::new(Barrier::new(buyers.len()));
    let handles: Vec<_> = buyers
        .into_iter()
        .map(|buyer| {
            let checkout = shop.checkout.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                checkout.process_checkout(buyer)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(ServiceError::Domain(DomainError::InsufficientStock { .. }))
    )));
    assert_eq!(shop.stock_of(product), 0);
    assert_eq!(shop.orders.count(), 1);
}

#[test]
fn concurrent_multi_product_checkouts_do_not_deadlock() {
    let shop = shop();
    let first = shop.seed_with_id(product_id(1), "Burr Grinder", 2000, 5);
    let second = shop.seed_with_id(product_id(2), "Scale", 3000, 5);

    let buyers = [UserId::new(), UserId::new()];
    for buyer in buyers {
        shop.cart_service.add_item(buyer, first, 1).unwrap();
        shop.cart_service.add_item(buyer, second, 1).unwrap();
    }

    let barrier = Arc::new(Barrier::new(buyers.len()));
    let handles: Vec<_> = buyers
        .into_iter()
        .map(|buyer| {
            let checkout = shop.checkout.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                checkout.process_checkout(buyer)
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }

    assert_eq!(shop.stock_of(first), 3);
    assert_eq!(shop.stock_of(second), 3);
}

#[test]
fn stock_is_conserved_across_many_concurrent_checkouts() {
    const INITIAL_STOCK: u32 = 40;
    const THREADS: usize = 8;
    const ATTEMPTS_PER_THREAD: usize = 5;
    const QUANTITY: u32 = 2;

    let shop = shop();
    let product = shop.seed("Filter Papers", 500, INITIAL_STOCK);

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let checkout = shop.checkout.clone();
            let cart_service =
                CartService::new(shop.products.clone(), shop.carts.clone());
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..ATTEMPTS_PER_THREAD {
                    // A fresh buyer per attempt keeps carts independent.
                    let buyer = UserId::new();
                    if cart_service.add_item(buyer, product, QUANTITY).is_err() {
                        continue;
                    }
                    // InsufficientStock losses are expected near sell-out.
                    let _ = checkout.process_checkout(buyer);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let final_stock = shop.stock_of(product);
    let sold: u32 = shop
        .orders
        .list_for_date(Utc::now().date_naive())
        .unwrap()
        .iter()
        .flat_map(|order| order.items())
        .map(|item| item.quantity())
        .sum();

    // Conservation: everything sold plus everything left equals the seed.
    assert_eq!(sold + final_stock, INITIAL_STOCK);
}

#[test]
fn reservation_rolls_back_on_drop_and_sticks_on_commit() {
    let products: Products = Arc::new(InMemoryProductStore::new());
    let product = Product::new(ProductId::new(), "Kettle", Money::from_cents(1000), 10).unwrap();
    let id = product.id_typed();
    products.insert(product).unwrap();

    let ledger = StockLedger::new(products.clone());

    {
        let mut reservation = ledger.begin();
        let updated = reservation.reserve_and_decrement(id, 4).unwrap();
        assert_eq!(updated.stock(), 6);
        // Dropped without commit.
    }
    assert_eq!(products.get(id).unwrap().unwrap().stock(), 10);

    {
        let mut reservation = ledger.begin();
        reservation.reserve_and_decrement(id, 4).unwrap();
        reservation.commit();
    }
    assert_eq!(products.get(id).unwrap().unwrap().stock(), 6);
}

#[test]
fn reservations_enforce_the_global_lock_order() {
    let products: Products = Arc::new(InMemoryProductStore::new());
    for (n, name) in [(1u128, "Burr Grinder"), (2, "Scale")] {
        products
            .insert(Product::new(product_id(n), name, Money::from_cents(1000), 5).unwrap())
            .unwrap();
    }

    let ledger = StockLedger::new(products.clone());
    let mut reservation = ledger.begin();

    reservation.reserve_and_decrement(product_id(2), 1).unwrap();
    let err = reservation
        .reserve_and_decrement(product_id(1), 1)
        .unwrap_err();

    assert!(matches!(err, ServiceError::Store(StoreError::LockOrder(_))));
}

#[test]
fn daily_report_covers_the_days_checkouts() {
    let shop = shop();
    let grinder = shop.seed("Espresso Grinder", 2500, 10);
    let kettle = shop.seed("Gooseneck Kettle", 3000, 10);

    let first_buyer = UserId::new();
    shop.cart_service.add_item(first_buyer, grinder, 2).unwrap();
    shop.checkout.process_checkout(first_buyer).unwrap();

    let second_buyer = UserId::new();
    shop.cart_service.add_item(second_buyer, kettle, 1).unwrap();
    shop.checkout.process_checkout(second_buyer).unwrap();

    let report = daily_sales_report(shop.orders.as_ref(), Utc::now().date_naive()).unwrap();

    assert_eq!(report.total_orders, 2);
    assert_eq!(report.total_revenue, Money::from_cents(8000));
}
