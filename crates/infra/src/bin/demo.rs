//! End-to-end demo: seed a catalog, fill a cart, check out, report.
//!
//! ```text
//! RUST_LOG=debug cargo run -p storefront-infra --bin demo
//! ```

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;

use storefront_catalog::Product;
use storefront_checkout::{CartService, CheckoutService, daily_sales_report};
use storefront_checkout::store::ProductStore;
use storefront_core::{Money, ProductId, UserId};
use storefront_events::{EventBus, InMemoryEventBus};
use storefront_infra::{
    InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore, NotificationWorker, ShopConfig,
};

fn main() -> Result<()> {
    storefront_observability::init();
    let config = ShopConfig::from_env();

    let products = Arc::new(InMemoryProductStore::new());
    let carts = Arc::new(InMemoryCartStore::new());
    let orders = Arc::new(InMemoryOrderStore::new());
    let bus = Arc::new(InMemoryEventBus::new());

    let worker = NotificationWorker::spawn(bus.subscribe(), config.clone())?;

    let grinder = seed(&products, "Espresso Grinder", 2500, 10)?;
    let kettle = seed(&products, "Gooseneck Kettle", 3000, 6)?;
    seed(&products, "Ceramic Dripper", 1500, 20)?;

    let cart_service = CartService::new(products.clone(), carts.clone());
    let checkout = CheckoutService::new(
        products.clone(),
        carts.clone(),
        orders.clone(),
        bus.clone(),
        config.low_stock_threshold,
    );

    let shopper = UserId::new();
    cart_service.add_item(shopper, grinder, 2)?;
    cart_service.add_item(shopper, kettle, 3)?;
    let items = cart_service.item_count(shopper)?;
    let cart_total = cart_service.cart_total(shopper)?;
    tracing::info!(items, total = %cart_total, "cart ready");

    let receipt = checkout.process_checkout(shopper)?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);

    let report = daily_sales_report(orders.as_ref(), Utc::now().date_naive())?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    // Drop every publisher handle so the worker's subscription disconnects.
    drop(checkout);
    drop(bus);
    worker.join();

    Ok(())
}

fn seed(
    products: &Arc<InMemoryProductStore>,
    name: &str,
    price_cents: u64,
    stock: u32,
) -> Result<ProductId> {
    let product = Product::new(ProductId::new(), name, Money::from_cents(price_cents), stock)?;
    let id = product.id_typed();
    products.insert(product)?;
    Ok(id)
}
