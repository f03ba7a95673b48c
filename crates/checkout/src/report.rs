//! Daily sales aggregation over the order store.

use chrono::NaiveDate;
use serde::Serialize;

use storefront_core::Money;
use storefront_orders::Order;

use crate::error::ServiceResult;
use crate::store::OrderStore;

/// One calendar day of sales, for the admin report mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySalesReport {
    pub date: NaiveDate,
    pub total_orders: usize,
    pub total_revenue: Money,
    pub orders: Vec<Order>,
}

/// Aggregate every order created on `date`.
pub fn daily_sales_report<O>(orders: &O, date: NaiveDate) -> ServiceResult<DailySalesReport>
where
    O: OrderStore,
{
    let orders = orders.list_for_date(date)?;
    let total_revenue = orders.iter().map(Order::total).sum();

    Ok(DailySalesReport {
        date,
        total_orders: orders.len(),
        total_revenue,
        orders,
    })
}
