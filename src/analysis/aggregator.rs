//! Order analytics aggregation.
//!
//! This module turns a filtered set of orders into global totals and a
//! per-item breakdown ranked by value, plus the smaller breakdowns shown
//! alongside it in the report.

use crate::models::{
    Channel, ItemAggregate, ItemReportRow, Order, OrderStatus, Summary, VendorTotal,
};
use indexmap::IndexMap;
use std::cmp::Ordering;
use tracing::debug;

/// Summarize a set of orders.
///
/// Scalar totals come from the order records: `total_amount` is the sum of
/// each order's own total, not of its line subtotals. Lines are grouped by
/// item code in scan order (orders first, then their lines). The first line
/// seen for a code supplies its display name, and every matching line counts
/// once towards `total_orders`, so two lines with the same code on one order
/// count twice.
///
/// Quantities saturate at the `i64` bounds instead of overflowing.
///
/// Aggregates are ranked by `total_amount` descending. The sort is stable, so
/// ties keep the order in which their codes were first seen. NaN amounts
/// rank after every other amount.
pub fn summarize(orders: &[Order]) -> Summary {
    let total_orders = orders.len();
    let total_quantity = orders
        .iter()
        .map(Order::line_quantity)
        .fold(0i64, i64::saturating_add);
    let total_amount: f64 = orders.iter().map(|o| o.total_amount).sum();

    let mut grouped: IndexMap<&str, ItemAggregate> = IndexMap::new();

    for order in orders {
        for line in &order.items {
            grouped
                .entry(line.item_code.as_str())
                .and_modify(|agg| {
                    agg.total_orders += 1;
                    agg.total_quantity = agg.total_quantity.saturating_add(line.quantity);
                    agg.total_amount += line.subtotal;
                })
                .or_insert_with(|| ItemAggregate {
                    item_code: line.item_code.clone(),
                    item_name: line.item_name.clone(),
                    total_orders: 1,
                    total_quantity: line.quantity,
                    total_amount: line.subtotal,
                });
        }
    }

    let mut items: Vec<ItemAggregate> = grouped.into_values().collect();
    items.sort_by(|a, b| by_amount_desc(a.total_amount, b.total_amount));

    debug!(
        "Summarized {} orders into {} item aggregates",
        total_orders,
        items.len()
    );

    Summary {
        total_orders,
        total_quantity,
        total_amount,
        items,
    }
}

/// Derive the report-table ratios for every aggregate in a summary.
///
/// A zero denominator yields `0.0`. Only `percent_of_total` can hit it for
/// aggregates produced by [`summarize`], when the global amount is zero.
pub fn report_rows(summary: &Summary) -> Vec<ItemReportRow> {
    summary
        .items
        .iter()
        .map(|agg| ItemReportRow {
            avg_order_qty: ratio(agg.total_quantity as f64, agg.total_orders as f64),
            avg_unit_price: ratio(agg.total_amount, agg.total_quantity as f64),
            percent_of_total: ratio(agg.total_amount * 100.0, summary.total_amount),
            aggregate: agg.clone(),
        })
        .collect()
}

/// Count orders per status, in status display order.
pub fn group_by_status(orders: &[Order]) -> Vec<(OrderStatus, usize)> {
    OrderStatus::ALL
        .iter()
        .map(|&status| (status, orders.iter().filter(|o| o.status == status).count()))
        .collect()
}

/// Count orders per channel, in channel display order.
pub fn group_by_channel(orders: &[Order]) -> Vec<(Channel, usize)> {
    Channel::ALL
        .iter()
        .map(|&channel| {
            (
                channel,
                orders.iter().filter(|o| o.channel == channel).count(),
            )
        })
        .collect()
}

/// Order count and value per vendor, ranked by value (highest first).
///
/// Ties keep the order in which vendors were first seen.
pub fn vendor_totals(orders: &[Order]) -> Vec<VendorTotal> {
    let mut grouped: IndexMap<&str, VendorTotal> = IndexMap::new();

    for order in orders {
        let entry = grouped
            .entry(order.vendor_name.as_str())
            .or_insert_with(|| VendorTotal {
                vendor_name: order.vendor_name.clone(),
                total_orders: 0,
                total_amount: 0.0,
            });
        entry.total_orders += 1;
        entry.total_amount += order.total_amount;
    }

    let mut vendors: Vec<VendorTotal> = grouped.into_values().collect();
    vendors.sort_by(|a, b| by_amount_desc(a.total_amount, b.total_amount));
    vendors
}

/// Descending comparison on amounts with NaN last.
///
/// NaNs compare equal to each other, as do zeroes of either sign.
fn by_amount_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
