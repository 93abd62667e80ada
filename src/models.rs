//! Data models for procurement order reporting.
//!
//! This module contains the order records loaded from the order store
//! and the derived structures produced by the analytics aggregator.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel an order was placed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Whatsapp,
    Email,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Whatsapp => write!(f, "WhatsApp"),
            Channel::Email => write!(f, "Email"),
        }
    }
}

impl Channel {
    /// All channels, in display order.
    pub const ALL: [Channel; 2] = [Channel::Whatsapp, Channel::Email];
}

/// Lifecycle status of an order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Requested,
    Sent,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Requested => write!(f, "Requested"),
            OrderStatus::Sent => write!(f, "Sent"),
            OrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl OrderStatus {
    /// All statuses, in display order.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Requested,
        OrderStatus::Sent,
        OrderStatus::Cancelled,
    ];
}

/// One product line within an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    /// Catalog item code. Not unique within an order.
    pub item_code: String,
    /// Display name as entered on this order.
    pub item_name: String,
    /// Free-form specification text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<String>,
    /// Requested quantity. Not validated.
    pub quantity: i64,
    /// Price per unit.
    pub unit_price: f64,
    /// Line subtotal, trusted as given.
    pub subtotal: f64,
}

/// A procurement request from a property to a vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier, conventionally `ORD-<YYYYMMDD>-<seq>`.
    pub id: String,
    /// Creation timestamp as recorded by the source.
    pub created_on: String,
    pub property_code: String,
    pub property_name: String,
    pub property_region: String,
    pub channel: Channel,
    pub items: Vec<OrderLineItem>,
    pub vendor_name: String,
    /// Order total. Expected to match the sum of line subtotals but never checked.
    pub total_amount: f64,
    pub status: OrderStatus,
}

impl Order {
    /// Parse `created_on` into a timestamp.
    ///
    /// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DD HH:MM:SS`, RFC 3339 and a bare
    /// `YYYY-MM-DD` (midnight).
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        let raw = self.created_on.trim();

        for format in ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(ts);
            }
        }

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.naive_local());
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// Date part of `created_on`, if it parses.
    pub fn created_date(&self) -> Option<NaiveDate> {
        self.created_at().map(|ts| ts.date())
    }

    /// Sum of quantities across all lines, saturating at the `i64` bounds.
    pub fn line_quantity(&self) -> i64 {
        self.items
            .iter()
            .map(|i| i.quantity)
            .fold(0, i64::saturating_add)
    }
}

/// Per-item rollup of all lines sharing an item code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAggregate {
    /// Grouping key.
    pub item_code: String,
    /// Name from the first line seen for this code.
    pub item_name: String,
    /// Number of contributing lines (not distinct orders).
    pub total_orders: usize,
    /// Sum of line quantities.
    pub total_quantity: i64,
    /// Sum of line subtotals.
    pub total_amount: f64,
}

/// Result of summarizing a set of orders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of orders summarized.
    pub total_orders: usize,
    /// Sum of all line quantities.
    pub total_quantity: i64,
    /// Sum of order-level totals.
    pub total_amount: f64,
    /// Item aggregates ranked by value, highest first.
    pub items: Vec<ItemAggregate>,
}

/// Item aggregate with the ratios shown in the report table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemReportRow {
    #[serde(flatten)]
    pub aggregate: ItemAggregate,
    /// Average quantity per contributing line.
    pub avg_order_qty: f64,
    /// Average price per unit across contributing lines.
    pub avg_unit_price: f64,
    /// Share of the global order value, in percent.
    pub percent_of_total: f64,
}

/// Order count and value for a single vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorTotal {
    pub vendor_name: String,
    pub total_orders: usize,
    pub total_amount: f64,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the orders were loaded from.
    pub source: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Orders in the store before filtering.
    pub orders_loaded: usize,
    /// Orders that passed the filter.
    pub orders_matched: usize,
    /// Human-readable descriptions of the active filters.
    pub filters: Vec<String>,
    /// Time spent loading and aggregating, in seconds.
    pub duration_seconds: f64,
}

/// The complete order report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: Summary,
    /// Item rows with derived ratios, in ranked order.
    pub rows: Vec<ItemReportRow>,
    /// Vendor breakdown, ranked by value.
    pub vendors: Vec<VendorTotal>,
    /// The filtered orders the report was computed from.
    pub orders: Vec<Order>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_created_on(created_on: &str) -> Order {
        Order {
            id: "ORD-20241128-001".to_string(),
            created_on: created_on.to_string(),
            property_code: "PROP-001".to_string(),
            property_name: "Grand Hotel Jakarta".to_string(),
            property_region: "DKI Jakarta (Jakarta)".to_string(),
            channel: Channel::Whatsapp,
            items: vec![
                OrderLineItem {
                    item_code: "ITM001".to_string(),
                    item_name: "Mineral Water 600ml".to_string(),
                    specifications: None,
                    quantity: 240,
                    unit_price: 5000.0,
                    subtotal: 1_200_000.0,
                },
                OrderLineItem {
                    item_code: "ITM002".to_string(),
                    item_name: "Towel White Large".to_string(),
                    specifications: None,
                    quantity: 48,
                    unit_price: 25000.0,
                    subtotal: 1_200_000.0,
                },
            ],
            vendor_name: "Pacific Supplies Ltd.".to_string(),
            total_amount: 2_400_000.0,
            status: OrderStatus::Sent,
        }
    }

    #[test]
    fn test_created_at_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 11, 28).unwrap();

        for raw in [
            "2024-11-28 09:15",
            "2024-11-28 09:15:30",
            "2024-11-28T09:15:30",
            "2024-11-28T09:15:30+07:00",
            "2024-11-28",
        ] {
            let order = order_created_on(raw);
            assert_eq!(order.created_date(), Some(expected), "format: {}", raw);
        }
    }

    #[test]
    fn test_created_at_invalid() {
        let order = order_created_on("yesterday");
        assert!(order.created_at().is_none());
    }

    #[test]
    fn test_line_quantity() {
        let order = order_created_on("2024-11-28 09:15");
        assert_eq!(order.line_quantity(), 288);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "ORD-20241128-002",
            "createdOn": "2024-11-28 10:30",
            "propertyCode": "PROP-002",
            "propertyName": "Bali Beach Resort",
            "propertyRegion": "Bali (Denpasar)",
            "channel": "email",
            "items": [
                { "itemCode": "ITM003", "itemName": "Bed Sheet King", "quantity": 24, "unitPrice": 60000, "subtotal": 1440000 }
            ],
            "vendorName": "Pacific Supplies Ltd.",
            "totalAmount": 1440000,
            "status": "requested"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.channel, Channel::Email);
        assert_eq!(order.status, OrderStatus::Requested);
        assert_eq!(order.items[0].item_code, "ITM003");
        assert_eq!(order.items[0].quantity, 24);
        assert_eq!(order.total_amount, 1_440_000.0);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let json = r#""approved""#;
        assert!(serde_json::from_str::<OrderStatus>(json).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Channel::Whatsapp.to_string(), "WhatsApp");
        assert_eq!(OrderStatus::Cancelled.to_string(), "Cancelled");
    }
}
