//! Order filtering.
//!
//! Selects the orders a report is computed from: date range, status set,
//! region set, vendor and a free-text quick search.

use crate::models::{Order, OrderStatus};
use chrono::NaiveDate;

/// Criteria an order must satisfy to be included in a report.
///
/// Empty sets and `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    /// Earliest creation date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest creation date, inclusive.
    pub to: Option<NaiveDate>,
    pub statuses: Vec<OrderStatus>,
    pub regions: Vec<String>,
    pub vendor: Option<String>,
    /// Case-insensitive substring over order id, property name and code, and vendor.
    pub search: Option<String>,
}

impl OrderFilter {
    /// Returns true when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Check whether a single order passes every criterion.
    pub fn matches(&self, order: &Order) -> bool {
        self.matches_date(order)
            && self.matches_status(order)
            && self.matches_region(order)
            && self.matches_vendor(order)
            && self.matches_search(order)
    }

    /// Select matching orders, preserving input order.
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }

    /// Human-readable labels for the active criteria.
    pub fn describe(&self) -> Vec<String> {
        let mut labels = Vec::new();

        match (self.from, self.to) {
            (Some(from), Some(to)) => labels.push(format!("Created: {} to {}", from, to)),
            (Some(from), None) => labels.push(format!("Created: from {}", from)),
            (None, Some(to)) => labels.push(format!("Created: until {}", to)),
            (None, None) => {}
        }

        if !self.statuses.is_empty() {
            let statuses: Vec<String> = self.statuses.iter().map(|s| s.to_string()).collect();
            labels.push(format!("Status: {}", statuses.join(", ")));
        }

        if !self.regions.is_empty() {
            labels.push(format!("Region: {}", self.regions.join(", ")));
        }

        if let Some(ref vendor) = self.vendor {
            labels.push(format!("Vendor: {}", vendor));
        }

        if let Some(ref search) = self.search {
            labels.push(format!("Search: \"{}\"", search));
        }

        labels
    }

    fn matches_date(&self, order: &Order) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }

        // Unparseable dates cannot satisfy a bound.
        let Some(date) = order.created_date() else {
            return false;
        };

        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    fn matches_status(&self, order: &Order) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&order.status)
    }

    fn matches_region(&self, order: &Order) -> bool {
        self.regions.is_empty()
            || self
                .regions
                .iter()
                .any(|r| r.eq_ignore_ascii_case(&order.property_region))
    }

    fn matches_vendor(&self, order: &Order) -> bool {
        self.vendor
            .as_deref()
            .map_or(true, |v| v.eq_ignore_ascii_case(&order.vendor_name))
    }

    fn matches_search(&self, order: &Order) -> bool {
        let Some(term) = self.search.as_deref() else {
            return true;
        };
        let term = term.to_lowercase();

        [
            &order.id,
            &order.property_name,
            &order.property_code,
            &order.vendor_name,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OrderStore;

    fn sample_orders() -> Vec<Order> {
        OrderStore::sample().orders().to_vec()
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let orders = sample_orders();
        let filter = OrderFilter::default();

        assert!(filter.is_empty());
        assert_eq!(filter.apply(&orders), orders);
        assert!(filter.describe().is_empty());
    }

    #[test]
    fn test_date_range_inclusive() {
        let orders = sample_orders();
        let filter = OrderFilter {
            from: NaiveDate::from_ymd_opt(2024, 11, 27),
            to: NaiveDate::from_ymd_opt(2024, 11, 27),
            ..Default::default()
        };

        assert_eq!(
            ids(&filter.apply(&orders)),
            vec!["ORD-20241127-003", "ORD-20241127-004"]
        );
    }

    #[test]
    fn test_unparseable_date_excluded_only_with_bounds() {
        let mut orders = sample_orders();
        orders[0].created_on = "not a date".to_string();

        let unbounded = OrderFilter::default();
        assert_eq!(unbounded.apply(&orders).len(), 5);

        let bounded = OrderFilter {
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            ..Default::default()
        };
        assert_eq!(bounded.apply(&orders).len(), 4);
    }

    #[test]
    fn test_status_set() {
        let orders = sample_orders();
        let filter = OrderFilter {
            statuses: vec![OrderStatus::Requested, OrderStatus::Cancelled],
            ..Default::default()
        };

        assert_eq!(
            ids(&filter.apply(&orders)),
            vec!["ORD-20241128-002", "ORD-20241127-004"]
        );
    }

    #[test]
    fn test_region_and_vendor_case_insensitive() {
        let orders = sample_orders();
        let filter = OrderFilter {
            regions: vec!["dki jakarta (jakarta)".to_string()],
            vendor: Some("PACIFIC SUPPLIES LTD.".to_string()),
            ..Default::default()
        };

        assert_eq!(
            ids(&filter.apply(&orders)),
            vec!["ORD-20241128-001", "ORD-20241127-004"]
        );
    }

    #[test]
    fn test_search_matches_any_field() {
        let orders = sample_orders();

        let by_property = OrderFilter {
            search: Some("bandung".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_property.apply(&orders)), vec!["ORD-20241126-005"]);

        let by_code = OrderFilter {
            search: Some("prop-002".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_code.apply(&orders)), vec!["ORD-20241128-002"]);

        let by_vendor = OrderFilter {
            search: Some("eastern".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&by_vendor.apply(&orders)), vec!["ORD-20241127-003"]);
    }

    #[test]
    fn test_describe() {
        let filter = OrderFilter {
            from: NaiveDate::from_ymd_opt(2024, 11, 1),
            to: None,
            statuses: vec![OrderStatus::Sent],
            regions: vec![],
            vendor: Some("Western Suppliers".to_string()),
            search: None,
        };

        assert_eq!(
            filter.describe(),
            vec![
                "Created: from 2024-11-01".to_string(),
                "Status: Sent".to_string(),
                "Vendor: Western Suppliers".to_string(),
            ]
        );
    }
}
