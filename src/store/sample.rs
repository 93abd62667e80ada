//! Built-in sample orders.
//!
//! Five orders from four hotel properties across three vendors, used when
//! no order source is given and as a fixture in tests.

use crate::models::{Channel, Order, OrderLineItem, OrderStatus};

fn line(code: &str, name: &str, quantity: i64, unit_price: f64) -> OrderLineItem {
    OrderLineItem {
        item_code: code.to_string(),
        item_name: name.to_string(),
        specifications: None,
        quantity,
        unit_price,
        subtotal: quantity as f64 * unit_price,
    }
}

struct Property {
    code: &'static str,
    name: &'static str,
    region: &'static str,
}

const GRAND_JAKARTA: Property = Property {
    code: "PROP-001",
    name: "Grand Hotel Jakarta",
    region: "DKI Jakarta (Jakarta)",
};
const BALI_BEACH: Property = Property {
    code: "PROP-002",
    name: "Bali Beach Resort",
    region: "Bali (Denpasar)",
};
const SURABAYA_PLAZA: Property = Property {
    code: "PROP-003",
    name: "Surabaya Plaza Hotel",
    region: "Jawa Timur (Surabaya)",
};
const BANDUNG_INN: Property = Property {
    code: "PROP-004",
    name: "Bandung Mountain Inn",
    region: "Jawa Barat (Bandung)",
};

fn order(
    id: &str,
    created_on: &str,
    property: &Property,
    channel: Channel,
    items: Vec<OrderLineItem>,
    vendor_name: &str,
    status: OrderStatus,
) -> Order {
    let total_amount = items.iter().map(|i| i.subtotal).sum();
    Order {
        id: id.to_string(),
        created_on: created_on.to_string(),
        property_code: property.code.to_string(),
        property_name: property.name.to_string(),
        property_region: property.region.to_string(),
        channel,
        items,
        vendor_name: vendor_name.to_string(),
        total_amount,
        status,
    }
}

/// The sample order list.
pub fn orders() -> Vec<Order> {
    vec![
        order(
            "ORD-20241128-001",
            "2024-11-28 09:15",
            &GRAND_JAKARTA,
            Channel::Whatsapp,
            vec![
                line("ITM001", "Mineral Water 600ml", 240, 5000.0),
                line("ITM002", "Towel White Large", 48, 25000.0),
            ],
            "Pacific Supplies Ltd.",
            OrderStatus::Sent,
        ),
        order(
            "ORD-20241128-002",
            "2024-11-28 10:30",
            &BALI_BEACH,
            Channel::Email,
            vec![line("ITM003", "Bed Sheet King", 24, 60000.0)],
            "Pacific Supplies Ltd.",
            OrderStatus::Requested,
        ),
        order(
            "ORD-20241127-003",
            "2024-11-27 14:20",
            &SURABAYA_PLAZA,
            Channel::Whatsapp,
            vec![
                line("ITM001", "Mineral Water 600ml", 480, 5000.0),
                line("ITM004", "Coffee Mug Set", 12, 150000.0),
                line("ITM005", "Laundry Detergent 5L", 6, 85000.0),
            ],
            "Eastern Supplies Co.",
            OrderStatus::Sent,
        ),
        order(
            "ORD-20241127-004",
            "2024-11-27 11:45",
            &GRAND_JAKARTA,
            Channel::Email,
            vec![line("ITM002", "Towel White Large", 72, 25000.0)],
            "Pacific Supplies Ltd.",
            OrderStatus::Cancelled,
        ),
        order(
            "ORD-20241126-005",
            "2024-11-26 16:00",
            &BANDUNG_INN,
            Channel::Whatsapp,
            vec![
                line("ITM001", "Mineral Water 600ml", 144, 5000.0),
                line("ITM003", "Bed Sheet King", 12, 60000.0),
            ],
            "Western Suppliers",
            OrderStatus::Sent,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_totals() {
        let orders = orders();
        assert_eq!(orders.len(), 5);

        let totals: Vec<f64> = orders.iter().map(|o| o.total_amount).collect();
        assert_eq!(
            totals,
            vec![2_400_000.0, 1_440_000.0, 4_710_000.0, 1_800_000.0, 1_440_000.0]
        );
    }
}
