//! Report generation.
//!
//! This module renders an order report as Markdown or JSON. Number and
//! currency formatting happen here and nowhere else.

use crate::analysis::{group_by_channel, group_by_status};
use crate::config::ReportConfig;
use crate::models::{ItemReportRow, Order, Report, ReportMetadata, Summary, VendorTotal};
use anyhow::Result;

/// Rendering options for the Markdown report.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub currency: String,
    pub include_order_table: bool,
    pub include_order_lines: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for RenderOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            title: config.title.clone(),
            currency: config.currency.clone(),
            include_order_table: config.include_order_table,
            include_order_lines: config.include_order_lines,
        }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", options.title));
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(report, options));
    output.push_str(&generate_items_section(
        &report.rows,
        &report.summary,
        options,
    ));

    if options.include_order_table {
        output.push_str(&generate_orders_section(&report.orders, options));
    }

    if options.include_order_lines && !report.orders.is_empty() {
        output.push_str(&generate_order_details_section(&report.orders, options));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Orders Matched:** {} of {}\n",
        metadata.orders_matched, metadata.orders_loaded
    ));
    if metadata.filters.is_empty() {
        section.push_str("- **Filters:** none\n");
    } else {
        section.push_str(&format!("- **Filters:** {}\n", metadata.filters.join("; ")));
    }
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the summary section: headline totals and order breakdowns.
fn generate_summary_section(report: &Report, options: &RenderOptions) -> String {
    let mut section = String::new();
    let summary = &report.summary;

    section.push_str("## Summary\n\n");
    section.push_str("| Total Orders | Total Quantity Requested | Total Order Value |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        summary.total_orders,
        format_number(summary.total_quantity),
        format_amount(summary.total_amount, &options.currency)
    ));

    if report.orders.is_empty() {
        return section;
    }

    section.push_str("### Orders by Status\n\n");
    section.push_str("| Status | Orders |\n");
    section.push_str("|:---|:---:|\n");
    for (status, count) in group_by_status(&report.orders) {
        section.push_str(&format!("| {} | {} |\n", status, count));
    }
    section.push('\n');

    section.push_str("### Orders by Channel\n\n");
    section.push_str("| Channel | Orders |\n");
    section.push_str("|:---|:---:|\n");
    for (channel, count) in group_by_channel(&report.orders) {
        section.push_str(&format!("| {} | {} |\n", channel, count));
    }
    section.push('\n');

    if !report.vendors.is_empty() {
        section.push_str(&generate_vendor_table(&report.vendors, options));
    }

    section
}

fn generate_vendor_table(vendors: &[VendorTotal], options: &RenderOptions) -> String {
    let mut table = String::new();

    table.push_str("### Orders by Vendor\n\n");
    table.push_str("| Vendor | Orders | Value |\n");
    table.push_str("|:---|:---:|---:|\n");
    for vendor in vendors {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            escape_cell(&vendor.vendor_name),
            vendor.total_orders,
            format_amount(vendor.total_amount, &options.currency)
        ));
    }
    table.push('\n');

    table
}

/// Generate the item-level analytics table.
fn generate_items_section(
    rows: &[ItemReportRow],
    summary: &Summary,
    options: &RenderOptions,
) -> String {
    let mut section = String::new();

    section.push_str("## Item Level Analytics\n\n");

    if rows.is_empty() {
        section.push_str("No item data available for the selected filters.\n\n");
        return section;
    }

    if rows.len() < summary.items.len() {
        section.push_str(&format!(
            "*Showing top {} of {} items by value.*\n\n",
            rows.len(),
            summary.items.len()
        ));
    }

    section.push_str(
        "| Code | Item | Orders | Total Qty | Total Value | Avg Qty/Order | Avg Unit Price | % of Total |\n",
    );
    section.push_str("|:---|:---|:---:|---:|---:|---:|---:|---:|\n");

    for row in rows {
        let agg = &row.aggregate;
        section.push_str(&format!(
            "| `{}` | {} | {} | {} | {} | {} | {} | {} |\n",
            agg.item_code,
            escape_cell(&agg.item_name),
            agg.total_orders,
            format_number(agg.total_quantity),
            format_amount(agg.total_amount, &options.currency),
            format_decimal(row.avg_order_qty),
            format_amount(row.avg_unit_price, &options.currency),
            format_percent(row.percent_of_total)
        ));
    }
    section.push('\n');

    section
}

/// Generate the order table.
fn generate_orders_section(orders: &[Order], options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str("## Orders\n\n");

    if orders.is_empty() {
        section.push_str("No orders found matching criteria.\n\n");
        return section;
    }

    section.push_str(
        "| Property Code | Property Name | Region | Order ID | Created On | Channel | Items | Qty | Value | Vendor | Status |\n",
    );
    section.push_str("|:---|:---|:---|:---|:---|:---|:---|---:|---:|:---|:---|\n");

    for order in orders {
        section.push_str(&format!(
            "| {} | {} | {} | `{}` | {} | {} | {} | {} | {} | {} | {} |\n",
            escape_cell(&order.property_code),
            escape_cell(&order.property_name),
            escape_cell(&order.property_region),
            order.id,
            order.created_on,
            order.channel,
            escape_cell(&item_preview(order)),
            format_number(order.line_quantity()),
            format_amount(order.total_amount, &options.currency),
            escape_cell(&order.vendor_name),
            order.status
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-order line item listing.
fn generate_order_details_section(orders: &[Order], options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str("## Order Details\n\n");

    for order in orders {
        section.push_str(&format!("### `{}`\n\n", order.id));
        section.push_str(&format!(
            "- **Property:** {} ({})\n",
            order.property_name, order.property_code
        ));
        section.push_str(&format!("- **Vendor:** {}\n\n", order.vendor_name));

        if order.items.is_empty() {
            section.push_str("No line items.\n\n");
            continue;
        }

        section.push_str("| Code | Item | Qty | Unit Price | Subtotal |\n");
        section.push_str("|:---|:---|---:|---:|---:|\n");
        for line in &order.items {
            let name = match line.specifications.as_deref() {
                Some(detail) if !detail.trim().is_empty() => format!("{} ({})", line.item_name, detail),
                _ => line.item_name.clone(),
            };
            section.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                line.item_code,
                escape_cell(&name),
                format_number(line.quantity),
                format_amount(line.unit_price, &options.currency),
                format_amount(line.subtotal, &options.currency)
            ));
        }
        section.push('\n');
    }

    section
}

/// Short description of an order's lines, e.g. `2 Items (Mineral Water 600ml...)`.
fn item_preview(order: &Order) -> String {
    let count = order.items.len();
    let noun = if count == 1 { "Item" } else { "Items" };

    match order.items.first() {
        Some(first) => format!("{} {} ({}...)", count, noun, first.item_name),
        None => format!("{} {}", count, noun),
    }
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by procreport*\n");

    footer
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Format an integer with `.` thousands separators (id-ID style).
pub fn format_number(n: i64) -> String {
    let grouped = group_thousands(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a number with `.` thousands separators and up to two decimals
/// after a `,`.
pub fn format_decimal(value: f64) -> String {
    format_fixed(value, 2, true)
}

/// Render `value` with `decimals` places in id-ID style.
///
/// Digits come from `f64` formatting directly, so magnitudes beyond the
/// integer range keep their whole part.
fn format_fixed(value: f64, decimals: usize, trim: bool) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = if trim {
        fraction.trim_end_matches('0')
    } else {
        fraction
    };

    let mut result = String::new();
    if value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        result.push('-');
    }
    result.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        result.push(',');
        result.push_str(fraction);
    }

    result
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }

    result
}

/// Format an amount with a currency prefix, e.g. `Rp 1.200.000`.
pub fn format_amount(amount: f64, currency: &str) -> String {
    format!("{} {}", currency, format_decimal(amount))
}

/// Format a percentage with one decimal, e.g. `36,6%`.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_fixed(value, 1, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{report_rows, summarize, vendor_totals};
    use crate::store::OrderStore;
    use chrono::Utc;

    fn create_test_report(orders: Vec<Order>) -> Report {
        let summary = summarize(&orders);
        let rows = report_rows(&summary);

        Report {
            metadata: ReportMetadata {
                source: "built-in sample".to_string(),
                generated_at: Utc::now(),
                orders_loaded: 5,
                orders_matched: orders.len(),
                filters: vec![],
                duration_seconds: 0.002,
            },
            vendors: vendor_totals(&orders),
            summary,
            rows,
            orders,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(OrderStore::sample().orders().to_vec());
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("# Order Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Item Level Analytics"));
        assert!(markdown.contains("## Orders"));
        assert!(markdown.contains("| 5 | 1.038 | Rp 11.790.000 |"));
        assert!(markdown.contains("| Sent | 3 |"));
        assert!(markdown.contains("| WhatsApp | 3 |"));
        assert!(markdown.contains("- **Filters:** none"));
    }

    #[test]
    fn test_item_rows_ranked() {
        let report = create_test_report(OrderStore::sample().orders().to_vec());
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        let water = markdown.find("`ITM001`").unwrap();
        let towels = markdown.find("`ITM002`").unwrap();
        let detergent = markdown.find("`ITM005`").unwrap();
        assert!(water < towels);
        assert!(towels < detergent);

        assert!(markdown.contains(
            "| `ITM001` | Mineral Water 600ml | 3 | 864 | Rp 4.320.000 | 288 | Rp 5.000 | 36,6% |"
        ));
    }

    #[test]
    fn test_empty_report() {
        let report = create_test_report(vec![]);
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("| 0 | 0 | Rp 0 |"));
        assert!(markdown.contains("No item data available for the selected filters."));
        assert!(markdown.contains("No orders found matching criteria."));
        assert!(!markdown.contains("### Orders by Status"));
    }

    #[test]
    fn test_truncated_rows_and_options() {
        let mut report = create_test_report(OrderStore::sample().orders().to_vec());
        report.rows.truncate(2);

        let options = RenderOptions {
            title: "November Orders".to_string(),
            currency: "IDR".to_string(),
            include_order_table: false,
            include_order_lines: false,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.starts_with("# November Orders"));
        assert!(markdown.contains("*Showing top 2 of 5 items by value.*"));
        assert!(markdown.contains("IDR 11.790.000"));
        assert!(!markdown.contains("## Orders\n"));
    }

    #[test]
    fn test_order_details_section() {
        let report = create_test_report(OrderStore::sample().orders().to_vec());

        let markdown = generate_markdown_report(&report, &RenderOptions::default());
        assert!(!markdown.contains("## Order Details"));

        let options = RenderOptions {
            include_order_lines: true,
            ..RenderOptions::default()
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("## Order Details"));
        assert!(markdown.contains("### `ORD-20241128-001`"));
        assert!(markdown.contains("- **Vendor:** Pacific Supplies Ltd."));
        assert!(markdown.contains("| `ITM001` | Mineral Water 600ml | 240 | Rp 5.000 | Rp 1.200.000 |"));
        assert!(markdown.find("## Orders\n").unwrap() < markdown.find("## Order Details").unwrap());

        let empty = create_test_report(vec![]);
        assert!(!generate_markdown_report(&empty, &options).contains("## Order Details"));
    }

    #[test]
    fn test_item_preview() {
        let orders = OrderStore::sample().orders().to_vec();
        assert_eq!(item_preview(&orders[0]), "2 Items (Mineral Water 600ml...)");
        assert_eq!(item_preview(&orders[1]), "1 Item (Bed Sheet King...)");

        let mut empty = orders[1].clone();
        empty.items.clear();
        assert_eq!(item_preview(&empty), "0 Items");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(OrderStore::sample().orders().to_vec());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"summary\""));
        assert!(json.contains("\"percent_of_total\""));
        assert!(json.contains("\"item_code\": \"ITM001\""));
        assert!(json.contains("\"createdOn\""));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.000");
        assert_eq!(format_number(1234567), "1.234.567");
        assert_eq!(format_number(-1200000), "-1.200.000");
    }

    #[test]
    fn test_format_decimal_and_amount() {
        assert_eq!(format_decimal(1_200_000.0), "1.200.000");
        assert_eq!(format_decimal(5.5), "5,5");
        assert_eq!(format_decimal(1234.567), "1.234,57");
        assert_eq!(format_decimal(-0.25), "-0,25");
        assert_eq!(format_amount(2_400_000.0, "Rp"), "Rp 2.400.000");
        assert_eq!(format_percent(36.641221), "36,6%");
        assert_eq!(format_percent(0.0), "0,0%");
        assert_eq!(format_percent(-12.34), "-12,3%");
    }

    #[test]
    fn test_format_decimal_beyond_integer_range() {
        assert_eq!(format_decimal(1e20), "100.000.000.000.000.000.000");
        assert_eq!(format_amount(-2.5e19, "Rp"), "Rp -25.000.000.000.000.000.000");
        assert_eq!(format_decimal(-0.001), "0");
        assert_eq!(format_decimal(f64::INFINITY), "inf");
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("Soap | 500ml"), "Soap \\| 500ml");
    }
}
