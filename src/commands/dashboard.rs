//! Dashboard command - Build a dashboard request and render its response

use anyhow::{Context, Result};
use comfy_table::Cell;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::PathBuf;

use super::utils;
use stockup::config::Settings;
use stockup::sales::dashboard::{self, parse_datetime, DashboardState, Tab};
use stockup::text;

/// Options for the dashboard command
pub struct DashboardOptions {
    /// Tab name: summary, sales, top, stock
    pub tab: String,
    /// Zero-based page of the sales tab
    pub page: u32,
    /// Range start, `YYYY-MM-DDTHH:MM`
    pub from: Option<String>,
    /// Range end, `YYYY-MM-DDTHH:MM`
    pub to: Option<String>,
    /// Top products to show
    pub limit: Option<u32>,
    /// Low-stock threshold
    pub threshold: Option<i64>,
    /// Saved backend response for the tab
    pub file: Option<PathBuf>,
}

/// Dashboard state as described by the options
pub fn build_state(options: &DashboardOptions, settings: &Settings) -> Result<DashboardState> {
    let tab = Tab::parse(&options.tab).with_context(|| {
        format!(
            "Invalid tab '{}'. Use summary, sales, top, or stock",
            options.tab
        )
    })?;

    let parse = |value: &Option<String>| -> Result<_> {
        value
            .as_deref()
            .map(|v| parse_datetime(v).with_context(|| format!("Invalid date-time: {}", v)))
            .transpose()
    };

    let mut state = DashboardState::new(settings.top_limit, settings.stock_threshold);
    state.active_tab = tab;
    state.set_page_size(settings.page_size);
    state.set_range(parse(&options.from)?, parse(&options.to)?);
    state.set_page(options.page);
    if let Some(limit) = options.limit {
        state.set_top_limit(limit);
    }
    if let Some(threshold) = options.threshold {
        state.set_stock_threshold(threshold);
    }
    Ok(state)
}

fn render_active(state: &DashboardState) -> String {
    match state.active_tab {
        Tab::Summary => match &state.summary {
            Some(summary) => {
                let mut table = utils::new_table(&["Units sold", "Revenue", "Profit"]);
                table.add_row(vec![
                    Cell::new(summary.total_quantity),
                    Cell::new(text::format_naira(summary.total_revenue)),
                    Cell::new(text::format_naira(summary.total_profit)),
                ]);
                let mut output = table.to_string();
                if dashboard::show_excluded(summary) {
                    let excluded = summary.excluded_count.unwrap_or_default() as usize;
                    output.push_str(&format!(
                        "\n{}",
                        format!(
                            "{} excluded from profit (missing cost or sold price)",
                            text::plural(excluded, "sale")
                        )
                        .yellow()
                    ));
                }
                output
            }
            None => "No summary".to_string(),
        },
        Tab::Sales => {
            let mut table = utils::new_table(&["Date", "Product", "Qty", "Price", "Total"]);
            for sale in &state.sales {
                table.add_row(vec![
                    Cell::new(utils::format_timestamp(&sale.created_at)),
                    Cell::new(sale.product_name()),
                    Cell::new(sale.quantity),
                    Cell::new(text::format_naira(sale.sold_price)),
                    Cell::new(text::format_naira(sale.total_amount)),
                ]);
            }
            let mut output = table.to_string();
            output.push_str(&format!("\n\nPage {}", state.page() + 1));
            if state.has_more() {
                output.push_str(" (more available)");
            }
            output
        }
        Tab::Top => {
            let mut table = utils::new_table(&["#", "Product", "Sold", "Revenue"]);
            for (rank, top) in state.top_products.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(rank + 1),
                    Cell::new(&top.product_name),
                    Cell::new(top.total_sold),
                    Cell::new(text::format_naira(top.total_revenue)),
                ]);
            }
            table.to_string()
        }
        Tab::Stock => {
            if state.low_stock.is_empty() {
                return format!(
                    "{}",
                    format!("Nothing at or below {} in stock", state.stock_threshold()).green()
                );
            }
            let mut table = utils::new_table(&["Product", "Available"]);
            for product in &state.low_stock {
                table.add_row(vec![
                    Cell::new(&product.name),
                    Cell::new(product.number_available),
                ]);
            }
            table.to_string()
        }
    }
}

/// Execute the dashboard command and return formatted output
pub fn execute(options: &DashboardOptions, settings: &Settings) -> Result<String> {
    let mut state = build_state(options, settings)?;
    let url = state.active_request().url(&settings.endpoints()?)?;
    let mut output = format!("GET {}", url);

    if let Some(file) = &options.file {
        let response: Value = utils::read_json(file)?;
        state
            .apply_active(response)
            .with_context(|| format!("Unexpected response shape in {}", file.display()))?;
        output.push_str("\n\n");
        output.push_str(&render_active(&state));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(tab: &str) -> DashboardOptions {
        DashboardOptions {
            tab: tab.to_string(),
            page: 0,
            from: None,
            to: None,
            limit: None,
            threshold: None,
            file: None,
        }
    }

    #[test]
    fn test_build_state() {
        let opts = DashboardOptions {
            page: 2,
            from: Some("2025-03-01T08:00".to_string()),
            limit: Some(500),
            ..options("sales")
        };
        let state = build_state(&opts, &Settings::default()).unwrap();
        assert_eq!(state.active_tab, Tab::Sales);
        assert_eq!(state.page(), 2);
        assert_eq!(state.top_limit(), 50);
        assert!(state.range().0.is_some());
    }

    #[test]
    fn test_build_state_rejects_bad_input() {
        assert!(build_state(&options("charts"), &Settings::default()).is_err());

        let opts = DashboardOptions {
            to: Some("March".to_string()),
            ..options("summary")
        };
        assert!(build_state(&opts, &Settings::default()).is_err());
    }

    #[test]
    fn test_request_url() {
        let opts = DashboardOptions {
            threshold: Some(3),
            ..options("stock")
        };
        let output = execute(&opts, &Settings::default()).unwrap();
        assert_eq!(
            output,
            "GET http://localhost:8080/api/sales/low-stock?stockThreshold=3"
        );
    }

    #[test]
    fn test_render_sales_page() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("sales.json");
        fs::write(
            &file,
            r#"{"content": [{"id": 1, "soldPrice": 150, "quantity": 2, "totalAmount": 300,
                 "createdAt": "2025-03-01T10:15:00Z", "product": null}], "totalPages": 2}"#,
        )
        .unwrap();

        let opts = DashboardOptions {
            file: Some(file),
            ..options("sales")
        };
        let output = execute(&opts, &Settings::default()).unwrap();
        assert!(output.contains("page=0&size=10"));
        assert!(output.contains("—"));
        assert!(output.contains("₦300"));
        assert!(output.contains("Page 1 (more available)"));
    }

    #[test]
    fn test_render_summary_with_excluded() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("summary.json");
        fs::write(
            &file,
            r#"{"totalQuantity": 12, "totalRevenue": 15000, "totalProfit": 4200.5, "excludedCount": 2}"#,
        )
        .unwrap();

        let opts = DashboardOptions {
            file: Some(file),
            ..options("summary")
        };
        let output = execute(&opts, &Settings::default()).unwrap();
        assert!(output.contains("₦15,000"));
        assert!(output.contains("₦4,200.5"));
        assert!(output.contains("2 sales excluded from profit"));
    }

    #[test]
    fn test_render_empty_stock() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("stock.json");
        fs::write(&file, "null").unwrap();

        let opts = DashboardOptions {
            file: Some(file),
            ..options("stock")
        };
        let output = execute(&opts, &Settings::default()).unwrap();
        assert!(output.contains("Nothing at or below 10 in stock"));
    }
}
