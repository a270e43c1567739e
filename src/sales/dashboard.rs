//! Sales dashboard: tabs, filters, paging, and backend views

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::ApiRequest;
use crate::inventory::product::id_from_text_or_number;

/// Sales listed per page
pub const PAGE_SIZE: u32 = 10;
/// Top products shown by default
pub const DEFAULT_TOP_LIMIT: u32 = 5;
pub const MAX_TOP_LIMIT: u32 = 50;
/// Products at or below this count are low on stock
pub const DEFAULT_STOCK_THRESHOLD: i64 = 10;

/// Format of the date-time pickers (`2025-03-01T14:30`)
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Summary,
    Sales,
    Top,
    Stock,
}

impl Tab {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "summary" => Some(Self::Summary),
            "sales" => Some(Self::Sales),
            "top" | "top-products" => Some(Self::Top),
            "stock" | "low-stock" => Some(Self::Stock),
            _ => None,
        }
    }
}

/// Totals over the selected period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    #[serde(default)]
    pub total_quantity: i64,
    #[serde(default)]
    pub total_revenue: f64,
    #[serde(default)]
    pub total_profit: f64,
    /// Sales left out of the profit figure (missing cost or sold price)
    #[serde(default)]
    pub excluded_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub name: String,
}

/// One recorded sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleView {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub sold_price: f64,
    pub quantity: i64,
    pub total_amount: f64,
    pub created_at: String,
    #[serde(default)]
    pub product: Option<ProductRef>,
}

impl SaleView {
    pub fn product_name(&self) -> &str {
        self.product.as_ref().map_or("—", |p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductView {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub product_id: String,
    pub product_name: String,
    pub total_sold: i64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStockView {
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    pub name: String,
    pub number_available: i64,
}

/// Parse a date-time picker value
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT)
}

/// Everything the dashboard page holds between fetches
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub active_tab: Tab,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
    page: u32,
    page_size: u32,
    has_more: bool,
    top_limit: u32,
    stock_threshold: i64,
    pub summary: Option<SalesSummary>,
    pub sales: Vec<SaleView>,
    pub top_products: Vec<TopProductView>,
    pub low_stock: Vec<ProductStockView>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_LIMIT, DEFAULT_STOCK_THRESHOLD)
    }
}

impl DashboardState {
    pub fn new(top_limit: u32, stock_threshold: i64) -> Self {
        Self {
            active_tab: Tab::default(),
            from: None,
            to: None,
            page: 0,
            page_size: PAGE_SIZE,
            has_more: false,
            top_limit: top_limit.clamp(1, MAX_TOP_LIMIT),
            stock_threshold: stock_threshold.max(0),
            summary: None,
            sales: Vec::new(),
            top_products: Vec::new(),
            low_stock: Vec::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn set_page_size(&mut self, size: u32) {
        self.page_size = size.max(1);
        self.page = 0;
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn top_limit(&self) -> u32 {
        self.top_limit
    }

    pub fn stock_threshold(&self) -> i64 {
        self.stock_threshold
    }

    pub fn range(&self) -> (Option<NaiveDateTime>, Option<NaiveDateTime>) {
        (self.from, self.to)
    }

    /// Change the period; paging restarts at the first page
    pub fn set_range(&mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) {
        self.from = from;
        self.to = to;
        self.page = 0;
    }

    /// Clamped to 1..=50
    pub fn set_top_limit(&mut self, limit: u32) {
        self.top_limit = limit.clamp(1, MAX_TOP_LIMIT);
    }

    /// Negative thresholds are raised to 0
    pub fn set_stock_threshold(&mut self, threshold: i64) {
        self.stock_threshold = threshold.max(0);
    }

    /// Jump to a page (used when opening the dashboard at a given page)
    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Advance when the backend reported more pages
    pub fn next_page(&mut self) -> bool {
        if !self.has_more {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    fn with_range(&self, request: ApiRequest) -> ApiRequest {
        request
            .param_opt("from", self.from.map(|d| d.format(DATETIME_FORMAT)))
            .param_opt("to", self.to.map(|d| d.format(DATETIME_FORMAT)))
    }

    pub fn summary_request(&self) -> ApiRequest {
        self.with_range(ApiRequest::new("sales/summary"))
    }

    pub fn sales_request(&self) -> ApiRequest {
        let request = ApiRequest::new("sales/filter")
            .param("page", self.page)
            .param("size", self.page_size);
        self.with_range(request)
    }

    pub fn top_products_request(&self) -> ApiRequest {
        self.with_range(ApiRequest::new("sales/top-products"))
            .param("limit", self.top_limit)
    }

    /// Stock levels are not tied to a period, so the range is left out
    pub fn low_stock_request(&self) -> ApiRequest {
        ApiRequest::new("sales/low-stock").param("stockThreshold", self.stock_threshold)
    }

    /// The request behind the active tab
    pub fn active_request(&self) -> ApiRequest {
        match self.active_tab {
            Tab::Summary => self.summary_request(),
            Tab::Sales => self.sales_request(),
            Tab::Top => self.top_products_request(),
            Tab::Stock => self.low_stock_request(),
        }
    }

    pub fn apply_summary(&mut self, value: Value) -> Result<(), serde_json::Error> {
        self.summary = Some(serde_json::from_value(value)?);
        Ok(())
    }

    /// Accept either a page object or a bare array of sales
    ///
    /// `{ "content": [...], "totalPages": n }` sets `has_more` from the page
    /// count; a bare array means there is nothing further; anything else
    /// empties the list.
    pub fn apply_sales(&mut self, value: Value) -> Result<(), serde_json::Error> {
        match value {
            Value::Object(mut map) if map.contains_key("content") => {
                let total_pages = map.get("totalPages").and_then(Value::as_u64).unwrap_or(0);
                let content = map.remove("content").unwrap_or(Value::Null);
                self.sales = serde_json::from_value(content)?;
                self.has_more = u64::from(self.page) + 1 < total_pages;
            }
            Value::Array(_) => {
                self.sales = serde_json::from_value(value)?;
                self.has_more = false;
            }
            _ => {
                self.sales.clear();
                self.has_more = false;
            }
        }
        Ok(())
    }

    /// A `null` body counts as no rows
    pub fn apply_top_products(&mut self, value: Value) -> Result<(), serde_json::Error> {
        self.top_products = if value.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(value)?
        };
        Ok(())
    }

    pub fn apply_low_stock(&mut self, value: Value) -> Result<(), serde_json::Error> {
        self.low_stock = if value.is_null() {
            Vec::new()
        } else {
            serde_json::from_value(value)?
        };
        Ok(())
    }

    /// Feed a response into whichever tab is active
    pub fn apply_active(&mut self, value: Value) -> Result<(), serde_json::Error> {
        match self.active_tab {
            Tab::Summary => self.apply_summary(value),
            Tab::Sales => self.apply_sales(value),
            Tab::Top => self.apply_top_products(value),
            Tab::Stock => self.apply_low_stock(value),
        }
    }
}

/// Whether the "excluded from profit" card should be shown
pub fn show_excluded(summary: &SalesSummary) -> bool {
    summary.excluded_count.is_some_and(|n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sale(id: i64) -> Value {
        json!({
            "id": id,
            "soldPrice": 200.0,
            "quantity": 2,
            "totalAmount": 400.0,
            "createdAt": "2025-03-01T10:15:00Z",
            "product": { "id": "p-1", "name": "Pen" }
        })
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!(Tab::parse("Summary"), Some(Tab::Summary));
        assert_eq!(Tab::parse("top-products"), Some(Tab::Top));
        assert_eq!(Tab::parse("low-stock"), Some(Tab::Stock));
        assert_eq!(Tab::parse("charts"), None);
    }

    #[test]
    fn test_defaults() {
        let state = DashboardState::default();
        assert_eq!(state.active_tab, Tab::Summary);
        assert_eq!(state.page(), 0);
        assert_eq!(state.top_limit(), 5);
        assert_eq!(state.stock_threshold(), 10);
    }

    #[test]
    fn test_page_response_sets_has_more() {
        let mut state = DashboardState::default();
        state
            .apply_sales(json!({ "content": [sale(1), sale(2)], "totalPages": 3 }))
            .unwrap();
        assert_eq!(state.sales.len(), 2);
        assert_eq!(state.sales[0].id, "1");
        assert!(state.has_more());

        assert!(state.next_page());
        assert!(state.next_page());
        state
            .apply_sales(json!({ "content": [sale(5)], "totalPages": 3 }))
            .unwrap();
        assert_eq!(state.page(), 2);
        assert!(!state.has_more());
        assert!(!state.next_page());
    }

    #[test]
    fn test_array_response_has_no_more_pages() {
        let mut state = DashboardState::default();
        state.apply_sales(json!([sale(1)])).unwrap();
        assert_eq!(state.sales.len(), 1);
        assert!(!state.has_more());
    }

    #[test]
    fn test_unexpected_response_empties_sales() {
        let mut state = DashboardState::default();
        state.apply_sales(json!([sale(1)])).unwrap();
        state.apply_sales(json!({ "message": "nope" })).unwrap();
        assert!(state.sales.is_empty());
    }

    #[test]
    fn test_prev_page_floors_at_zero() {
        let mut state = DashboardState::default();
        assert!(!state.prev_page());
        state.set_page(2);
        assert!(state.prev_page());
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_set_range_resets_page() {
        let mut state = DashboardState::default();
        state.set_page(4);
        let from = parse_datetime("2025-03-01T00:00").unwrap();
        state.set_range(Some(from), None);
        assert_eq!(state.page(), 0);
        assert_eq!(state.range(), (Some(from), None));
    }

    #[test]
    fn test_requests_carry_filters() {
        let mut state = DashboardState::default();
        state.set_range(
            Some(parse_datetime("2025-03-01T08:00").unwrap()),
            Some(parse_datetime("2025-03-31T20:30").unwrap()),
        );

        let summary = state.summary_request();
        assert_eq!(summary.path, "sales/summary");
        assert_eq!(summary.get("from"), Some("2025-03-01T08:00"));
        assert_eq!(summary.get("to"), Some("2025-03-31T20:30"));

        let sales = state.sales_request();
        assert_eq!(sales.get("page"), Some("0"));
        assert_eq!(sales.get("size"), Some("10"));

        let top = state.top_products_request();
        assert_eq!(top.get("limit"), Some("5"));
        assert_eq!(top.get("from"), Some("2025-03-01T08:00"));

        let stock = state.low_stock_request();
        assert_eq!(stock.get("stockThreshold"), Some("10"));
        assert_eq!(stock.get("from"), None);
    }

    #[test]
    fn test_top_limit_clamped() {
        let mut state = DashboardState::new(0, 10);
        assert_eq!(state.top_limit(), 1);
        state.set_top_limit(500);
        assert_eq!(state.top_limit(), 50);
        state.set_stock_threshold(-3);
        assert_eq!(state.stock_threshold(), 0);
    }

    #[test]
    fn test_page_size() {
        let mut state = DashboardState::default();
        state.set_page(3);
        state.set_page_size(25);
        assert_eq!(state.page(), 0);
        assert_eq!(state.sales_request().get("size"), Some("25"));

        state.set_page_size(0);
        assert_eq!(state.page_size(), 1);
    }

    #[test]
    fn test_null_lists_become_empty() {
        let mut state = DashboardState::default();
        state.apply_top_products(Value::Null).unwrap();
        state.apply_low_stock(Value::Null).unwrap();
        assert!(state.top_products.is_empty());
        assert!(state.low_stock.is_empty());

        state
            .apply_low_stock(json!([{ "id": 7, "name": "Cup", "numberAvailable": 2 }]))
            .unwrap();
        assert_eq!(state.low_stock[0].id, "7");
    }

    #[test]
    fn test_summary_and_excluded_card() {
        let mut state = DashboardState::default();
        state
            .apply_summary(json!({
                "totalQuantity": 12,
                "totalRevenue": 24000.0,
                "totalProfit": 6000.0
            }))
            .unwrap();
        let summary = state.summary.clone().unwrap();
        assert_eq!(summary.total_quantity, 12);
        assert!(!show_excluded(&summary));

        let with_excluded = SalesSummary {
            excluded_count: Some(2),
            ..summary
        };
        assert!(show_excluded(&with_excluded));
    }

    #[test]
    fn test_sale_without_product() {
        let mut value = sale(3);
        value["product"] = Value::Null;
        let view: SaleView = serde_json::from_value(value).unwrap();
        assert_eq!(view.product_name(), "—");
    }
}
