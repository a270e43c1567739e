//! Cart of products to record as sold

use serde::{Deserialize, Serialize};

use crate::inventory::Product;
use crate::text;

/// A cart line ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
}

/// One sale to record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub product_id: String,
    pub quantity: u32,
}

/// Quantities picked per product, in the order products were first picked
#[derive(Debug, Clone, Default)]
pub struct SalesCart {
    counts: Vec<(String, u32)>,
}

impl SalesCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quantity(&self, product_id: &str) -> u32 {
        self.counts
            .iter()
            .find(|(id, _)| id == product_id)
            .map_or(0, |(_, qty)| *qty)
    }

    /// Set a quantity; 0 takes the product out of the cart
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) {
        if quantity == 0 {
            self.counts.retain(|(id, _)| id != product_id);
            return;
        }

        match self.counts.iter_mut().find(|(id, _)| id == product_id) {
            Some((_, qty)) => *qty = quantity,
            None => self.counts.push((product_id.to_string(), quantity)),
        }
    }

    /// Add one unit and return the new quantity
    pub fn increment(&mut self, product_id: &str) -> u32 {
        let next = self.quantity(product_id).saturating_add(1);
        self.set_quantity(product_id, next);
        next
    }

    /// Take one unit away
    ///
    /// Returns `None` when the quantity was already 0 (nothing changed).
    pub fn decrement(&mut self, product_id: &str) -> Option<u32> {
        let current = self.quantity(product_id);
        if current == 0 {
            return None;
        }
        let next = current - 1;
        self.set_quantity(product_id, next);
        Some(next)
    }

    /// Lines with a positive quantity, named from `products`
    pub fn items(&self, products: &[Product]) -> Vec<CartItem> {
        self.counts
            .iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(id, qty)| CartItem {
                product_id: id.clone(),
                name: products
                    .iter()
                    .find(|p| p.id.as_deref() == Some(id.as_str()))
                    .map_or_else(|| "Unknown".to_string(), |p| p.name.clone()),
                quantity: *qty,
            })
            .collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.counts.iter().filter(|(_, qty)| *qty > 0).count()
    }

    pub fn total_quantity(&self) -> u64 {
        self.counts.iter().map(|(_, qty)| u64::from(*qty)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_count() == 0
    }

    /// `"2 products selected • 5 total"`
    pub fn summary_line(&self) -> String {
        format!(
            "{} selected • {} total",
            text::plural(self.distinct_count(), "product"),
            self.total_quantity()
        )
    }

    /// `"5 total items"`, `"1 total item"`
    pub fn total_items_line(&self) -> String {
        let total = self.total_quantity();
        format!("{} total item{}", total, if total == 1 { "" } else { "s" })
    }

    pub fn to_sale_records(&self) -> Vec<SaleRecord> {
        self.counts
            .iter()
            .filter(|(_, qty)| *qty > 0)
            .map(|(id, qty)| SaleRecord {
                product_id: id.clone(),
                quantity: *qty,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<Product> {
        let mut pen = Product::named("Pen");
        pen.id = Some("1".to_string());
        let mut cup = Product::named("Cup");
        cup.id = Some("2".to_string());
        vec![pen, cup]
    }

    #[test]
    fn test_increment_and_decrement() {
        let mut cart = SalesCart::new();
        assert_eq!(cart.increment("1"), 1);
        assert_eq!(cart.increment("1"), 2);
        assert_eq!(cart.decrement("1"), Some(1));
        assert_eq!(cart.decrement("1"), Some(0));
        // Floors at zero without reporting a change
        assert_eq!(cart.decrement("1"), None);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_items_keep_pick_order_and_name_unknowns() {
        let mut cart = SalesCart::new();
        cart.set_quantity("2", 3);
        cart.set_quantity("9", 1);
        cart.set_quantity("1", 2);

        let items = cart.items(&products());
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Cup", "Unknown", "Pen"]);
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_set_zero_removes() {
        let mut cart = SalesCart::new();
        cart.set_quantity("1", 4);
        cart.set_quantity("1", 0);
        assert_eq!(cart.quantity("1"), 0);
        assert!(cart.items(&products()).is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let mut cart = SalesCart::new();
        cart.increment("1");
        assert_eq!(cart.summary_line(), "1 product selected • 1 total");
        assert_eq!(cart.total_items_line(), "1 total item");

        cart.set_quantity("2", 4);
        assert_eq!(cart.distinct_count(), 2);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.summary_line(), "2 products selected • 5 total");
        assert_eq!(cart.total_items_line(), "5 total items");
    }

    #[test]
    fn test_sale_records() {
        let mut cart = SalesCart::new();
        cart.set_quantity("1", 2);
        cart.set_quantity("2", 1);

        let records = cart.to_sale_records();
        assert_eq!(records.len(), 2);
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["productId"], "1");
        assert_eq!(json["quantity"], 2);

        cart.clear();
        assert!(cart.to_sale_records().is_empty());
    }
}
