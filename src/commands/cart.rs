//! Cart command - Build a sale from product picks

use anyhow::{bail, Context, Result};
use comfy_table::Cell;
use owo_colors::OwoColorize;
use std::path::Path;

use super::utils;
use stockup::inventory::Catalog;
use stockup::sales::SalesCart;
use stockup::text;

/// Apply picks to a cart
///
/// `"<id>"` adds one unit, `"<id>=<qty>"` sets the quantity (0 removes it).
pub fn apply_picks(cart: &mut SalesCart, picks: &[String]) -> Result<()> {
    for pick in picks {
        match pick.split_once('=') {
            Some((id, qty)) => {
                let qty: u32 = qty
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid quantity in pick: {}", pick))?;
                cart.set_quantity(id.trim(), qty);
            }
            None if !pick.trim().is_empty() => {
                cart.increment(pick.trim());
            }
            None => bail!("Empty product pick"),
        }
    }
    Ok(())
}

/// Execute the cart command and return formatted output
pub fn execute(catalog_file: &Path, picks: &[String], json: bool) -> Result<String> {
    let catalog = Catalog::read(catalog_file)?;
    let mut cart = SalesCart::new();
    apply_picks(&mut cart, picks)?;

    if cart.is_empty() {
        return Ok(format!("{}", "Cart is empty".yellow()));
    }

    if json {
        return Ok(serde_json::to_string_pretty(&cart.to_sale_records())?);
    }

    let mut table = utils::new_table(&["Product", "Qty", "Price", "Subtotal"]);
    let mut total = 0.0;
    for item in cart.items(catalog.products()) {
        let price = catalog
            .find(&item.product_id)
            .map(|p| p.selling_price)
            .unwrap_or_default();
        let subtotal = price * f64::from(item.quantity);
        total += subtotal;
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(item.quantity),
            Cell::new(text::format_naira(price)),
            Cell::new(text::format_naira(subtotal)),
        ]);
    }

    Ok(format!(
        "{}\n\n{}\n{} {}",
        table,
        cart.summary_line(),
        cart.total_items_line(),
        text::format_naira(total).bold()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn picks(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn catalog_file(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[
                {"id": "1", "name": "Pen", "sellingPrice": 150, "numberAvailable": 40},
                {"id": "2", "name": "Cup", "sellingPrice": 1200, "numberAvailable": 5}
            ]"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_apply_picks() {
        let mut cart = SalesCart::new();
        apply_picks(&mut cart, &picks(&["1", "1", "2=3", "1=0"])).unwrap();
        assert_eq!(cart.quantity("1"), 0);
        assert_eq!(cart.quantity("2"), 3);

        assert!(apply_picks(&mut cart, &picks(&["2=x"])).is_err());
        assert!(apply_picks(&mut cart, &picks(&[" "])).is_err());
    }

    #[test]
    fn test_execute_table() {
        let dir = TempDir::new().unwrap();
        let output = execute(&catalog_file(&dir), &picks(&["1", "1", "2=2"]), false).unwrap();
        assert!(output.contains("Pen"));
        assert!(output.contains("₦2,400"));
        assert!(output.contains("2 products selected • 4 total"));
        assert!(output.contains("4 total items"));
        assert!(output.contains("2,700"));
    }

    #[test]
    fn test_execute_json() {
        let dir = TempDir::new().unwrap();
        let output = execute(&catalog_file(&dir), &picks(&["2=1"]), true).unwrap();
        let records: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(records[0]["productId"], "2");
        assert_eq!(records[0]["quantity"], 1);
    }

    #[test]
    fn test_execute_empty_cart() {
        let dir = TempDir::new().unwrap();
        let output = execute(&catalog_file(&dir), &[], false).unwrap();
        assert!(output.contains("Cart is empty"));
    }
}
