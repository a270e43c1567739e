//! Products command - Show the catalog as a table

use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

use super::utils;
use stockup::inventory::{Catalog, Product};
use stockup::text;

/// Options for the products command
pub struct ProductsOptions {
    /// Case-insensitive search word
    pub search: Option<String>,
    /// Only products at or below this stock level
    pub low_stock: Option<i64>,
    /// Show backend ids
    pub with_id: bool,
}

/// Execute the products command and return formatted output
pub fn execute(catalog_file: &Path, options: &ProductsOptions) -> Result<String> {
    let catalog = Catalog::read(catalog_file)?;
    Ok(render(&catalog, options))
}

fn render(catalog: &Catalog, options: &ProductsOptions) -> String {
    let mut products = catalog.search(options.search.as_deref().unwrap_or_default());
    if let Some(threshold) = options.low_stock {
        let low: Vec<&Product> = catalog.low_stock(threshold);
        products.retain(|p| low.iter().any(|l| std::ptr::eq(*l, *p)));
        products.sort_by_key(|p| p.number_available);
    }

    let mut header = vec![];
    if options.with_id {
        header.push("ID");
    }
    header.extend(["Name", "Category", "Cost", "Price", "Stock", "Updated"]);
    let mut table = utils::new_table(&header);

    for product in &products {
        let mut row = vec![];
        if options.with_id {
            row.push(Cell::new(product.id.as_deref().unwrap_or("-")));
        }
        row.push(Cell::new(&product.name));
        row.push(Cell::new(product.category_name().unwrap_or("-")));
        row.push(Cell::new(text::format_naira(product.cost_price)));
        row.push(Cell::new(text::format_naira(product.selling_price)));
        row.push(Cell::new(product.number_available));
        row.push(Cell::new(
            product
                .updated_at
                .as_deref()
                .map(utils::format_timestamp)
                .unwrap_or_else(|| "-".to_string()),
        ));
        table.add_row(row);
    }

    let mut output = table.to_string();
    if products.len() < catalog.len() {
        output.push_str(&format!(
            "\n\nShowing {} of {} products",
            products.len(),
            catalog.len()
        ));
    } else {
        output.push_str(&format!("\n\n{} found", text::plural(catalog.len(), "product")));
    }
    output
}
