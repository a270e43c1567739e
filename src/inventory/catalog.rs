//! Product catalog as fetched from `/products`

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::product::Product;
use crate::api::ApiRequest;
use crate::text;

/// `GET /products`, filtered server-side when a search word is given
pub fn list_request(search: &str) -> ApiRequest {
    let request = ApiRequest::new("products");
    if text::is_blank(Some(search)) {
        request
    } else {
        request.param("search", search.trim())
    }
}

/// An in-memory product list
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Read a catalog from a JSON file holding an array of products
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {}", path.display()))?;
        let products: Vec<Product> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse catalog: {}", path.display()))?;
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_deref() == Some(id))
    }

    /// Case-insensitive match on name, description and tags
    ///
    /// A blank search word matches everything.
    pub fn search(&self, word: &str) -> Vec<&Product> {
        if text::is_blank(Some(word)) {
            return self.products.iter().collect();
        }

        let needle = word.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&needle)
                    || p.description.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Products with `threshold` or fewer units left, emptiest first
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| p.number_available <= threshold)
            .collect();
        low.sort_by_key(|p| p.number_available);
        low
    }

    /// Replace the product with the same id, or append it
    pub fn upsert(&mut self, product: Product) {
        let existing = product
            .id
            .as_deref()
            .and_then(|id| self.products.iter().position(|p| p.id.as_deref() == Some(id)));

        match existing {
            Some(index) => self.products[index] = product,
            None => self.products.push(product),
        }
    }
}
