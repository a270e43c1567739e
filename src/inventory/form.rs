//! Product entry forms: bulk list, single product, and edit

use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use super::product::{NewProduct, Product};
use crate::api::ApiRequest;
use super::rows::RowList;
use crate::input::NumericField;
use crate::text;

/// Validation and submission failures for the product forms
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("{field} is too large")]
    NumberTooLarge { field: &'static str },

    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: Box<FormError>,
    },

    #[error("a save is already in progress")]
    AlreadySubmitting,

    #[error("nothing to save: every row is blank")]
    NothingToSave,
}

/// Prevents a second submit while one is in flight
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitGuard {
    in_flight: bool,
}

impl SubmitGuard {
    pub fn begin(&mut self) -> Result<(), FormError> {
        if self.in_flight {
            return Err(FormError::AlreadySubmitting);
        }
        self.in_flight = true;
        Ok(())
    }

    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }
}

/// The "Add Products" page: a row list plus save/cancel
#[derive(Debug, Clone)]
pub struct BulkEntryForm {
    rows: RowList,
    initial_rows: usize,
    guard: SubmitGuard,
}

impl BulkEntryForm {
    pub fn new(initial_rows: usize) -> Self {
        Self {
            rows: RowList::new(initial_rows),
            initial_rows,
            guard: SubmitGuard::default(),
        }
    }

    pub fn rows(&self) -> &RowList {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut RowList {
        &mut self.rows
    }

    pub fn is_submitting(&self) -> bool {
        self.guard.is_submitting()
    }

    /// Filter blank rows, validate the rest, and mark the form as saving
    ///
    /// The guard is only taken when a payload is returned.
    pub fn begin_save(&mut self) -> Result<Vec<NewProduct>, FormError> {
        if self.guard.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }

        let payload = self.rows.to_new_products()?;
        if payload.is_empty() {
            return Err(FormError::NothingToSave);
        }

        self.guard.begin()?;
        debug!(count = payload.len(), "bulk save started");
        Ok(payload)
    }

    /// The save collaborator finished (either way)
    pub fn finish_save(&mut self) {
        self.guard.finish();
    }

    /// Throw away everything typed and start over
    pub fn cancel(&mut self) {
        self.rows = RowList::new(self.initial_rows);
        self.guard.finish();
    }
}

/// The single "Add Product" page
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub cost_price: NumericField,
    pub selling_price: NumericField,
    pub stock: NumericField,
    pub category_id: Option<String>,
    /// Picture to upload once the product exists
    pub image: Option<PathBuf>,
    guard: SubmitGuard,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check required fields and build the create payload
    ///
    /// Name, selling price and stock are required. An empty description or
    /// cost price is sent as `null`.
    pub fn validate(&self) -> Result<NewProduct, FormError> {
        if text::is_blank(Some(&self.name)) {
            return Err(FormError::MissingField { field: "name" });
        }
        if self.selling_price.is_empty() {
            return Err(FormError::MissingField {
                field: "selling price",
            });
        }
        if self.stock.is_empty() {
            return Err(FormError::MissingField { field: "stock" });
        }

        let description = if text::is_blank(Some(&self.description)) {
            None
        } else {
            Some(self.description.clone())
        };

        let cost_price = if self.cost_price.is_empty() {
            None
        } else {
            Some(coerce(&self.cost_price, "cost price")?)
        };

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description,
            cost_price,
            selling_price: Some(coerce(&self.selling_price, "selling price")?),
            number_available: Some(coerce(&self.stock, "stock")?),
            category_id: self.category_id.clone(),
        })
    }

    /// Second step of a create: upload the picture for the new product
    ///
    /// `None` when no picture was picked; the flow ends after the create.
    pub fn image_upload_request(&self, product_id: &str) -> Option<ApiRequest> {
        let path = self.image.as_deref()?;
        Some(ApiRequest::post(&format!("s3/upload/{}", product_id)).file("file", path))
    }

    /// Validate and take the submission guard
    pub fn begin_submit(&mut self) -> Result<NewProduct, FormError> {
        if self.guard.is_submitting() {
            return Err(FormError::AlreadySubmitting);
        }
        let payload = self.validate()?;
        self.guard.begin()?;
        Ok(payload)
    }

    pub fn finish_submit(&mut self) {
        self.guard.finish();
    }

    pub fn is_submitting(&self) -> bool {
        self.guard.is_submitting()
    }

    /// Reset every field
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn coerce(field: &NumericField, label: &'static str) -> Result<u64, FormError> {
    field
        .to_u64()
        .ok_or(FormError::NumberTooLarge { field: label })
}

/// Largest integer an `f64` holds exactly
const MAX_EXACT_PRICE: u64 = 1 << 53;

fn coerce_price(field: &NumericField, label: &'static str) -> Result<f64, FormError> {
    let value = coerce(field, label)?;
    if value > MAX_EXACT_PRICE {
        return Err(FormError::NumberTooLarge { field: label });
    }
    Ok(value as f64)
}

/// Edit dialog for an existing product
#[derive(Debug, Clone)]
pub struct ProductEdit {
    original: Product,
    pub edited: Product,
}

impl ProductEdit {
    pub fn new(product: Product) -> Self {
        Self {
            edited: product.clone(),
            original: product,
        }
    }

    pub fn original(&self) -> &Product {
        &self.original
    }

    pub fn has_changes(&self) -> bool {
        self.original != self.edited
    }

    pub fn set_cost_price(&mut self, field: &NumericField) -> Result<(), FormError> {
        self.edited.cost_price = coerce_price(field, "cost price")?;
        Ok(())
    }

    pub fn set_selling_price(&mut self, field: &NumericField) -> Result<(), FormError> {
        self.edited.selling_price = coerce_price(field, "selling price")?;
        Ok(())
    }

    pub fn set_stock(&mut self, field: &NumericField) -> Result<(), FormError> {
        let stock = coerce(field, "stock")?;
        self.edited.number_available =
            i64::try_from(stock).map_err(|_| FormError::NumberTooLarge { field: "stock" })?;
        Ok(())
    }

    /// The product to send back, if it still has a name
    pub fn finish(self) -> Result<Product, FormError> {
        if text::is_blank(Some(&self.edited.name)) {
            return Err(FormError::MissingField { field: "name" });
        }
        Ok(self.edited)
    }
}
