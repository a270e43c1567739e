//! Products: catalog, bulk entry rows, and entry forms

pub mod catalog;
pub mod form;
pub mod product;
pub mod rows;

pub use catalog::{list_request, Catalog};
pub use form::{BulkEntryForm, FormError, ProductEdit, ProductForm};
pub use product::{image_patch_request, Category, NewProduct, Product};
pub use rows::{FieldKey, NumericColumn, ProductRow, RowFields, RowId, RowList};
