//! Self-expanding list of product rows for bulk entry
//!
//! The list always holds at least one row. Typing a name into the last row
//! appends a fresh blank row so there is always somewhere to type the next
//! product. Rows are correlated by [`RowId`], never by position.

use std::fmt;
use tracing::debug;
use uuid::Uuid;

use super::form::FormError;
use super::product::NewProduct;
use crate::input::{CaretTarget, EditOutcome, NumericField};
use crate::text;

/// Rows shown when a bulk entry page opens
pub const DEFAULT_INITIAL_ROWS: usize = 4;

/// Opaque row identifier, unique for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(Uuid);

impl RowId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for display
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The comma-formatted columns of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericColumn {
    CostPrice,
    SellingPrice,
    NumberAvailable,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 3] = [
        NumericColumn::CostPrice,
        NumericColumn::SellingPrice,
        NumericColumn::NumberAvailable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::CostPrice => "cost price",
            Self::SellingPrice => "selling price",
            Self::NumberAvailable => "quantity",
        }
    }
}

/// Editable attributes of a product row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFields {
    pub name: String,
    pub cost_price: NumericField,
    pub selling_price: NumericField,
    pub number_available: NumericField,
}

impl RowFields {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Only the name decides blankness; numbers are ignored
    pub fn is_blank(&self) -> bool {
        text::is_blank(Some(&self.name))
    }

    pub fn numeric(&self, column: NumericColumn) -> &NumericField {
        match column {
            NumericColumn::CostPrice => &self.cost_price,
            NumericColumn::SellingPrice => &self.selling_price,
            NumericColumn::NumberAvailable => &self.number_available,
        }
    }

    pub fn numeric_mut(&mut self, column: NumericColumn) -> &mut NumericField {
        match column {
            NumericColumn::CostPrice => &mut self.cost_price,
            NumericColumn::SellingPrice => &mut self.selling_price,
            NumericColumn::NumberAvailable => &mut self.number_available,
        }
    }

    /// Convert to a create payload, coercing the digit strings to integers
    fn to_new_product(&self) -> Result<NewProduct, FormError> {
        let number = |column: NumericColumn| {
            self.numeric(column)
                .to_u64()
                .ok_or(FormError::NumberTooLarge {
                    field: column.label(),
                })
        };

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description: None,
            cost_price: Some(number(NumericColumn::CostPrice)?),
            selling_price: Some(number(NumericColumn::SellingPrice)?),
            number_available: Some(number(NumericColumn::NumberAvailable)?),
            category_id: None,
        })
    }
}

/// One entry in the bulk list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    row_id: RowId,
    pub fields: RowFields,
}

impl ProductRow {
    fn blank() -> Self {
        Self {
            row_id: RowId::generate(),
            fields: RowFields::default(),
        }
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    pub fn is_blank(&self) -> bool {
        self.fields.is_blank()
    }
}

/// Addresses one numeric input on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldKey {
    pub row: RowId,
    pub column: NumericColumn,
}

/// What a row edit did to the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowEdit {
    /// The row was found and updated
    pub applied: bool,
    /// Id of the blank row appended by this edit, if any
    pub appended: Option<RowId>,
}

/// Result of routing a keystroke into a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericInput {
    pub outcome: EditOutcome,
    pub edit: RowEdit,
}

/// Ordered, never-empty collection of product rows
#[derive(Debug, Clone)]
pub struct RowList {
    rows: Vec<ProductRow>,
}

impl Default for RowList {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_ROWS)
    }
}

impl RowList {
    /// A list of `initial` blank rows (at least one)
    pub fn new(initial: usize) -> Self {
        let rows = (0..initial.max(1)).map(|_| ProductRow::blank()).collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Never true: the list keeps at least one row
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row_id: RowId) -> Option<&ProductRow> {
        self.rows.iter().find(|r| r.row_id == row_id)
    }

    pub fn position(&self, row_id: RowId) -> Option<usize> {
        self.rows.iter().position(|r| r.row_id == row_id)
    }

    pub fn last_row_id(&self) -> Option<RowId> {
        self.rows.last().map(|r| r.row_id)
    }

    /// Replace a row's fields
    ///
    /// When the row was last before this edit and its name is now non-blank,
    /// exactly one blank row is appended. Unknown ids are ignored.
    pub fn on_row_edited(&mut self, row_id: RowId, fields: RowFields) -> RowEdit {
        let Some(index) = self.position(row_id) else {
            debug!(%row_id, "edit for unknown row ignored");
            return RowEdit::default();
        };

        let was_last = index + 1 == self.rows.len();
        let filled = !fields.is_blank();
        self.rows[index].fields = fields;

        let appended = if was_last && filled {
            let row = ProductRow::blank();
            let id = row.row_id;
            self.rows.push(row);
            debug!(rows = self.rows.len(), "last row filled, blank row appended");
            Some(id)
        } else {
            None
        };

        RowEdit {
            applied: true,
            appended,
        }
    }

    /// Set a row's name, keeping its numbers
    pub fn on_name_input(&mut self, row_id: RowId, name: &str) -> RowEdit {
        let Some(row) = self.get(row_id) else {
            return RowEdit::default();
        };
        let mut fields = row.fields.clone();
        fields.name = name.to_string();
        self.on_row_edited(row_id, fields)
    }

    /// Route a keystroke into one of the row's numeric inputs
    ///
    /// A rejected keystroke leaves the row and the list untouched.
    pub fn on_numeric_input(
        &mut self,
        row_id: RowId,
        column: NumericColumn,
        input: &str,
        caret: usize,
    ) -> NumericInput {
        let Some(row) = self.get(row_id) else {
            return NumericInput {
                outcome: EditOutcome::Rejected,
                edit: RowEdit::default(),
            };
        };

        let mut fields = row.fields.clone();
        let outcome = fields.numeric_mut(column).apply_edit(input, caret);
        let edit = match outcome {
            EditOutcome::Accepted { .. } => self.on_row_edited(row_id, fields),
            EditOutcome::Rejected => RowEdit::default(),
        };

        NumericInput { outcome, edit }
    }

    /// Remove a row; refused when it is the only one left
    pub fn on_row_removed(&mut self, row_id: RowId) -> bool {
        if self.rows.len() <= 1 {
            debug!("refusing to remove the only row");
            return false;
        }
        let before = self.rows.len();
        self.rows.retain(|r| r.row_id != row_id);
        self.rows.len() != before
    }

    /// Append one blank row unconditionally
    pub fn on_row_added(&mut self) -> RowId {
        let row = ProductRow::blank();
        let id = row.row_id;
        self.rows.push(row);
        id
    }

    /// Rows with a non-blank name, in list order
    pub fn rows_to_save(&self) -> Vec<&ProductRow> {
        self.rows.iter().filter(|r| !r.is_blank()).collect()
    }

    /// Create payloads for every non-blank row
    ///
    /// Errors name the row by its 1-based position in the full list.
    pub fn to_new_products(&self) -> Result<Vec<NewProduct>, FormError> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| !r.is_blank())
            .map(|(i, r)| {
                r.fields.to_new_product().map_err(|e| FormError::InvalidRow {
                    row: i + 1,
                    source: Box::new(e),
                })
            })
            .collect()
    }
}

impl CaretTarget<FieldKey> for RowList {
    fn place_caret(&mut self, field: FieldKey, offset: usize) -> bool {
        match self.rows.iter_mut().find(|r| r.row_id == field.row) {
            Some(row) => {
                row.fields.numeric_mut(field.column).set_caret(offset);
                true
            }
            None => false,
        }
    }
}
