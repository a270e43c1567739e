//! Text input behaviour shared by the entry forms

pub mod caret;
pub mod numeric;

pub use caret::{CaretFixup, CaretQueue, CaretTarget};
pub use numeric::{EditOutcome, NumericField};
