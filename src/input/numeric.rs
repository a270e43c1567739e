//! Comma-formatted numeric text field
//!
//! The field keeps only the canonical digit string. The display string is
//! regrouped from the digits whenever it is asked for, so the two can never
//! disagree.
//!
//! Editing follows the usual text-input flow: the widget hands over the whole
//! post-keystroke text (separators and all) plus the caret position it reports
//! inside that text. The field validates it, regroups it, and works out where
//! the caret belongs in the regrouped text so that the same digit stays to its
//! left.

use tracing::trace;

/// Thousands separator inserted into the display string
pub const SEPARATOR: char = ',';

/// Group a digit string in threes from the least-significant end
///
/// Values under 1000 are returned unchanged. Leading zeros are kept.
///
/// # Example
/// ```
/// use stockup::input::numeric::group_digits;
///
/// assert_eq!(group_digits("1234567"), "1,234,567");
/// assert_eq!(group_digits("0012"), "0,012");
/// ```
pub fn group_digits(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(SEPARATOR);
        }
        out.push(c);
    }

    out
}

/// Remove every separator character
pub fn strip_separators(input: &str) -> String {
    input.chars().filter(|c| *c != SEPARATOR).collect()
}

/// Caret offset just after the `n`-th digit of a display string
///
/// Falls back to the end of the string when it holds fewer than `n` digits.
fn caret_after_digits(display: &str, n: usize) -> usize {
    if n == 0 {
        return 0;
    }

    let mut seen = 0;
    for (i, c) in display.chars().enumerate() {
        if c != SEPARATOR {
            seen += 1;
            if seen == n {
                return i + 1;
            }
        }
    }

    display.chars().count()
}

/// Result of feeding one keystroke into a [`NumericField`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The edit was taken; the caret belongs at this display offset
    Accepted { caret: usize },
    /// The input held something other than digits and separators
    Rejected,
}

impl EditOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// State of one comma-formatted numeric input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumericField {
    digits: String,
    caret: usize,
}

impl NumericField {
    /// An empty field with the caret at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field from a separator-free digit string
    ///
    /// Returns `None` if anything other than ASCII digits is present.
    /// The caret is placed at the end of the display string.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }

        let mut field = Self {
            digits: digits.to_string(),
            caret: 0,
        };
        field.caret = field.display_len();
        Some(field)
    }

    /// Build a field from text that may already contain separators
    pub fn parse(input: &str) -> Option<Self> {
        Self::from_digits(&strip_separators(input))
    }

    pub fn from_u64(value: u64) -> Self {
        let digits = value.to_string();
        let caret = group_digits(&digits).len();
        Self { digits, caret }
    }

    /// The canonical, separator-free digits
    pub fn raw_digits(&self) -> &str {
        &self.digits
    }

    /// The digits with thousands separators
    pub fn display(&self) -> String {
        group_digits(&self.digits)
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Move the caret, clamped to the display length
    pub fn set_caret(&mut self, offset: usize) {
        self.caret = offset.min(self.display_len());
    }

    /// Owner-side integer coercion
    ///
    /// An empty field is 0. Returns `None` when the digits do not fit `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        if self.digits.is_empty() {
            return Some(0);
        }
        self.digits.parse().ok()
    }

    /// Apply the widget's post-keystroke text and caret
    ///
    /// `caret` is a character offset into `input`. Anything other than digits
    /// and separators rejects the whole edit and leaves the field untouched.
    pub fn apply_edit(&mut self, input: &str, caret: usize) -> EditOutcome {
        let digits = strip_separators(input);
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            trace!(input, "rejected non-numeric edit");
            return EditOutcome::Rejected;
        }

        let caret = caret.min(input.chars().count());
        let separators_before = input
            .chars()
            .take(caret)
            .filter(|c| *c == SEPARATOR)
            .count();
        let digits_before = caret - separators_before;

        let display = group_digits(&digits);
        self.caret = caret_after_digits(&display, digits_before);
        self.digits = digits;

        EditOutcome::Accepted { caret: self.caret }
    }

    fn display_len(&self) -> usize {
        let len = self.digits.len();
        if len == 0 {
            0
        } else {
            len + (len - 1) / 3
        }
    }
}

impl std::fmt::Display for NumericField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}
