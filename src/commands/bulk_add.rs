//! Bulk-add command - Fill the bulk entry form from a text file
//!
//! Each non-empty line is one product: `name | cost | selling | quantity`.
//! Numbers are typed into the form one character at a time, so the file goes
//! through exactly the same formatting and row-appending path as the page.

use anyhow::{Context, Result};
use comfy_table::Cell;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::utils;
use stockup::config::Settings;
use stockup::input::{CaretQueue, EditOutcome};
use stockup::inventory::{BulkEntryForm, FieldKey, NumericColumn, RowId, RowList};

/// A product line from the input file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryLine {
    pub name: String,
    pub cost_price: String,
    pub selling_price: String,
    pub number_available: String,
}

impl EntryLine {
    fn column(&self, column: NumericColumn) -> &str {
        match column {
            NumericColumn::CostPrice => &self.cost_price,
            NumericColumn::SellingPrice => &self.selling_price,
            NumericColumn::NumberAvailable => &self.number_available,
        }
    }
}

/// Parse the input text; blank lines and `#` comments are skipped
pub fn parse_lines(content: &str) -> Vec<EntryLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let mut parts = line.split('|').map(str::trim);
            let mut next = || parts.next().unwrap_or_default().to_string();
            EntryLine {
                name: next(),
                cost_price: next(),
                selling_price: next(),
                number_available: next(),
            }
        })
        .collect()
}

/// Type `text` at the caret of one numeric input, a character at a time
///
/// Each accepted keystroke schedules a caret fixup that is flushed after the
/// row list "renders". Returns how many keystrokes were rejected.
fn type_into(
    rows: &mut RowList,
    carets: &mut CaretQueue<FieldKey>,
    row: RowId,
    column: NumericColumn,
    text: &str,
) -> usize {
    let mut rejected = 0;
    for c in text.chars() {
        let Some(current) = rows.get(row).map(|r| r.fields.numeric(column).clone()) else {
            break;
        };

        let mut chars: Vec<char> = current.display().chars().collect();
        let at = current.caret().min(chars.len());
        chars.insert(at, c);
        let input: String = chars.into_iter().collect();

        match rows.on_numeric_input(row, column, &input, at + 1).outcome {
            EditOutcome::Accepted { caret } => carets.schedule(FieldKey { row, column }, caret),
            EditOutcome::Rejected => rejected += 1,
        }
        carets.flush_after_render(rows);
    }
    rejected
}

/// Fill a fresh form with `lines`
///
/// Returns the form and the number of rejected keystrokes.
pub fn fill_form(lines: &[EntryLine], initial_rows: usize) -> (BulkEntryForm, usize) {
    let mut form = BulkEntryForm::new(initial_rows);
    let mut carets = CaretQueue::new();
    let mut rejected = 0;

    for (index, line) in lines.iter().enumerate() {
        let rows = form.rows_mut();
        let row = match rows.rows().get(index) {
            Some(r) => r.row_id(),
            None => rows.on_row_added(),
        };

        rows.on_name_input(row, &line.name);
        for column in NumericColumn::ALL {
            rejected += type_into(rows, &mut carets, row, column, line.column(column));
        }
    }

    debug!(rows = form.rows().len(), rejected, "bulk form filled");
    (form, rejected)
}

/// Render the form as it would appear on screen
pub fn render_rows(rows: &RowList) -> String {
    let mut table = utils::new_table(&["#", "Row", "Name", "Cost", "Selling", "Qty"]);
    for (index, row) in rows.rows().iter().enumerate() {
        let fields = &row.fields;
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(row.row_id().short()),
            Cell::new(&fields.name),
            Cell::new(fields.cost_price.display()),
            Cell::new(fields.selling_price.display()),
            Cell::new(fields.number_available.display()),
        ]);
    }
    table.to_string()
}

/// Row count from the flag, falling back to the settings file
///
/// Settings are only read when no count was given.
pub fn initial_rows<F>(rows: Option<usize>, load: F) -> Result<usize>
where
    F: FnOnce() -> Result<Settings>,
{
    match rows {
        Some(rows) => Ok(rows),
        None => Ok(load()?.initial_rows),
    }
}

/// Execute the bulk-add command and return formatted output
pub fn execute(file: &Path, initial_rows: usize, output: Option<&Path>) -> Result<String> {
    let content =
        fs::read_to_string(file).with_context(|| format!("Failed to read: {}", file.display()))?;
    let lines = parse_lines(&content);
    let (mut form, rejected) = fill_form(&lines, initial_rows);

    let mut report = render_rows(form.rows());
    if rejected > 0 {
        report.push_str(&format!(
            "\n\n{} ignored (only digits are allowed in number columns)",
            stockup::text::plural(rejected, "keystroke")
        ));
    }

    let payload = form.begin_save().context("Nothing could be saved")?;
    let json = serde_json::to_string_pretty(&payload)?;
    form.finish_save();

    let written = utils::write_or_return(json, output)?;
    report.push_str(&format!(
        "\n\n{} ready to save\n{}",
        stockup::text::plural(payload.len(), "product"),
        written
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_lines() {
        let lines = parse_lines("# header\nPen | 100 | 150 | 20\n\n  Cup|1,200  \n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].name, "Pen");
        assert_eq!(lines[0].number_available, "20");
        assert_eq!(lines[1].cost_price, "1,200");
        assert_eq!(lines[1].selling_price, "");
    }

    #[test]
    fn test_fill_form_formats_and_grows() {
        let lines = parse_lines(
            "Pen | 100 | 150 | 20\nCup | 1200 | 1500 | 3\nBag | 25000 | 30000 | 1\nHat | 9 | 9 | 9\n",
        );
        let (form, rejected) = fill_form(&lines, 4);

        assert_eq!(rejected, 0);
        // Filling the fourth row appended a fifth blank one
        assert_eq!(form.rows().len(), 5);
        let rows = form.rows().rows();
        assert_eq!(rows[1].fields.cost_price.display(), "1,200");
        assert_eq!(rows[2].fields.selling_price.display(), "30,000");
        assert_eq!(rows[2].fields.selling_price.caret(), 6);
        assert!(rows[4].is_blank());
    }

    #[test]
    fn test_fill_form_more_lines_than_rows() {
        let lines = parse_lines("A | 1 | 1 | 1\nB | 2 | 2 | 2\nC | 3 | 3 | 3\n");
        let (form, _) = fill_form(&lines, 1);
        assert_eq!(form.rows().len(), 4);
        assert_eq!(form.rows().rows_to_save().len(), 3);
    }

    #[test]
    fn test_fill_form_counts_rejected_keystrokes() {
        let lines = parse_lines("Rice | 12.50 | 15 | 2kg\n");
        let (form, rejected) = fill_form(&lines, 4);
        assert_eq!(rejected, 3);
        let row = &form.rows().rows()[0];
        assert_eq!(row.fields.cost_price.raw_digits(), "1250");
        assert_eq!(row.fields.number_available.raw_digits(), "2");
    }

    #[test]
    fn test_execute_writes_payload() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("products.txt");
        let output = dir.path().join("payload.json");
        fs::write(&input, "Pen | 100 | 1,500 | 20\n").unwrap();

        let report = execute(&input, 4, Some(output.as_path())).unwrap();
        assert!(report.contains("1 product ready to save"));

        let payload: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(payload[0]["name"], "Pen");
        assert_eq!(payload[0]["sellingPrice"], 1500);
        assert_eq!(payload[0]["numberAvailable"], 20);
    }

    #[test]
    fn test_initial_rows_skips_settings_when_given() {
        let broken = || -> Result<Settings> { anyhow::bail!("Failed to parse settings") };
        assert_eq!(initial_rows(Some(7), broken).unwrap(), 7);
        assert!(initial_rows(None, broken).is_err());

        let defaults = || -> Result<Settings> { Ok(Settings::default()) };
        assert_eq!(initial_rows(None, defaults).unwrap(), 4);
    }

    #[test]
    fn test_execute_empty_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.txt");
        fs::write(&input, "# nothing\n").unwrap();
        assert!(execute(&input, 4, None).is_err());
    }
}
