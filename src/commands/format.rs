//! Format command - Run one keystroke through a comma-formatted input

use anyhow::{bail, Result};
use owo_colors::OwoColorize;

use stockup::input::NumericField;

/// Result of a simulated keystroke
#[derive(Debug, PartialEq, Eq)]
pub struct Formatted {
    pub display: String,
    pub caret: usize,
    pub raw: String,
    pub accepted: bool,
}

/// Apply `input` (the widget text after a keystroke) to a field that held
/// `previous`
///
/// `caret` defaults to the end of `input`.
pub fn format(input: &str, caret: Option<usize>, previous: Option<&str>) -> Result<Formatted> {
    let mut field = match previous {
        Some(text) => match NumericField::parse(text) {
            Some(field) => field,
            None => bail!("Previous value is not a number: {}", text),
        },
        None => NumericField::new(),
    };

    let caret = caret.unwrap_or_else(|| input.chars().count());
    let accepted = field.apply_edit(input, caret).is_accepted();

    Ok(Formatted {
        display: field.display(),
        caret: field.caret(),
        raw: field.raw_digits().to_string(),
        accepted,
    })
}

/// Execute the format command and return formatted output
pub fn execute(input: &str, caret: Option<usize>, previous: Option<&str>) -> Result<String> {
    let result = format(input, caret, previous)?;

    let mut output = String::new();
    if !result.accepted {
        output.push_str(&format!(
            "{}\n",
            format!("Rejected '{}': only digits are allowed", input).yellow()
        ));
    }
    output.push_str(&format!("{}\n", result.display.bold()));
    output.push_str(&format!("{}^\n", " ".repeat(result.caret)));
    output.push_str(&format!("caret: {}\n", result.caret));
    output.push_str(&format!(
        "digits: {}",
        if result.raw.is_empty() { "-" } else { &result.raw }
    ));

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_a_digit() {
        let result = format("9999", Some(4), Some("999")).unwrap();
        assert_eq!(result.display, "9,999");
        assert_eq!(result.caret, 5);
        assert_eq!(result.raw, "9999");
        assert!(result.accepted);
    }

    #[test]
    fn test_pasted_value_caret_defaults_to_end() {
        let result = format("1234567", None, None).unwrap();
        assert_eq!(result.display, "1,234,567");
        assert_eq!(result.caret, 9);
    }

    #[test]
    fn test_rejected_keeps_previous() {
        let result = format("1,2a34", None, Some("1,234")).unwrap();
        assert!(!result.accepted);
        assert_eq!(result.display, "1,234");
    }

    #[test]
    fn test_bad_previous() {
        assert!(format("1", None, Some("abc")).is_err());
    }

    #[test]
    fn test_execute_output() {
        let output = execute("1000", None, None).unwrap();
        assert!(output.contains("1,000"));
        assert!(output.contains("caret: 5"));
        assert!(output.contains("digits: 1000"));
    }
}
