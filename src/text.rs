//! Shared text helpers

use crate::input::numeric::group_digits;

/// Currency symbol shown in front of every amount
pub const NAIRA: char = '₦';

/// True when the string is missing, empty, or whitespace only
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

/// Format an amount as naira with thousands grouping
///
/// Up to two fraction digits are kept and trailing zeros are dropped, so
/// `1500.0` renders as `₦1,500` and `2500.5` as `₦2,500.5`.
pub fn format_naira(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{}{}", NAIRA, amount);
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut out = String::new();
    if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push(NAIRA);
    out.push_str(&group_digits(whole));
    if !fraction.is_empty() {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// `"1 product"`, `"3 products"`
pub fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}
