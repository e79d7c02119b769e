//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Longest description shown in a table cell.
const TABLE_TEXT_CHARS: usize = 80;

/// Shortens text for a table cell, appending an ellipsis when cut.
///
/// Usage in templates: `{{ product.description|table_text }}`
#[askama::filter_fn]
pub fn table_text(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(truncate(&value.to_string(), TABLE_TEXT_CHARS))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}
