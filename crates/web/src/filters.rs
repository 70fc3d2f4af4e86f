//! Custom Askama template filters.

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// CSS class suffix for an order status badge, e.g. `status-preparing`.
///
/// Usage in templates: `{{ order.status|status_class }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn status_class(status: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("status-{}", status.to_string().to_ascii_lowercase()))
}
