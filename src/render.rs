//! Plain-text views for the terminal front end.

use std::fmt::Write as _;

use time::OffsetDateTime;

use crate::catalog::Product;
use crate::chat::{EntryKind, Role, TranscriptEntry};
use crate::filter::FilterOutcome;
use crate::selection::SelectionStore;

pub const PRODUCTS_PLACEHOLDER: &str = "Select a category or search to view products";
pub const NO_MATCHES: &str = "No products match these filters.";
pub const EMPTY_SELECTION: &str = "No products selected yet.";

/// Product grid: one line per product, `[x]` marking selected ones.
#[must_use]
pub fn product_list(outcome: &FilterOutcome<'_>, selection: &SelectionStore) -> String {
    let products = match outcome {
        FilterOutcome::Placeholder => return PRODUCTS_PLACEHOLDER.to_string(),
        FilterOutcome::Products(list) if list.is_empty() => return NO_MATCHES.to_string(),
        FilterOutcome::Products(list) => list,
    };
    let mut out = String::new();
    for p in products {
        let mark = if selection.contains(p.id) { "x" } else { " " };
        let _ = writeln!(out, "[{mark}] {:>4}  {} ({}) [{}]", p.id, p.name, p.brand, p.category);
    }
    out.truncate(out.trim_end().len());
    out
}

/// Full description block for one product.
#[must_use]
pub fn product_detail(product: &Product) -> String {
    format!(
        "{} ({})\nBrand: {}\nCategory: {}\nImage: {}\n\n{}",
        product.name, product.id, product.brand, product.category, product.image, product.description
    )
}

/// Selected-products panel.
#[must_use]
pub fn selected_list(products: &[&Product]) -> String {
    if products.is_empty() {
        return EMPTY_SELECTION.to_string();
    }
    products
        .iter()
        .map(|p| format!("{:>4}  {} ({})", p.id, p.name, p.brand))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One transcript line: speaker, time, text and delivery status.
#[must_use]
pub fn transcript_entry(entry: &TranscriptEntry) -> String {
    let time = clock_time(entry.timestamp);
    match &entry.kind {
        EntryKind::Message { role, status } => {
            let speaker = match role {
                Role::User => "You",
                Role::Assistant => "AI",
                Role::System => "System",
            };
            let status = status.map(|s| format!(" [{}]", s.label())).unwrap_or_default();
            format!("{speaker} {time}{status}\n{}", entry.text)
        }
        EntryKind::Placeholder | EntryKind::Notice => format!("AI {time}\n{}", entry.text),
    }
}

/// `h:mm AM` in UTC for a millisecond timestamp.
#[must_use]
pub fn clock_time(timestamp_ms: i64) -> String {
    let Ok(dt) = OffsetDateTime::from_unix_timestamp_nanos(i128::from(timestamp_ms) * 1_000_000) else {
        return String::new();
    };
    let (hour, period) = match dt.hour() {
        0 => (12, "AM"),
        h @ 1..=11 => (h, "AM"),
        12 => (12, "PM"),
        h => (h - 12, "PM"),
    };
    format!("{hour}:{:02} {period}", dt.minute())
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
