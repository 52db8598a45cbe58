//! Table extraction from results-site markup.
//!
//! Upstream pages are not consistent about how their tables are marked up,
//! so each parser carries an ordered list of [`Strategy`] values. Every
//! strategy is a pure function over the parsed document; the first one that
//! yields anything wins. Neither parser ever fails: a page with no usable
//! table produces an empty sequence.

pub mod fixtures;
pub mod ladder;

pub use fixtures::parse_round;
pub use ladder::parse_ladder;

use scraper::{ElementRef, Html, Selector};

/// One way of pulling records out of a document.
pub(crate) struct Strategy<T> {
    pub name: &'static str,
    pub extract: fn(&Html) -> Vec<T>,
}

/// Run strategies in order and keep the first non-empty result.
pub(crate) fn first_non_empty<T>(document: &Html, strategies: &[Strategy<T>]) -> Vec<T> {
    for strategy in strategies {
        let records = (strategy.extract)(document);
        if !records.is_empty() {
            tracing::debug!("table strategy {} matched {} records", strategy.name, records.len());
            return records;
        }
    }
    Vec::new()
}

/// Tables matching `selector`, in document order.
pub(crate) fn tables<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    let selector = Selector::parse(selector).expect("invalid selector");
    document.select(&selector).collect()
}

/// Cell texts of each body row of `table`.
///
/// Only rows and cells belonging to `table` itself are read; a table nested
/// inside a cell contributes nothing here.
pub(crate) fn body_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    children_named(table, &["tbody"])
        .flat_map(|body| children_named(body, &["tr"]))
        .map(|row| children_named(row, &["td", "th"]).map(cell_text).collect())
        .collect()
}

fn children_named<'a>(
    parent: ElementRef<'a>, names: &'static [&'static str],
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |child| names.iter().any(|name| *name == child.value().name()))
}

/// Visible text of a cell with whitespace collapsed.
pub(crate) fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Lenient unsigned parse: anything non-numeric is zero.
pub(crate) fn lenient_u32(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// Lenient signed parse: anything non-numeric is zero.
pub(crate) fn lenient_i32(text: &str) -> i32 {
    text.trim().parse().unwrap_or(0)
}
