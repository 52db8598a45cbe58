//! Ladder (standings) table parsing.
//!
//! Cells map positionally: position, team, played, won, lost, drawn, for,
//! against, then an optional percentage, with points always taken from the
//! last cell. Rows shorter than eight cells are skipped.

use ladderboard_core::LadderEntry;
use scraper::Html;

use super::{Strategy, body_rows, first_non_empty, lenient_i32, lenient_u32, tables};

/// Minimum cells for a standings row.
const MIN_LADDER_CELLS: usize = 8;

const DEFAULT_PERCENTAGE: &str = "0%";

const STRATEGIES: [Strategy<LadderEntry>; 2] = [
    Strategy { name: "ladder-role", extract: ladder_role_table },
    Strategy { name: "table-class", extract: classed_table },
];

/// Parse a ladder page into entries in document order.
///
/// Returns an empty vector when no table can be found.
pub fn parse_ladder(html: &str) -> Vec<LadderEntry> {
    let document = Html::parse_document(html);
    let entries = first_non_empty(&document, &STRATEGIES);
    if entries.is_empty() {
        tracing::warn!("no ladder table found in page ({} bytes)", html.len());
    }
    entries
}

fn ladder_role_table(document: &Html) -> Vec<LadderEntry> {
    first_table_entries(document, r#"table[role*="ladder"]"#)
}

fn classed_table(document: &Html) -> Vec<LadderEntry> {
    first_table_entries(document, r#"table[class*="table"]"#)
}

/// Entries from the first matching table that has any standings rows.
fn first_table_entries(document: &Html, selector: &str) -> Vec<LadderEntry> {
    tables(document, selector)
        .into_iter()
        .map(|table| body_rows(table).iter().filter_map(|cells| entry_from_cells(cells)).collect::<Vec<_>>())
        .find(|entries| !entries.is_empty())
        .unwrap_or_default()
}

fn entry_from_cells(cells: &[String]) -> Option<LadderEntry> {
    if cells.len() < MIN_LADDER_CELLS {
        return None;
    }

    let last = cells.last()?;
    Some(LadderEntry {
        position: lenient_u32(&cells[0]),
        team: cells[1].clone(),
        played: lenient_u32(&cells[2]),
        won: lenient_u32(&cells[3]),
        lost: lenient_u32(&cells[4]),
        drawn: lenient_u32(&cells[5]),
        points_for: lenient_u32(&cells[6]),
        against: lenient_u32(&cells[7]),
        percentage: cells.get(8).cloned().unwrap_or_else(|| DEFAULT_PERCENTAGE.to_string()),
        points: lenient_i32(last),
    })
}
