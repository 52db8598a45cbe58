//! Round fixture table parsing.
//!
//! Cells map positionally: date, time, home team, away team, venue, then an
//! optional score cell. A score of the form `<digits> - <digits>` marks the
//! match completed; anything else leaves it scheduled.

use std::sync::LazyLock;

use ladderboard_core::Fixture;
use regex::Regex;
use scraper::Html;

use super::{Strategy, body_rows, first_non_empty, tables};

/// Minimum cells for a match row.
const MIN_FIXTURE_CELLS: usize = 5;

static SCORE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*-\s*(\d+)").expect("invalid score regex"));

const STRATEGIES: [Strategy<Fixture>; 2] = [
    Strategy { name: "table-class", extract: classed_tables },
    Strategy { name: "fixtures-role", extract: fixtures_role_tables },
];

/// Parse one round's page into fixtures tagged with `round`.
///
/// Returns an empty vector when no match rows can be found.
pub fn parse_round(html: &str, round: u32) -> Vec<Fixture> {
    let document = Html::parse_document(html);
    let mut fixtures = first_non_empty(&document, &STRATEGIES);
    for fixture in &mut fixtures {
        fixture.round = round;
    }

    if fixtures.is_empty() {
        tracing::debug!(round, "no fixture rows found in page ({} bytes)", html.len());
    }
    fixtures
}

fn classed_tables(document: &Html) -> Vec<Fixture> {
    match_rows(document, r#"table[class*="table"]"#)
}

fn fixtures_role_tables(document: &Html) -> Vec<Fixture> {
    match_rows(document, r#"table[role="fixtures"]"#)
}

/// Fixtures from every matching table, in document order, with round unset.
///
/// A round page may split its matches across several tables (one per day).
fn match_rows(document: &Html, selector: &str) -> Vec<Fixture> {
    tables(document, selector)
        .into_iter()
        .flat_map(body_rows)
        .filter(|cells| cells.len() >= MIN_FIXTURE_CELLS)
        .filter_map(|cells| fixture_from_cells(&cells))
        .collect()
}

fn fixture_from_cells(cells: &[String]) -> Option<Fixture> {
    let home_team = cells.get(2).cloned().unwrap_or_default();
    let away_team = cells.get(3).cloned().unwrap_or_default();
    if home_team.is_empty() || away_team.is_empty() {
        tracing::debug!("skipping row without both teams: {:?}", cells);
        return None;
    }

    let score = cells.get(5).and_then(|text| parse_score(text));

    Some(Fixture {
        round: 0,
        date: cells.first().cloned().unwrap_or_default(),
        time: non_empty(cells.get(1)),
        home_team,
        away_team,
        venue: non_empty(cells.get(4)),
        completed: score.is_some(),
        home_score: score.map(|(home, _)| home),
        away_score: score.map(|(_, away)| away),
    })
}

/// Home and away scores from a score cell, if it holds one.
fn parse_score(text: &str) -> Option<(u32, u32)> {
    let caps = SCORE.captures(text)?;
    let home = caps.get(1)?.as_str().parse().ok()?;
    let away = caps.get(2)?.as_str().parse().ok()?;
    Some((home, away))
}

fn non_empty(cell: Option<&String>) -> Option<String> {
    cell.filter(|text| !text.is_empty()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(table_attrs: &str, rows: &str) -> String {
        format!(
            "<html><body><h2>Round</h2><table {table_attrs}><thead><tr><th>Date</th><th>Time</th>\
             <th>Home</th><th>Away</th><th>Venue</th><th>Result</th></tr></thead>\
             <tbody>{rows}</tbody></table></body></html>"
        )
    }

    const PLAYED: &str = "<tr><td>Sat 12 Apr 2025</td><td>2:10 PM</td><td>Hawks</td><td>Eagles</td>\
                          <td>Central Oval</td><td>88 - 61</td></tr>";
    const SCHEDULED: &str = "<tr><td>Sat 19 Apr 2025</td><td>11:00 AM</td><td>Lions</td><td>Hawks</td>\
                             <td>North Park</td><td></td></tr>";

    #[test]
    fn test_completed_fixture() {
        let fixtures = parse_round(&page(r#"class="table""#, PLAYED), 3);
        assert_eq!(fixtures.len(), 1);

        let fixture = &fixtures[0];
        assert_eq!(fixture.round, 3);
        assert_eq!(fixture.date, "Sat 12 Apr 2025");
        assert_eq!(fixture.time.as_deref(), Some("2:10 PM"));
        assert_eq!(fixture.home_team, "Hawks");
        assert_eq!(fixture.away_team, "Eagles");
        assert_eq!(fixture.venue.as_deref(), Some("Central Oval"));
        assert!(fixture.completed);
        assert_eq!(fixture.home_score, Some(88));
        assert_eq!(fixture.away_score, Some(61));
    }

    #[test]
    fn test_scheduled_fixture() {
        let fixtures = parse_round(&page(r#"class="table""#, SCHEDULED), 4);
        let fixture = &fixtures[0];
        assert!(!fixture.completed);
        assert!(fixture.home_score.is_none());
        assert!(fixture.away_score.is_none());
    }

    #[test]
    fn test_score_variants() {
        assert_eq!(parse_score("12-3"), Some((12, 3)));
        assert_eq!(parse_score("W 101 -  99"), Some((101, 99)));
        assert_eq!(parse_score("Forfeit"), None);
        assert_eq!(parse_score("TBC"), None);
        assert_eq!(parse_score("-"), None);
    }

    #[test]
    fn test_five_cells_without_score() {
        let rows = "<tr><td>Sun 20 Apr 2025</td><td>9:00 AM</td><td>Hawks</td><td>Lions</td><td>Oval 2</td></tr>";
        let fixtures = parse_round(&page(r#"class="table""#, rows), 5);
        assert_eq!(fixtures.len(), 1);
        assert!(!fixtures[0].completed);
    }

    #[test]
    fn test_short_rows_skipped() {
        let rows = format!("{PLAYED}<tr><td colspan=\"4\">Bye: Lions</td></tr>{SCHEDULED}");
        let fixtures = parse_round(&page(r#"class="table""#, &rows), 1);
        assert_eq!(fixtures.len(), 2);
    }

    #[test]
    fn test_empty_time_and_venue() {
        let rows = "<tr><td>TBC</td><td></td><td>Hawks</td><td>Lions</td><td> </td><td></td></tr>";
        let fixtures = parse_round(&page(r#"class="table""#, rows), 9);
        assert!(fixtures[0].time.is_none());
        assert!(fixtures[0].venue.is_none());
        assert_eq!(fixtures[0].date, "TBC");
    }

    #[test]
    fn test_fixtures_role_fallback() {
        let fixtures = parse_round(&page(r#"role="fixtures""#, PLAYED), 2);
        assert_eq!(fixtures.len(), 1);
    }

    #[test]
    fn test_fallback_when_classed_table_has_no_matches() {
        let decoy = "<tr><td>Home</td><td>Draw</td><td></td><td></td><td>Help</td></tr>";
        let html = format!("{}{}", page(r#"class="table legend""#, decoy), page(r#"role="fixtures""#, PLAYED));
        let fixtures = parse_round(&html, 7);
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].home_team, "Hawks");
        assert_eq!(fixtures[0].round, 7);
    }

    #[test]
    fn test_nested_table_rows_counted_once() {
        let inner = format!("<table class=\"table\"><tbody>{PLAYED}</tbody></table>");
        let rows = format!("<tr><td colspan=\"6\">{inner}</td></tr>{SCHEDULED}");
        let fixtures = parse_round(&page(r#"class="table""#, &rows), 2);
        // outer table first, then the nested one
        let homes: Vec<&str> = fixtures.iter().map(|f| f.home_team.as_str()).collect();
        assert_eq!(homes, vec!["Lions", "Hawks"]);
    }

    #[test]
    fn test_multiple_tables_merged() {
        let html = format!("{}{}", page(r#"class="table""#, PLAYED), page(r#"class="table day-2""#, SCHEDULED));
        let fixtures = parse_round(&html, 6);
        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].home_team, "Hawks");
        assert_eq!(fixtures[1].home_team, "Lions");
    }

    #[test]
    fn test_no_tables() {
        assert!(parse_round("<html><body><p>No fixtures for this round</p></body></html>", 1).is_empty());
    }
}
