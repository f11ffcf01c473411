// Plain-text rendering of scan results for stdout

use crate::engine::BookLine;
use crate::pipeline::{LeagueScan, TeamGame};
use anyhow::Result;

pub const NO_EVENT_MESSAGE: &str = "No upcoming event found in window.";

/// Quota header text exactly as the provider sent it.
fn credits_line(remaining: Option<&str>) -> Option<String> {
    remaining.map(|n| format!("credits_remaining: {}", n))
}

/// JSON dump, then `name: value` ascending by value, then the quota line.
pub fn render_league(scan: &LeagueScan) -> Result<Vec<String>> {
    let mut lines = vec![scan.board.to_json_line()?];
    lines.extend(
        scan.board
            .sorted_by_line()
            .into_iter()
            .map(|(player, line)| format!("{}: {:.1}", player, line)),
    );
    lines.extend(credits_line(scan.credits_remaining.as_deref()));
    Ok(lines)
}

/// Commence time shown in US Eastern; falls back to the raw string.
fn commence_eastern(commence_time: &str) -> String {
    chrono::FixedOffset::west_opt(5 * 3600)
        .zip(chrono::DateTime::parse_from_rfc3339(commence_time).ok())
        .map(|(eastern, dt)| dt.with_timezone(&eastern).format("%b %d %H:%M ET").to_string())
        .unwrap_or_else(|| commence_time.to_string())
}

fn fmt_price(price: Option<i32>) -> String {
    match price {
        Some(p) if p > 0 => format!("+{}", p),
        Some(p) => p.to_string(),
        None => "-".to_string(),
    }
}

fn book_row(row: &BookLine) -> String {
    let line = row.line.map_or_else(|| "-".to_string(), |l| format!("{:.1}", l));
    format!(
        "  {}: line {} (O {} / U {})",
        row.bookmaker,
        line,
        fmt_price(row.over_price),
        fmt_price(row.under_price),
    )
}

pub fn render_team(game: Option<&TeamGame>) -> Vec<String> {
    let game = match game {
        Some(g) => g,
        None => return vec![NO_EVENT_MESSAGE.to_string()],
    };

    let mut lines = vec![format!(
        "{} @ {} ({})",
        game.event.away_team,
        game.event.home_team,
        commence_eastern(&game.event.commence_time),
    )];
    for pc in &game.players {
        match pc.line {
            Some(l) => lines.push(format!("{}: consensus {:.1}", pc.player, l)),
            None => lines.push(format!("{}: no consensus", pc.player)),
        }
        lines.extend(pc.rows.iter().map(book_row));
    }
    lines.extend(credits_line(game.credits_remaining.as_deref()));
    lines
}
