use crate::feed::types::{Bookmaker, Market};
use std::collections::HashMap;

/// the-odds-api market key for player passing yards over/under.
pub const PASS_YDS_MARKET: &str = "player_pass_yds";

/// How many players per game are treated as the starting quarterbacks.
pub const STARTERS_PER_GAME: usize = 2;

/// One bookmaker's quote for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct BookLine {
    pub bookmaker: String,
    pub line: Option<f64>,
    pub over_price: Option<i32>,
    pub under_price: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConsensus {
    pub player: String,
    /// None when no bookmaker posted a line.
    pub line: Option<f64>,
    pub rows: Vec<BookLine>,
}

fn matching_markets<'a>(bm: &'a Bookmaker, market_key: &'a str) -> impl Iterator<Item = &'a Market> {
    bm.markets.iter().filter(move |m| m.key == market_key)
}

/// Outcome counts per player, in first-seen order. Each Over/Under counts once.
pub fn count_players(bookmakers: &[Bookmaker], market_key: &str) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for bm in bookmakers {
        for market in matching_markets(bm, market_key) {
            for outcome in &market.outcomes {
                let name = match outcome.description.as_deref() {
                    Some(n) if !n.is_empty() => n,
                    _ => continue,
                };
                match index.get(name) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(name, counts.len());
                        counts.push((name.to_string(), 1));
                    }
                }
            }
        }
    }

    counts
}

/// The `n` most-quoted players, by descending count; ties keep first-seen order.
pub fn top_players(bookmakers: &[Bookmaker], market_key: &str, n: usize) -> Vec<String> {
    let mut counts = count_players(bookmakers, market_key);
    // stable: equal counts keep first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(name, _)| name).collect()
}

/// One row per bookmaker for `player`. Bookmakers without a quote yield a row of Nones.
/// Duplicate outcomes within one bookmaker are not validated; the first value seen wins.
pub fn extract_lines(bookmakers: &[Bookmaker], market_key: &str, player: &str) -> Vec<BookLine> {
    bookmakers
        .iter()
        .map(|bm| {
            let mut line = None;
            let mut over_price = None;
            let mut under_price = None;

            for market in matching_markets(bm, market_key) {
                for outcome in market
                    .outcomes
                    .iter()
                    .filter(|o| o.description.as_deref() == Some(player))
                {
                    if line.is_none() {
                        line = outcome.point;
                    }
                    match outcome.name.as_str() {
                        "Over" if over_price.is_none() => over_price = outcome.american_price(),
                        "Under" if under_price.is_none() => under_price = outcome.american_price(),
                        _ => {}
                    }
                }
            }

            BookLine {
                bookmaker: bm.label().to_string(),
                line,
                over_price,
                under_price,
            }
        })
        .collect()
}

/// Round to one decimal place. Exact ties go to the even neighbour, so a
/// four-book mean of 250.25 becomes 250.2 and 250.75 becomes 250.8.
pub fn round1(x: f64) -> f64 {
    let scaled = x * 10.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor == 0.5 {
        if floor % 2.0 == 0.0 { floor } else { floor + 1.0 }
    } else {
        scaled.round()
    };
    rounded / 10.0
}

/// Mean of the posted lines, ignoring bookmakers without one.
pub fn consensus_line(rows: &[BookLine]) -> Option<f64> {
    let points: Vec<f64> = rows.iter().filter_map(|r| r.line).collect();
    if points.is_empty() {
        return None;
    }
    Some(round1(points.iter().sum::<f64>() / points.len() as f64))
}

/// Identify the probable starters for one game and compute their consensus lines.
pub fn event_consensus(bookmakers: &[Bookmaker], market_key: &str) -> Vec<PlayerConsensus> {
    top_players(bookmakers, market_key, STARTERS_PER_GAME)
        .into_iter()
        .map(|player| {
            let rows = extract_lines(bookmakers, market_key, &player);
            let line = consensus_line(&rows);
            PlayerConsensus { player, line, rows }
        })
        .collect()
}
