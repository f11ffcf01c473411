//! Sequential fetch -> aggregate flows over a [`PropsFeed`].

use crate::engine::consensus::event_consensus;
use crate::engine::{ConsensusBoard, PlayerConsensus};
use crate::feed::types::Event;
use crate::feed::{PropsFeed, ScanWindow};
use crate::teams;
use anyhow::Result;

/// Result of scanning every game in a window.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeagueScan {
    pub board: ConsensusBoard,
    pub credits_remaining: Option<String>,
}

/// The next game for one team, with per-bookmaker detail.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamGame {
    pub event: Event,
    pub players: Vec<PlayerConsensus>,
    pub credits_remaining: Option<String>,
}

/// Stable ascending sort on the ISO-8601 commence time string.
pub fn sort_by_commence(events: &mut [Event]) {
    events.sort_by(|a, b| a.commence_time.cmp(&b.commence_time));
}

/// Earliest event where `team_name` is home or away (exact match).
pub fn earliest_for_team(mut events: Vec<Event>, team_name: &str) -> Option<Event> {
    events.retain(|e| e.home_team == team_name || e.away_team == team_name);
    sort_by_commence(&mut events);
    events.into_iter().next()
}

fn credits_remaining<F: PropsFeed + ?Sized>(feed: &F) -> Option<String> {
    feed.last_quota().and_then(|q| q.requests_remaining)
}

/// Next game in `window` for the team with abbreviation `abbr`.
/// Unknown abbreviations fail with [`teams::UnknownTeam`] before any request is made.
pub async fn find_next_game<F: PropsFeed + ?Sized>(
    feed: &mut F,
    window: &ScanWindow,
    abbr: &str,
) -> Result<Option<Event>> {
    let team = teams::lookup(abbr)?;
    let events = feed.fetch_events(window).await?;
    let total = events.len();
    let next = earliest_for_team(events, team.name);
    tracing::debug!(team = team.abbr, total, found = next.is_some(), "team schedule lookup");
    Ok(next)
}

/// Consensus lines for the probable starters in the team's next game.
pub async fn team_report<F: PropsFeed + ?Sized>(
    feed: &mut F,
    window: &ScanWindow,
    abbr: &str,
    market: &str,
) -> Result<Option<TeamGame>> {
    let event = match find_next_game(feed, window, abbr).await? {
        Some(e) => e,
        None => return Ok(None),
    };

    let bookmakers = feed.fetch_player_props(&event.id).await?;
    let players = event_consensus(&bookmakers, market);
    if players.len() < crate::engine::consensus::STARTERS_PER_GAME {
        tracing::warn!(event_id = %event.id, found = players.len(), "fewer than two quoted players");
    }

    Ok(Some(TeamGame {
        event,
        players,
        credits_remaining: credits_remaining(feed),
    }))
}

/// Scan every game in `window`, one at a time, into a single board.
/// Any failed request aborts the scan.
pub async fn scan_league<F: PropsFeed + ?Sized>(
    feed: &mut F,
    window: &ScanWindow,
    market: &str,
) -> Result<LeagueScan> {
    let mut events = feed.fetch_events(window).await?;
    sort_by_commence(&mut events);
    tracing::info!(count = events.len(), "scanning events");

    let mut scan = LeagueScan {
        credits_remaining: credits_remaining(feed),
        ..LeagueScan::default()
    };

    for event in &events {
        let bookmakers = feed.fetch_player_props(&event.id).await?;
        scan.credits_remaining = credits_remaining(feed);

        for pc in event_consensus(&bookmakers, market) {
            match pc.line {
                Some(line) => scan.board.insert(pc.player, line),
                None => tracing::debug!(event_id = %event.id, player = %pc.player, "no posted line"),
            }
        }
    }

    Ok(scan)
}
