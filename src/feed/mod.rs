pub mod the_odds_api;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use types::{ApiQuota, Bookmaker, Event};

/// Commence-time window for an events query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl ScanWindow {
    /// `[now - lookback_hours, now + days]`
    pub fn around(now: DateTime<Utc>, lookback_hours: i64, days: i64) -> Self {
        Self {
            from: now - Duration::hours(lookback_hours),
            to: now + Duration::days(days),
        }
    }
}

/// Format a UTC instant the way the odds API expects (`Z` suffix, no fraction).
pub fn iso_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

#[async_trait]
pub trait PropsFeed: Send + Sync {
    /// Events whose commence time falls inside the window, in provider order.
    async fn fetch_events(&mut self, window: &ScanWindow) -> Result<Vec<Event>>;
    /// Bookmakers quoting the configured player-prop market for one event.
    async fn fetch_player_props(&mut self, event_id: &str) -> Result<Vec<Bookmaker>>;
    fn last_quota(&self) -> Option<ApiQuota>;
}
