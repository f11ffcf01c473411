use serde::Deserialize;

/// the-odds-api.com v4 `/events` response: top-level array of events.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub commence_time: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
}

/// the-odds-api.com v4 `/events/{id}/odds` response. Only the bookmakers
/// array is consumed; a missing key is an empty list.
#[derive(Debug, Default, Deserialize)]
pub struct EventOdds {
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Bookmaker {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub markets: Vec<Market>,
}

impl Bookmaker {
    /// Display label: title, then key, then "unknown".
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(self.key.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub name: String,
    /// Player name for player-prop markets.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub point: Option<f64>,
    /// American odds. The API sends integers but may render them as floats.
    #[serde(default)]
    pub price: Option<f64>,
}

impl Outcome {
    pub fn american_price(&self) -> Option<i32> {
        self.price.map(|p| p as i32)
    }
}

/// API usage quota headers, kept as the provider sent them (may be "14527.0").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiQuota {
    pub requests_used: Option<String>,
    pub requests_remaining: Option<String>,
}
