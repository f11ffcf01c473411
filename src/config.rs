use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OddsApiConfig {
    pub base_url: String,
    pub sport_key: String,
    pub regions: String,
    pub odds_format: String,
    pub market: String,
    pub request_timeout_s: u64,
    pub credentials_path: String,
    pub credentials_field: String,
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.the-odds-api.com".to_string(),
            sport_key: "americanfootball_nfl".to_string(),
            regions: "us".to_string(),
            odds_format: "american".to_string(),
            market: crate::engine::consensus::PASS_YDS_MARKET.to_string(),
            request_timeout_s: 20,
            credentials_path: ".api-keys.json".to_string(),
            credentials_field: "the_odds_api".to_string(),
        }
    }
}

/// Commence-time windows, relative to now.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WindowConfig {
    /// Look back this far so games that just kicked off are still listed.
    pub lookback_hours: i64,
    pub league_days: i64,
    pub team_days: i64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_hours: 12,
            league_days: 8,
            team_days: 4,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to built-in defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Read the odds API key from the JSON credentials file.
    pub fn odds_api_key(&self) -> Result<String> {
        read_api_key(
            Path::new(&self.odds_api.credentials_path),
            &self.odds_api.credentials_field,
        )
    }
}

/// Read `field` from a JSON object stored at `path`.
pub fn read_api_key(path: &Path, field: &str) -> Result<String> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let json: serde_json::Value = serde_json::from_str(content)
        .with_context(|| format!("Failed to parse key file: {}", path.display()))?;

    let key = json
        .get(field)
        .and_then(|v| v.as_str())
        .map(sanitize_key)
        .unwrap_or_default();
    if key.is_empty() {
        anyhow::bail!("key file {} has no \"{}\" entry", path.display(), field);
    }
    Ok(key)
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
