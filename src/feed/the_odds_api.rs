use super::types::*;
use super::{iso_utc, PropsFeed, ScanWindow};
use crate::config::OddsApiConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct TheOddsApi {
    client: Client,
    api_key: String,
    base_url: String,
    sport_key: String,
    regions: String,
    odds_format: String,
    market: String,
    last_quota: Option<ApiQuota>,
}

/// Quota header text, untouched (the provider may send "14527.0").
fn quota_header(headers: &reqwest::header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn quota_from_headers(headers: &reqwest::header::HeaderMap) -> ApiQuota {
    ApiQuota {
        requests_used: quota_header(headers, "x-requests-used"),
        requests_remaining: quota_header(headers, "x-requests-remaining"),
    }
}

/// Fail on any non-2xx status, carrying the status and response body.
fn check_status(status: reqwest::StatusCode, what: &str, body: &str) -> Result<()> {
    if !status.is_success() {
        anyhow::bail!("the-odds-api {} ({}): {}", what, status, body);
    }
    Ok(())
}

/// Decode an `/events` body. An empty body or JSON `null` means no events.
pub fn parse_events(body: &str) -> Result<Vec<Event>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let events: Option<Vec<Event>> =
        serde_json::from_str(body).context("failed to parse the-odds-api events response")?;
    Ok(events.unwrap_or_default())
}

/// Decode an `/events/{id}/odds` body down to its bookmakers.
pub fn parse_event_odds(body: &str) -> Result<Vec<Bookmaker>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let odds: Option<EventOdds> =
        serde_json::from_str(body).context("failed to parse the-odds-api odds response")?;
    Ok(odds.unwrap_or_default().bookmakers)
}

impl TheOddsApi {
    pub fn new(api_key: String, config: &OddsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_s))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sport_key: config.sport_key.clone(),
            regions: config.regions.clone(),
            odds_format: config.odds_format.clone(),
            market: config.market.clone(),
            last_quota: None,
        })
    }

    fn events_url(&self, window: &ScanWindow) -> String {
        format!(
            "{}/v4/sports/{}/events?apiKey={}&dateFormat=iso&commenceTimeFrom={}&commenceTimeTo={}",
            self.base_url,
            self.sport_key,
            self.api_key,
            iso_utc(window.from),
            iso_utc(window.to),
        )
    }

    fn event_odds_url(&self, event_id: &str) -> String {
        format!(
            "{}/v4/sports/{}/events/{}/odds?apiKey={}&regions={}&markets={}&oddsFormat={}&dateFormat=iso",
            self.base_url,
            self.sport_key,
            event_id,
            self.api_key,
            self.regions,
            self.market,
            self.odds_format,
        )
    }

    /// GET `url`, record quota headers, and return the body of a 2xx response.
    async fn get_body(&mut self, url: &str, what: &str) -> Result<String> {
        let resp = self.client.get(url).send().await
            .with_context(|| format!("the-odds-api {} request failed", what))?;

        let quota = quota_from_headers(resp.headers());
        if let Some(remaining) = quota.requests_remaining.as_deref() {
            tracing::debug!(remaining, used = ?quota.requests_used, "the-odds-api quota");
        }
        self.last_quota = Some(quota);

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            check_status(status, what, &body)?;
            return Ok(body);
        }

        resp.text().await
            .with_context(|| format!("failed to read the-odds-api {} response", what))
    }
}

#[async_trait]
impl PropsFeed for TheOddsApi {
    async fn fetch_events(&mut self, window: &ScanWindow) -> Result<Vec<Event>> {
        let url = self.events_url(window);
        let body = self.get_body(&url, "events").await?;
        let events = parse_events(&body)?;
        tracing::debug!(count = events.len(), sport = %self.sport_key, "fetched events");
        Ok(events)
    }

    async fn fetch_player_props(&mut self, event_id: &str) -> Result<Vec<Bookmaker>> {
        let url = self.event_odds_url(event_id);
        let body = self.get_body(&url, "event odds").await?;
        let bookmakers = parse_event_odds(&body)?;
        tracing::debug!(event_id, count = bookmakers.len(), market = %self.market, "fetched player props");
        Ok(bookmakers)
    }

    fn last_quota(&self) -> Option<ApiQuota> {
        self.last_quota.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reqwest::header::{HeaderMap, HeaderValue};
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response on a loopback port; returns the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let resp = format!(
                "HTTP/1.1 {}\r\nx-requests-remaining: 14527.0\r\nx-requests-used: 473\r\n\
                 content-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body,
            );
            sock.write_all(resp.as_bytes()).await.unwrap();
            let _ = sock.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn local_api(base_url: String) -> TheOddsApi {
        let config = OddsApiConfig {
            base_url,
            request_timeout_s: 5,
            ..OddsApiConfig::default()
        };
        let mut api = TheOddsApi::new("KEY".to_string(), &config).unwrap();
        api.client = Client::builder().no_proxy().timeout(Duration::from_secs(5)).build().unwrap();
        api
    }

    fn api() -> TheOddsApi {
        let config = OddsApiConfig {
            base_url: "https://api.the-odds-api.com/".to_string(),
            ..OddsApiConfig::default()
        };
        TheOddsApi::new("KEY".to_string(), &config).unwrap()
    }

    #[test]
    fn test_events_url() {
        let now = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        let window = ScanWindow::around(now, 12, 4);
        assert_eq!(
            api().events_url(&window),
            "https://api.the-odds-api.com/v4/sports/americanfootball_nfl/events?apiKey=KEY\
             &dateFormat=iso&commenceTimeFrom=2025-10-19T00:00:00Z&commenceTimeTo=2025-10-23T12:00:00Z"
        );
    }

    #[test]
    fn test_event_odds_url() {
        assert_eq!(
            api().event_odds_url("evt1"),
            "https://api.the-odds-api.com/v4/sports/americanfootball_nfl/events/evt1/odds?apiKey=KEY\
             &regions=us&markets=player_pass_yds&oddsFormat=american&dateFormat=iso"
        );
    }

    #[test]
    fn test_parse_events_empty_and_null() {
        assert!(parse_events("").unwrap().is_empty());
        assert!(parse_events("  \n").unwrap().is_empty());
        assert!(parse_events("null").unwrap().is_empty());
        assert!(parse_events("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_events() {
        let body = r#"[
            {"id":"e1","sport_key":"americanfootball_nfl","commence_time":"2025-10-19T17:00:00Z",
             "home_team":"Kansas City Chiefs","away_team":"Las Vegas Raiders"}
        ]"#;
        let events = parse_events(body).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "e1");
        assert_eq!(events[0].home_team, "Kansas City Chiefs");
    }

    #[test]
    fn test_parse_events_rejects_garbage() {
        assert!(parse_events("<html>").is_err());
    }

    #[test]
    fn test_parse_event_odds_missing_bookmakers() {
        assert!(parse_event_odds(r#"{"id":"e1"}"#).unwrap().is_empty());
        assert!(parse_event_odds("null").unwrap().is_empty());
    }

    #[test]
    fn test_parse_event_odds() {
        let body = r#"{"id":"e1","bookmakers":[
            {"key":"draftkings","title":"DraftKings","markets":[
                {"key":"player_pass_yds","outcomes":[
                    {"name":"Over","description":"Patrick Mahomes","price":-115,"point":255.5},
                    {"name":"Under","description":"Patrick Mahomes","price":-105,"point":255.5}
                ]}
            ]}
        ]}"#;
        let books = parse_event_odds(body).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].markets[0].outcomes.len(), 2);
    }

    #[test]
    fn test_quota_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-requests-remaining", HeaderValue::from_static("14527.0"));
        headers.insert("x-requests-used", HeaderValue::from_static("473"));
        let quota = quota_from_headers(&headers);
        assert_eq!(quota.requests_remaining.as_deref(), Some("14527.0"));
        assert_eq!(quota.requests_used.as_deref(), Some("473"));

        let quota = quota_from_headers(&HeaderMap::new());
        assert_eq!(quota, ApiQuota::default());
    }

    #[test]
    fn test_check_status() {
        assert!(check_status(StatusCode::OK, "events", "").is_ok());
        let err = check_status(StatusCode::UNAUTHORIZED, "events", "bad key").unwrap_err();
        assert_eq!(err.to_string(), "the-odds-api events (401 Unauthorized): bad key");
        assert!(check_status(StatusCode::TOO_MANY_REQUESTS, "event odds", "").is_err());
    }

    #[tokio::test]
    async fn test_server_error_aborts_and_records_quota() {
        let base_url = serve_once("500 Internal Server Error", "upstream down").await;
        let mut api = local_api(base_url);
        let err = api.fetch_player_props("evt1").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("500 Internal Server Error"), "unexpected error: {msg}");
        assert!(msg.contains("upstream down"));
        let quota = api.last_quota().unwrap();
        assert_eq!(quota.requests_remaining.as_deref(), Some("14527.0"));
    }

    #[tokio::test]
    async fn test_events_fetched_from_server() {
        let base_url = serve_once(
            "200 OK",
            r#"[{"id":"e1","commence_time":"2025-10-19T17:00:00Z","home_team":"Buffalo Bills","away_team":"Miami Dolphins"}]"#,
        )
        .await;
        let mut api = local_api(base_url);
        let now = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        let events = api.fetch_events(&ScanWindow::around(now, 12, 8)).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].away_team, "Miami Dolphins");
        assert_eq!(api.last_quota().unwrap().requests_used.as_deref(), Some("473"));
    }
}
