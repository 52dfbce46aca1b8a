// League stats provider client.
//
// One GET per call, no retries and no caching. The `StatsSource` trait is the
// seam the HTTP layer depends on, so handlers can be exercised against a
// canned payload.

use std::time::Duration;

use async_trait::async_trait;
use ept_core::Season;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::UpstreamConfig;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LEAGUE_ID: &str = "00";
/// Season totals; EPT is defined over totals, never per-game averages.
const PER_MODE: &str = "Totals";
const SCOPE: &str = "S";
const STAT_CATEGORY: &str = "PTS";
const SITE_ORIGIN: &str = "https://www.nba.com";
const SITE_REFERER: &str = "https://www.nba.com/";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("stats request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("stats request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("stats provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("stats response was not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

// ---------------------------------------------------------------------------
// StatsSource
// ---------------------------------------------------------------------------

/// Anything that can produce the raw league-totals payload for a season.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch_league_totals(&self, season: &Season) -> Result<Value, FetchError>;
}

// ---------------------------------------------------------------------------
// NbaStatsClient
// ---------------------------------------------------------------------------

pub struct NbaStatsClient {
    http: reqwest::Client,
    url: String,
    season_type: String,
    timeout_secs: u64,
}

impl NbaStatsClient {
    /// Build a client from the `[upstream]` config section. The timeout
    /// covers the whole request, connect through body.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ORIGIN, HeaderValue::from_static(SITE_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(SITE_REFERER));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(FetchError::Request)?;

        Ok(Self {
            http,
            url: config.url.clone(),
            season_type: config.season_type.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// The GET request for `season`, not yet sent.
    pub fn request(&self, season: &Season) -> reqwest::RequestBuilder {
        let label = season.label();
        self.http.get(&self.url).query(&[
            ("LeagueID", LEAGUE_ID),
            ("PerMode", PER_MODE),
            ("Scope", SCOPE),
            ("Season", label.as_str()),
            ("SeasonType", self.season_type.as_str()),
            ("StatCategory", STAT_CATEGORY),
        ])
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            FetchError::Request(err)
        }
    }
}

#[async_trait]
impl StatsSource for NbaStatsClient {
    async fn fetch_league_totals(&self, season: &Season) -> Result<Value, FetchError> {
        debug!(%season, url = %self.url, "requesting league totals");

        let response = self
            .request(season)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.classify(e)
            } else {
                FetchError::Decode(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_config() -> UpstreamConfig {
        UpstreamConfig {
            url: "https://stats.example.test/stats/leagueLeaders".into(),
            timeout_secs: 3,
            season_type: "Playoffs".into(),
            user_agent: "ept-test/1.0".into(),
        }
    }

    #[test]
    fn request_carries_season_totals_query() {
        let client = NbaStatsClient::from_config(&upstream_config()).unwrap();
        let request = client.request(&Season::from_start_year(2025)).build().unwrap();

        assert_eq!(request.method(), &reqwest::Method::GET);
        assert_eq!(request.url().path(), "/stats/leagueLeaders");

        let query: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("Season".into(), "2025-26".into())));
        assert!(query.contains(&("PerMode".into(), "Totals".into())));
        assert!(query.contains(&("SeasonType".into(), "Playoffs".into())));
        assert!(query.contains(&("LeagueID".into(), "00".into())));
        assert!(query.contains(&("StatCategory".into(), "PTS".into())));
    }

    #[test]
    fn status_error_message_names_code() {
        let err = FetchError::Status { status: 503 };
        assert_eq!(err.to_string(), "stats provider returned HTTP 503");
    }

    #[test]
    fn timeout_error_message_names_limit() {
        let err = FetchError::Timeout { secs: 10 };
        assert_eq!(err.to_string(), "stats request timed out after 10s");
    }
}
