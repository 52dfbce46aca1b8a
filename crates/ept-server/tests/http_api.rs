// Integration tests: the real provider client and HTTP server, wired together
// over loopback sockets. A local axum app stands in for the stats provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use ept_core::Season;
use ept_server::config::UpstreamConfig;
use ept_server::http_server::{self, AppState, STATS_PATH};
use ept_server::upstream::{FetchError, NbaStatsClient, StatsSource};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ===========================================================================
// Test helpers
// ===========================================================================

const FIXTURES: &str = "tests/fixtures";

fn load_fixture(name: &str) -> Value {
    let path = format!("{FIXTURES}/{name}");
    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("read {path}: {e}"));
    serde_json::from_str(&text).unwrap()
}

/// Serve `app` on an ephemeral loopback port; returns its base URL.
async fn spawn_app(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

type SeenQueries = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// Fake provider that records each query string and answers with `payload`.
async fn spawn_provider(payload: Value) -> (String, SeenQueries) {
    let seen: SeenQueries = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/stats/leagueLeaders",
        get(move |Query(q): Query<HashMap<String, String>>| {
            let payload = payload.clone();
            let recorder = recorder.clone();
            async move {
                recorder.lock().unwrap().push(q);
                Json(payload)
            }
        }),
    );
    let base = spawn_app(app).await;
    (format!("{base}/stats/leagueLeaders"), seen)
}

fn upstream_config(url: String, timeout_secs: u64) -> UpstreamConfig {
    UpstreamConfig {
        url,
        timeout_secs,
        season_type: "Regular Season".into(),
        user_agent: "ept-integration/1.0".into(),
    }
}

fn static_root(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("ept_integration_{name}"));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<title>EPT Leaders</title>").unwrap();
    dir
}

// ===========================================================================
// Provider client
// ===========================================================================

#[tokio::test]
async fn client_fetches_payload_with_season_query() {
    let (url, seen) = spawn_provider(load_fixture("league_leaders.json")).await;
    let client = NbaStatsClient::from_config(&upstream_config(url, 5)).unwrap();

    let season = Season::from_start_year(2025);
    let payload = client.fetch_league_totals(&season).await.unwrap();
    assert_eq!(payload["resultSet"]["name"], "LeagueLeaders");

    let queries = seen.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].get("Season").map(String::as_str), Some("2025-26"));
    assert_eq!(queries[0].get("PerMode").map(String::as_str), Some("Totals"));
    assert_eq!(
        queries[0].get("SeasonType").map(String::as_str),
        Some("Regular Season")
    );
}

#[tokio::test]
async fn client_maps_error_status() {
    let app = Router::new().route(
        "/stats/leagueLeaders",
        get(|| async { (StatusCode::FORBIDDEN, "blocked") }),
    );
    let base = spawn_app(app).await;
    let client =
        NbaStatsClient::from_config(&upstream_config(format!("{base}/stats/leagueLeaders"), 5))
            .unwrap();

    let err = client
        .fetch_league_totals(&Season::from_start_year(2025))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 403 }), "got {err:?}");
}

#[tokio::test]
async fn client_maps_non_json_body_to_decode_error() {
    let app = Router::new().route("/stats/leagueLeaders", get(|| async { "<html>maintenance</html>" }));
    let base = spawn_app(app).await;
    let client =
        NbaStatsClient::from_config(&upstream_config(format!("{base}/stats/leagueLeaders"), 5))
            .unwrap();

    let err = client
        .fetch_league_totals(&Season::from_start_year(2025))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn client_times_out_slow_provider() {
    let app = Router::new().route(
        "/stats/leagueLeaders",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "{}"
        }),
    );
    let base = spawn_app(app).await;
    let client =
        NbaStatsClient::from_config(&upstream_config(format!("{base}/stats/leagueLeaders"), 1))
            .unwrap();

    let err = client
        .fetch_league_totals(&Season::from_start_year(2025))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { secs: 1 }), "got {err:?}");
}

// ===========================================================================
// Full service
// ===========================================================================

#[tokio::test]
async fn service_serves_top_25_from_provider() {
    let (url, seen) = spawn_provider(load_fixture("league_leaders.json")).await;
    let client = NbaStatsClient::from_config(&upstream_config(url, 5)).unwrap();
    let state = AppState::new(Arc::new(client), static_root("top_25"));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(http_server::run(listener, state, async move {
        let _ = stop_rx.await;
    }));

    let http = reqwest::Client::new();
    let resp = http
        .get(format!("http://{addr}{STATS_PATH}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let body: Value = resp.json().await.unwrap();

    let players = body["players"].as_array().unwrap();
    assert_eq!(players.len(), 25);
    assert_eq!(players[0]["name"], "Paolo Lowe");
    assert_eq!(body["season"], Season::current().to_string());
    assert_eq!(
        seen.lock().unwrap()[0].get("Season").cloned(),
        Some(Season::current().to_string())
    );

    let index = http
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(index, "<title>EPT Leaders</title>");

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

#[tokio::test]
async fn service_reports_provider_outage() {
    let app = Router::new().route(
        "/stats/leagueLeaders",
        get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down") }),
    );
    let base = spawn_app(app).await;
    let client =
        NbaStatsClient::from_config(&upstream_config(format!("{base}/stats/leagueLeaders"), 5))
            .unwrap();
    let service = spawn_app(http_server::router(AppState::new(Arc::new(client), static_root("outage")))).await;

    let resp = reqwest::get(format!("{service}{STATS_PATH}")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "stats provider returned HTTP 503");
}
