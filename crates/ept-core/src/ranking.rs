// Normalize a league table into player records and rank them by EPT.

use std::cmp::Ordering;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::NormalizeError;
use crate::player::PlayerRecord;
use crate::season::Season;
use crate::table::{ColumnMap, HeaderIndex, RawTable};

/// Number of players kept after ranking.
pub const TOP_N: usize = 25;

/// Ranked leaderboard handed to the serving layer. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub players: Vec<PlayerRecord>,
    pub season: Season,
    #[serde(rename = "updatedAt", serialize_with = "serialize_timestamp")]
    pub generated_at: DateTime<Utc>,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2026-01-05T18:30:00.123Z`.
fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Project every row, sort by EPT descending and keep the top [`TOP_N`].
///
/// Sorting is stable: players with equal EPT keep the order the provider
/// listed them in.
pub fn normalize_and_rank(table: &RawTable, season: Season, generated_at: DateTime<Utc>) -> RankedResult {
    let columns = ColumnMap::resolve(&HeaderIndex::build(&table.header_names));

    let mut players: Vec<PlayerRecord> = table
        .rows
        .iter()
        .map(|row| PlayerRecord::from_row(row, &columns))
        .collect();

    players.sort_by(|a, b| b.ept.partial_cmp(&a.ept).unwrap_or(Ordering::Equal));
    players.truncate(TOP_N);

    RankedResult {
        players,
        season,
        generated_at,
    }
}

/// Extract the table from a raw provider payload, then rank it.
pub fn rank_payload(
    payload: &Value,
    season: Season,
    generated_at: DateTime<Utc>,
) -> Result<RankedResult, NormalizeError> {
    let table = RawTable::from_payload(payload)?;
    Ok(normalize_and_rank(&table, season, generated_at))
}
