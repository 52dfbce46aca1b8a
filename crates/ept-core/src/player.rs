// Per-player record: season totals, shooting percentages, per-game rates and
// the EPT composite score.

use serde::Serialize;
use serde_json::Value;

use crate::table::{number_at, optional_number_at, text_at, ColumnMap};

// ---------------------------------------------------------------------------
// EPT weights
// ---------------------------------------------------------------------------

pub const POINTS_WEIGHT: f64 = 1.5;
pub const REBOUNDS_WEIGHT: f64 = 1.5;
pub const ASSISTS_WEIGHT: f64 = 1.5;
pub const STEALS_WEIGHT: f64 = 3.0;
pub const BLOCKS_WEIGHT: f64 = 3.0;
pub const TURNOVERS_WEIGHT: f64 = 1.5;

// ---------------------------------------------------------------------------
// PlayerRecord
// ---------------------------------------------------------------------------

/// One normalized row of the league table. Built once by [`PlayerRecord::from_row`]
/// and only read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,

    #[serde(rename = "gp")]
    pub games_played: f64,
    #[serde(rename = "pts")]
    pub points: f64,
    #[serde(rename = "reb")]
    pub rebounds: f64,
    #[serde(rename = "ast")]
    pub assists: f64,
    #[serde(rename = "stl")]
    pub steals: f64,
    #[serde(rename = "blk")]
    pub blocks: f64,
    #[serde(rename = "tov")]
    pub turnovers: f64,
    #[serde(rename = "fgm")]
    pub field_goals_made: f64,
    #[serde(rename = "fga")]
    pub field_goals_attempted: f64,
    #[serde(rename = "fg3m")]
    pub threes_made: f64,
    #[serde(rename = "fg3a")]
    pub threes_attempted: f64,
    #[serde(rename = "ftm")]
    pub free_throws_made: f64,
    #[serde(rename = "fta")]
    pub free_throws_attempted: f64,

    #[serde(rename = "fgPct")]
    pub field_goal_pct: f64,
    #[serde(rename = "ftPct")]
    pub free_throw_pct: f64,
    #[serde(rename = "tpPct")]
    pub three_point_pct: f64,

    #[serde(rename = "ppg")]
    pub points_per_game: f64,
    #[serde(rename = "rpg")]
    pub rebounds_per_game: f64,
    #[serde(rename = "apg")]
    pub assists_per_game: f64,
    #[serde(rename = "spg")]
    pub steals_per_game: f64,
    #[serde(rename = "bpg")]
    pub blocks_per_game: f64,
    #[serde(rename = "topg")]
    pub turnovers_per_game: f64,

    pub ept: f64,
}

impl PlayerRecord {
    /// Project one positional row through the resolved column map.
    ///
    /// Missing columns and null cells count as zero for every numeric field.
    /// `name` and `team` stay `None` in that case.
    pub fn from_row(row: &[Value], columns: &ColumnMap) -> Self {
        let games_played = number_at(row, columns.games_played);
        let points = number_at(row, columns.points);
        let rebounds = number_at(row, columns.rebounds);
        let assists = number_at(row, columns.assists);
        let steals = number_at(row, columns.steals);
        let blocks = number_at(row, columns.blocks);
        let turnovers = number_at(row, columns.turnovers);
        let field_goals_made = number_at(row, columns.field_goals_made);
        let field_goals_attempted = number_at(row, columns.field_goals_attempted);
        let threes_made = number_at(row, columns.threes_made);
        let threes_attempted = number_at(row, columns.threes_attempted);
        let free_throws_made = number_at(row, columns.free_throws_made);
        let free_throws_attempted = number_at(row, columns.free_throws_attempted);

        Self {
            name: text_at(row, columns.name),
            team: text_at(row, columns.team),
            games_played,
            points,
            rebounds,
            assists,
            steals,
            blocks,
            turnovers,
            field_goals_made,
            field_goals_attempted,
            threes_made,
            threes_attempted,
            free_throws_made,
            free_throws_attempted,
            field_goal_pct: shooting_pct(
                optional_number_at(row, columns.field_goal_pct),
                field_goals_made,
                field_goals_attempted,
            ),
            free_throw_pct: shooting_pct(
                optional_number_at(row, columns.free_throw_pct),
                free_throws_made,
                free_throws_attempted,
            ),
            three_point_pct: shooting_pct(
                optional_number_at(row, columns.three_point_pct),
                threes_made,
                threes_attempted,
            ),
            points_per_game: per_game(points, games_played),
            rebounds_per_game: per_game(rebounds, games_played),
            assists_per_game: per_game(assists, games_played),
            steals_per_game: per_game(steals, games_played),
            blocks_per_game: per_game(blocks, games_played),
            turnovers_per_game: per_game(turnovers, games_played),
            ept: ept(points, rebounds, assists, steals, blocks, turnovers),
        }
    }
}

// ---------------------------------------------------------------------------
// Derivations
// ---------------------------------------------------------------------------

/// Round to one decimal place, halves rounding up (toward +inf).
///
/// `x - floor(x)` is exact in f64, so the half comparison never drifts.
/// Negative zero is folded into zero so it never serializes as `-0.0`.
pub fn round1(value: f64) -> f64 {
    let scaled = value * 10.0;
    let floor = scaled.floor();
    let rounded = if scaled - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded / 10.0 + 0.0
}

/// `total / games`, rounded; 0 when no games were played.
pub fn per_game(total: f64, games_played: f64) -> f64 {
    if games_played > 0.0 {
        round1(total / games_played)
    } else {
        0.0
    }
}

/// Shooting percentage on the 0-100 scale.
///
/// A provider-supplied fraction wins when present; otherwise `made / attempted`,
/// with 0 attempts giving 0.
pub fn shooting_pct(provided: Option<f64>, made: f64, attempted: f64) -> f64 {
    let fraction = match provided {
        Some(fraction) => fraction,
        None if attempted > 0.0 => made / attempted,
        None => 0.0,
    };
    round1(fraction * 100.0)
}

/// EPT from season totals, accumulated left to right in a fixed order.
pub fn ept(points: f64, rebounds: f64, assists: f64, steals: f64, blocks: f64, turnovers: f64) -> f64 {
    let mut score = points * POINTS_WEIGHT;
    score += rebounds * REBOUNDS_WEIGHT;
    score += assists * ASSISTS_WEIGHT;
    score += steals * STEALS_WEIGHT;
    score += blocks * BLOCKS_WEIGHT;
    score -= turnovers * TURNOVERS_WEIGHT;
    round1(score)
}
