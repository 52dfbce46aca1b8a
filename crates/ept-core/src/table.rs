// Raw tabular payload (header names + row arrays) and one-time column resolution.
//
// The provider returns each result set as a list of header names plus rows of
// positional values. Header names are resolved to positions once per table
// (`HeaderIndex` -> `ColumnMap`); rows are then read by position only.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::NormalizeError;

// ---------------------------------------------------------------------------
// Source header names
// ---------------------------------------------------------------------------

// Each field lists the header names it may appear under, in priority order.
// The league-leaders endpoint uses the first name; the league-dashboard
// endpoints use the alias.
const PLAYER: &[&str] = &["PLAYER", "PLAYER_NAME"];
const TEAM: &[&str] = &["TEAM", "TEAM_ABBREVIATION"];
const GP: &[&str] = &["GP"];
const PTS: &[&str] = &["PTS"];
const REB: &[&str] = &["REB"];
const AST: &[&str] = &["AST"];
const STL: &[&str] = &["STL"];
const BLK: &[&str] = &["BLK"];
const TOV: &[&str] = &["TOV"];
const FGM: &[&str] = &["FGM"];
const FGA: &[&str] = &["FGA"];
const FG3M: &[&str] = &["FG3M"];
const FG3A: &[&str] = &["FG3A"];
const FTM: &[&str] = &["FTM"];
const FTA: &[&str] = &["FTA"];
const FG_PCT: &[&str] = &["FG_PCT"];
const FT_PCT: &[&str] = &["FT_PCT"];
const FG3_PCT: &[&str] = &["FG3_PCT"];

// ---------------------------------------------------------------------------
// RawTable
// ---------------------------------------------------------------------------

/// A single result set exactly as the provider shaped it. Column position is
/// authoritative; header names only locate columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub header_names: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RawTable {
    pub fn new(header_names: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { header_names, rows }
    }

    /// Extract the table from a provider payload.
    ///
    /// Reads `resultSet.{headers,rowSet}`. When `resultSet` is absent, the
    /// first entry of a `resultSets` array is used instead. Anything short of
    /// a string header list plus an array of row arrays is rejected with
    /// [`NormalizeError::MalformedInput`].
    pub fn from_payload(payload: &Value) -> Result<Self, NormalizeError> {
        let set = match payload.get("resultSet") {
            Some(set) if !set.is_null() => set,
            _ => payload
                .get("resultSets")
                .and_then(Value::as_array)
                .and_then(|sets| sets.first())
                .ok_or_else(|| NormalizeError::malformed("missing `resultSet`"))?,
        };

        if !set.is_object() {
            return Err(NormalizeError::malformed("`resultSet` is not an object"));
        }

        let headers = set
            .get("headers")
            .ok_or_else(|| NormalizeError::malformed("missing `headers`"))?
            .as_array()
            .ok_or_else(|| NormalizeError::malformed("`headers` is not an array"))?;

        let header_names = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                h.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| NormalizeError::malformed(format!("header {i} is not a string")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let row_set = set
            .get("rowSet")
            .ok_or_else(|| NormalizeError::malformed("missing `rowSet`"))?
            .as_array()
            .ok_or_else(|| NormalizeError::malformed("`rowSet` is not an array"))?;

        let rows = row_set
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_array()
                    .cloned()
                    .ok_or_else(|| NormalizeError::malformed(format!("row {i} is not an array")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { header_names, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// HeaderIndex
// ---------------------------------------------------------------------------

/// Header name -> zero-based column position. Built left to right, so a
/// duplicated header resolves to its last occurrence.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn build(header_names: &[String]) -> Self {
        let mut positions = HashMap::with_capacity(header_names.len());
        for (i, name) in header_names.iter().enumerate() {
            positions.insert(name.clone(), i);
        }
        Self { positions }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Position of the first name in `names` that exists in the table.
    pub fn first_of(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.position(name))
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ColumnMap
// ---------------------------------------------------------------------------

/// Fixed column positions for every field a `PlayerRecord` reads.
/// `None` means the table has no such column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: Option<usize>,
    pub team: Option<usize>,
    pub games_played: Option<usize>,
    pub points: Option<usize>,
    pub rebounds: Option<usize>,
    pub assists: Option<usize>,
    pub steals: Option<usize>,
    pub blocks: Option<usize>,
    pub turnovers: Option<usize>,
    pub field_goals_made: Option<usize>,
    pub field_goals_attempted: Option<usize>,
    pub threes_made: Option<usize>,
    pub threes_attempted: Option<usize>,
    pub free_throws_made: Option<usize>,
    pub free_throws_attempted: Option<usize>,
    pub field_goal_pct: Option<usize>,
    pub free_throw_pct: Option<usize>,
    pub three_point_pct: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(index: &HeaderIndex) -> Self {
        Self {
            name: index.first_of(PLAYER),
            team: index.first_of(TEAM),
            games_played: index.first_of(GP),
            points: index.first_of(PTS),
            rebounds: index.first_of(REB),
            assists: index.first_of(AST),
            steals: index.first_of(STL),
            blocks: index.first_of(BLK),
            turnovers: index.first_of(TOV),
            field_goals_made: index.first_of(FGM),
            field_goals_attempted: index.first_of(FGA),
            threes_made: index.first_of(FG3M),
            threes_attempted: index.first_of(FG3A),
            free_throws_made: index.first_of(FTM),
            free_throws_attempted: index.first_of(FTA),
            field_goal_pct: index.first_of(FG_PCT),
            free_throw_pct: index.first_of(FT_PCT),
            three_point_pct: index.first_of(FG3_PCT),
        }
    }

    pub fn for_headers(header_names: &[String]) -> Self {
        Self::resolve(&HeaderIndex::build(header_names))
    }
}

// ---------------------------------------------------------------------------
// Cell access policy
// ---------------------------------------------------------------------------

/// The cell at `column`, or `None` when the column is absent, the row is
/// too short, or the cell is JSON null.
fn present_cell(row: &[Value], column: Option<usize>) -> Option<&Value> {
    column
        .and_then(|i| row.get(i))
        .filter(|v| !v.is_null())
}

/// Numeric coercion for a present cell: numbers as-is, numeric strings
/// parsed, everything else (and any non-finite result) is 0.
fn coerce_number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Numeric cell with the default-to-zero policy applied.
pub fn number_at(row: &[Value], column: Option<usize>) -> f64 {
    present_cell(row, column).map(coerce_number).unwrap_or(0.0)
}

/// Numeric cell, distinguishing "not provided" from a provided value.
pub fn optional_number_at(row: &[Value], column: Option<usize>) -> Option<f64> {
    present_cell(row, column).map(coerce_number)
}

/// Identity cell taken verbatim. Strings pass through untouched, other
/// scalars keep their JSON text. Absent or null yields `None`; no
/// placeholder is invented.
pub fn text_at(row: &[Value], column: Option<usize>) -> Option<String> {
    present_cell(row, column).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}
