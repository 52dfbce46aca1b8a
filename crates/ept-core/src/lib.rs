// Library root: season resolution and the league-leaders normalization and
// ranking pipeline. Pure computation, no I/O and no logging.

pub mod error;
pub mod player;
pub mod ranking;
pub mod season;
pub mod table;

pub use error::NormalizeError;
pub use player::PlayerRecord;
pub use ranking::{normalize_and_rank, rank_payload, RankedResult, TOP_N};
pub use season::Season;
pub use table::{ColumnMap, HeaderIndex, RawTable};
