use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::event::EventKey;

/// One computed difficulty record for a (team, event) pairing.
///
/// Records are never edited in place: whenever the drop ledger or the
/// event's parameters change, the caller recomputes and appends a new
/// record with the next version for the same (team, event). The full
/// history stays queryable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyScore {
    pub team: String,
    pub event: EventKey,
    /// 1-based; the highest version is the current one.
    pub version: u32,
    pub initial_score: f64,
    pub actual_score: f64,
    pub effective_participants: u32,
    pub actual_time: Duration,
}
