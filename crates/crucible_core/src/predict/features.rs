use serde::{Deserialize, Serialize};

/// Canonical feature schema, in training order.
pub const FEATURE_NAMES: [&str; 4] = ["actual_score", "of_ratio", "day", "heat_category"];
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// One feature row: the difficulty the team faced (or will face), the
/// team's OF share, and the event context.
///
/// For prospective events the initial difficulty stands in for
/// `actual_score`, since no run has happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub actual_score: f64,
    /// OF members / team size, in [0, 1].
    pub of_ratio: f64,
    pub day: f64,
    pub heat_category: f64,
}

impl FeatureVector {
    pub fn schema() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [self.actual_score, self.of_ratio, self.day, self.heat_category]
    }
}
