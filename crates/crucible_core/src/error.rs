use thiserror::Error;

use crate::models::CandidateType;

/// Engine-wide error taxonomy.
///
/// Every variant carries the offending record or field so the presentation
/// layer can show a correctable message. None of these abort the process;
/// numeric edge cases are guarded before computation so they surface here
/// rather than as NaN or infinity.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("invalid heat category {heat}: must be between 1 and 5")]
    InvalidHeatCategory { heat: u8 },

    #[error("invalid parameters for event '{event}': {reason}")]
    InvalidEventParameters { event: String, reason: String },

    #[error("all participants dropped from event '{event}'")]
    AllParticipantsDropped { event: String },

    #[error("invalid actual time {seconds}s for event '{event}': must be positive")]
    InvalidActualTime { event: String, seconds: f64 },

    #[error("duplicate drop for roster #{roster_number} in event '{event}'")]
    DuplicateDrop { roster_number: u32, event: String },

    #[error("{team} holds {count} {candidate_type} members, quota allows {quota} (+1 for remainder teams)")]
    RatioConstraintViolated {
        team: String,
        candidate_type: CandidateType,
        count: usize,
        quota: usize,
    },

    #[error("cannot form {teams} teams from {available} {candidate_type} participants")]
    InsufficientParticipants {
        teams: usize,
        available: usize,
        candidate_type: CandidateType,
    },

    #[error("calibration target {target} infeasible for event '{event}': {reason}")]
    InfeasibleTarget {
        event: String,
        target: f64,
        reason: String,
    },

    #[error("insufficient training data: {samples} samples, at least {required} required")]
    InsufficientTrainingData { samples: usize, required: usize },

    #[error("feature schema mismatch: model was trained on [{expected}], got [{found}]")]
    FeatureSchemaMismatch { expected: String, found: String },

    #[error("{operation} has already been applied")]
    AlreadyTransitioned { operation: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
