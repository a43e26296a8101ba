use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Candidate category. The OF : ADE ratio of the full roster must be
/// preserved (per team, within the integer remainder) whenever teams are
/// rebalanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CandidateType {
    #[serde(rename = "OF")]
    Of,
    #[serde(rename = "ADE")]
    Ade,
}

impl CandidateType {
    /// Parse the ingestion-boundary spelling ("OF" / "ADE").
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim() {
            "OF" => Ok(CandidateType::Of),
            "ADE" => Ok(CandidateType::Ade),
            other => Err(EngineError::Validation {
                field: "Candidate_Type".to_string(),
                message: format!("unknown candidate type '{}'", other),
            }),
        }
    }
}

impl fmt::Display for CandidateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateType::Of => write!(f, "OF"),
            CandidateType::Ade => write!(f, "ADE"),
        }
    }
}

/// A roster member.
///
/// Identity (roster number, name) and candidate type are fixed for the
/// lifetime of the competition. Team membership is tracked by the active
/// `TeamAssignment`, never on the participant itself, so the Days 1-2
/// assignment stays queryable after the rebalance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub roster_number: u32,
    pub name: String,
    pub candidate_type: CandidateType,
}

impl Participant {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "Candidate_Name".to_string(),
                message: format!("empty name for roster #{}", self.roster_number),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_candidate_types() {
        assert_eq!(CandidateType::parse("OF").unwrap(), CandidateType::Of);
        assert_eq!(CandidateType::parse(" ADE ").unwrap(), CandidateType::Ade);
        assert!(CandidateType::parse("NCO").is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let p = Participant {
            roster_number: 1001,
            name: "  ".to_string(),
            candidate_type: CandidateType::Of,
        };
        assert!(matches!(p.validate(), Err(EngineError::Validation { .. })));
    }
}
