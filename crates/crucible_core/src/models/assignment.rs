use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::participant::Participant;
use crate::error::{EngineError, Result};

/// Which day range an assignment governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Days1To2,
    Days3To4,
}

/// A partition of the roster into named teams, active for one phase.
///
/// Invariant: every participant belongs to exactly one team, and the
/// union of all teams equals the full active roster. `validate` checks
/// both directions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub phase: Phase,
    /// Team name -> roster numbers. BTreeMap keeps iteration order
    /// deterministic.
    pub teams: BTreeMap<String, Vec<u32>>,
}

impl TeamAssignment {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            teams: BTreeMap::new(),
        }
    }

    pub fn team_of(&self, roster_number: u32) -> Option<&str> {
        self.teams
            .iter()
            .find(|(_, members)| members.contains(&roster_number))
            .map(|(name, _)| name.as_str())
    }

    pub fn members(&self, team: &str) -> Option<&[u32]> {
        self.teams.get(team).map(|m| m.as_slice())
    }

    pub fn roster_size(&self) -> usize {
        self.teams.values().map(|m| m.len()).sum()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn validate(&self, roster: &[Participant]) -> Result<()> {
        let mut seen = BTreeSet::new();
        for (team, members) in &self.teams {
            for &number in members {
                if !seen.insert(number) {
                    return Err(EngineError::Validation {
                        field: "Roster_Number".to_string(),
                        message: format!("roster #{} assigned to more than one team", number),
                    });
                }
                if !roster.iter().any(|p| p.roster_number == number) {
                    return Err(EngineError::Validation {
                        field: "Roster_Number".to_string(),
                        message: format!("roster #{} in {} is not on the roster", number, team),
                    });
                }
            }
        }
        for p in roster {
            if !seen.contains(&p.roster_number) {
                return Err(EngineError::Validation {
                    field: "Roster_Number".to_string(),
                    message: format!("roster #{} has no team assignment", p.roster_number),
                });
            }
        }
        Ok(())
    }
}
