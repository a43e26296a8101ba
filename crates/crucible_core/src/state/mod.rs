//! # Competition State Store
//!
//! Owned, versioned in-memory state for one running competition. All
//! mutating operations go through `&mut self`, so concurrent writers to
//! the same store are serialized by the lock around the global singleton;
//! score reads are pure functions of a snapshot and may run freely.
//!
//! Rebalancing and per-event calibration are one-shot transitions. They
//! produce new immutable records (a second assignment, a new score
//! version) rather than editing history in place, and retrying either
//! against a store that has already transitioned fails with
//! `AlreadyTransitioned`.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use log::{debug, info};
use once_cell::sync::Lazy;

use crate::calibration::{CalibrationMode, CalibrationOutcome, DifficultyCalibrator};
use crate::data::rows::{build_events, build_roster, EventRow, RosterRow};
use crate::error::{EngineError, Result};
use crate::models::{
    CandidateType, DifficultyScore, Event, EventKey, Participant, TeamAssignment,
};
use crate::predict::{FeatureVector, Outcome, TrainingSample};
use crate::rebalance::TeamRebalancer;
use crate::scoring::{DropLedger, ScoreCalculator};

/// Global competition state singleton.
pub static ENGINE_STATE: Lazy<Arc<RwLock<CompetitionState>>> =
    Lazy::new(|| Arc::new(RwLock::new(CompetitionState::new())));

/// Runtime competition state.
#[derive(Debug, Clone, Default)]
pub struct CompetitionState {
    pub roster: Vec<Participant>,
    pub events: Vec<Event>,
    pub ledger: DropLedger,
    /// Days 1-2 partition, fixed at roster load.
    pub initial_assignment: Option<TeamAssignment>,
    /// Days 3-4 partition, produced once by the rebalancer.
    pub rebalanced_assignment: Option<TeamAssignment>,
    /// Append-only score history; the highest version per (team, event)
    /// is current.
    pub scores: Vec<DifficultyScore>,
    calibrated: BTreeSet<EventKey>,
}

impl CompetitionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load roster and schedule from ingestion rows.
    pub fn from_rows(roster_rows: &[RosterRow], event_rows: &[EventRow]) -> Result<Self> {
        let (roster, assignment) = build_roster(roster_rows)?;
        let events = build_events(event_rows)?;
        info!(
            "loaded {} participants in {} teams and {} events",
            roster.len(),
            assignment.team_count(),
            events.len()
        );
        Ok(Self {
            roster,
            events,
            ledger: DropLedger::new(),
            initial_assignment: Some(assignment),
            rebalanced_assignment: None,
            scores: Vec::new(),
            calibrated: BTreeSet::new(),
        })
    }

    // ========================
    // Lookups
    // ========================

    pub fn participant(&self, roster_number: u32) -> Option<&Participant> {
        self.roster.iter().find(|p| p.roster_number == roster_number)
    }

    pub fn event(&self, key: &EventKey) -> Option<&Event> {
        self.events.iter().find(|e| &e.key() == key)
    }

    fn event_mut(&mut self, key: &EventKey) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| &e.key() == key)
    }

    fn require_event(&self, key: &EventKey) -> Result<&Event> {
        self.event(key).ok_or_else(|| EngineError::Validation {
            field: "Event_Name".to_string(),
            message: format!("unknown event '{}'", key),
        })
    }

    /// The assignment governing a given day: Days 1-2 always use the
    /// initial partition, Days 3-4 the rebalanced one once it exists.
    pub fn active_assignment(&self, day: u8) -> Result<&TeamAssignment> {
        let assignment = if day >= 3 {
            self.rebalanced_assignment
                .as_ref()
                .or(self.initial_assignment.as_ref())
        } else {
            self.initial_assignment.as_ref()
        };
        assignment.ok_or_else(|| EngineError::Validation {
            field: "Initial_Team".to_string(),
            message: "no roster has been loaded".to_string(),
        })
    }

    /// Latest score version for a (team, event), if any.
    pub fn latest_score(&self, team: &str, key: &EventKey) -> Option<&DifficultyScore> {
        self.scores
            .iter()
            .filter(|s| s.team == team && &s.event == key)
            .max_by_key(|s| s.version)
    }

    /// Latest score versions across all (team, event) pairings.
    pub fn current_scores(&self) -> Vec<&DifficultyScore> {
        let mut current: HashMap<(&str, &EventKey), &DifficultyScore> = HashMap::new();
        for score in &self.scores {
            let entry = current.entry((score.team.as_str(), &score.event)).or_insert(score);
            if score.version > entry.version {
                *entry = score;
            }
        }
        let mut scores: Vec<&DifficultyScore> = current.into_values().collect();
        scores.sort_by(|a, b| {
            (a.event.day, a.event.event_number, &a.event.name, &a.team)
                .cmp(&(b.event.day, b.event.event_number, &b.event.name, &b.team))
        });
        scores
    }

    // ========================
    // Event setup
    // ========================

    /// Set the heat category ahead of recording. Ingested event rows
    /// carry no heat column; the operator picks it per event.
    pub fn set_heat_category(&mut self, key: &EventKey, heat_category: u8) -> Result<()> {
        if !(1..=5).contains(&heat_category) {
            return Err(EngineError::InvalidHeatCategory {
                heat: heat_category,
            });
        }
        self.require_event(key)?;
        let event = self.event_mut(key).unwrap();
        event.heat_category = heat_category;
        debug!("heat category for '{}' set to {}", key, heat_category);
        Ok(())
    }

    // ========================
    // Drops
    // ========================

    /// Record a participant drop. Appends to the ledger only; existing
    /// scores are untouched until `recompute_result` is called.
    pub fn record_drop(
        &mut self,
        roster_number: u32,
        key: &EventKey,
        drop_time: Duration,
    ) -> Result<()> {
        let participant = self
            .participant(roster_number)
            .ok_or_else(|| EngineError::Validation {
                field: "Roster_Number".to_string(),
                message: format!("unknown roster number {}", roster_number),
            })?
            .clone();
        let event = self.require_event(key)?.clone();
        self.ledger.record_drop(&participant, &event, drop_time)?;
        info!(
            "drop recorded for #{} ({}) in '{}' at {:?}",
            roster_number, participant.name, key, drop_time
        );
        Ok(())
    }

    // ========================
    // Scoring
    // ========================

    /// Effective participants for one team's run: the event's planned
    /// count minus this team's drops strictly before completion.
    fn team_effective_participants(
        &self,
        event: &Event,
        members: &[u32],
        actual_time: Duration,
    ) -> u32 {
        let key = event.key();
        let dropped = ScoreCalculator::count_drops_before(
            self.ledger
                .drops_for_event(&key)
                .filter(|r| members.contains(&r.roster_number)),
            actual_time,
        );
        event.initial_participants.saturating_sub(dropped as u32)
    }

    /// Record one team's run of an event, appending a new score version.
    pub fn record_result(
        &mut self,
        team: &str,
        key: &EventKey,
        actual_time: Duration,
    ) -> Result<&DifficultyScore> {
        let event = self.require_event(key)?.clone();
        let assignment = self.active_assignment(event.day)?;
        let members = assignment
            .members(team)
            .ok_or_else(|| EngineError::Validation {
                field: "Team".to_string(),
                message: format!("unknown team '{}' for day {}", team, event.day),
            })?
            .to_vec();

        let total_weight = event.total_weight();
        let effective = self.team_effective_participants(&event, &members, actual_time);
        let initial_score = ScoreCalculator::initial_difficulty(&event, total_weight)?;
        let actual_score =
            ScoreCalculator::actual_difficulty(&event, total_weight, effective, actual_time)?;

        let version = self
            .latest_score(team, key)
            .map(|s| s.version + 1)
            .unwrap_or(1);
        self.scores.push(DifficultyScore {
            team: team.to_string(),
            event: key.clone(),
            version,
            initial_score,
            actual_score,
            effective_participants: effective,
            actual_time,
        });
        info!(
            "scored '{}' for {} (v{}): initial {:.4}, actual {:.4}, {} effective",
            key, team, version, initial_score, actual_score, effective
        );
        Ok(self.scores.last().unwrap())
    }

    /// Recompute a previously recorded result after a ledger or event
    /// change, appending the next version. The measured time is carried
    /// over from the latest version.
    pub fn recompute_result(&mut self, team: &str, key: &EventKey) -> Result<&DifficultyScore> {
        let actual_time = self
            .latest_score(team, key)
            .map(|s| s.actual_time)
            .ok_or_else(|| EngineError::Validation {
                field: "Team".to_string(),
                message: format!("no recorded result for {} in '{}'", team, key),
            })?;
        self.record_result(team, key, actual_time)
    }

    /// Per-participant cumulative score over Days 1-2.
    ///
    /// A participant inherits their team's actual score for every Day 1-2
    /// event the team has a result for, except events the participant
    /// dropped out of before completion, which contribute zero.
    pub fn cumulative_scores(&self) -> Result<HashMap<u32, f64>> {
        let assignment = self.active_assignment(1)?;
        let mut cumulative: HashMap<u32, f64> =
            self.roster.iter().map(|p| (p.roster_number, 0.0)).collect();
        for score in self.current_scores() {
            if score.event.day > 2 {
                continue;
            }
            let Some(members) = assignment.members(&score.team) else {
                continue;
            };
            for &number in members {
                let dropped_early = self
                    .ledger
                    .drops_for_event(&score.event)
                    .any(|r| r.roster_number == number && r.drop_time < score.actual_time);
                if !dropped_early {
                    *cumulative.entry(number).or_insert(0.0) += score.actual_score;
                }
            }
        }
        Ok(cumulative)
    }

    // ========================
    // Transitions
    // ========================

    /// One-shot Day-2 -> Day-3 rebalance.
    pub fn rebalance(&mut self, team_count: usize) -> Result<&TeamAssignment> {
        if self.rebalanced_assignment.is_some() {
            return Err(EngineError::AlreadyTransitioned {
                operation: "team rebalance".to_string(),
            });
        }
        let cumulative = self.cumulative_scores()?;
        let assignment = TeamRebalancer::rebalance(&self.roster, &cumulative, team_count)?;
        self.rebalanced_assignment = Some(assignment);
        info!("Days 3-4 assignment active with {} teams", team_count);
        Ok(self.rebalanced_assignment.as_ref().unwrap())
    }

    /// One-shot calibration of a Day 3-4 event. Fails once the event has
    /// been calibrated or scored.
    pub fn calibrate_event(
        &mut self,
        key: &EventKey,
        target: f64,
        mode: &CalibrationMode,
    ) -> Result<CalibrationOutcome> {
        let event = self.require_event(key)?.clone();
        if !event.is_adjustable() {
            return Err(EngineError::InvalidEventParameters {
                event: event.name.clone(),
                reason: format!("day {} events are fixed at load time", event.day),
            });
        }
        if self.calibrated.contains(key) {
            return Err(EngineError::AlreadyTransitioned {
                operation: format!("calibration of '{}'", key),
            });
        }
        if self.scores.iter().any(|s| &s.event == key) {
            return Err(EngineError::AlreadyTransitioned {
                operation: format!("calibration of already-scored '{}'", key),
            });
        }

        let outcome =
            DifficultyCalibrator::solve(&event, target, event.initial_participants, mode)?;
        let event = self.event_mut(key).unwrap();
        DifficultyCalibrator::apply(event, &outcome)?;
        self.calibrated.insert(key.clone());
        info!(
            "calibrated '{}' to target {:.4} (weight {:?}, distance {:?})",
            key, target, outcome.new_total_weight, outcome.new_distance_km
        );
        Ok(outcome)
    }

    // ========================
    // Prediction support
    // ========================

    /// OF share of a team under the assignment active for `day`.
    pub fn team_of_ratio(&self, team: &str, day: u8) -> Result<f64> {
        let assignment = self.active_assignment(day)?;
        let members = assignment
            .members(team)
            .ok_or_else(|| EngineError::Validation {
                field: "Team".to_string(),
                message: format!("unknown team '{}'", team),
            })?;
        if members.is_empty() {
            return Ok(0.0);
        }
        let of_count = members
            .iter()
            .filter_map(|n| self.participant(*n))
            .filter(|p| p.candidate_type == CandidateType::Of)
            .count();
        Ok(of_count as f64 / members.len() as f64)
    }

    /// Feature row for a prospective team/event pairing. The event's
    /// initial difficulty stands in for the actual score.
    pub fn features_for(&self, team: &str, key: &EventKey) -> Result<FeatureVector> {
        let event = self.require_event(key)?;
        let initial = ScoreCalculator::initial_difficulty(event, event.total_weight())?;
        Ok(FeatureVector {
            actual_score: initial,
            of_ratio: self.team_of_ratio(team, event.day)?,
            day: f64::from(event.day),
            heat_category: f64::from(event.heat_category),
        })
    }

    /// Training rows from the full score history. A run is a success when
    /// the team's drop rate stayed at or under `drop_rate_threshold`.
    pub fn training_set(&self, drop_rate_threshold: f64) -> Result<Vec<TrainingSample>> {
        let mut samples = Vec::new();
        for score in self.current_scores() {
            let assignment = self.active_assignment(score.event.day)?;
            let Some(members) = assignment.members(&score.team) else {
                continue;
            };
            if members.is_empty() {
                continue;
            }
            let dropped = ScoreCalculator::count_drops_before(
                self.ledger
                    .drops_for_event(&score.event)
                    .filter(|r| members.contains(&r.roster_number)),
                score.actual_time,
            );
            let drop_rate = dropped as f64 / members.len() as f64;
            let event = self.require_event(&score.event)?;
            samples.push(TrainingSample {
                features: FeatureVector {
                    actual_score: score.actual_score,
                    of_ratio: self.team_of_ratio(&score.team, score.event.day)?,
                    day: f64::from(score.event.day),
                    heat_category: f64::from(event.heat_category),
                },
                outcome: if drop_rate <= drop_rate_threshold {
                    Outcome::Success
                } else {
                    Outcome::Failure
                },
            });
        }
        Ok(samples)
    }
}

// ========================
// Global accessors
// ========================

/// Get a read lock on the global competition state.
pub fn get_state() -> std::sync::RwLockReadGuard<'static, CompetitionState> {
    ENGINE_STATE.read().expect("ENGINE_STATE lock poisoned")
}

/// Get a write lock on the global competition state.
pub fn get_state_mut() -> std::sync::RwLockWriteGuard<'static, CompetitionState> {
    ENGINE_STATE.write().expect("ENGINE_STATE lock poisoned")
}

/// Reset the global state to empty.
pub fn reset_state() {
    *ENGINE_STATE.write().expect("ENGINE_STATE lock poisoned") = CompetitionState::new();
}

/// Replace the entire global state.
pub fn set_state(new_state: CompetitionState) {
    *ENGINE_STATE.write().expect("ENGINE_STATE lock poisoned") = new_state;
}
