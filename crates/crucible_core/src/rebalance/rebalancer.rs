//! # Team Rebalancer
//!
//! Re-partitions the roster after Day 2 so Days 3-4 teams carry balanced
//! cumulative performance while preserving the roster's OF : ADE ratio
//! per team.
//!
//! The algorithm is a deterministic heuristic, not an exact optimizer:
//! ratio-constrained balanced partitioning is NP-hard in general. OF and
//! ADE participants are ranked separately by cumulative score (roster
//! number breaks ties) and each ranking is dealt across the teams in a
//! snake draft, which satisfies the per-type quota by construction and
//! keeps the aggregate spread small.

use std::collections::HashMap;

use log::{debug, info};

use crate::error::{EngineError, Result};
use crate::models::{CandidateType, Participant, Phase, TeamAssignment};

pub struct TeamRebalancer;

impl TeamRebalancer {
    /// Number of teams for a roster of `roster_size` at the given target
    /// team size (nearest integer, never below 1).
    pub fn team_count_for(roster_size: usize, target_team_size: usize) -> usize {
        if target_team_size == 0 {
            return 1;
        }
        ((roster_size as f64 / target_team_size as f64).round() as usize).max(1)
    }

    /// Partition the roster into `team_count` new teams for Days 3-4.
    ///
    /// `cumulative` maps roster numbers to their Days 1-2 cumulative
    /// score S(p); participants missing from the map score 0.
    pub fn rebalance(
        roster: &[Participant],
        cumulative: &HashMap<u32, f64>,
        team_count: usize,
    ) -> Result<TeamAssignment> {
        if team_count == 0 {
            return Err(EngineError::Validation {
                field: "team_count".to_string(),
                message: "cannot rebalance into zero teams".to_string(),
            });
        }

        let of: Vec<&Participant> = roster
            .iter()
            .filter(|p| p.candidate_type == CandidateType::Of)
            .collect();
        let ade: Vec<&Participant> = roster
            .iter()
            .filter(|p| p.candidate_type == CandidateType::Ade)
            .collect();
        for (candidate_type, pool) in [(CandidateType::Of, &of), (CandidateType::Ade, &ade)] {
            if team_count > pool.len() {
                return Err(EngineError::InsufficientParticipants {
                    teams: team_count,
                    available: pool.len(),
                    candidate_type,
                });
            }
        }

        let mut teams: Vec<(String, Vec<u32>)> = (1..=team_count)
            .map(|i| (format!("Team {}", i), Vec::new()))
            .collect();
        Self::snake_draft(&mut teams, &of, cumulative);
        Self::snake_draft(&mut teams, &ade, cumulative);

        let assignment = TeamAssignment {
            phase: Phase::Days3To4,
            teams: teams.into_iter().collect(),
        };
        assignment.validate(roster)?;
        Self::verify_quotas(&assignment, roster, team_count)?;

        let (min_total, max_total) = Self::aggregate_bounds(&assignment, cumulative);
        info!(
            "rebalanced {} participants into {} teams (aggregate spread {:.4})",
            roster.len(),
            team_count,
            max_total - min_total
        );
        Ok(assignment)
    }

    /// Rank a type pool by cumulative score descending, roster number
    /// ascending on ties. Determinism matters: the draft must produce the
    /// same partition for the same inputs.
    fn ranked<'a>(
        pool: &[&'a Participant],
        cumulative: &HashMap<u32, f64>,
    ) -> Vec<&'a Participant> {
        let score =
            |p: &Participant| cumulative.get(&p.roster_number).copied().unwrap_or(0.0);
        let mut ranked = pool.to_vec();
        ranked.sort_by(|a, b| {
            score(b)
                .partial_cmp(&score(a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.roster_number.cmp(&b.roster_number))
        });
        ranked
    }

    /// Boustrophedon deal: round 1 left-to-right, round 2 right-to-left,
    /// so the team that just received the weakest pick receives the next
    /// strongest one.
    fn snake_draft(
        teams: &mut [(String, Vec<u32>)],
        pool: &[&Participant],
        cumulative: &HashMap<u32, f64>,
    ) {
        let k = teams.len();
        for (i, p) in Self::ranked(pool, cumulative).iter().enumerate() {
            let round = i / k;
            let pos = i % k;
            let idx = if round % 2 == 0 { pos } else { k - 1 - pos };
            teams[idx].1.push(p.roster_number);
            debug!("draft pick {} -> {}", p.roster_number, teams[idx].0);
        }
    }

    /// Each team's OF and ADE counts must match the per-team quota as
    /// closely as integer division allows: floor(total/k), plus one for
    /// remainder teams when the division is inexact.
    pub fn verify_quotas(
        assignment: &TeamAssignment,
        roster: &[Participant],
        team_count: usize,
    ) -> Result<()> {
        if team_count == 0 {
            return Err(EngineError::Validation {
                field: "team_count".to_string(),
                message: "cannot verify quotas for zero teams".to_string(),
            });
        }
        let type_of: HashMap<u32, CandidateType> = roster
            .iter()
            .map(|p| (p.roster_number, p.candidate_type))
            .collect();
        for candidate_type in [CandidateType::Of, CandidateType::Ade] {
            let total = roster
                .iter()
                .filter(|p| p.candidate_type == candidate_type)
                .count();
            let quota = total / team_count;
            let max_allowed = if total % team_count == 0 { quota } else { quota + 1 };
            for (team, members) in &assignment.teams {
                let count = members
                    .iter()
                    .filter(|n| type_of.get(n) == Some(&candidate_type))
                    .count();
                if count < quota || count > max_allowed {
                    return Err(EngineError::RatioConstraintViolated {
                        team: team.clone(),
                        candidate_type,
                        count,
                        quota,
                    });
                }
            }
        }
        Ok(())
    }

    /// (min, max) of per-team aggregate cumulative score.
    pub fn aggregate_bounds(
        assignment: &TeamAssignment,
        cumulative: &HashMap<u32, f64>,
    ) -> (f64, f64) {
        let mut min_total = f64::INFINITY;
        let mut max_total = f64::NEG_INFINITY;
        for members in assignment.teams.values() {
            let total: f64 = members
                .iter()
                .map(|n| cumulative.get(n).copied().unwrap_or(0.0))
                .sum();
            min_total = min_total.min(total);
            max_total = max_total.max(total);
        }
        if assignment.teams.is_empty() {
            (0.0, 0.0)
        } else {
            (min_total, max_total)
        }
    }
}
