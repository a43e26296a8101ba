//! Row schema consumed from the ingestion collaborator.
//!
//! Field names mirror the upstream CSV/SQL headers verbatim; the builders
//! turn validated rows into engine models and surface the offending
//! record on failure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::timefmt::parse_mm_ss;
use crate::error::{EngineError, Result};
use crate::models::{
    CandidateType, Equipment, EquipmentSlot, Event, Participant, Phase, TeamAssignment,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRow {
    #[serde(rename = "Candidate_Name")]
    pub candidate_name: String,
    #[serde(rename = "Roster_Number")]
    pub roster_number: u32,
    #[serde(rename = "Candidate_Type")]
    pub candidate_type: String,
    #[serde(rename = "Initial_Team")]
    pub initial_team: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRow {
    #[serde(rename = "Equipment_Name")]
    pub equipment_name: String,
    #[serde(rename = "Equipment_Weight")]
    pub equipment_weight: f64,
}

/// One equipment line of one event; events spanning several pieces of
/// equipment arrive as several rows sharing (Day, Event_Number,
/// Event_Name).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRow {
    #[serde(rename = "Event_Name")]
    pub event_name: String,
    #[serde(rename = "Day")]
    pub day: u8,
    #[serde(rename = "Event_Number")]
    pub event_number: u8,
    #[serde(rename = "Equipment_Name")]
    pub equipment_name: String,
    #[serde(rename = "Equipment_Weight")]
    pub equipment_weight: f64,
    #[serde(rename = "Number_of_Equipment")]
    pub number_of_equipment: u32,
    /// "mm:ss"; minutes may exceed 60.
    #[serde(rename = "Time_Limit")]
    pub time_limit: String,
    #[serde(rename = "Initial_Participants")]
    pub initial_participants: u32,
    /// Kilometers.
    #[serde(rename = "Distance")]
    pub distance: f64,
}

/// Build the roster and the Days 1-2 assignment from ingested rows.
pub fn build_roster(rows: &[RosterRow]) -> Result<(Vec<Participant>, TeamAssignment)> {
    let mut roster = Vec::with_capacity(rows.len());
    let mut teams: BTreeMap<String, Vec<u32>> = BTreeMap::new();

    for row in rows {
        if roster
            .iter()
            .any(|p: &Participant| p.roster_number == row.roster_number)
        {
            return Err(EngineError::Validation {
                field: "Roster_Number".to_string(),
                message: format!("duplicate roster number {}", row.roster_number),
            });
        }
        if row.initial_team.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "Initial_Team".to_string(),
                message: format!("missing initial team for roster #{}", row.roster_number),
            });
        }
        let participant = Participant {
            roster_number: row.roster_number,
            name: row.candidate_name.clone(),
            candidate_type: CandidateType::parse(&row.candidate_type)?,
        };
        participant.validate()?;
        teams
            .entry(row.initial_team.trim().to_string())
            .or_default()
            .push(row.roster_number);
        roster.push(participant);
    }

    let assignment = TeamAssignment {
        phase: Phase::Days1To2,
        teams,
    };
    assignment.validate(&roster)?;
    Ok((roster, assignment))
}

/// Build the equipment reference list from ingested rows.
pub fn build_equipment(rows: &[EquipmentRow]) -> Result<Vec<Equipment>> {
    rows.iter()
        .map(|row| {
            let equipment = Equipment {
                name: row.equipment_name.clone(),
                weight: row.equipment_weight,
            };
            equipment.validate()?;
            Ok(equipment)
        })
        .collect()
}

/// Group event rows by (day, event number, name) and build validated
/// events. Rows of one event must agree on time limit, participants, and
/// distance. Heat category defaults to 1; the operator sets it at
/// recording time.
pub fn build_events(rows: &[EventRow]) -> Result<Vec<Event>> {
    let mut order: Vec<(u8, u8, String)> = Vec::new();
    let mut grouped: BTreeMap<(u8, u8, String), Vec<&EventRow>> = BTreeMap::new();
    for row in rows {
        let key = (row.day, row.event_number, row.event_name.clone());
        if !grouped.contains_key(&key) {
            order.push(key.clone());
        }
        grouped.entry(key).or_default().push(row);
    }

    let mut events = Vec::with_capacity(order.len());
    for key in order {
        let group = &grouped[&key];
        let first = group[0];
        for row in group.iter().skip(1) {
            if row.time_limit != first.time_limit
                || row.initial_participants != first.initial_participants
                || (row.distance - first.distance).abs() > f64::EPSILON
            {
                return Err(EngineError::Validation {
                    field: "Event_Name".to_string(),
                    message: format!(
                        "rows for '{}' disagree on time limit, participants, or distance",
                        first.event_name
                    ),
                });
            }
        }
        let event = Event {
            name: first.event_name.clone(),
            day: first.day,
            event_number: first.event_number,
            equipment: group
                .iter()
                .map(|row| EquipmentSlot {
                    equipment: Equipment {
                        name: row.equipment_name.clone(),
                        weight: row.equipment_weight,
                    },
                    count: row.number_of_equipment,
                })
                .collect(),
            time_limit: parse_mm_ss(&first.time_limit)?,
            initial_participants: first.initial_participants,
            distance_km: first.distance,
            heat_category: 1,
        };
        event.validate()?;
        events.push(event);
    }
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_row(n: u32, ty: &str, team: &str) -> RosterRow {
        RosterRow {
            candidate_name: format!("Candidate {}", n),
            roster_number: n,
            candidate_type: ty.to_string(),
            initial_team: team.to_string(),
        }
    }

    fn event_row(name: &str, equip: &str, weight: f64, count: u32) -> EventRow {
        EventRow {
            event_name: name.to_string(),
            day: 1,
            event_number: 1,
            equipment_name: equip.to_string(),
            equipment_weight: weight,
            number_of_equipment: count,
            time_limit: "185:00".to_string(),
            initial_participants: 18,
            distance: 7.0,
        }
    }

    #[test]
    fn roster_builds_initial_assignment() {
        let rows = vec![
            roster_row(1001, "OF", "Team 1"),
            roster_row(1002, "ADE", "Team 1"),
            roster_row(1003, "OF", "Team 2"),
        ];
        let (roster, assignment) = build_roster(&rows).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(assignment.team_of(1002), Some("Team 1"));
        assert_eq!(assignment.team_of(1003), Some("Team 2"));
    }

    #[test]
    fn duplicate_roster_number_names_offender() {
        let rows = vec![roster_row(1001, "OF", "Team 1"), roster_row(1001, "ADE", "Team 2")];
        let err = build_roster(&rows).unwrap_err();
        match err {
            EngineError::Validation { field, message } => {
                assert_eq!(field, "Roster_Number");
                assert!(message.contains("1001"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn unknown_candidate_type_rejected() {
        let rows = vec![roster_row(1001, "XYZ", "Team 1")];
        assert!(build_roster(&rows).is_err());
    }

    #[test]
    fn event_rows_group_by_identity() {
        let rows = vec![
            event_row("AMMO CAN LOW CARRY", "AMMO CAN", 120.0, 4),
            event_row("AMMO CAN LOW CARRY", "TIRE", 10.0, 4),
        ];
        let events = build_events(&rows).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].equipment.len(), 2);
        assert_eq!(events[0].total_weight(), 480.0 + 40.0);
        assert_eq!(events[0].time_limit.as_secs(), 185 * 60);
        assert_eq!(events[0].heat_category, 1);
    }

    #[test]
    fn disagreeing_rows_rejected() {
        let mut second = event_row("AMMO CAN LOW CARRY", "TIRE", 10.0, 4);
        second.distance = 9.9;
        let rows = vec![event_row("AMMO CAN LOW CARRY", "AMMO CAN", 120.0, 4), second];
        assert!(build_events(&rows).is_err());
    }

    #[test]
    fn negative_equipment_weight_rejected() {
        let rows = vec![EquipmentRow {
            equipment_name: "TIRE".to_string(),
            equipment_weight: -5.0,
        }];
        assert!(build_equipment(&rows).is_err());
    }
}
