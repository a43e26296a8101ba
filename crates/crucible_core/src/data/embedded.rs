//! Embedded default dataset.
//!
//! The stock four-day schedule and a 10-team roster, used when no
//! ingestion data has been provided yet. Equipment weights are the
//! effective per-item carry weights after apparatus ratios are applied.

use super::rows::{EventRow, RosterRow};
use super::timefmt::format_mm_ss;
use std::time::Duration;

pub const DEFAULT_TEAM_SIZE: u32 = 18;
const DEFAULT_TEAM_COUNT: u32 = 10;

/// (event id, event name, equipment name, per-item weight, count,
/// distance km, time standard in minutes)
const EVENT_CATALOG: &[(u8, &str, &str, f64, u32, f64, u64)] = &[
    (1, "AMMO CAN LOW CARRY", "AMMO CAN", 120.0, 4, 7.0, 185),
    (1, "AMMO CAN LOW CARRY", "TIRE", 10.0, 4, 7.0, 185),
    (1, "AMMO CAN LOW CARRY", "2\"x10' POLE", 45.0, 6, 7.0, 185),
    (1, "AMMO CAN LOW CARRY", "3\"x10' POLE", 60.0, 1, 7.0, 185),
    (2, "AMMO CAN APP", "AMMO CAN", 24.0, 7, 3.7, 195),
    (2, "AMMO CAN APP", "TIRE", 10.0, 4, 3.7, 195),
    (2, "AMMO CAN APP", "2\"x10' POLE", 9.0, 6, 3.7, 195),
    (2, "AMMO CAN APP", "3\"x10' POLE", 12.0, 1, 3.7, 195),
    (3, "AMMO CAN HIGH CARRY", "AMMO CAN", 120.0, 4, 7.0, 210),
    (3, "AMMO CAN HIGH CARRY", "TIRE", 10.0, 4, 7.0, 210),
    (3, "AMMO CAN HIGH CARRY", "2\"x10' POLE", 45.0, 6, 7.0, 210),
    (3, "AMMO CAN HIGH CARRY", "3\"x10' POLE", 60.0, 1, 7.0, 210),
    (4, "AMMO CRATE APP", "AMMO CRATE", 20.0, 8, 4.1, 285),
    (4, "AMMO CRATE APP", "TIRE", 10.0, 4, 4.1, 285),
    (4, "AMMO CRATE APP", "2\"x10' POLE", 9.0, 3, 4.1, 285),
    (4, "AMMO CRATE APP", "3\"x10' POLE", 12.0, 1, 4.1, 285),
    (5, "AMMO CRATE LOW CARRY", "AMMO CRATE", 100.0, 7, 8.16, 240),
    (6, "DOWN PILOT HIGH CARRY", "SANDMEN", 250.0, 3, 6.7, 330),
    (6, "DOWN PILOT HIGH CARRY", "2\"x10' POLE", 45.0, 12, 6.7, 330),
    (7, "DOWN PILOT APP", "SANDMEN", 50.0, 3, 4.2, 210),
    (7, "DOWN PILOT APP", "2\"x10' POLE", 9.0, 12, 4.2, 210),
    (7, "DOWN PILOT APP", "3\"x10' POLE", 12.0, 1, 4.2, 210),
    (7, "DOWN PILOT APP", "TIRE", 10.0, 4, 4.2, 210),
    (8, "DOWN PILOT APP W/JEEP & TRAILER", "JEEP", 244.0, 1, 3.95, 240),
    (8, "DOWN PILOT APP W/JEEP & TRAILER", "SANDMEN", 25.0, 2, 3.95, 240),
    (8, "DOWN PILOT APP W/JEEP & TRAILER", "TRAILER", 57.5, 1, 3.95, 240),
    (8, "DOWN PILOT APP W/JEEP & TRAILER", "2\"x10' POLE", 4.5, 7, 3.95, 240),
    (8, "DOWN PILOT APP W/JEEP & TRAILER", "AMMO CAN", 12.0, 1, 3.95, 240),
    (9, "DOWN PILOT HIGH CARRY W/JEEP", "JEEP", 488.0, 1, 7.22, 360),
    (9, "DOWN PILOT HIGH CARRY W/JEEP", "SANDMEN", 250.0, 2, 7.22, 360),
    (9, "DOWN PILOT HIGH CARRY W/JEEP", "2\"x10' POLE", 45.0, 10, 7.22, 360),
    (9, "DOWN PILOT HIGH CARRY W/JEEP", "AMMO CRATE", 100.0, 4, 7.22, 360),
    (10, "PAILS OF PAIN", "PAIL", 35.0, 27, 7.22, 270),
    (10, "PAILS OF PAIN", "2\"x10' POLE", 45.0, 10, 7.22, 270),
    (10, "PAILS OF PAIN", "2\"x6' POLE", 27.0, 1, 7.22, 270),
    (10, "PAILS OF PAIN", "3\"x10' POLE", 60.0, 1, 7.22, 270),
    (11, "RED DOT AMMO CAN APP", "RED DOT LOG", 150.0, 1, 3.95, 210),
    (11, "RED DOT AMMO CAN APP", "AMMO CAN", 24.0, 5, 3.95, 210),
    (11, "RED DOT AMMO CAN APP", "TIRE", 10.0, 4, 3.95, 210),
    (11, "RED DOT AMMO CAN APP", "2\"x10' POLE", 9.0, 4, 3.95, 210),
    (11, "RED DOT AMMO CAN APP", "3\"x10' POLE", 12.0, 1, 3.95, 210),
    (12, "RED DOT AMMO CRATE APP", "RED DOT LOG", 150.0, 1, 3.8, 200),
    (12, "RED DOT AMMO CRATE APP", "AMMO CAN", 24.0, 5, 3.8, 200),
    (12, "RED DOT AMMO CRATE APP", "TIRE", 10.0, 4, 3.8, 200),
    (12, "RED DOT AMMO CRATE APP", "2\"x10' POLE", 9.0, 4, 3.8, 200),
    (12, "RED DOT AMMO CRATE APP", "3\"x10' POLE", 12.0, 1, 3.8, 200),
    (13, "RED DOT APP", "RED DOT LOG", 150.0, 1, 3.8, 200),
    (13, "RED DOT APP", "AMMO CAN", 24.0, 5, 3.8, 200),
    (13, "RED DOT APP", "TIRE", 10.0, 4, 3.8, 200),
    (13, "RED DOT APP", "2\"x10' POLE", 9.0, 4, 3.8, 200),
    (13, "RED DOT APP", "3\"x10' POLE", 12.0, 1, 3.8, 200),
    (14, "RED DOT LOW CARRY", "RED DOT LOG", 750.0, 1, 6.7, 260),
    (15, "RELEASE RUCK", "RUCK", 65.0, 1, 3.8, 330),
    (16, "SAND BABIES", "SAND BAG", 50.0, 25, 4.0, 120),
    (17, "WATER CAN LOW CARRY", "WATER CAN", 45.0, 18, 7.0, 165),
    (18, "WATER DRUM APP", "WATER DRUM", 53.0, 2, 4.7, 225),
    (18, "WATER DRUM APP", "WATER CAN", 9.0, 2, 4.7, 225),
    (18, "WATER DRUM APP", "2\"x10' POLE", 9.0, 5, 4.7, 225),
    (18, "WATER DRUM APP", "3\"x10' POLE", 12.0, 1, 4.7, 225),
    (18, "WATER DRUM APP", "TIRE", 10.0, 4, 4.7, 225),
    (19, "WATER DRUM HIGH CARRY", "WATER DRUM", 265.0, 2, 7.25, 315),
    (19, "WATER DRUM HIGH CARRY", "WATER CAN", 45.0, 6, 7.25, 315),
    (19, "WATER DRUM HIGH CARRY", "2\"x10' POLE", 45.0, 10, 7.25, 315),
    (20, "WATER DRUM LOW CARRY", "WATER DRUM", 265.0, 2, 6.0, 330),
    (20, "WATER DRUM LOW CARRY", "WATER CAN", 45.0, 6, 6.0, 330),
    (21, "BUY BACK", "AMMO CRATE", 100.0, 7, 4.4, 200),
    (21, "BUY BACK", "2\"x10' POLE", 45.0, 2, 4.4, 200),
    (21, "BUY BACK", "3\"x10' POLE", 60.0, 1, 4.4, 200),
    (21, "BUY BACK", "2\"x6' POLE", 27.0, 1, 4.4, 200),
    (21, "BUY BACK", "2\"x4' POLE", 18.0, 2, 4.4, 200),
    (21, "BUY BACK", "3\"x6' POLE", 36.0, 1, 4.4, 200),
    (21, "BUY BACK", "3\"x4' POLE", 24.0, 2, 4.4, 200),
    (21, "BUY BACK", "TIRE", 10.0, 4, 4.4, 200),
    (22, "JUNK YARD", "RED DOT LOG", 750.0, 7, 13.9, 600),
    (22, "JUNK YARD", "YELLOW DOT LOG", 550.0, 5, 13.9, 600),
    (22, "JUNK YARD", "WHITE DOT LOG", 375.0, 3, 13.9, 600),
    (22, "JUNK YARD", "3 DOT LOG", 250.0, 4, 13.9, 600),
    (22, "JUNK YARD", "2 DOT LOG", 220.0, 3, 13.9, 600),
    (22, "JUNK YARD", "1 DOT LOG", 140.0, 2, 13.9, 600),
    (22, "JUNK YARD", "WATER DRUM", 265.0, 5, 13.9, 600),
    (22, "JUNK YARD", "AMMO CRATE", 100.0, 1, 13.9, 600),
    (22, "JUNK YARD", "AMMO CAN", 120.0, 1, 13.9, 600),
    (22, "JUNK YARD", "WATER CAN", 45.0, 1, 13.9, 600),
];

/// Schedule slot for a catalog event. JUNK YARD occupies Day 4 alone;
/// everything else fills six slots per day, capped at Day 3.
fn schedule_slot(event_id: u8, name: &str) -> (u8, u8) {
    if name == "JUNK YARD" {
        (4, 1)
    } else {
        let day = ((u16::from(event_id) - 1) / 6 + 1).min(3) as u8;
        let number = ((event_id - 1) % 3) + 1;
        (day, number)
    }
}

/// The stock event schedule as ingestion rows.
pub fn default_event_rows() -> Vec<EventRow> {
    EVENT_CATALOG
        .iter()
        .map(|&(id, name, equipment, weight, count, distance, minutes)| {
            let (day, event_number) = schedule_slot(id, name);
            EventRow {
                event_name: name.to_string(),
                day,
                event_number,
                equipment_name: equipment.to_string(),
                equipment_weight: weight,
                number_of_equipment: count,
                time_limit: format_mm_ss(Duration::from_secs(minutes * 60)),
                initial_participants: DEFAULT_TEAM_SIZE,
                distance,
            }
        })
        .collect()
}

/// The stock roster: ten teams of eighteen, alternating ADE and OF.
pub fn default_roster_rows() -> Vec<RosterRow> {
    let mut rows = Vec::with_capacity((DEFAULT_TEAM_COUNT * DEFAULT_TEAM_SIZE) as usize);
    for team in 1..=DEFAULT_TEAM_COUNT {
        for member in 1..=DEFAULT_TEAM_SIZE {
            let candidate_type = if member % 2 == 0 { "OF" } else { "ADE" };
            let prefix = if candidate_type == "OF" { "Officer" } else { "Candidate" };
            rows.push(RosterRow {
                candidate_name: format!("{} {}-{}", prefix, team, member),
                roster_number: 1000 + (team - 1) * DEFAULT_TEAM_SIZE + member,
                candidate_type: candidate_type.to_string(),
                initial_team: format!("Team {}", team),
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rows::{build_events, build_roster};

    #[test]
    fn default_roster_builds() {
        let rows = default_roster_rows();
        assert_eq!(rows.len(), 180);
        let (roster, assignment) = build_roster(&rows).unwrap();
        assert_eq!(roster.len(), 180);
        assert_eq!(assignment.team_count(), 10);
        assert_eq!(assignment.members("Team 1").unwrap().len(), 18);
    }

    #[test]
    fn default_events_build() {
        let events = build_events(&default_event_rows()).unwrap();
        assert_eq!(events.len(), 22);
        let junk_yard = events.iter().find(|e| e.name == "JUNK YARD").unwrap();
        assert_eq!(junk_yard.day, 4);
        assert_eq!(junk_yard.event_number, 1);
        assert!(events.iter().all(|e| e.day <= 4));
    }

    #[test]
    fn catalog_weights_are_positive() {
        for (_, name, equipment, weight, count, ..) in EVENT_CATALOG {
            assert!(*weight > 0.0, "{} / {} has bad weight", name, equipment);
            assert!(*count > 0, "{} / {} has bad count", name, equipment);
        }
    }
}
