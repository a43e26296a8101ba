use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::equipment::EquipmentSlot;
use crate::error::{EngineError, Result};

/// Identity of an event within the four-day schedule.
///
/// Days 1-2 run with the initial team assignment, Days 3-4 with the
/// rebalanced one; the same event name can appear on different days, so
/// identity is the full (day, number, name) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventKey {
    pub day: u8,
    pub event_number: u8,
    pub name: String,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day {} Event {}: {}", self.day, self.event_number, self.name)
    }
}

/// One scheduled event.
///
/// Days 1-2 events are fixed at load time. Day 3-4 events may have their
/// equipment weight and/or distance adjusted exactly once by the
/// calibrator before any score for them is computed; the state store
/// enforces that one-shot discipline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub day: u8,
    pub event_number: u8,
    pub equipment: Vec<EquipmentSlot>,
    pub time_limit: Duration,
    pub initial_participants: u32,
    pub distance_km: f64,
    pub heat_category: u8,
}

impl Event {
    pub fn key(&self) -> EventKey {
        EventKey {
            day: self.day,
            event_number: self.event_number,
            name: self.name.clone(),
        }
    }

    /// Total carried weight: sum of per-item weight x count over all
    /// equipment line items.
    pub fn total_weight(&self) -> f64 {
        self.equipment.iter().map(|s| s.line_weight()).sum()
    }

    pub fn time_limit_secs(&self) -> f64 {
        self.time_limit.as_secs_f64()
    }

    /// Whether this event's parameters may still be calibrated.
    pub fn is_adjustable(&self) -> bool {
        self.day >= 3
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "Event_Name".to_string(),
                message: "event name cannot be empty".to_string(),
            });
        }
        if !(1..=4).contains(&self.day) {
            return Err(EngineError::Validation {
                field: "Day".to_string(),
                message: format!("day {} outside 1-4 for '{}'", self.day, self.name),
            });
        }
        if !(1..=3).contains(&self.event_number) {
            return Err(EngineError::Validation {
                field: "Event_Number".to_string(),
                message: format!("event number {} outside 1-3 for '{}'", self.event_number, self.name),
            });
        }
        if !(1..=5).contains(&self.heat_category) {
            return Err(EngineError::InvalidHeatCategory {
                heat: self.heat_category,
            });
        }
        if !(self.distance_km > 0.0) {
            return Err(EngineError::Validation {
                field: "Distance".to_string(),
                message: format!("non-positive distance {} for '{}'", self.distance_km, self.name),
            });
        }
        if self.time_limit.is_zero() {
            return Err(EngineError::Validation {
                field: "Time_Limit".to_string(),
                message: format!("zero time limit for '{}'", self.name),
            });
        }
        if self.initial_participants == 0 {
            return Err(EngineError::Validation {
                field: "Initial_Participants".to_string(),
                message: format!("zero initial participants for '{}'", self.name),
            });
        }
        if self.equipment.is_empty() {
            return Err(EngineError::Validation {
                field: "Equipment_Name".to_string(),
                message: format!("no equipment for '{}'", self.name),
            });
        }
        for slot in &self.equipment {
            slot.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Equipment;

    fn sample_event() -> Event {
        Event {
            name: "AMMO CAN LOW CARRY".to_string(),
            day: 1,
            event_number: 1,
            equipment: vec![EquipmentSlot {
                equipment: Equipment {
                    name: "AMMO CAN".to_string(),
                    weight: 120.0,
                },
                count: 4,
            }],
            time_limit: Duration::from_secs(185 * 60),
            initial_participants: 18,
            distance_km: 7.0,
            heat_category: 3,
        }
    }

    #[test]
    fn total_weight_sums_line_items() {
        let mut event = sample_event();
        event.equipment.push(EquipmentSlot {
            equipment: Equipment {
                name: "TIRE".to_string(),
                weight: 10.0,
            },
            count: 4,
        });
        assert_eq!(event.total_weight(), 480.0 + 40.0);
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(sample_event().validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_day() {
        let mut event = sample_event();
        event.day = 5;
        assert!(matches!(
            event.validate(),
            Err(EngineError::Validation { field, .. }) if field == "Day"
        ));
    }

    #[test]
    fn validate_rejects_bad_heat() {
        let mut event = sample_event();
        event.heat_category = 6;
        assert!(matches!(
            event.validate(),
            Err(EngineError::InvalidHeatCategory { heat: 6 })
        ));
    }

    #[test]
    fn days_3_and_4_are_adjustable() {
        let mut event = sample_event();
        assert!(!event.is_adjustable());
        event.day = 3;
        assert!(event.is_adjustable());
    }
}
