use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Immutable reference data: one piece of event equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    /// Effective per-item weight in pounds. Always positive.
    pub weight: f64,
}

impl Equipment {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "Equipment_Name".to_string(),
                message: "equipment name cannot be empty".to_string(),
            });
        }
        if !(self.weight > 0.0) {
            return Err(EngineError::Validation {
                field: "Equipment_Weight".to_string(),
                message: format!("non-positive weight {} for '{}'", self.weight, self.name),
            });
        }
        Ok(())
    }
}

/// An equipment line item on an event: what is carried, and how many.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSlot {
    pub equipment: Equipment,
    pub count: u32,
}

impl EquipmentSlot {
    /// Weight contributed by this line item (per-item weight x count).
    pub fn line_weight(&self) -> f64 {
        self.equipment.weight * self.count as f64
    }

    pub fn validate(&self) -> Result<()> {
        self.equipment.validate()?;
        if self.count == 0 {
            return Err(EngineError::Validation {
                field: "Number_of_Equipment".to_string(),
                message: format!("zero count for '{}'", self.equipment.name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_weight_multiplies_count() {
        let slot = EquipmentSlot {
            equipment: Equipment {
                name: "AMMO CAN".to_string(),
                weight: 120.0,
            },
            count: 4,
        };
        assert_eq!(slot.line_weight(), 480.0);
    }

    #[test]
    fn non_positive_weight_rejected() {
        let eq = Equipment {
            name: "TIRE".to_string(),
            weight: 0.0,
        };
        assert!(eq.validate().is_err());
    }
}
