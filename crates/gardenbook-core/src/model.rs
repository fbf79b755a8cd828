//! Garden and plant records

use serde::{Deserialize, Serialize};

/// Store-assigned garden id
pub type GardenId = i64;

/// Store-assigned plant id
pub type PlantId = i64;

/// Plant as an ordered field tuple:
/// `[id, name, common_name, category, location, year, notes]`
pub type PlantRow = (PlantId, String, String, String, String, i32, String);

/// A named physical area that may contain plants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garden {
    pub id: GardenId,
    pub name: String,
    pub notes: String,
}

/// A single plant specimen, optionally planted in a garden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub common_name: String,
    pub category: String,
    pub location: String,
    pub year: i32,
    pub notes: String,
    pub garden_id: Option<GardenId>,
}

impl Plant {
    /// Reduce to the tuple shape returned by plant search
    pub fn into_row(self) -> PlantRow {
        (
            self.id,
            self.name,
            self.common_name,
            self.category,
            self.location,
            self.year,
            self.notes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_row_serializes_as_array() {
        let plant = Plant {
            id: 1,
            name: "Rosa".to_string(),
            common_name: "Rose".to_string(),
            category: "Flower".to_string(),
            location: "BedA".to_string(),
            year: 2021,
            notes: "needs pruning".to_string(),
            garden_id: Some(3),
        };

        let json = serde_json::to_value(plant.into_row()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([1, "Rosa", "Rose", "Flower", "BedA", 2021, "needs pruning"])
        );
    }

    #[test]
    fn test_garden_serializes_as_object() {
        let garden = Garden {
            id: 1,
            name: "Back Yard".to_string(),
            notes: "sunny".to_string(),
        };

        let json = serde_json::to_value(&garden).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "name": "Back Yard", "notes": "sunny"})
        );
    }
}
