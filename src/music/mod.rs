// Music-plan model: one dated plan of service-part slots.
pub mod grid;
pub mod song;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use song::SongIdentifier;

/// One music slot in the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicSlot {
    /// e.g. "Processional", "Song of Praise", "Communion 1"
    pub service_part: String,
    /// Raw title from the planning sheet; may carry hymnal refs and verses
    pub song_title: String,
    pub key: String,
    pub lead: String,
}

/// All planned music for one service date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MusicPlan {
    pub date: NaiveDate,
    /// e.g. "Lent 2A", "Easter Day A"
    pub liturgical_label: String,
    pub slots: Vec<MusicSlot>,
}

impl MusicPlan {
    /// Look up a slot by service-part name. Checks each slot in plan
    /// order, accepting an exact case-insensitive match or a substring
    /// containment, so abbreviated queries still resolve.
    pub fn slot(&self, part_name: &str) -> Option<&MusicSlot> {
        let part_lower = part_name.trim().to_lowercase();
        for slot in &self.slots {
            if slot.service_part.trim().to_lowercase() == part_lower {
                return Some(slot);
            }
            if slot.service_part.to_lowercase().contains(&part_lower) {
                return Some(slot);
            }
        }
        None
    }

    /// All slots whose part name starts with the prefix, e.g.
    /// "Communion" for Communion 1/2/3.
    pub fn slots_with_prefix(&self, part_prefix: &str) -> Vec<&MusicSlot> {
        let prefix_lower = part_prefix.trim().to_lowercase();
        self.slots
            .iter()
            .filter(|s| s.service_part.to_lowercase().starts_with(&prefix_lower))
            .collect()
    }
}
