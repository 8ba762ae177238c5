use serde::{Deserialize, Serialize};

use voidline_core::constants::DIFF_FORMAT_VERSION;
use voidline_core::ids::SectorId;
use voidline_procgen::FieldSnapshot;

use crate::error::PersistError;
use crate::registry::PersistedEntityRecord;

/// Everything about a sector that its seed cannot reproduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorDiff {
    pub format_version: u32,
    pub sector_id: SectorId,
    /// Absent for sectors without an asteroid field.
    #[serde(default)]
    pub asteroid_field: Option<FieldSnapshot>,
    #[serde(default)]
    pub entities: Vec<PersistedEntityRecord>,
}

impl SectorDiff {
    pub fn new(
        sector_id: SectorId,
        asteroid_field: Option<FieldSnapshot>,
        entities: Vec<PersistedEntityRecord>,
    ) -> Self {
        Self {
            format_version: DIFF_FORMAT_VERSION,
            sector_id,
            asteroid_field,
            entities,
        }
    }

    /// Older versions are read as-is; newer ones are refused.
    pub fn check_version(&self) -> Result<(), PersistError> {
        if self.format_version > DIFF_FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                sector: self.sector_id.to_string(),
                found: self.format_version,
                supported: DIFF_FORMAT_VERSION,
            });
        }
        Ok(())
    }

    /// Nothing destroyed and no divergent entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self
                .asteroid_field
                .as_ref()
                .is_none_or(|field| field.destroyed_ids.is_empty())
    }
}
