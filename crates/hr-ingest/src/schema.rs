//! Column names for each role the normalizer needs.
//!
//! The defaults follow the haul-cycle export layout:
//!
//! | Role                      | Default      | Required |
//! |---------------------------|--------------|----------|
//! | model identifier          | `HaulModel`  | yes      |
//! | hauling-unit identifier   | `HaulingEq`  | yes      |
//! | loading-unit identifier   | `LoadingEq`  | no       |
//! | actual payload            | `PayloadAct` | yes      |
//! | ordering key              | `OID`        | no       |
//! | fallback ordering key     | `CycleHour`  | no       |

use crate::{IngestError, IngestResult, RawTable};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub model:              String,
    pub haul_unit:          String,
    pub load_unit:          String,
    pub payload:            String,
    pub order_key:          String,
    pub fallback_order_key: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            model:              "HaulModel".to_owned(),
            haul_unit:          "HaulingEq".to_owned(),
            load_unit:          "LoadingEq".to_owned(),
            payload:            "PayloadAct".to_owned(),
            order_key:          "OID".to_owned(),
            fallback_order_key: "CycleHour".to_owned(),
        }
    }
}

impl Schema {
    /// Columns that must be present in the header.
    pub fn required(&self) -> [&str; 3] {
        [self.model.as_str(), self.haul_unit.as_str(), self.payload.as_str()]
    }

    /// Fail with [`IngestError::MissingColumn`] naming the first required
    /// column absent from `table`.
    pub fn check(&self, table: &RawTable) -> IngestResult<()> {
        match self.required().into_iter().find(|c| !table.has_column(c)) {
            Some(missing) => Err(IngestError::MissingColumn { field: missing.to_owned() }),
            None => Ok(()),
        }
    }
}
