use serde::{Deserialize, Serialize};

use crate::delta::Delta;

const DEFAULT_SCHEMA: &str = "quilt";
const DEFAULT_VERSION: u32 = 1;

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

/// Save/load envelope. The serialized delta is the persistence format;
/// there is no other wire representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeltaValue {
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub delta: Delta,
}

impl DeltaValue {
    pub fn from_delta(delta: Delta) -> Self {
        Self {
            schema: default_schema(),
            version: default_version(),
            delta,
        }
    }

    pub fn into_delta(self) -> Delta {
        self.delta
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
