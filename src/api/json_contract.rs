use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

use super::PlotEngineConfig;

pub const ENGINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotEngineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: PlotEngineConfig,
}

impl PlotEngineConfig {
    pub fn to_json_contract_v1_pretty(self) -> PlotResult<String> {
        let payload = PlotEngineConfigJsonContractV1 {
            schema_version: ENGINE_CONFIG_JSON_SCHEMA_V1,
            config: self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            PlotError::InvalidData(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned contract payload.
    pub fn from_json_compat_str(input: &str) -> PlotResult<Self> {
        if let Ok(config) = serde_json::from_str::<PlotEngineConfig>(input) {
            return Ok(config);
        }
        let payload: PlotEngineConfigJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            PlotError::InvalidData(format!("failed to parse config json payload: {e}"))
        })?;
        if payload.schema_version != ENGINE_CONFIG_JSON_SCHEMA_V1 {
            return Err(PlotError::InvalidData(format!(
                "unsupported config schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.config)
    }
}
