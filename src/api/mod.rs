//! Host-facing engine facade and its serializable configuration.

mod engine;
mod engine_config;
mod json_contract;

pub use engine::PlotEngine;
pub use engine_config::PlotEngineConfig;
pub use json_contract::{ENGINE_CONFIG_JSON_SCHEMA_V1, PlotEngineConfigJsonContractV1};
