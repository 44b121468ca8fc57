//! Host-facing engine: configuration, layout passes and JSON contracts.

mod categories;
mod engine;
mod engine_config;
mod geometry_cache;
pub mod json_contract;
mod layout;

pub use engine::ChartEngine;
pub use engine_config::{ChartEngineConfig, ChartMargins};
pub use geometry_cache::PointGeometryCache;
pub use json_contract::{
    ChartEngineConfigJsonContractV1, ChartFrameJsonContractV1, CHART_FRAME_JSON_SCHEMA_V1,
    ENGINE_CONFIG_JSON_SCHEMA_V1,
};
