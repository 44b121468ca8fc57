use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{ChartFrame, Renderer};

use super::{ChartEngine, ChartEngineConfig};

pub const ENGINE_CONFIG_JSON_SCHEMA_V1: u32 = 1;
pub const CHART_FRAME_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: ChartEngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrameJsonContractV1 {
    pub schema_version: u32,
    pub frame: ChartFrame,
}

impl ChartEngineConfig {
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config json: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartEngineConfigJsonContractV1 {
            schema_version: ENGINE_CONFIG_JSON_SCHEMA_V1,
            config: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or a versioned contract payload, then
    /// validates the result.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let config = match serde_json::from_str::<ChartEngineConfig>(input) {
            Ok(config) => config,
            Err(_) => {
                let payload: ChartEngineConfigJsonContractV1 = serde_json::from_str(input)?;
                if payload.schema_version != ENGINE_CONFIG_JSON_SCHEMA_V1 {
                    return Err(ChartError::InvalidData(format!(
                        "unsupported config schema version: {}",
                        payload.schema_version
                    )));
                }
                payload.config
            }
        };
        config.validate()?;
        Ok(config)
    }
}

impl ChartFrame {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartFrameJsonContractV1 {
            schema_version: CHART_FRAME_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize frame contract v1: {e}"))
        })
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(frame) = serde_json::from_str::<ChartFrame>(input) {
            return Ok(frame);
        }
        let payload: ChartFrameJsonContractV1 = serde_json::from_str(input)?;
        if payload.schema_version != CHART_FRAME_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

impl<R: Renderer> ChartEngine<R> {
    pub fn config_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.config().to_json_contract_v1_pretty()
    }

    /// Runs a layout pass and serializes the resulting frame.
    pub fn frame_json_contract_v1_pretty(&mut self) -> ChartResult<String> {
        self.layout()?.to_json_contract_v1_pretty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartEngineConfigJsonContractV1, ENGINE_CONFIG_JSON_SCHEMA_V1};
    use crate::api::ChartEngineConfig;
    use crate::core::{Series, SeriesKind, SeriesPoint, Viewport};
    use crate::error::ChartError;

    fn config() -> ChartEngineConfig {
        ChartEngineConfig::new(Viewport::new(500, 300)).with_series(Series::new(
            "s",
            SeriesKind::Line,
            vec![SeriesPoint::xy(0.0, 1.0), SeriesPoint::xy(1.0, 3.0)],
        ))
    }

    #[test]
    fn contract_wraps_schema_version() {
        let json = config().to_json_contract_v1_pretty().expect("json");
        let payload: ChartEngineConfigJsonContractV1 = serde_json::from_str(&json).expect("payload");
        assert_eq!(payload.schema_version, ENGINE_CONFIG_JSON_SCHEMA_V1);
        assert_eq!(ChartEngineConfig::from_json_compat_str(&json).expect("compat"), config());
    }

    #[test]
    fn bare_config_is_accepted() {
        let json = config().to_json_pretty().expect("json");
        assert_eq!(ChartEngineConfig::from_json_compat_str(&json).expect("compat"), config());
    }

    #[test]
    fn unknown_schema_version_is_rejected() {
        let json = config()
            .to_json_contract_v1_pretty()
            .expect("json")
            .replacen("\"schema_version\": 1", "\"schema_version\": 9", 1);
        assert!(matches!(
            ChartEngineConfig::from_json_compat_str(&json),
            Err(ChartError::InvalidData(message)) if message.contains("schema version")
        ));
    }

    #[test]
    fn garbage_reports_json_error() {
        assert!(matches!(
            ChartEngineConfig::from_json_compat_str("{not json"),
            Err(ChartError::Json(_))
        ));
    }
}
