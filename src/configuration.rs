use std::fs::File;
use std::io::BufReader;

use serde::{
    Deserialize,
    Serialize
};
use thiserror::Error;

use crate::quadrature::integrator::VSVO_SWITCH_PRECISION;

pub const DEFAULT_ITERATION_LIMIT: usize = 1_000_000;

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),

    #[error("invalid value for '{field}': {message}")]
    InvalidValue { field: &'static str, message: String },
}

/// 積分器設定，可由 JSON 載入：
///
/// ```json
/// { "switch_precision": 1e-4, "iteration_limit": 1000000 }
/// ```
///
/// 缺少的欄位使用預設值；`iteration_limit` 為 `null` 時不限制迭代次數。
/// 迭代上限只作用於 `Integrator::try_integrate`。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    switch_precision: f32,
    iteration_limit: Option<usize>,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            switch_precision: VSVO_SWITCH_PRECISION,
            iteration_limit: Some(DEFAULT_ITERATION_LIMIT),
        }
    }
}

impl IntegratorConfig {
    pub fn new(switch_precision: f32, iteration_limit: Option<usize>) -> Result<IntegratorConfig, ConfigurationError> {
        let config = IntegratorConfig { switch_precision, iteration_limit };
        config.validate()?;
        Ok(config)
    }

    /// 裁切後的 precision 不小於此值時使用 4 階引擎，否則使用 VSVO
    pub fn switch_precision(&self) -> f32 {
        self.switch_precision
    }

    pub fn iteration_limit(&self) -> Option<usize> {
        self.iteration_limit
    }

    pub fn from_json_str(json: &str) -> Result<IntegratorConfig, ConfigurationError> {
        let config: IntegratorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader(file_path: String) -> Result<IntegratorConfig, ConfigurationError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let config: IntegratorConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        log::info!(
            "loaded integrator config: switch_precision = {:e}, iteration_limit = {:?}",
            config.switch_precision,
            config.iteration_limit
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.switch_precision.is_finite() && self.switch_precision > 0.0) {
            return Err(ConfigurationError::InvalidValue {
                field: "switch_precision",
                message: format!("{} is not a positive number", self.switch_precision),
            });
        }
        if self.iteration_limit == Some(0) {
            return Err(ConfigurationError::InvalidValue {
                field: "iteration_limit",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = IntegratorConfig::default();
        assert_eq!(config.switch_precision(), 1e-4);
        assert_eq!(config.iteration_limit(), Some(DEFAULT_ITERATION_LIMIT));
        assert_eq!(IntegratorConfig::from_json_str("{}").unwrap(), config);
    }

    #[test]
    fn test_from_json_str() {
        let config = IntegratorConfig::from_json_str(r#"{"switch_precision": 1e-3, "iteration_limit": null}"#).unwrap();
        assert_eq!(config.switch_precision(), 1e-3);
        assert_eq!(config.iteration_limit(), None);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            IntegratorConfig::from_json_str(r#"{"switch_precision": -1.0}"#),
            Err(ConfigurationError::InvalidValue { field: "switch_precision", .. })
        ));
        assert!(matches!(
            IntegratorConfig::from_json_str(r#"{"iteration_limit": 0}"#),
            Err(ConfigurationError::InvalidValue { field: "iteration_limit", .. })
        ));
        assert!(matches!(
            IntegratorConfig::from_json_str("{"),
            Err(ConfigurationError::JsonParseError(_))
        ));
        assert!(IntegratorConfig::new(1e-4, Some(10)).is_ok());
    }

    #[test]
    fn test_from_reader() {
        let path = std::env::temp_dir().join("compquad_config_test.json");
        std::fs::write(&path, r#"{"switch_precision": 5e-5, "iteration_limit": 42}"#).unwrap();
        let config = IntegratorConfig::from_reader(path.to_string_lossy().into_owned()).unwrap();
        assert_eq!(config.switch_precision(), 5e-5);
        assert_eq!(config.iteration_limit(), Some(42));

        let missing = std::env::temp_dir().join("compquad_missing_config.json");
        assert!(matches!(
            IntegratorConfig::from_reader(missing.to_string_lossy().into_owned()),
            Err(ConfigurationError::IOError(_))
        ));
    }
}
