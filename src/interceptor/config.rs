use crate::core::{FillError, Result, is_valid_identifier};
use serde::{Deserialize, Serialize};

/// Auto-fill interceptor configuration
///
/// # Examples
///
/// ```
/// use autofill_interceptor::interceptor::AutoFillConfig;
///
/// let config = AutoFillConfig::from_json(r#"{ "param_prefix": "af" }"#).unwrap();
/// assert_eq!(config.param_prefix, "af");
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFillConfig {
    /// Inert when false
    pub enabled: bool,

    /// Prefix of synthetic parameter names (`<prefix>0`, `<prefix>1`, ...)
    pub param_prefix: String,

    /// Match already-assigned columns ignoring ASCII case
    pub case_insensitive_columns: bool,
}

impl AutoFillConfig {
    pub const DEFAULT_PARAM_PREFIX: &'static str = "AUTO_FILL_VALUE_KEY";

    pub fn new() -> Self {
        Self {
            enabled: true,
            param_prefix: Self::DEFAULT_PARAM_PREFIX.to_string(),
            case_insensitive_columns: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn param_prefix(mut self, prefix: &str) -> Self {
        self.param_prefix = prefix.to_string();
        self
    }

    pub fn case_insensitive_columns(mut self, value: bool) -> Self {
        self.case_insensitive_columns = value;
        self
    }

    /// Parse and validate a JSON document; missing keys take defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // prefix is spliced into placeholders, so it must be a bare identifier
        if !is_valid_identifier(&self.param_prefix) || self.param_prefix.contains(['.', '"', '`']) {
            return Err(FillError::Config(format!(
                "Invalid parameter prefix '{}'",
                self.param_prefix
            )));
        }
        Ok(())
    }
}

impl Default for AutoFillConfig {
    fn default() -> Self {
        Self::new()
    }
}
