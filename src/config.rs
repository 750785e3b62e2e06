use serde::{Deserialize, Serialize};
use std::path::Path;
use anyhow::Result;

pub const DEFAULT_CONFIG_FILE: &str = "byteme.toml";
pub const DEFAULT_LOG_FILTER: &str = "byteme=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Byte budget for `varint decode` when --max-bytes is not given
    pub default_max_bytes: Option<usize>,
    pub uppercase_hex: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            default_max_bytes: None,
            uppercase_hex: false,
        }
    }
}

impl CliConfig {
    /// Load the config file if present, defaults otherwise.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if Path::new(config_file).exists() {
            let content = std::fs::read_to_string(config_file)?;
            Self::parse(&content)
        } else if config_path.is_some() {
            Err(anyhow::anyhow!("config file not found: {}", config_file))
        } else {
            Ok(Self::default())
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: CliConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        tracing::info!("Wrote config to {}", config_path);
        Ok(())
    }

    pub fn format_hex(&self, bytes: &[u8]) -> String {
        if self.uppercase_hex {
            hex::encode_upper(bytes)
        } else {
            hex::encode(bytes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = CliConfig::parse("default_max_bytes = 10\n").unwrap();
        assert_eq!(config.default_max_bytes, Some(10));
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert!(!config.uppercase_hex);
    }

    #[test]
    fn pretty_output_parses_back() {
        let config = CliConfig {
            log_filter: "byteme=trace".to_string(),
            default_max_bytes: Some(5),
            uppercase_hex: true,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(CliConfig::parse(&text).unwrap(), config);
    }

    #[test]
    fn hex_case_follows_config() {
        let mut config = CliConfig::default();
        assert_eq!(config.format_hex(&[0xAB, 0x0C]), "ab0c");
        config.uppercase_hex = true;
        assert_eq!(config.format_hex(&[0xAB, 0x0C]), "AB0C");
    }
}
