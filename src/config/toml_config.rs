use crate::config::OutputFormat;
use crate::core::batch::BatchSettings;
use crate::utils::error::{CardError, Result};
use crate::utils::validation::{
    validate_delimiter, validate_non_empty_string, validate_one_of, Validate,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub delimiter: Option<String>,
    pub has_headers: Option<bool>,
    pub number_column: Option<String>,
    pub expiry_column: Option<String>,
    pub cvc_column: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CardError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CARD_FORMAT_DELIMITER})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(level) = &self.logging.level {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        if let Some(delimiter) = &self.batch.delimiter {
            validate_delimiter("batch.delimiter", delimiter)?;
        }

        let columns = [
            ("batch.number_column", &self.batch.number_column),
            ("batch.expiry_column", &self.batch.expiry_column),
            ("batch.cvc_column", &self.batch.cvc_column),
        ];
        for (field, column) in columns {
            if let Some(column) = column {
                validate_non_empty_string(field, column)?;
            }
        }

        Ok(())
    }

    /// 取得輸出格式
    pub fn output_format(&self) -> OutputFormat {
        self.output.format.unwrap_or_default()
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.level.as_deref()
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }

    /// 組合批次設定，未指定的欄位使用預設值
    pub fn batch_settings(&self) -> Result<BatchSettings> {
        let defaults = BatchSettings::default();

        let delimiter = match &self.batch.delimiter {
            Some(delimiter) => validate_delimiter("batch.delimiter", delimiter)?,
            None => defaults.delimiter,
        };

        Ok(BatchSettings {
            delimiter,
            has_headers: self.batch.has_headers.unwrap_or(defaults.has_headers),
            number_column: self
                .batch
                .number_column
                .clone()
                .unwrap_or(defaults.number_column),
            expiry_column: self.batch.expiry_column.clone().or(defaults.expiry_column),
            cvc_column: self.batch.cvc_column.clone().or(defaults.cvc_column),
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[output]
format = "json"

[logging]
level = "debug"
json = true

[batch]
delimiter = ";"
has_headers = false
number_column = "pan"
expiry_column = "exp"
cvc_column = "code"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logs());

        let batch = config.batch_settings().unwrap();
        assert_eq!(batch.delimiter, b';');
        assert!(!batch.has_headers);
        assert_eq!(batch.number_column, "pan");
        assert_eq!(batch.expiry_column.as_deref(), Some("exp"));
        assert_eq!(batch.cvc_column.as_deref(), Some("code"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(!config.json_logs());

        let batch = config.batch_settings().unwrap();
        assert_eq!(batch.delimiter, b',');
        assert!(batch.has_headers);
        assert_eq!(batch.number_column, "number");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CARD_FORMAT_TEST_COLUMN", "card_number");

        let toml_content = r#"
[batch]
number_column = "${CARD_FORMAT_TEST_COLUMN}"
cvc_column = "${CARD_FORMAT_TEST_UNSET_VAR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.batch.number_column.as_deref(), Some("card_number"));
        assert_eq!(
            config.batch.cvc_column.as_deref(),
            Some("${CARD_FORMAT_TEST_UNSET_VAR}")
        );

        std::env::remove_var("CARD_FORMAT_TEST_COLUMN");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[batch]\ndelimiter = \"::\"\n").unwrap();
        assert!(config.validate().is_err());
        assert!(config.batch_settings().is_err());

        let config = TomlConfig::from_toml_str("[batch]\nnumber_column = \" \"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_output_format_is_a_parse_error() {
        let err = TomlConfig::from_toml_str("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, CardError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\nformat = \"text\"\n\n[batch]\ndelimiter = \"\\t\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert_eq!(config.batch_settings().unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_missing_file() {
        let err = TomlConfig::from_file("/nonexistent/card-format.toml").unwrap_err();
        assert!(matches!(err, CardError::IoError(_)));
    }
}
