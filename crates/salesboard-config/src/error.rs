//! Error types for salesboard-config

use serde::Serialize;
use thiserror::Error;

/// Stable identifiers for configuration failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfigErrorCode {
    FileNotFound,
    InvalidYaml,
    InvalidValue,
    IoError,
}

impl ConfigErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigErrorCode::FileNotFound => "FILE_NOT_FOUND",
            ConfigErrorCode::InvalidYaml => "INVALID_YAML",
            ConfigErrorCode::InvalidValue => "INVALID_VALUE",
            ConfigErrorCode::IoError => "IO_ERROR",
        }
    }
}

impl std::fmt::Display for ConfigErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Startup diagnostics: what failed, where, and how to fix it
#[derive(Debug, Clone, Serialize)]
pub struct ConfigErrorDetails {
    pub code: ConfigErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl std::fmt::Display for ConfigErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  hint: {}", suggestion)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Could not parse YAML: {message}")]
    InvalidYaml { message: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Could not read config: {message}")]
    IoError { message: String },
}

impl ConfigError {
    pub fn code(&self) -> ConfigErrorCode {
        match self {
            ConfigError::FileNotFound { .. } => ConfigErrorCode::FileNotFound,
            ConfigError::InvalidYaml { .. } => ConfigErrorCode::InvalidYaml,
            ConfigError::InvalidValue { .. } => ConfigErrorCode::InvalidValue,
            ConfigError::IoError { .. } => ConfigErrorCode::IoError,
        }
    }

    pub fn to_details(&self) -> ConfigErrorDetails {
        let (field, suggestions) = match self {
            ConfigError::FileNotFound { .. } => (
                None,
                vec![
                    "Pass the file with --config <path>".to_string(),
                    "Run with --print-config to get a starting file".to_string(),
                ],
            ),
            ConfigError::InvalidYaml { .. } => (
                None,
                vec!["Compare the file against the output of --print-config".to_string()],
            ),
            ConfigError::InvalidValue { field, .. } => (Some(field.clone()), vec![]),
            ConfigError::IoError { .. } => (None, vec!["Check the file permissions".to_string()]),
        };

        ConfigErrorDetails {
            code: self.code(),
            message: self.to_string(),
            field,
            suggestions,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let error = ConfigError::FileNotFound {
            path: "/etc/salesboard.yaml".to_string(),
        };
        assert_eq!(error.code(), ConfigErrorCode::FileNotFound);
        assert_eq!(error.code().to_string(), "FILE_NOT_FOUND");
        assert_eq!(error.to_string(), "Config file not found: /etc/salesboard.yaml");
    }

    #[test]
    fn test_invalid_value_details() {
        let error = ConfigError::InvalidValue {
            field: "pagination.records_per_page".to_string(),
            reason: "Records per page must be between 1 and 1000".to_string(),
        };
        let details = error.to_details();
        assert_eq!(details.field.as_deref(), Some("pagination.records_per_page"));
        assert!(details.suggestions.is_empty());
        assert!(details
            .to_string()
            .starts_with("[INVALID_VALUE] Invalid value for pagination.records_per_page"));
    }

    #[test]
    fn test_missing_file_suggests_print_config() {
        let details = ConfigError::FileNotFound {
            path: "config.yaml".to_string(),
        }
        .to_details();
        assert!(details.to_string().contains("--print-config"));
    }
}
