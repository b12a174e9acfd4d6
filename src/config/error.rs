//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating the configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("設定ファイルを読み込めません '{}': {message}", .path.display())]
    Read { path: PathBuf, message: String },

    /// The configuration file is not valid TOML for this schema.
    #[error("設定ファイルの解析に失敗しました '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// A value is out of range or inconsistent.
    #[error("設定値が不正です: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns true if the error concerns the file itself rather than its values.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Parse { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Read { .. } => "--config で指定したパスが存在するか確認してください",
            Self::Parse { .. } => "TOML の構文とキー名を確認してください",
            Self::Invalid(_) => "設定値を許容範囲内に修正してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/prayer.toml"),
            message: "No such file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/etc/prayer.toml"));
        assert!(msg.contains("No such file"));

        let err = ConfigError::Invalid("reminder_minutes".to_string());
        assert!(err.to_string().contains("reminder_minutes"));
    }

    #[test]
    fn test_is_file_error() {
        let parse = ConfigError::Parse {
            path: PathBuf::new(),
            message: String::new(),
        };
        assert!(parse.is_file_error());
        assert!(!ConfigError::Invalid(String::new()).is_file_error());
    }

    #[test]
    fn test_suggestion_not_empty() {
        assert!(!ConfigError::Invalid(String::new()).suggestion().is_empty());
    }
}
