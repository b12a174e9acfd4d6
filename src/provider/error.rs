//! Prayer time provider error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while computing prayer times.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The astronomical engine failed for the requested day.
    #[error("礼拝時刻の計算に失敗しました ({date}): {message}")]
    Engine {
        /// Day that was being computed
        date: NaiveDate,
        /// Message reported by the engine
        message: String,
    },

    /// Date arithmetic left the supported calendar range.
    #[error("日付が計算可能な範囲外です: {0}")]
    DateOutOfRange(NaiveDate),
}

impl ProviderError {
    /// Returns true if the error came from the astronomical engine.
    #[must_use]
    pub fn is_engine_error(&self) -> bool {
        matches!(self, Self::Engine { .. })
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::Engine { .. } => "位置情報と計算方法の設定を確認してください",
            Self::DateOutOfRange(_) => "システム時計を確認してください",
        }
    }
}
