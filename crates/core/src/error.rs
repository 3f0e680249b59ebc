use thiserror::Error;

/// Errors surfaced by the market data providers and the recommendation engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    /// A snapshot or series could not be produced. Never retried internally.
    #[error("market data unavailable from {source_name}: {detail}")]
    DataUnavailable { source_name: String, detail: String },

    #[error("invalid input {field}: {detail}")]
    InvalidInput { field: &'static str, detail: String },
}

pub type MarketResult<T> = Result<T, MarketError>;

impl MarketError {
    pub fn unavailable(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            detail: detail.into(),
        }
    }

    /// Short machine-readable tag, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketError::DataUnavailable { .. } => "data_unavailable",
            MarketError::InvalidInput { .. } => "invalid_input",
        }
    }
}
