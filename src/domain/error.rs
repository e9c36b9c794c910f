//! Domain error types.

/// Top-level error type for tradelog.
///
/// The aggregation engine itself never fails: every numeric edge case
/// resolves to a defined fallback value. Errors belong to the collaborators
/// around it (store, config, import, request validation).
#[derive(Debug, thiserror::Error)]
pub enum TradelogError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    #[error("invalid query option: {reason}")]
    InvalidQuery { reason: String },

    #[error("order {id} not found")]
    OrderNotFound { id: i64 },

    #[error("no notes stored for symbol {symbol}")]
    MetaNotFound { symbol: String },

    #[error("import error: {reason}")]
    Import { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradelogError> for std::process::ExitCode {
    fn from(err: &TradelogError) -> Self {
        let code: u8 = match err {
            TradelogError::Io(_) => 1,
            TradelogError::ConfigParse { .. }
            | TradelogError::ConfigMissing { .. }
            | TradelogError::ConfigInvalid { .. } => 2,
            TradelogError::Database { .. } | TradelogError::DatabaseQuery { .. } => 3,
            TradelogError::InvalidOrder { .. }
            | TradelogError::InvalidQuery { .. }
            | TradelogError::Import { .. } => 4,
            TradelogError::OrderNotFound { .. } | TradelogError::MetaNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
