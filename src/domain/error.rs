//! Domain error types.

use rust_decimal::Decimal;

/// Asset construction or mutation received invalid attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed asset: {reason}")]
pub struct AssetError {
    pub reason: String,
}

impl AssetError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Investor construction or edit received invalid attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid investor: {reason}")]
pub struct InvestorError {
    pub reason: String,
}

impl InvestorError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Rejection of a single buy or sell request. A rejected request leaves the
/// portfolio untouched; the caller may resubmit a corrected one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeError {
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    #[error("execution price must be greater than zero")]
    InvalidPrice,

    #[error("insufficient quantity: requested {requested}, holding {held}")]
    InsufficientQuantity { requested: Decimal, held: Decimal },

    #[error("investor not eligible: {reason}")]
    IneligibleInvestor { reason: String },
}

/// Top-level error type for foliotrack.
#[derive(Debug, thiserror::Error)]
pub enum FoliotrackError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("CSV error in {file}: {reason}")]
    CsvParse { file: String, reason: String },

    #[error("no asset found for ticker {ticker}")]
    AssetNotFound { ticker: String },

    #[error("no investor found for identifier {identifier}")]
    InvestorNotFound { identifier: String },

    #[error("duplicate asset: {ticker}")]
    DuplicateAsset { ticker: String },

    #[error("duplicate investor: {identifier}")]
    DuplicateInvestor { identifier: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Trade(#[from] TradeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&FoliotrackError> for std::process::ExitCode {
    fn from(err: &FoliotrackError) -> Self {
        let code: u8 = match err {
            FoliotrackError::Io(_) | FoliotrackError::Report { .. } => 1,
            FoliotrackError::ConfigParse { .. } | FoliotrackError::ConfigMissing { .. } => 2,
            FoliotrackError::CsvParse { .. }
            | FoliotrackError::DuplicateAsset { .. }
            | FoliotrackError::DuplicateInvestor { .. }
            | FoliotrackError::Asset(_) => 3,
            FoliotrackError::Trade(_) => 4,
            FoliotrackError::AssetNotFound { .. } | FoliotrackError::InvestorNotFound { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
