use thiserror::Error;

/// Revert category for a failed claim submission.
///
/// Classification is by message inspection and never replaces the
/// underlying error text, which is carried alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    InvalidProof,
    AlreadyClaimed,
    CampaignClosed,
    Unauthorized,
    Unknown,
}

impl std::fmt::Display for SubmissionErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionErrorKind::InvalidProof => write!(f, "invalid proof"),
            SubmissionErrorKind::AlreadyClaimed => write!(f, "already claimed"),
            SubmissionErrorKind::CampaignClosed => write!(f, "campaign closed"),
            SubmissionErrorKind::Unauthorized => write!(f, "unauthorized"),
            SubmissionErrorKind::Unknown => write!(f, "unknown revert"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Validation failed for user {user}, campaign {campaign_id} (chain {chain_id}): {reason}")]
    Validation {
        user: String,
        campaign_id: String,
        chain_id: u64,
        reason: String,
    },

    #[error("Argument assembly error: {0}")]
    ArgumentAssembly(String),

    #[error("Campaign not found: {0}")]
    CampaignNotFound(String),

    #[error("Submission failed ({kind}): {message}")]
    Submission {
        kind: SubmissionErrorKind,
        message: String,
    },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ClaimError>;
