use thiserror::Error;

/// Failures a compliance collaborator may report.
#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Compliance service unavailable: {0}")]
    Unavailable(String),

    #[error("Compliance service rejected the submission: {reason}")]
    Rejected { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[derive(Error, Debug)]
pub enum OnboardingError {
    #[error("Submission failed: {0}")]
    SubmissionFailed(#[from] ComplianceError),

    #[error("Submission task did not finish: {0}")]
    SubmissionTaskAborted(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type OnboardingResult<T> = Result<T, OnboardingError>;
