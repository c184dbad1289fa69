use thiserror::Error;

/// Failure of one inspect or download request
///
/// The attached cause is for logs only; callers decide what to show based on
/// the variant alone.
#[derive(Debug, Error)]
pub enum GrabError {
    #[error("inspection failed: {0}")]
    InspectionFailed(String),
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),
}
