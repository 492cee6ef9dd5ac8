use thiserror::Error;

/// Failure taxonomy of the navigator core.
///
/// Only `DataUnavailable` leaves the navigator unusable; everything else is recoverable and leaves
/// state continuable.
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("artwork collection unavailable: {reason}")]
    DataUnavailable { reason: String },
    #[error("no artworks match '{term}'")]
    EmptyResult { term: String },
    #[error("failed to load image {reference}: {reason}")]
    ImageLoadFailure { reference: String, reason: String },
    #[error("viewpoint index {index} out of range (cycle has {len} poses)")]
    OutOfRange { index: usize, len: usize },
    #[error("viewpoint cycle requires at least one pose")]
    EmptyViewpoints,
    #[error("unknown sort key '{0}'")]
    InvalidSortKey(String),
}

impl NavigatorError {
    pub fn data_unavailable(err: &anyhow::Error) -> Self {
        NavigatorError::DataUnavailable { reason: format!("{err:#}") }
    }

    /// Whether the user should be told about this failure (as opposed to an internal contract breach).
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            NavigatorError::DataUnavailable { .. }
                | NavigatorError::EmptyResult { .. }
                | NavigatorError::ImageLoadFailure { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_is_internal() {
        let err = NavigatorError::OutOfRange { index: 12, len: 10 };
        assert!(!err.is_user_facing());
        assert!(err.to_string().contains("12"));
    }

    #[test]
    fn data_unavailable_keeps_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("Failed to read collection");
        let err = NavigatorError::data_unavailable(&inner);
        let text = err.to_string();
        assert!(text.contains("Failed to read collection"));
        assert!(text.contains("connection refused"));
        assert!(err.is_user_facing());
    }
}
