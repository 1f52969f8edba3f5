//! Error types for the clustering engine

/// Errors returned by [`crate::model::cluster`] and [`crate::model::KMeans::fit`].
///
/// Every variant is raised before the first iteration runs, so a failed call
/// never yields a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClusterError {
    /// The points, group count, iteration cap or tolerance cannot be clustered.
    ///
    /// Resolution: supply a non-empty point set, `k >= 1`, `max_iterations >= 1`
    /// and a finite, non-negative tolerance.
    #[error("Invalid clustering input: {0}")]
    InvalidInput(String),
}

impl ClusterError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// True for every input-validation failure.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
