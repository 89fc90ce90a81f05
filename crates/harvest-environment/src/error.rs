//! Error types for the `harvest-environment` crate.
//!
//! A [`SourceError`] never escapes the aggregator: every variant is
//! recovered by synthetic substitution. The variants exist so the fallback
//! can be logged with a precise cause.

use harvest_types::EnvironmentDomain;

/// A failure to obtain a record from an external source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The source has no endpoint or credentials configured.
    #[error("{domain} source is not configured")]
    NotConfigured {
        /// The affected domain.
        domain: EnvironmentDomain,
    },

    /// The request could not be sent or the body could not be read.
    #[error("{domain} request failed: {source}")]
    Http {
        /// The affected domain.
        domain: EnvironmentDomain,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The source answered with a non-success status.
    #[error("{domain} source returned status {status}")]
    Status {
        /// The affected domain.
        domain: EnvironmentDomain,
        /// The HTTP status code.
        status: u16,
    },

    /// The payload did not have the expected shape or values.
    #[error("{domain} payload could not be decoded: {reason}")]
    Decode {
        /// The affected domain.
        domain: EnvironmentDomain,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The source did not answer within the per-call deadline.
    #[error("{domain} source timed out after {limit_ms}ms")]
    Timeout {
        /// The affected domain.
        domain: EnvironmentDomain,
        /// The deadline in milliseconds.
        limit_ms: u64,
    },

    /// Reverse geocoding failed. Only the place name is affected.
    #[error("reverse geocoding failed: {reason}")]
    Geocoding {
        /// Description of the failure.
        reason: String,
    },

    /// The fetch task panicked or was cancelled.
    #[error("{domain} fetch task failed: {reason}")]
    TaskFailed {
        /// The affected domain.
        domain: EnvironmentDomain,
        /// Description of the task failure.
        reason: String,
    },
}

impl SourceError {
    /// The domain the failure belongs to. Geocoding failures have none.
    pub const fn domain(&self) -> Option<EnvironmentDomain> {
        match self {
            Self::NotConfigured { domain }
            | Self::Http { domain, .. }
            | Self::Status { domain, .. }
            | Self::Decode { domain, .. }
            | Self::Timeout { domain, .. }
            | Self::TaskFailed { domain, .. } => Some(*domain),
            Self::Geocoding { .. } => None,
        }
    }
}
