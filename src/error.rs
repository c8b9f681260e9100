// Classified failures of a copy run and how they are reported

use thiserror::Error;

use crate::config::ConfigError;
use crate::copy::Step;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every failure a run can end with.
///
/// Anything that escapes classification becomes [`CopyError::Unexpected`].
#[derive(Debug, Error)]
pub(crate) enum CopyError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("Failed to authenticate to {registry}")]
    Authentication {
        registry: String,
        #[source]
        source: BoxError,
    },

    #[error("Failed to {step} image {reference}")]
    Transfer {
        step: Step,
        reference: String,
        #[source]
        source: BoxError,
    },

    #[error("Unexpected error")]
    Unexpected(#[source] BoxError),
}

impl CopyError {
    pub(crate) fn authentication(registry: &str, source: anyhow::Error) -> Self {
        CopyError::Authentication {
            registry: registry.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn transfer(step: Step, reference: impl Into<String>, source: anyhow::Error) -> Self {
        CopyError::Transfer {
            step,
            reference: reference.into(),
            source: source.into(),
        }
    }

    /// Stage the run failed in, used as the leading word of the report
    pub(crate) fn stage(&self) -> &'static str {
        match self {
            CopyError::Configuration(_) => "configuration",
            CopyError::Authentication { .. } => "authentication",
            CopyError::Transfer { .. } => "transfer",
            CopyError::Unexpected(_) => "unexpected",
        }
    }

    /// Top-level message followed by each wrapped cause
    pub(crate) fn chain(&self) -> Vec<String> {
        let mut messages = vec![self.to_string()];
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            messages.push(err.to_string());
            cause = err.source();
        }
        messages
    }

    /// Print the error chain to stderr
    pub(crate) fn report(&self) {
        let chain = self.chain();
        eprintln!("❌ [{}] {}", self.stage(), chain[0]);
        for cause in &chain[1..] {
            eprintln!("   Caused by: {}", cause);
        }
    }
}

impl From<anyhow::Error> for CopyError {
    fn from(err: anyhow::Error) -> Self {
        CopyError::Unexpected(err.into())
    }
}
