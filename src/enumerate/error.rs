use thiserror::Error;

/// The target could not be reached or never sent its banner.
#[derive(Debug, Error)]
#[error("connection to {target} failed: {source}")]
pub struct ConnectionError {
    pub target: String,
    #[source]
    pub source: std::io::Error,
}

impl ConnectionError {
    pub(crate) fn new(target: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            target: target.into(),
            source,
        }
    }
}

/// The `MAIL FROM` / `RCPT TO` exchange failed for one candidate.
#[derive(Debug, Error)]
#[error("probe for '{candidate}' failed: {source}")]
pub struct ProbeError {
    pub candidate: String,
    #[source]
    pub source: std::io::Error,
}

impl ProbeError {
    pub(crate) fn new(candidate: &str, source: std::io::Error) -> Self {
        Self {
            candidate: candidate.to_string(),
            source,
        }
    }
}

/// Errors that end an enumeration run.
#[derive(Debug, Error)]
pub enum EnumError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}
