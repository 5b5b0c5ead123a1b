use std::fmt;

#[cfg(feature = "with-serde")]
use serde::Serialize;

/// Outcome of probing a single candidate.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The server accepted the recipient.
    Exists,
    /// The server rejected the recipient.
    DoesNotExist,
    /// The reply carried neither an acceptance nor a rejection marker.
    Unknown,
    /// The `MAIL FROM` / `RCPT TO` exchange itself failed.
    ProbeFailed,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::DoesNotExist => "does_not_exist",
            Self::Unknown => "unknown",
            Self::ProbeFailed => "probe_failed",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => f.write_str("Exists"),
            Self::DoesNotExist => f.write_str("DoesNotExist"),
            Self::Unknown => f.write_str("Unknown"),
            Self::ProbeFailed => f.write_str("ProbeFailed"),
        }
    }
}

/// Verdict for one candidate, emitted as soon as it is known.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateReport {
    pub candidate: String,
    pub verdict: Verdict,
    /// Raw `RCPT TO` reply, absent when the probe failed.
    pub reply: Option<String>,
    /// Human-readable probe failure.
    pub error: Option<String>,
}

impl CandidateReport {
    pub fn classified(candidate: &str, reply: String, verdict: Verdict) -> Self {
        Self {
            candidate: candidate.to_string(),
            verdict,
            reply: Some(reply),
            error: None,
        }
    }

    pub fn failed(candidate: &str, error: String) -> Self {
        Self {
            candidate: candidate.to_string(),
            verdict: Verdict::ProbeFailed,
            reply: None,
            error: Some(error),
        }
    }

    /// The reply with surrounding whitespace and CRLF removed.
    pub fn trimmed_reply(&self) -> &str {
        self.reply.as_deref().map(str::trim).unwrap_or("")
    }
}

/// Totals returned once the loop has walked the whole candidate sequence.
#[cfg_attr(feature = "with-serde", derive(Serialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub exists: usize,
    pub does_not_exist: usize,
    pub unknown: usize,
    pub probe_failed: usize,
    pub cancelled: bool,
}

impl RunSummary {
    pub(crate) fn record(&mut self, verdict: Verdict) {
        self.processed += 1;
        match verdict {
            Verdict::Exists => self.exists += 1,
            Verdict::DoesNotExist => self.does_not_exist += 1,
            Verdict::Unknown => self.unknown += 1,
            Verdict::ProbeFailed => self.probe_failed += 1,
        }
    }
}
