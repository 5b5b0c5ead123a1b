//! Sequential SMTP recipient enumeration.
//!
//! The public entry point is [`Enumerator::run`], which opens one
//! [`SmtpSession`] per candidate, submits `MAIL FROM` / `RCPT TO` through
//! [`probe_candidate`] and turns the reply into a [`Verdict`] with
//! [`classify_reply`].

mod classify;
mod error;
mod options;
mod probe;
mod runner;
mod session;
mod types;

pub use classify::classify_reply;
pub use error::{ConnectionError, EnumError, ProbeError};
pub use options::{ClassifyMode, EnumOptions, ReplyMode};
pub use probe::probe_candidate;
pub use runner::{EnumObserver, Enumerator};
pub use session::SmtpSession;
pub use types::{CandidateReport, RunSummary, Verdict};
