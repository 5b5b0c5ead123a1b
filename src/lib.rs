#![forbid(unsafe_code)]
//! smtp_enum — SMTP recipient enumeration through `MAIL FROM` / `RCPT TO` probes.

pub mod enumerate;
pub use enumerate::{
    CandidateReport, ClassifyMode, ConnectionError, EnumError, EnumObserver, EnumOptions,
    Enumerator, ProbeError, ReplyMode, RunSummary, SmtpSession, Verdict, classify_reply,
    probe_candidate,
};

pub mod wordlist;
pub use wordlist::{WordlistError, load_candidates, parse_candidates};
