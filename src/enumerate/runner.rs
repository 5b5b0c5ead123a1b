use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, info, warn};

use crate::enumerate::classify::classify_reply;
use crate::enumerate::error::EnumError;
use crate::enumerate::options::EnumOptions;
use crate::enumerate::probe::probe_candidate;
use crate::enumerate::session::SmtpSession;
use crate::enumerate::types::{CandidateReport, RunSummary};

/// Receives progress as the loop walks the candidate sequence.
pub trait EnumObserver {
    fn on_connected(&mut self, _candidate: &str, _banner: &str) {}

    fn on_report(&mut self, report: &CandidateReport);
}

impl<F> EnumObserver for F
where
    F: FnMut(&CandidateReport),
{
    fn on_report(&mut self, report: &CandidateReport) {
        self(report)
    }
}

/// Sequential enumeration of candidates against one SMTP target.
pub struct Enumerator {
    target: String,
    options: EnumOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl Enumerator {
    pub fn new(target: impl Into<String>, options: EnumOptions) -> Self {
        Self {
            target: target.into(),
            options,
            cancel: None,
        }
    }

    /// Stop before the next candidate once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Probe every candidate in order, one session each.
    ///
    /// A connection failure aborts the whole run. Probe failures are
    /// reported as [`Verdict::ProbeFailed`](crate::enumerate::Verdict::ProbeFailed)
    /// and the loop moves on.
    pub fn run<S, O>(&self, candidates: &[S], observer: &mut O) -> Result<RunSummary, EnumError>
    where
        S: AsRef<str>,
        O: EnumObserver + ?Sized,
    {
        let mut summary = RunSummary::default();
        info!(
            target_host = %self.target,
            port = self.options.port,
            candidates = candidates.len(),
            "starting enumeration"
        );

        for candidate in candidates {
            let candidate = candidate.as_ref();
            if self.is_cancelled() {
                info!(processed = summary.processed, "enumeration cancelled");
                summary.cancelled = true;
                return Ok(summary);
            }

            let report = match self.check_candidate(candidate, observer) {
                Ok(report) => report,
                Err(err) => {
                    warn!(candidate, error = %err, "connection failed, aborting run");
                    return Err(err);
                }
            };
            observer.on_report(&report);
            summary.record(report.verdict);

            if !self.options.delay.is_zero() {
                debug!(delay = ?self.options.delay, "waiting before next candidate");
                thread::sleep(self.options.delay);
            }
        }

        info!(
            processed = summary.processed,
            exists = summary.exists,
            "enumeration finished"
        );
        Ok(summary)
    }

    fn check_candidate<O>(
        &self,
        candidate: &str,
        observer: &mut O,
    ) -> Result<CandidateReport, EnumError>
    where
        O: EnumObserver + ?Sized,
    {
        let mut session = SmtpSession::connect(&self.target, &self.options)?;
        observer.on_connected(candidate, session.banner());

        let report = match probe_candidate(&mut session, candidate, &self.options) {
            Ok(reply) => {
                let verdict = classify_reply(&reply, self.options.classify_mode);
                debug!(candidate, %verdict, "classified reply");
                CandidateReport::classified(candidate, reply, verdict)
            }
            Err(err) => {
                warn!(candidate, error = %err.source, "probe failed");
                CandidateReport::failed(candidate, err.source.to_string())
            }
        };
        session.close();
        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .map(|flag| flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

