use std::io::{self, Write};

use anyhow::{Result, bail};
use smtp_enum::{CandidateReport, EnumObserver, RunSummary, Verdict};

#[cfg_attr(
    not(all(feature = "with-serde", feature = "with-csv")),
    allow(dead_code)
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Ndjson,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "human" => Ok(Self::Human),
            #[cfg(feature = "with-serde")]
            "ndjson" => Ok(Self::Ndjson),
            #[cfg(not(feature = "with-serde"))]
            "ndjson" => bail!("format=ndjson requires the 'with-serde' feature"),
            #[cfg(feature = "with-csv")]
            "csv" => Ok(Self::Csv),
            #[cfg(not(feature = "with-csv"))]
            "csv" => bail!("format=csv requires the 'with-csv' feature"),
            other => bail!("unknown --format '{other}', use: human|ndjson|csv"),
        }
    }
}

/// Writes one block per candidate as soon as its verdict is known.
pub struct ConsoleReporter<W: Write> {
    format: OutputFormat,
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            error: None,
        }
    }

    pub fn finish(mut self, summary: &RunSummary) -> Result<()> {
        if self.format == OutputFormat::Human {
            self.emit(&[summary_line(summary)]);
        }
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    fn emit(&mut self, lines: &[String]) {
        if self.error.is_some() {
            return;
        }
        let result = lines
            .iter()
            .try_for_each(|line| writeln!(self.out, "{line}"))
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            tracing::error!(error = %err, "cannot write report");
            self.error = Some(err);
        }
    }
}

impl<W: Write> EnumObserver for ConsoleReporter<W> {
    fn on_connected(&mut self, candidate: &str, banner: &str) {
        match self.format {
            OutputFormat::Human => self.emit(&[banner_line(banner)]),
            _ => tracing::info!(candidate, banner = %banner.trim_end(), "connected"),
        }
    }

    fn on_report(&mut self, report: &CandidateReport) {
        let lines = match self.format {
            OutputFormat::Human => human_lines(report),
            OutputFormat::Ndjson => ndjson_lines(report),
            OutputFormat::Csv => csv_lines(report),
        };
        self.emit(&lines);
    }
}

pub fn banner_line(banner: &str) -> String {
    format!("Connected to SMTP server: {}", banner.trim())
}

pub fn human_lines(report: &CandidateReport) -> Vec<String> {
    let user = &report.candidate;
    if report.verdict == Verdict::ProbeFailed {
        let reason = report.error.as_deref().unwrap_or("unknown error");
        return vec![format!("Failed to check user: {user} ({reason})")];
    }
    let reply = report.trimmed_reply();
    let verdict_line = match report.verdict {
        Verdict::Exists => format!("User exists: {user}"),
        Verdict::DoesNotExist => format!("User does not exist: {user}"),
        _ => format!("Unexpected response for {user}: {reply}"),
    };
    vec![
        format!("Checking user: {user} - Response: {reply}"),
        verdict_line,
    ]
}

fn summary_line(summary: &RunSummary) -> String {
    if summary.cancelled {
        format!("Search cancelled after {} candidates.", summary.processed)
    } else {
        "Search finished!".to_string()
    }
}

#[cfg(feature = "with-serde")]
fn ndjson_lines(report: &CandidateReport) -> Vec<String> {
    match serde_json::to_string(report) {
        Ok(line) => vec![line],
        Err(err) => {
            tracing::error!(error = %err, candidate = %report.candidate, "cannot serialize report");
            Vec::new()
        }
    }
}

#[cfg(not(feature = "with-serde"))]
fn ndjson_lines(_: &CandidateReport) -> Vec<String> {
    Vec::new()
}

#[cfg(feature = "with-csv")]
fn csv_lines(report: &CandidateReport) -> Vec<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    let record = [
        report.candidate.as_str(),
        report.verdict.as_str(),
        report.trimmed_reply(),
        report.error.as_deref().unwrap_or(""),
    ];
    let written = wtr
        .write_record(record)
        .map_err(anyhow::Error::from)
        .and_then(|_| wtr.into_inner().map_err(|err| anyhow::anyhow!("{err}")));
    match written {
        Ok(data) => vec![String::from_utf8_lossy(&data).trim_end().to_string()],
        Err(err) => {
            tracing::error!(error = %err, candidate = %report.candidate, "cannot encode csv row");
            Vec::new()
        }
    }
}

#[cfg(not(feature = "with-csv"))]
fn csv_lines(_: &CandidateReport) -> Vec<String> {
    Vec::new()
}
