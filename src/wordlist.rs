//! Candidate wordlist loading: one username per line, blank lines skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordlistError {
    #[error("cannot open wordlist {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read wordlist line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Read candidates from a file on disk.
pub fn load_candidates(path: impl AsRef<Path>) -> Result<Vec<String>, WordlistError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| WordlistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let candidates = parse_candidates(BufReader::new(file))?;
    tracing::debug!(path = %path.display(), count = candidates.len(), "wordlist loaded");
    Ok(candidates)
}

/// Trim each line and keep the non-empty ones, preserving order and
/// duplicates.
pub fn parse_candidates<R: BufRead>(reader: R) -> Result<Vec<String>, WordlistError> {
    let mut candidates = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| WordlistError::Read {
            line: idx + 1,
            source,
        })?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            candidates.push(trimmed.to_string());
        }
    }
    Ok(candidates)
}
