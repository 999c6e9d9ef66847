//! Per-test wall-clock limit, from the command line or `TIMELIMIT.txt`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

pub const TIME_LIMIT_FILE: &str = "TIMELIMIT.txt";

#[derive(Debug, Error)]
pub enum TimeLimitError {
    #[error("invalid time limit `{value}`: expected a non-negative number of seconds")]
    Invalid { value: String },

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Convert seconds to a limit. `0` means unlimited.
///
/// ## Errors
/// - [`TimeLimitError::Invalid`] for negative, NaN, infinite or out-of-range values.
pub fn from_seconds(seconds: f64) -> Result<Option<Duration>, TimeLimitError> {
    if seconds == 0.0 {
        return Ok(None);
    }
    Duration::try_from_secs_f64(seconds)
        .map(Some)
        .map_err(|_| TimeLimitError::Invalid {
            value: seconds.to_string(),
        })
}

/// Parse the contents of a time limit file (surrounding whitespace allowed).
pub fn parse(text: &str) -> Result<Option<Duration>, TimeLimitError> {
    let value = text.trim();
    let seconds: f64 = value.parse().map_err(|_| TimeLimitError::Invalid {
        value: value.to_string(),
    })?;
    from_seconds(seconds)
}

/// Pick the effective limit: `cli` wins, then `TIMELIMIT.txt` in `test_dir`, then unlimited.
pub fn resolve(cli: Option<f64>, test_dir: &Path) -> Result<Option<Duration>, TimeLimitError> {
    if let Some(seconds) = cli {
        return from_seconds(seconds);
    }

    let path = test_dir.join(TIME_LIMIT_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|source| TimeLimitError::Io { path, source })?;
    parse(&text)
}
