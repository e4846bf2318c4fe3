//! Episode record and row validation

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One broadcast episode of a radio program
///
/// Serialized as a flat record:
/// `{program, episodeNumber, title, url, year, month}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Program name, set once when the episode is loaded
    pub program: String,
    /// Episode identifier as it appears in the source (may be alphanumeric)
    pub episode_number: String,
    /// Free-text title; empty when the source cell was blank
    pub title: String,
    /// Link to the episode resource
    pub url: String,
    pub year: i32,
    /// Month of broadcast. Not range-checked: out-of-range values are kept as-is.
    pub month: i32,
}

impl Episode {
    pub fn new(
        program: impl Into<String>,
        episode_number: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        year: i32,
        month: i32,
    ) -> Self {
        Self {
            program: program.into(),
            episode_number: episode_number.into(),
            title: title.into(),
            url: url.into(),
            year,
            month,
        }
    }

    /// Build a typed episode from the raw cells of one source row
    ///
    /// Title and URL may be blank. The episode number must be present and
    /// year/month must be integers (integral floats like `2010.0` are accepted).
    pub fn from_raw(program: &str, raw: &RawEpisode<'_>) -> Result<Self, RowIssue> {
        let episode_number = raw.episode_number.trim();
        if episode_number.is_empty() {
            return Err(RowIssue::EmptyEpisodeNumber);
        }

        let year = parse_integer(raw.year).ok_or_else(|| RowIssue::InvalidYear(raw.year.to_string()))?;
        let month =
            parse_integer(raw.month).ok_or_else(|| RowIssue::InvalidMonth(raw.month.to_string()))?;

        Ok(Self {
            program: program.to_string(),
            episode_number: episode_number.to_string(),
            title: raw.title.trim().to_string(),
            url: raw.url.trim().to_string(),
            year,
            month,
        })
    }
}

/// Borrowed, untyped cells of one source row
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEpisode<'a> {
    pub episode_number: &'a str,
    pub title: &'a str,
    pub url: &'a str,
    pub year: &'a str,
    pub month: &'a str,
}

/// Why a single row could not become an [`Episode`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    #[error("empty episode number")]
    EmptyEpisodeNumber,

    #[error("year is not an integer: {0:?}")]
    InvalidYear(String),

    #[error("month is not an integer: {0:?}")]
    InvalidMonth(String),

    /// Row shape defect reported by the tabular reader
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A skipped row, kept for the load report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line number in the source file (0 when unknown)
    pub line: u64,
    pub issue: RowIssue,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.issue)
    }
}

fn parse_integer(cell: &str) -> Option<i32> {
    let cell = cell.trim();
    if let Ok(value) = cell.parse::<i32>() {
        return Some(value);
    }

    // Spreadsheet exports sometimes write whole numbers as floats
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
    {
        Some(value as i32)
    } else {
        None
    }
}
