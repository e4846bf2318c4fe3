//! Catalog loading from program source files
//!
//! Each program has one `;`-delimited text file with a header row. Loading is
//! a one-time, blocking step run before the service accepts requests.
//!
//! Failure policy:
//! - missing file: the program is skipped and absent from the catalog
//! - unreadable file or header without a required column: that source fails,
//!   the other programs still load
//! - bad row (wrong field count, invalid UTF-8, empty episode number,
//!   non-integer year/month): the row is skipped and recorded

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, error, info, warn};

use super::model::{Episode, RawEpisode, RowError, RowIssue};
use super::{Catalog, CatalogBuilder};
use crate::{Error, Result};

/// Field separator of the program source files
const DELIMITER: u8 = b';';

/// Binds a source file name to the program it contains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramSource {
    pub file_name: &'static str,
    pub program: &'static str,
}

/// Known programs, in catalog order
pub const PROGRAM_SOURCES: &[ProgramSource] = &[
    ProgramSource {
        file_name: "6x3_all.csv",
        program: "6x3",
    },
    ProgramSource {
        file_name: "Discopolis_all.csv",
        program: "Discopolis",
    },
    ProgramSource {
        file_name: "Musica_y_significado_all.csv",
        program: "Música y Significado",
    },
];

/// Episodes parsed from one source plus the rows that were skipped
#[derive(Debug, Clone, Default)]
pub struct ParsedSource {
    pub episodes: Vec<Episode>,
    pub skipped: Vec<RowError>,
}

/// What happened to one configured source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    Loaded {
        episodes: usize,
        skipped: Vec<RowError>,
    },
    Missing,
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct SourceReport {
    pub program: String,
    pub path: PathBuf,
    pub outcome: SourceOutcome,
}

/// Per-source outcomes of a catalog load, in configuration order
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceReport>,
}

impl LoadReport {
    /// Programs whose source loaded (possibly with skipped rows)
    pub fn loaded_programs(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .filter(|s| matches!(s.outcome, SourceOutcome::Loaded { .. }))
            .map(|s| s.program.as_str())
    }

    pub fn total_episodes(&self) -> usize {
        self.sources
            .iter()
            .map(|s| match &s.outcome {
                SourceOutcome::Loaded { episodes, .. } => *episodes,
                _ => 0,
            })
            .sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.sources
            .iter()
            .map(|s| match &s.outcome {
                SourceOutcome::Loaded { skipped, .. } => skipped.len(),
                _ => 0,
            })
            .sum()
    }

    pub fn outcome_for(&self, program: &str) -> Option<&SourceOutcome> {
        self.sources
            .iter()
            .find(|s| s.program == program)
            .map(|s| &s.outcome)
    }
}

/// Loads the configured program sources from a data directory
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    data_dir: PathBuf,
    sources: &'static [ProgramSource],
}

impl CatalogLoader {
    /// Loader for the built-in [`PROGRAM_SOURCES`]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self::with_sources(data_dir, PROGRAM_SOURCES)
    }

    pub fn with_sources(data_dir: impl Into<PathBuf>, sources: &'static [ProgramSource]) -> Self {
        Self {
            data_dir: data_dir.into(),
            sources,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load every source; never fails as a whole
    pub fn load(&self) -> (Catalog, LoadReport) {
        let mut builder = CatalogBuilder::new();
        let mut report = LoadReport::default();

        for source in self.sources {
            let path = self.data_dir.join(source.file_name);
            let outcome = match load_file(source.program, &path) {
                Ok(None) => {
                    warn!(
                        "Source for '{}' not found at {}, program will be unavailable",
                        source.program,
                        path.display()
                    );
                    SourceOutcome::Missing
                }
                Ok(Some(parsed)) => {
                    for row in &parsed.skipped {
                        warn!("Skipped row in {}: {}", path.display(), row);
                    }
                    info!(
                        "Loaded {} episodes for '{}' ({} rows skipped)",
                        parsed.episodes.len(),
                        source.program,
                        parsed.skipped.len()
                    );
                    let episodes = parsed.episodes.len();
                    builder = builder.program(source.program, parsed.episodes);
                    SourceOutcome::Loaded {
                        episodes,
                        skipped: parsed.skipped,
                    }
                }
                Err(e) => {
                    error!("Failed to load '{}' from {}: {}", source.program, path.display(), e);
                    SourceOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };

            report.sources.push(SourceReport {
                program: source.program.to_string(),
                path,
                outcome,
            });
        }

        (builder.build(), report)
    }
}

/// `Ok(None)` when the file does not exist
fn load_file(program: &str, path: &Path) -> Result<Option<ParsedSource>> {
    if !path.exists() {
        return Ok(None);
    }
    debug!("Reading {}", path.display());
    let file = File::open(path)?;
    parse_source(program, file).map(Some)
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    episode_number: usize,
    title: usize,
    url: usize,
    year: usize,
    month: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str, aliases: &[&str]| -> Result<usize> {
            headers
                .iter()
                .position(|header| {
                    let header = normalize_header(header);
                    aliases.iter().any(|alias| header == *alias)
                })
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        Ok(Self {
            episode_number: find(
                "Episodio n",
                &["episodio n", "episodio", "episode_number", "episode"],
            )?,
            title: find("Titulo", &["titulo", "título", "title"])?,
            url: find("URL", &["url"])?,
            year: find("Año", &["año", "anio", "ano", "year"])?,
            month: find("Mes", &["mes", "month"])?,
        })
    }

    fn raw<'r>(&self, record: &'r StringRecord) -> RawEpisode<'r> {
        let cell = |i: usize| record.get(i).unwrap_or("");
        RawEpisode {
            episode_number: cell(self.episode_number),
            title: cell(self.title),
            url: cell(self.url),
            year: cell(self.year),
            month: cell(self.month),
        }
    }
}

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

/// Parse one `;`-delimited source, tagging every episode with `program`
///
/// Fails only when the header row is unusable or the reader hits an I/O
/// error; bad rows are skipped and listed in [`ParsedSource::skipped`].
pub fn parse_source<R: Read>(program: &str, reader: R) -> Result<ParsedSource> {
    let mut reader = ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(false)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(reader.headers()?)?;
    let mut parsed = ParsedSource::default();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e.into());
                }
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                parsed.skipped.push(RowError {
                    line,
                    issue: RowIssue::Malformed(e.to_string()),
                });
                continue;
            }
        };

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        match Episode::from_raw(program, &columns.raw(&record)) {
            Ok(episode) => parsed.episodes.push(episode),
            Err(issue) => parsed.skipped.push(RowError { line, issue }),
        }
    }

    Ok(parsed)
}
