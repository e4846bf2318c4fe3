//! In-memory episode catalog
//!
//! The catalog maps each program name to its episodes. It is assembled once
//! through [`CatalogBuilder`] and has no mutation API afterwards, so it can be
//! shared across request handlers behind an `Arc` without locking.
//!
//! Program order is the order in which programs were added (configuration
//! order when built by the loader). Episode order within a program follows
//! the source file.

use std::collections::HashMap;

mod loader;
mod model;
mod query;

pub use loader::{
    parse_source, CatalogLoader, LoadReport, ParsedSource, ProgramSource, SourceOutcome,
    SourceReport, PROGRAM_SOURCES,
};
pub use model::{Episode, RawEpisode, RowError, RowIssue};
pub use query::{DateFilter, QueryEngine};

/// Episodes of a single program, in source order
#[derive(Debug, Clone)]
struct Shelf {
    program: String,
    episodes: Vec<Episode>,
}

/// Immutable mapping from program name to its episodes
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    shelves: Vec<Shelf>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Program names in catalog order
    pub fn program_names(&self) -> impl Iterator<Item = &str> {
        self.shelves.iter().map(|shelf| shelf.program.as_str())
    }

    /// Episodes of one program, or `None` if the program is not loaded
    pub fn episodes_for(&self, program: &str) -> Option<&[Episode]> {
        self.index
            .get(program)
            .map(|&i| self.shelves[i].episodes.as_slice())
    }

    pub fn contains_program(&self, program: &str) -> bool {
        self.index.contains_key(program)
    }

    /// All episodes, program by program in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.shelves.iter().flat_map(|shelf| shelf.episodes.iter())
    }

    pub(crate) fn shelves(&self) -> impl Iterator<Item = &[Episode]> {
        self.shelves.iter().map(|shelf| shelf.episodes.as_slice())
    }

    /// Total number of episodes across all programs
    pub fn len(&self) -> usize {
        self.shelves.iter().map(|shelf| shelf.episodes.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn program_count(&self) -> usize {
        self.shelves.len()
    }
}

/// Assembles a [`Catalog`]; consumed by [`CatalogBuilder::build`]
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: Catalog,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program and its episodes
    ///
    /// Each episode is tagged with `program`. Adding a program that already
    /// exists appends to it and keeps its original position.
    pub fn program(
        mut self,
        program: impl Into<String>,
        episodes: impl IntoIterator<Item = Episode>,
    ) -> Self {
        let program = program.into();
        let i = self.shelf_index(&program);
        self.catalog.shelves[i]
            .episodes
            .extend(episodes.into_iter().map(|mut episode| {
                episode.program.clone_from(&program);
                episode
            }));
        self
    }

    /// File a single episode under its own program
    pub fn push(&mut self, episode: Episode) {
        let i = self.shelf_index(&episode.program);
        self.catalog.shelves[i].episodes.push(episode);
    }

    pub fn build(self) -> Catalog {
        self.catalog
    }

    fn shelf_index(&mut self, program: &str) -> usize {
        if let Some(&i) = self.catalog.index.get(program) {
            return i;
        }
        let i = self.catalog.shelves.len();
        self.catalog.shelves.push(Shelf {
            program: program.to_string(),
            episodes: Vec::new(),
        });
        self.catalog.index.insert(program.to_string(), i);
        i
    }
}
