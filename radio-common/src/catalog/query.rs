//! Read-only queries over the catalog
//!
//! Every operation is a linear scan over the selected scope and returns owned
//! copies of the matching episodes in catalog order. "Not found" is always an
//! empty result: an unknown program name selects an empty scope.

use super::{Catalog, Episode};

/// Year (and optionally month and program) filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub year: i32,
    pub month: Option<i32>,
    pub program: Option<String>,
}

impl DateFilter {
    pub fn year(year: i32) -> Self {
        Self {
            year,
            month: None,
            program: None,
        }
    }

    pub fn month(mut self, month: i32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn program(mut self, program: Option<&str>) -> Self {
        self.program = program.map(str::to_string);
        self
    }

    /// Year equality, then month equality when a month is set
    fn matches(&self, episode: &Episode) -> bool {
        episode.year == self.year && self.month.map_or(true, |month| episode.month == month)
    }
}

/// Query engine borrowing a frozen [`Catalog`]
#[derive(Debug, Clone, Copy)]
pub struct QueryEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> QueryEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// All episodes, optionally restricted to one program
    pub fn list_all(&self, program: Option<&str>) -> Vec<Episode> {
        self.scope(program).cloned().collect()
    }

    /// Episodes broadcast in `year`, optionally restricted to one program
    pub fn filter_by_year(&self, year: i32, program: Option<&str>) -> Vec<Episode> {
        self.filter_by_date(&DateFilter::year(year).program(program))
    }

    /// Conjunction of program scope, year and optional month
    pub fn filter_by_date(&self, filter: &DateFilter) -> Vec<Episode> {
        self.scope(filter.program.as_deref())
            .filter(|episode| filter.matches(episode))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search on titles across every program
    ///
    /// No minimum term length is enforced here; the HTTP layer rejects terms
    /// shorter than its minimum before calling in. Blank titles never match.
    pub fn search_by_title(&self, term: &str) -> Vec<Episode> {
        let needle = fold_case(term);
        self.catalog
            .iter()
            .filter(|episode| {
                !episode.title.is_empty() && fold_case(&episode.title).contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn scope(&self, program: Option<&str>) -> impl Iterator<Item = &'a Episode> {
        let catalog = self.catalog;
        let shelves: Vec<&'a [Episode]> = match program {
            Some(name) => catalog.episodes_for(name).into_iter().collect(),
            None => catalog.shelves().collect(),
        };
        shelves.into_iter().flatten()
    }
}

/// Context-free lowercase used for title matching
///
/// `str::to_lowercase` turns a word-final `Σ` into `ς`, so the same word can
/// lower to different strings depending on where it ends. Lowering char by
/// char and merging `ς` into `σ` gives one form per letter.
fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}
