//! # Radio Common Library
//!
//! Shared code for the radio episodes service:
//! - Episode record and the immutable in-memory catalog
//! - Catalog loading from `;`-delimited program files
//! - Read-only query engine (list, year/month filter, title search)
//! - Bootstrap configuration loading

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{Catalog, CatalogBuilder, DateFilter, Episode, QueryEngine};
pub use error::{Error, Result};
