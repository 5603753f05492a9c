//! Crate-level error type.
//!
//! Parsing of tree strings reports [ParsingError] and date conversion
//! [DateError]; everything reading files, tables, or drawing images reports
//! [PhyloError], which wraps those.

use crate::dates::DateError;
use crate::parser::ParsingError;
use std::fmt;
use thiserror::Error;

/// Errors of the readers, table operations and renderer.
#[derive(Debug, Error)]
pub enum PhyloError {
    #[error(transparent)]
    Parsing(#[from] ParsingError),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("No tree found in {0}")]
    MissingTree(String),
    #[error("No tip dates found")]
    NoTipDates,
    #[error("Column '{0}' not found in table")]
    MissingColumn(String),
    #[error("Palette has {available} colours but {requested} values need one")]
    PaletteExhausted { requested: usize, available: usize },
    #[error("Unknown palette '{0}'")]
    UnknownPalette(String),
    #[error("Tip '{0}' not found in tree")]
    UnknownTip(String),
}

/// A tip whose lookup in a metadata table did not give exactly one match.
///
/// Not an error: the tip gets the placeholder value and the lookup is
/// reported back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupAmbiguity {
    /// Tip name that was looked up
    pub name: String,
    /// Number of matching rows (0 or more than 1)
    pub matches: usize,
}

impl fmt::Display for LookupAmbiguity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.matches == 0 {
            write!(f, "{} not found in table", self.name)
        } else {
            write!(f, "{} found {} times in table", self.name, self.matches)
        }
    }
}
