//! NEXUS dialects of common phylogenetics tools.
//!
//! This module provides:
//! - [BeastReader] - reads a single dated tree from BEAST/FigTree NEXUS files,
//!   including `translate` commands, and lays it out in absolute time
//! - [normalize_treesub] / [treesub_to_nexus] - turn treesub output into a
//!   minimal NEXUS file plus a [SubstitutionTable]
//! - [NexusWriter] / [write_minimal_nexus] - write minimal NEXUS files
//!
//! # Format
//! NEXUS files handled here are processed line by line, so each command is
//! expected on its own line, as the tools above write them:
//! ```text
//! #NEXUS
//! begin taxa;
//!     dimensions ntax=3;
//!     taxlabels
//!         'A_2020-01-01'
//!         ...
//! ;
//! end;
//! begin trees;
//!     translate
//!         1 'A_2020-01-01',
//!         ...
//! ;
//! tree TREE1 = [&R] ((1:0.1,2:0.2):0.1,3:0.3);
//! end;
//! ```
//! Tree strings themselves are handed to the [Newick parser](crate::newick).

mod beast;
mod defs;
pub mod treesub;
mod writer;

pub use self::beast::{BeastReader, DEFAULT_DATE_DELIMITER, DEFAULT_DATE_POSITION};
pub use self::treesub::{
    SubstitutionRow, SubstitutionTable, TreesubConfig, TreesubOutput, normalize_treesub, treesub_to_nexus,
};
pub use self::writer::{NexusWriter, write_minimal_nexus};

use crate::error::PhyloError;
use crate::model::Tree;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (public)
// ============================================================================
/// Reads a dated tree from a BEAST/FigTree NEXUS file with default settings.
///
/// Dates are taken from the last `_`-separated field of each tip name. See
/// [BeastReader] for configuration.
///
/// # Errors
/// Returns an error if the file cannot be read, holds no valid tree, or tip
/// dates cannot be read.
pub fn read_beast_tree<P: AsRef<Path>>(path: P) -> Result<Tree, PhyloError> {
    BeastReader::default().read(path)
}
