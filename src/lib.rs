//! Phylokit is a library to read, annotate and draw phylogenetic trees
//! as produced by BEAST, FastTree, RAxML and treesub.
//!
//! Core functionality provided:
//! - Newick: Parse single Newick strings, including `[&...]` annotations,
//!   polytomies and labelled internal vertices; write trees back.
//! - NEXUS: Read a dated tree from BEAST/FigTree NEXUS files (with
//!   `translate` blocks), normalise treesub output into a minimal NEXUS file
//!   plus a substitution table, and write minimal NEXUS files.
//! - Dates: Convert calendar dates of variable granularity to decimal years
//!   and lay trees out in absolute time.
//! - Traits: Assign metadata from tables to leaves and propagate shared
//!   values to internal vertices.
//! - Distances: Patristic distances and labelling of tips by their nearest
//!   reference tip.
//! - Drawing: Qualitative colour palettes and a quick PNG phylogram.
//! - Tree model: [Tree](crate::model::Tree) uses the arena pattern, so no
//!   direct vertex references are stored, only vertex indices. See
//!   [crate::model] for more details.
//!
//! # Usage patterns
//! 1. Quick functions with default settings, see below and the
//!    [newick] and [nexus] modules.
//! 2. Configure a reader, e.g. [BeastReader](crate::nexus::BeastReader) or
//!    [TreesubConfig](crate::nexus::TreesubConfig), for full control.
//!
//! ## Example
//! ```no_run
//! use phylokit::read_beast_tree;
//! use phylokit::traits::{assign_internal_traits, assign_leaf_traits, MetadataTable};
//!
//! let mut tree = read_beast_tree("mcc.tree")?;
//! let table = MetadataTable::from_path("metadata.csv", b',')?;
//! assign_leaf_traits(&mut tree, &table, "strain", "host", "host")?;
//! assign_internal_traits(&mut tree, "host");
//! println!("Root date: {:?}", tree.root().absolute_time());
//! # Ok::<(), phylokit::PhyloError>(())
//! ```
//!
//! ## Example Reader Configuration
//! ```no_run
//! use phylokit::dates::DateFormat;
//! use phylokit::nexus::BeastReader;
//!
//! let tree = BeastReader::default()
//!     .with_date_delimiter("|")
//!     .with_date_position(2)
//!     .with_date_format(DateFormat::default().with_format("%d/%m/%Y").with_splitter("/"))
//!     .with_sort_descending(true)
//!     .read("annotated.tree")?;
//! # Ok::<(), phylokit::PhyloError>(())
//! ```

pub mod dates;
pub mod distance;
pub mod error;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod palette;
pub mod parser;
pub mod render;
pub mod traits;

pub use crate::error::{LookupAmbiguity, PhyloError};

use crate::model::Tree;
use crate::nexus::{SubstitutionTable, TreesubConfig};
use crate::parser::ParsingError;
use std::path::Path;

// ============================================================================
// Quick NEXUS API
// ============================================================================
/// Reads a dated tree from a BEAST/FigTree NEXUS file using default settings.
///
/// See [`nexus::read_beast_tree`] for full documentation.
pub fn read_beast_tree<P: AsRef<Path>>(path: P) -> Result<Tree, PhyloError> {
    nexus::read_beast_tree(path)
}

/// Converts treesub output at `input` into a minimal NEXUS file at `output`
/// using default settings, returning the substitution table.
///
/// See [`nexus::treesub_to_nexus`] for full documentation.
pub fn treesub_to_nexus<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<SubstitutionTable, PhyloError> {
    nexus::treesub_to_nexus(input, output, &TreesubConfig::default())
}

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parses a Newick string using default settings.
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    newick::parse_str(newick)
}

/// Reads a file holding a single Newick tree (FastTree, RAxML) and lays it
/// out for plotting, with branches sorted in descending order.
///
/// See [`newick::read_tree`] for full documentation of this convenience function.
pub fn read_newick_tree<P: AsRef<Path>>(path: P) -> Result<Tree, ParsingError> {
    newick::read_tree(path, true)
}
