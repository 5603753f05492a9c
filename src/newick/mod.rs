//! Newick format parser and writer for phylogenetic trees.
//!
//! This module provides [`NewickParser`] to parse Newick strings into a
//! [`Tree`], including the `[&...]` annotations written by BEAST, FigTree
//! and treesub, and a writer to turn trees back into Newick strings.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single tree string, starting at its first `(`
//! * [`read_tree`] - reads a file holding a single tree string and lays it out
//!   for plotting
//! * [`to_newick`] / [`write_newick_file`] - write trees
//!
//! # Full API
//! For more control, configure a [`NewickParser`] and provide a [`ByteParser`]:
//! * [`NewickParser::parse_tree`] - parse a single tree
//!
//! # Format
//! See [`NewickParser`] for the grammar. Vertices may have any number of
//! children and internal vertices may be labelled, as in FastTree and RAxML
//! output.

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::Tree;
use crate::parser::byte_parser::ByteParser;
use crate::parser::{ParsingError, ParsingErrorType};
use log::debug;
use std::fs;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`Tree`].
///
/// Anything before the first `(` is ignored, so whole tree lines of NEXUS
/// files like `tree TREE1 = [&R] (A:1,B:1);` can be passed directly.
///
/// # Returns
/// * [`Tree`] - Tree parsed from the string
/// * [`ParsingError`] - If there is no `(` or the string is not valid Newick format
///
/// # Example
/// ```
/// use phylokit::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata:1,(Fratercula_arctica:0.5,Fratercula_corniculata:0.5):0.5);").unwrap();
/// assert_eq!(tree.num_leaves(), 3);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<Tree, ParsingError> {
    let newick = newick.as_ref();
    let start = newick
        .find('(')
        .ok_or_else(|| ParsingError::without_context(ParsingErrorType::MissingTreeString))?;

    let mut byte_parser = ByteParser::for_str(&newick[start..]);
    NewickParser::new().parse_tree(&mut byte_parser)
}

/// Reads a file holding a single Newick tree string and prepares it for plotting.
///
/// Computes heights and sorts branches (see [`Tree::sort_branches`]). Tip
/// names are taken from the tree string as is; no dates are read, so
/// absolute times remain unset.
///
/// # Arguments
/// * `path` - Path to the tree file, e.g. FastTree or RAxML output
/// * `sort_descending` - Direction for [`Tree::sort_branches`]
///
/// # Example
/// ```no_run
/// use phylokit::newick::read_tree;
///
/// let tree = read_tree("fasttree.nwk", false)?;
/// println!("{tree}");
/// # Ok::<(), phylokit::parser::ParsingError>(())
/// ```
pub fn read_tree<P: AsRef<Path>>(path: P, sort_descending: bool) -> Result<Tree, ParsingError> {
    let contents = fs::read_to_string(path.as_ref())?;
    let mut tree = parse_str(&contents)?;

    let height = tree.compute_heights();
    tree.sort_branches(sort_descending);
    debug!(
        "Read tree with {} leaves and height {height} from {}",
        tree.num_leaves(),
        path.as_ref().display()
    );

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_str_skips_prefix() {
        let tree = parse_str("tree TREE1 = [&R] ((1:0.1,2:0.1):0.2,3:0.3);").unwrap();
        assert_eq!(tree.num_leaves(), 3);
        assert!(tree.leaf_by_name("3").is_some());
    }

    #[test]
    fn test_parse_str_without_tree() {
        let err = parse_str("begin trees;").unwrap_err();
        assert_eq!(err.kind(), &ParsingErrorType::MissingTreeString);
    }
}
