//! Newick format writing for [Tree]s.

use crate::model::annotation::{AnnotationValue, quote_text};
use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::{BranchLength, Vertex};
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Branch lengths take about 20 chars each (e.g., ":0.009529961339106089")
const BRANCH_LENGTH_CHARS: usize = 20;

/// Style for serializing a tree to Newick format,
/// controlling which vertex data ends up in `[&...]` blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NewickStyle {
    /// Names and branch lengths only
    Plain,
    /// Additionally write [Traits](crate::model::Traits) as `[&key="value",...]`
    WithTraits,
    /// Additionally write the parsed [Annotations](crate::model::Annotations)
    WithAnnotations,
}

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// # Arguments
/// * `path` - The file to create or overwrite
/// * `trees` - Trees to write
/// * `style` - The [NewickStyle] to use for all trees
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file<P: AsRef<Path>>(path: P, trees: &[Tree], style: NewickStyle) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        writer.write_all(to_newick(tree, style).as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// Names are escaped where necessary (see [escape_label]); the branch length
/// of the root is omitted.
///
/// # Example
/// ```
/// use phylokit::model::{BranchLength, Tree};
/// use phylokit::newick::{to_newick, NewickStyle};
///
/// let mut tree = Tree::new();
/// let a = tree.add_leaf(Some("A".to_string()), Some(BranchLength::new(1.0)));
/// let b = tree.add_leaf(Some("B c".to_string()), Some(BranchLength::new(2.0)));
/// tree.add_root(vec![a, b]);
/// tree[a].set_trait("host", "bat");
///
/// assert_eq!(to_newick(&tree, NewickStyle::Plain), "(A:1,B_c:2);");
/// assert_eq!(to_newick(&tree, NewickStyle::WithTraits), "(A[&host=\"bat\"]:1,B_c:2);");
/// ```
pub fn to_newick(tree: &Tree, style: NewickStyle) -> String {
    if !tree.is_root_set() {
        return String::new();
    }

    let label_capacity: usize = tree.vertices().filter_map(|v| v.name()).map(str::len).sum();
    let estimated_capacity = label_capacity + tree.num_vertices() * (BRANCH_LENGTH_CHARS + 2);
    let mut newick = String::with_capacity(estimated_capacity);

    build_newick(tree, &mut newick, tree.root_index(), style);
    newick.push(';');
    newick
}

/// Recursive helper for building the Newick string
fn build_newick(tree: &Tree, newick: &mut String, index: VertexIndex, style: NewickStyle) {
    let vertex = &tree[index];

    if !vertex.is_leaf() {
        newick.push('(');
        for (i, &child) in vertex.children().iter().enumerate() {
            if i > 0 {
                newick.push(',');
            }
            build_newick(tree, newick, child, style);
        }
        newick.push(')');
    }

    if let Some(name) = vertex.name() {
        newick.push_str(&escape_label(name));
    }
    build_newick_annotations(newick, vertex, style);
    if !vertex.is_root() {
        build_newick_branch_length(newick, vertex.branch_length());
    }
}

/// Helper for adding branch lengths
fn build_newick_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
    if let Some(branch_length) = branch_length {
        newick.push(':');
        newick.push_str(&(*branch_length).to_string());
    }
}

/// Helper for adding a `[&...]` block depending on style
fn build_newick_annotations(newick: &mut String, vertex: &Vertex, style: NewickStyle) {
    let entries: Vec<String> = match style {
        NewickStyle::Plain => return,
        NewickStyle::WithTraits => vertex
            .traits()
            .iter()
            .map(|(key, value)| format!("{key}={}", quote_text(value)))
            .collect(),
        NewickStyle::WithAnnotations => vertex
            .annotations()
            .iter()
            .map(|(key, value)| match value {
                AnnotationValue::Flag => key.clone(),
                _ => format!("{key}={value}"),
            })
            .collect(),
    };

    if !entries.is_empty() {
        newick.push_str("[&");
        newick.push_str(&entries.join(","));
        newick.push(']');
    }
}
