//! Phylogenetic tree model.
//!
//! A [Tree] stores its [Vertex]es in an arena and references them by
//! [VertexIndex]. Vertices carry their parsed [Annotations], the [Traits]
//! assigned from metadata, and the layout derived by tree operations.

/// Vertex annotations parsed from `[&...]` blocks
pub mod annotation;
/// Phylogenetic tree structure and operations
pub mod tree;
/// Tree vertices and branch lengths
pub mod vertex;

pub use annotation::{AnnotationValue, Annotations};
pub use tree::{PostOrderIter, PreOrderIter, Tree, TreeStats, VertexIndex};
pub use vertex::{BranchLength, Traits, Vertex};
