//! Vertex module for phylogenetic tree representation.

use crate::model::annotation::Annotations;
use crate::model::tree::VertexIndex;
use std::collections::BTreeMap;
use std::ops::Deref;

/// Metadata traits of a vertex, e.g. `"country" -> "Malaysia"`.
///
/// Populated from external tables, see [crate::traits].
pub type Traits = BTreeMap<String, String>;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex is one of:
/// - **Root**: no parent; usually has children
/// - **Internal**: has a parent and at least one child
/// - **Leaf**: has no children; usually carries a name
///
/// Trees from FastTree or RAxML have a trifurcating root and polytomies occur
/// in collapsed BEAST trees, so the number of children is not restricted.
///
/// # Invariants
/// - `index` is the position in the tree arena
/// - `branch_length`, if set, is finite (negative lengths do occur in
///   neighbour-joining trees and are kept)
/// - `parent` is `None` only for the root (and during construction)
///
/// Besides topology a vertex carries:
/// - its parsed `[&...]` [Annotations],
/// - [Traits] assigned from metadata,
/// - derived values set by [Tree](crate::model::Tree) operations: height
///   (distance from root), absolute time and the vertical plotting
///   coordinate `y`.
#[derive(PartialEq, Debug, Clone)]
pub struct Vertex {
    index: VertexIndex,
    parent: Option<VertexIndex>,
    children: Vec<VertexIndex>,
    branch_length: Option<BranchLength>,
    name: Option<String>,
    annotations: Annotations,
    traits: Traits,
    height: Option<f64>,
    absolute_time: Option<f64>,
    y: Option<f64>,
}

impl Vertex {
    /// Creates a new leaf vertex.
    pub(crate) fn new_leaf(index: VertexIndex, name: Option<String>, branch_length: Option<BranchLength>) -> Self {
        Vertex {
            index,
            parent: None,
            children: Vec::new(),
            branch_length,
            name,
            annotations: Annotations::new(),
            traits: Traits::new(),
            height: None,
            absolute_time: None,
            y: None,
        }
    }

    /// Creates a new vertex with the given children.
    pub(crate) fn new_internal(index: VertexIndex, children: Vec<VertexIndex>, branch_length: Option<BranchLength>) -> Self {
        Vertex {
            children,
            ..Vertex::new_leaf(index, None, branch_length)
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        self.index
    }

    /// Returns the index of the parent, `None` for the root.
    pub fn parent_index(&self) -> Option<VertexIndex> {
        self.parent
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn set_parent(&mut self, parent: Option<VertexIndex>) {
        self.parent = parent;
    }

    /// Returns the children of this vertex in drawing order.
    pub fn children(&self) -> &[VertexIndex] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<VertexIndex> {
        &mut self.children
    }

    /// Returns `true` if this vertex has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this vertex has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns `true` if this vertex is neither root nor leaf.
    pub fn is_internal(&self) -> bool {
        !self.is_leaf() && !self.is_root()
    }

    /// Returns the branch length, i.e. distance to the parent, if known.
    pub fn branch_length(&self) -> Option<BranchLength> {
        self.branch_length
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        self.branch_length.is_some()
    }

    /// Sets the branch length to the parent.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        self.branch_length = branch_length;
    }

    /// Returns the name; tip name for leaves, label (support value,
    /// node identifier) for other vertices.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Sets the name of this vertex.
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Returns the annotations parsed from `[&...]` blocks.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns the annotations for modification.
    pub fn annotations_mut(&mut self) -> &mut Annotations {
        &mut self.annotations
    }

    /// Returns the traits of this vertex.
    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    /// Returns the value of trait `key`, if assigned.
    pub fn trait_value(&self, key: &str) -> Option<&str> {
        self.traits.get(key).map(String::as_str)
    }

    /// Assigns `value` to trait `key`, replacing any previous value.
    pub fn set_trait(&mut self, key: &str, value: impl Into<String>) {
        self.traits.insert(key.to_string(), value.into());
    }

    /// Returns the distance from the root, once computed with
    /// [Tree::compute_heights](crate::model::Tree::compute_heights).
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub(crate) fn set_height(&mut self, height: f64) {
        self.height = Some(height);
    }

    /// Returns the absolute time (decimal year), once set with
    /// [Tree::set_absolute_time](crate::model::Tree::set_absolute_time).
    pub fn absolute_time(&self) -> Option<f64> {
        self.absolute_time
    }

    pub(crate) fn set_absolute_time(&mut self, time: f64) {
        self.absolute_time = Some(time);
    }

    /// Returns the vertical plotting coordinate, once assigned with
    /// [Tree::sort_branches](crate::model::Tree::sort_branches).
    pub fn y(&self) -> Option<f64> {
        self.y
    }

    pub(crate) fn set_y(&mut self, y: f64) {
        self.y = Some(y);
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is not finite.
    pub fn new(length: f64) -> Self {
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }

    /// Creates a new branch length, or `None` if `length` is not finite.
    pub fn try_new(length: f64) -> Option<Self> {
        length.is_finite().then_some(BranchLength(length))
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}
