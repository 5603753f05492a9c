//! Tree module for phylogenetic tree representation.
//!
//! This module provides the core data structure for representing phylogenetic trees:
//! - [Tree]: the tree itself, using the arena pattern for efficient memory layout
//! - [VertexIndex] is used to index vertices
//! - [TreeStats] summarises topology as logged when a tree is loaded
//!
//! Besides construction and traversal, [Tree] carries the derived layout used
//! for plotting: heights (distance from root), absolute times (decimal years,
//! given the date of the most recent tip) and vertical `y` coordinates.

use crate::model::vertex::{BranchLength, Vertex};
use log::info;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: VertexIndex = usize::MAX;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by [VertexIndex].
/// Vertices may have any number of children; FastTree and RAxML write
/// trifurcating roots and BEAST trees may contain polytomies.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena
/// - Index of root is maintained
/// - No assumption on order of indices is maintained
/// - Branch lengths are optional, but if provided must be finite
///
/// # Construction
/// Bottom-up: add leaves, then internal vertices over them, then mark the
/// top-most vertex as root with [Tree::set_root] (or use [Tree::add_root]).
/// Test validity with [Tree::is_valid].
///
/// # Example
/// ```
/// use phylokit::model::{BranchLength, Tree};
///
/// // ((A:0.2,B:0.2):0.2,C:0.4);
/// let mut tree = Tree::new();
/// let a = tree.add_leaf(Some("A".to_string()), Some(BranchLength::new(0.2)));
/// let b = tree.add_leaf(Some("B".to_string()), Some(BranchLength::new(0.2)));
/// let c = tree.add_leaf(Some("C".to_string()), Some(BranchLength::new(0.4)));
/// let ab = tree.add_internal(vec![a, b], Some(BranchLength::new(0.2)));
/// tree.add_root(vec![ab, c]);
///
/// assert!(tree.is_valid());
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: Option<VertexIndex>,

    /// Name of tree; optional, e.g. when parsed from a NEXUS file
    name: Option<String>,

    /// Maximum distance from root to any leaf, once heights are computed
    tree_height: Option<f64>,

    /// Decimal date of the most recent tip, once absolute times are set
    most_recent_sample: Option<f64>,
}

// ============================================================================
// New, Construction, Getters / Accessors (pub)
// ============================================================================
impl Tree {
    /// Creates a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty tree with room for `num_vertices` vertices.
    pub fn with_capacity(num_vertices: usize) -> Self {
        Tree {
            vertices: Vec::with_capacity(num_vertices),
            ..Self::default()
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Returns the name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `name` - Tip name, e.g. `"MN908947_2019-12-26"`
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    pub fn add_leaf(&mut self, name: Option<String>, branch_length: Option<BranchLength>) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices.push(Vertex::new_leaf(index, name, branch_length));
        index
    }

    /// Adds a vertex over the given children, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Child indices in drawing order; their parent gets set
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent
    ///
    /// # Panics
    /// Panics if a child index is out of bounds.
    pub fn add_internal(&mut self, children: Vec<VertexIndex>, branch_length: Option<BranchLength>) -> VertexIndex {
        let index = self.vertices.len();
        for &child in &children {
            self.vertices[child].set_parent(Some(index));
        }
        self.vertices.push(Vertex::new_internal(index, children, branch_length));
        index
    }

    /// Adds a root over the given children and marks it as root.
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root(&mut self, children: Vec<VertexIndex>) -> VertexIndex {
        let index = self.add_internal(children, None);
        self.root_index = Some(index);
        index
    }

    /// Marks the vertex at `index` as root of this tree.
    ///
    /// The vertex keeps its branch length (a Newick root may carry one), but it
    /// is ignored for heights.
    pub fn set_root(&mut self, index: VertexIndex) {
        self.vertices[index].set_parent(None);
        self.root_index = Some(index);
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index.is_some()
    }

    /// Returns the index of the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index.unwrap_or(NO_ROOT_SET_INDEX)
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index()]
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex_mut(&mut self, index: VertexIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns an iterator over all vertices in arena order.
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter()
    }

    /// Returns an iterator over all leaves in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.iter().filter(|v| v.is_leaf())
    }

    /// Returns the indices of all leaves in arena order.
    pub fn leaf_indices(&self) -> Vec<VertexIndex> {
        self.leaves().map(|v| v.index()).collect()
    }

    /// Returns the indices of all vertices which are neither leaf nor root.
    pub fn internal_indices(&self) -> Vec<VertexIndex> {
        self.vertices.iter().filter(|v| v.is_internal()).map(|v| v.index()).collect()
    }

    /// Returns the index of the leaf named `name`, if any.
    pub fn leaf_by_name(&self, name: &str) -> Option<VertexIndex> {
        self.leaves().find(|v| v.name() == Some(name)).map(|v| v.index())
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices (excluding the root) in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the tree height, i.e. the maximum root-to-leaf distance,
    /// once computed with [Tree::compute_heights].
    pub fn height(&self) -> Option<f64> {
        self.tree_height
    }

    /// Returns the decimal date of the most recent tip, once set with
    /// [Tree::set_absolute_time].
    pub fn most_recent_sample(&self) -> Option<f64> {
        self.most_recent_sample
    }

    /// Returns the sum of all branch lengths in the tree (missing ones count as 0).
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter(|v| !v.is_root())
            .filter_map(|v| v.branch_length())
            .map(|bl| *bl)
            .sum::<f64>()
    }

    /// Checks if all non-root vertices have branch lengths set.
    pub fn vertices_have_branch_lengths(&self) -> bool {
        self.vertices.iter().all(|v| v.is_root() || v.has_branch_length())
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is set, within bounds and points to a vertex without parent
    /// - All vertex indices match their position in the arena
    /// - There is only one vertex without parent
    /// - All child indices are valid and point back to correct parent
    /// - All vertices are reachable from the root
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        let Some(root_index) = self.root_index else {
            return false;
        };
        if root_index >= self.vertices.len() || !self.vertices[root_index].is_root() {
            return false;
        }

        for (index, vertex) in self.vertices.iter().enumerate() {
            if vertex.index() != index {
                return false;
            }

            if vertex.is_root() && index != root_index {
                return false;
            }

            for &child in vertex.children() {
                if child >= self.vertices.len() || self.vertices[child].parent_index() != Some(index) {
                    return false;
                }
            }

            if let Some(parent) = vertex.parent_index() {
                if parent >= self.vertices.len() || !self.vertices[parent].children().contains(&index) {
                    return false;
                }
            }
        }

        // Guards against cycles as well as detached subtrees
        self.pre_order_iter().take(self.vertices.len() + 1).count() == self.vertices.len()
    }

    /// Returns an iterator over the tree in post-order (children before parents).
    ///
    /// Post-order traversal visits each vertex's children before visiting the vertex itself.
    /// This is useful for aggregating data from leaves upward.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Pre-order traversal visits each vertex before visiting its children.
    /// Children are visited in drawing order, so leaves come up in the
    /// order they are plotted bottom to top.
    ///
    /// # Example
    /// ```
    /// use phylokit::newick;
    ///
    /// let tree = newick::parse_str("((A:1,B:1):1,C:2);").unwrap();
    /// let names: Vec<_> = tree.pre_order_iter().filter_map(|v| v.name()).collect();
    /// assert_eq!(names, vec!["A", "B", "C"]);
    /// ```
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns the leaves below `index` (or `index` itself if it is a leaf), in pre-order.
    pub fn leaf_descendants(&self, index: VertexIndex) -> Vec<VertexIndex> {
        let mut leaves = Vec::new();
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let vertex = &self[current];
            if vertex.is_leaf() {
                leaves.push(current);
            } else {
                stack.extend(vertex.children().iter().rev());
            }
        }
        leaves
    }

    /// Returns the path from `index` up to the root, both included.
    pub fn path_to_root(&self, index: VertexIndex) -> Vec<VertexIndex> {
        let mut path = vec![index];
        let mut current = index;
        while let Some(parent) = self[current].parent_index() {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Returns the most recent common ancestor of `a` and `b`.
    ///
    /// If one is an ancestor of the other, that one is returned.
    pub fn common_ancestor(&self, a: VertexIndex, b: VertexIndex) -> VertexIndex {
        let ancestors_a: HashSet<VertexIndex> = self.path_to_root(a).into_iter().collect();
        self.path_to_root(b)
            .into_iter()
            .find(|v| ancestors_a.contains(v))
            .unwrap_or_else(|| self.root_index())
    }

    /// Computes tree statistics and logs them.
    pub fn tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            num_leaves: 0,
            num_internal: 0,
            num_polytomies: 0,
            num_single_child: 0,
            has_branch_lengths: self.vertices_have_branch_lengths(),
        };

        for vertex in &self.vertices {
            if vertex.is_leaf() {
                stats.num_leaves += 1;
                continue;
            }
            if vertex.is_internal() {
                stats.num_internal += 1;
            }
            match vertex.children().len() {
                1 => stats.num_single_child += 1,
                2 => {}
                _ => stats.num_polytomies += 1,
            }
        }

        info!("{stats}");
        stats
    }
}

// ============================================================================
// Layout: heights, sorting, absolute time (pub)
// ============================================================================
impl Tree {
    /// Sets the height (distance from root) of every vertex and returns the
    /// tree height, i.e. the maximum over all leaves.
    ///
    /// Missing branch lengths count as 0 and the root sits at height 0.
    pub fn compute_heights(&mut self) -> f64 {
        if !self.is_root_set() {
            return 0.0;
        }

        let order = self.pre_order_indices();
        let mut tree_height: f64 = 0.0;
        for index in order {
            let vertex = &self.vertices[index];
            let height = match vertex.parent_index() {
                None => 0.0,
                Some(parent) => {
                    let parent_height = self.vertices[parent].height().unwrap_or(0.0);
                    parent_height + vertex.branch_length().map_or(0.0, |bl| *bl)
                }
            };
            if vertex.is_leaf() {
                tree_height = tree_height.max(height);
            }
            self.vertices[index].set_height(height);
        }

        self.tree_height = Some(tree_height);
        tree_height
    }

    /// Ladderizes the tree and assigns vertical plotting coordinates.
    ///
    /// Children of every vertex are sorted stably by whether they have
    /// children themselves, then number of descendant leaves, then height;
    /// ascending or `descending`. Afterwards leaves get `y = 0..n-1` in
    /// drawing order and every other vertex the mean `y` of its children.
    /// Heights are computed first if missing.
    pub fn sort_branches(&mut self, descending: bool) {
        if !self.is_root_set() {
            return;
        }
        if self.tree_height.is_none() {
            self.compute_heights();
        }

        let leaf_counts = self.leaf_counts();
        for index in 0..self.vertices.len() {
            if self.vertices[index].is_leaf() {
                continue;
            }
            let mut children = self.vertices[index].children().to_vec();
            children.sort_by(|&x, &y| {
                let ordering = self.sort_key_cmp(x, y, &leaf_counts);
                if descending { ordering.reverse() } else { ordering }
            });
            *self.vertices[index].children_mut() = children;
        }

        self.assign_y();
    }

    /// Sets absolute times given the decimal date of the most recent tip.
    ///
    /// Every vertex gets `most_recent - tree_height + height`; heights are
    /// computed first if missing.
    pub fn set_absolute_time(&mut self, most_recent: f64) {
        let tree_height = match self.tree_height {
            Some(height) => height,
            None => self.compute_heights(),
        };

        for vertex in &mut self.vertices {
            let height = vertex.height().unwrap_or(0.0);
            vertex.set_absolute_time(most_recent - tree_height + height);
        }
        self.most_recent_sample = Some(most_recent);
    }

    /// Renames leaves whose current name is a key of `names`.
    ///
    /// Used with the `translate` block of NEXUS files, which maps the numbers
    /// in the tree string to tip names.
    ///
    /// # Returns
    /// The number of renamed leaves.
    pub fn rename_tips(&mut self, names: &HashMap<String, String>) -> usize {
        let mut renamed = 0;
        for vertex in self.vertices.iter_mut().filter(|v| v.is_leaf()) {
            if let Some(new_name) = vertex.name().and_then(|name| names.get(name)) {
                vertex.set_name(new_name.clone());
                renamed += 1;
            }
        }
        renamed
    }
}

// ============================================================================
// Helpers (private)
// ============================================================================
impl Tree {
    fn pre_order_indices(&self) -> Vec<VertexIndex> {
        self.pre_order_iter().map(|v| v.index()).collect()
    }

    /// Number of descendant leaves per vertex.
    fn leaf_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.vertices.len()];
        for vertex in self.post_order_iter() {
            counts[vertex.index()] = if vertex.is_leaf() {
                1
            } else {
                vertex.children().iter().map(|&c| counts[c]).sum()
            };
        }
        counts
    }

    fn sort_key_cmp(&self, x: VertexIndex, y: VertexIndex, leaf_counts: &[usize]) -> Ordering {
        let (vx, vy) = (&self.vertices[x], &self.vertices[y]);
        vx.is_leaf()
            .cmp(&vy.is_leaf())
            .reverse()
            .then(leaf_counts[x].cmp(&leaf_counts[y]))
            .then(vx.height().unwrap_or(0.0).total_cmp(&vy.height().unwrap_or(0.0)))
    }

    fn assign_y(&mut self) {
        let mut next_y = 0.0;
        for index in self.pre_order_indices() {
            if self.vertices[index].is_leaf() {
                self.vertices[index].set_y(next_y);
                next_y += 1.0;
            }
        }

        let post_order: Vec<VertexIndex> = self.post_order_iter().map(|v| v.index()).collect();
        for index in post_order {
            let children = self.vertices[index].children();
            if children.is_empty() {
                continue;
            }
            let sum: f64 = children.iter().map(|&c| self.vertices[c].y().unwrap_or(0.0)).sum();
            let y = sum / children.len() as f64;
            self.vertices[index].set_y(y);
        }
    }
}

impl std::ops::Index<VertexIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<VertexIndex> for Tree {
    fn index_mut(&mut self, index: VertexIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
/// Prints a visual representation of the tree.
///
/// # Example Output
/// ```text
/// Tree with 3 leaves (5 vertices total):
/// Root: vertex 4
///   [4] Internal (no branch)
///     ├─ [3] Internal (branch: 0.200)
///     │   ├─ [0] Leaf "A" (branch: 0.100)
///     │   └─ [1] Leaf "B" (branch: 0.200)
///     └─ [2] Leaf "C" (branch: 0.400)
/// ```
impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Tree with {} leaves ({} vertices total):", self.num_leaves(), self.vertices.len())?;

        match self.root_index {
            Some(root) => {
                writeln!(f, "Root: vertex {root}")?;
                self.fmt_vertex(f, root, "", true)
            }
            None => writeln!(f, "(No root set)"),
        }
    }
}

impl Tree {
    /// Helper function to recursively print a vertex and its children.
    fn fmt_vertex(&self, f: &mut fmt::Formatter, index: VertexIndex, prefix: &str, is_last: bool) -> fmt::Result {
        let vertex = &self.vertices[index];
        let connector = if prefix.is_empty() { "  " } else if is_last { "└─ " } else { "├─ " };
        let branch_str = match vertex.branch_length() {
            Some(bl) => format!("(branch: {:.3})", *bl),
            None => "(no branch)".to_string(),
        };

        if vertex.is_leaf() {
            let label = vertex.name().unwrap_or("?");
            return writeln!(f, "{prefix}{connector}[{index}] Leaf \"{label}\" {branch_str}");
        }

        writeln!(f, "{prefix}{connector}[{index}] Internal {branch_str}")?;
        let new_prefix = if prefix.is_empty() {
            "    ".to_string()
        } else {
            format!("{}{}   ", prefix, if is_last { " " } else { "│" })
        };
        let last = vertex.children().len().saturating_sub(1);
        for (i, &child) in vertex.children().iter().enumerate() {
            self.fmt_vertex(f, child, &new_prefix, i == last)?;
        }
        Ok(())
    }
}

// =#========================================================================#=
// TREE STATS
// =#========================================================================#=
/// Topology summary of a [Tree].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub num_leaves: usize,
    /// Vertices with parent and children
    pub num_internal: usize,
    /// Vertices (root included) with more than two children
    pub num_polytomies: usize,
    /// Vertices (root included) with exactly one child
    pub num_single_child: usize,
    pub has_branch_lengths: bool,
}

impl TreeStats {
    /// Returns whether every non-leaf vertex has exactly two children.
    pub fn is_bifurcating(&self) -> bool {
        self.num_polytomies == 0 && self.num_single_child == 0
    }
}

impl fmt::Display for TreeStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Tree statistics: {} leaves, {} internal vertices, {} polytomies, {} single-child vertices, \
             bifurcating: {}, branch lengths: {}",
            self.num_leaves,
            self.num_internal,
            self.num_polytomies,
            self.num_single_child,
            self.is_bifurcating(),
            self.has_branch_lengths
        )
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root_index {
            stack.push((root, false));
        }
        PostOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Last child pushed first, so first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIter<'a> {
    tree: &'a Tree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root_index {
            stack.push(root);
        }
        PreOrderIter { tree, stack }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];
        self.stack.extend(vertex.children().iter().rev());
        Some(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ((A:1,B:2):1,(C:1,(D:1,E:1):1):0.5,F:3);
    fn sample_tree() -> Tree {
        let mut tree = Tree::new();
        let bl = |x| Some(BranchLength::new(x));
        let a = tree.add_leaf(Some("A".into()), bl(1.0));
        let b = tree.add_leaf(Some("B".into()), bl(2.0));
        let ab = tree.add_internal(vec![a, b], bl(1.0));
        let c = tree.add_leaf(Some("C".into()), bl(1.0));
        let d = tree.add_leaf(Some("D".into()), bl(1.0));
        let e = tree.add_leaf(Some("E".into()), bl(1.0));
        let de = tree.add_internal(vec![d, e], bl(1.0));
        let cde = tree.add_internal(vec![c, de], bl(0.5));
        let f = tree.add_leaf(Some("F".into()), bl(3.0));
        tree.add_root(vec![ab, cde, f]);
        tree
    }

    #[test]
    fn test_valid_and_counts() {
        let tree = sample_tree();
        assert!(tree.is_valid());
        assert_eq!(tree.num_leaves(), 6);
        assert_eq!(tree.num_internal(), 3);
        assert_eq!(tree.num_vertices(), 10);
        assert_eq!(tree.total_branch_length(), 11.5);
    }

    #[test]
    fn test_invalid_without_root() {
        let mut tree = Tree::new();
        tree.add_leaf(Some("A".into()), None);
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_compute_heights() {
        let mut tree = sample_tree();
        let height = tree.compute_heights();
        assert_eq!(height, 3.0);
        let e = tree.leaf_by_name("E").unwrap();
        assert_eq!(tree[e].height(), Some(2.5));
        assert_eq!(tree.root().height(), Some(0.0));
    }

    #[test]
    fn test_sort_branches_ascending() {
        let mut tree = sample_tree();
        tree.sort_branches(false);
        let names: Vec<_> = tree.pre_order_iter().filter_map(|v| v.name()).collect();
        // leaf first, then smaller clades
        assert_eq!(names, vec!["F", "A", "B", "C", "D", "E"]);

        let f = tree.leaf_by_name("F").unwrap();
        assert_eq!(tree[f].y(), Some(0.0));
        let d = tree.leaf_by_name("D").unwrap();
        let de = tree[d].parent_index().unwrap();
        assert_eq!(tree[de].y(), Some(4.5));
    }

    #[test]
    fn test_sort_branches_descending() {
        let mut tree = sample_tree();
        tree.sort_branches(true);
        let names: Vec<_> = tree.pre_order_iter().filter_map(|v| v.name()).collect();
        assert_eq!(names, vec!["D", "E", "C", "B", "A", "F"]);
    }

    #[test]
    fn test_set_absolute_time() {
        let mut tree = sample_tree();
        tree.set_absolute_time(2020.5);
        assert_eq!(tree.root().absolute_time(), Some(2017.5));
        let f = tree.leaf_by_name("F").unwrap();
        assert_eq!(tree[f].absolute_time(), Some(2020.5));
        assert_eq!(tree.most_recent_sample(), Some(2020.5));
    }

    #[test]
    fn test_common_ancestor_and_descendants() {
        let tree = sample_tree();
        let c = tree.leaf_by_name("C").unwrap();
        let e = tree.leaf_by_name("E").unwrap();
        let mrca = tree.common_ancestor(c, e);
        assert_eq!(tree.leaf_descendants(mrca), vec![c, tree.leaf_by_name("D").unwrap(), e]);
        let a = tree.leaf_by_name("A").unwrap();
        assert_eq!(tree.common_ancestor(a, e), tree.root_index());
        assert_eq!(tree.common_ancestor(mrca, e), mrca);
    }

    #[test]
    fn test_tree_stats() {
        let stats = sample_tree().tree_stats();
        assert_eq!(stats.num_leaves, 6);
        assert_eq!(stats.num_polytomies, 1);
        assert!(!stats.is_bifurcating());
        assert!(stats.has_branch_lengths);
    }

    #[test]
    fn test_rename_tips() {
        let mut tree = sample_tree();
        let names = HashMap::from([("A".to_string(), "hCoV-19/A_2020-03-01".to_string())]);
        assert_eq!(tree.rename_tips(&names), 1);
        assert!(tree.leaf_by_name("hCoV-19/A_2020-03-01").is_some());
        assert!(tree.leaf_by_name("A").is_none());
    }

    #[test]
    fn test_display() {
        let printed = sample_tree().to_string();
        assert!(printed.starts_with("Tree with 6 leaves (10 vertices total):"));
        assert!(printed.contains("Leaf \"F\" (branch: 3.000)"));
    }
}
