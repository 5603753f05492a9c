//! Patristic distances and nearest-reference labelling.
//!
//! The patristic distance of two vertices is the summed branch length of
//! the path between them. Labelling each sample tip by its closest
//! reference tip (e.g. genotype or clade references) is a quick way to
//! classify new sequences placed on a reference tree.

use crate::error::PhyloError;
use crate::model::{Tree, VertexIndex};
use log::debug;
use std::collections::BTreeMap;
use std::path::Path;

/// Trait receiving the label of the nearest reference
pub const CLADE_LABEL_TRAIT: &str = "clade_label";
/// Trait receiving the distance to the nearest reference
pub const CLADE_DISTANCE_TRAIT: &str = "clade_distance";

// =#========================================================================#=
// DISTANCES
// =#========================================================================#=
/// Returns the patristic distance between vertices `a` and `b`.
///
/// Missing branch lengths count as 0.
///
/// # Example
/// ```
/// use phylokit::distance::patristic_distance;
/// use phylokit::newick::parse_str;
///
/// let tree = parse_str("((A:1,B:2):0.5,C:3);").unwrap();
/// let a = tree.leaf_by_name("A").unwrap();
/// let c = tree.leaf_by_name("C").unwrap();
/// assert_eq!(patristic_distance(&tree, a, c), 4.5);
/// ```
pub fn patristic_distance(tree: &Tree, a: VertexIndex, b: VertexIndex) -> f64 {
    let mrca = tree.common_ancestor(a, b);
    distance_to_ancestor(tree, a, mrca) + distance_to_ancestor(tree, b, mrca)
}

/// Summed branch lengths from `index` up to its ancestor `ancestor`.
fn distance_to_ancestor(tree: &Tree, index: VertexIndex, ancestor: VertexIndex) -> f64 {
    let mut distance = 0.0;
    let mut current = index;
    while current != ancestor {
        let vertex = &tree[current];
        distance += vertex.branch_length().map_or(0.0, |bl| *bl);
        match vertex.parent_index() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    distance
}

/// Patristic distances between all pairs of named tips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceTable {
    distances: BTreeMap<(String, String), f64>,
}

impl DistanceTable {
    /// Returns the distance between tips `a` and `b` (in either order).
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        if a == b {
            return Some(0.0);
        }
        let key = if a < b { (a.to_string(), b.to_string()) } else { (b.to_string(), a.to_string()) };
        self.distances.get(&key).copied()
    }

    /// Iterates over all unordered pairs, each once, as `((a, b), distance)` with `a < b`.
    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &f64)> {
        self.distances.iter()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Writes the table as CSV with header `tip_a,tip_b,distance`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), PhyloError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["tip_a", "tip_b", "distance"])?;
        for ((a, b), distance) in &self.distances {
            writer.write_record([a.as_str(), b.as_str(), &distance.to_string()])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Computes patristic distances between all pairs of named tips.
///
/// Runs in quadratic time in the number of tips, so keep it to trees of
/// moderate size.
pub fn pairwise_tip_distances(tree: &Tree) -> DistanceTable {
    let tips: Vec<(VertexIndex, &str)> = tree.leaves().filter_map(|v| v.name().map(|n| (v.index(), n))).collect();

    let mut distances = BTreeMap::new();
    for (i, &(a, name_a)) in tips.iter().enumerate() {
        for &(b, name_b) in &tips[i + 1..] {
            let key = if name_a < name_b {
                (name_a.to_string(), name_b.to_string())
            } else {
                (name_b.to_string(), name_a.to_string())
            };
            distances.insert(key, patristic_distance(tree, a, b));
        }
    }

    debug!("Computed {} pairwise tip distances", distances.len());
    DistanceTable { distances }
}

// =#========================================================================#=
// NEAREST REFERENCE
// =#========================================================================#=
/// Nearest reference of one tip.
#[derive(Debug, Clone, PartialEq)]
pub struct CladeAssignment {
    /// Index of the labelled tip
    pub vertex: VertexIndex,
    /// Name of the labelled tip, empty if unnamed
    pub tip: String,
    /// Name of the nearest reference tip
    pub clade_label: String,
    pub distance: f64,
}

/// Nearest references of all non-reference tips, in tree order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CladeLabels {
    assignments: Vec<CladeAssignment>,
}

impl CladeLabels {
    pub fn assignments(&self) -> &[CladeAssignment] {
        &self.assignments
    }

    /// Returns the assignment of the first tip named `tip`.
    pub fn get(&self, tip: &str) -> Option<&CladeAssignment> {
        self.assignments.iter().find(|a| a.tip == tip)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Writes the labels as CSV with header `tip,clade_label,clade_distance`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), PhyloError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["tip", CLADE_LABEL_TRAIT, CLADE_DISTANCE_TRAIT])?;
        for assignment in &self.assignments {
            writer.write_record([
                assignment.tip.as_str(),
                assignment.clade_label.as_str(),
                &assignment.distance.to_string(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Labels every non-reference tip with its nearest reference tip.
///
/// References are resolved to the first leaf of that name; other leaves
/// sharing the name count as samples. For each tip not in `references`, the patristic distance to every
/// reference is computed; the reference at strictly minimal distance wins,
/// ties going to the one listed first. The result is also stored as traits
/// [CLADE_LABEL_TRAIT] and [CLADE_DISTANCE_TRAIT] of the tips.
///
/// # Errors
/// [PhyloError::UnknownTip] if a reference is not a tip of the tree.
///
/// # Example
/// ```
/// use phylokit::distance::label_by_nearest_reference;
/// use phylokit::newick::parse_str;
///
/// let mut tree = parse_str("((ref1:1,s1:1):1,(ref2:1,s2:1):1);").unwrap();
/// let labels = label_by_nearest_reference(&mut tree, &["ref1", "ref2"]).unwrap();
/// assert_eq!(labels.get("s2").unwrap().clade_label, "ref2");
/// assert_eq!(labels.get("s2").unwrap().distance, 2.0);
/// ```
pub fn label_by_nearest_reference<S: AsRef<str>>(tree: &mut Tree, references: &[S]) -> Result<CladeLabels, PhyloError> {
    let mut reference_tips = Vec::with_capacity(references.len());
    for reference in references {
        let reference = reference.as_ref();
        let index = tree
            .leaf_by_name(reference)
            .ok_or_else(|| PhyloError::UnknownTip(reference.to_string()))?;
        reference_tips.push((index, reference.to_string()));
    }

    let mut assignments = Vec::new();
    if !reference_tips.is_empty() {
        for tip in tree.leaf_indices() {
            if reference_tips.iter().any(|(r, _)| *r == tip) {
                continue;
            }

            let mut nearest: Option<(&str, f64)> = None;
            for (reference, name) in &reference_tips {
                let distance = patristic_distance(tree, tip, *reference);
                if nearest.is_none_or(|(_, best)| distance < best) {
                    nearest = Some((name, distance));
                }
            }

            if let Some((label, distance)) = nearest {
                assignments.push(CladeAssignment {
                    vertex: tip,
                    tip: tree[tip].name().unwrap_or_default().to_string(),
                    clade_label: label.to_string(),
                    distance,
                });
            }
        }
    }

    for assignment in &assignments {
        let tip = &mut tree[assignment.vertex];
        tip.set_trait(CLADE_LABEL_TRAIT, assignment.clade_label.clone());
        tip.set_trait(CLADE_DISTANCE_TRAIT, assignment.distance.to_string());
    }

    Ok(CladeLabels { assignments })
}
