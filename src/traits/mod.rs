//! Assigning metadata traits to tree vertices.
//!
//! Leaves get their traits by looking up their name in a [MetadataTable]
//! (or a plain map); internal vertices inherit a trait if all leaves below
//! agree on it. Where no single value applies, [UNDEFINED] is assigned.

mod table;

pub use self::table::MetadataTable;

use crate::error::{LookupAmbiguity, PhyloError};
use crate::model::Tree;
use log::{debug, warn};
use std::collections::HashMap;

/// Trait value of vertices without a single applicable value
pub const UNDEFINED: &str = "undef";

/// Assigns trait `trait_key` to every leaf from a metadata table.
///
/// Each leaf name is looked up in `key_column`; with exactly one matching
/// row, the value in `value_column` is assigned. With none or several
/// matching rows, the leaf gets [UNDEFINED] and the lookup is reported.
///
/// # Errors
/// [PhyloError::MissingColumn] if a column does not exist.
///
/// # Example
/// ```
/// use phylokit::newick::parse_str;
/// use phylokit::traits::{assign_leaf_traits, MetadataTable, UNDEFINED};
///
/// let mut tree = parse_str("((A:1,B:1):1,C:2);").unwrap();
/// let mut table = MetadataTable::new(["strain", "host"]);
/// table.push_row(["A", "bat"]);
/// table.push_row(["B", "pangolin"]);
///
/// let missing = assign_leaf_traits(&mut tree, &table, "strain", "host", "host").unwrap();
/// assert_eq!(missing.len(), 1);
/// let c = tree.leaf_by_name("C").unwrap();
/// assert_eq!(tree[c].trait_value("host"), Some(UNDEFINED));
/// ```
pub fn assign_leaf_traits(
    tree: &mut Tree,
    table: &MetadataTable,
    key_column: &str,
    value_column: &str,
    trait_key: &str,
) -> Result<Vec<LookupAmbiguity>, PhyloError> {
    // Fail early on missing columns, even for trees without named leaves
    table.column_index(key_column)?;
    table.column_index(value_column)?;

    let mut ambiguities = Vec::new();
    for index in tree.leaf_indices() {
        let name = tree[index].name().unwrap_or_default().to_string();
        let matches = table.lookup(key_column, &name, value_column)?;

        if let [value] = matches.as_slice() {
            tree[index].set_trait(trait_key, *value);
        } else {
            let ambiguity = LookupAmbiguity { name, matches: matches.len() };
            warn!("{ambiguity}, setting {trait_key} to {UNDEFINED}");
            tree[index].set_trait(trait_key, UNDEFINED);
            ambiguities.push(ambiguity);
        }
    }

    Ok(ambiguities)
}

/// Assigns trait `trait_key` to every leaf from a map of leaf name to value.
///
/// Leaves missing from the map get [UNDEFINED] and are reported.
pub fn assign_trait_map(tree: &mut Tree, values: &HashMap<String, String>, trait_key: &str) -> Vec<LookupAmbiguity> {
    let mut ambiguities = Vec::new();
    for index in tree.leaf_indices() {
        let name = tree[index].name().unwrap_or_default().to_string();
        match values.get(&name) {
            Some(value) => tree[index].set_trait(trait_key, value.clone()),
            None => {
                let ambiguity = LookupAmbiguity { name, matches: 0 };
                warn!("{ambiguity}, setting {trait_key} to {UNDEFINED}");
                tree[index].set_trait(trait_key, UNDEFINED);
                ambiguities.push(ambiguity);
            }
        }
    }
    ambiguities
}

/// Assigns trait `trait_key` to every non-leaf vertex from the leaves below.
///
/// A vertex gets the value all its descendant leaves share; if they
/// disagree, or any of them lacks the trait, it gets [UNDEFINED].
///
/// # Returns
/// The number of non-leaf vertices that got a value other than [UNDEFINED].
pub fn assign_internal_traits(tree: &mut Tree, trait_key: &str) -> usize {
    // Shared value of all leaves below each vertex, None if there is none
    let mut shared: Vec<Option<String>> = vec![None; tree.num_vertices()];
    let order: Vec<usize> = tree.post_order_iter().map(|v| v.index()).collect();

    let mut defined = 0;
    for index in order {
        let vertex = &tree[index];
        if vertex.is_leaf() {
            shared[index] = vertex.trait_value(trait_key).map(str::to_string);
            continue;
        }

        let (first, rest) = match vertex.children().split_first() {
            Some(split) => split,
            None => continue,
        };
        let value = shared[*first]
            .clone()
            .filter(|value| rest.iter().all(|&c| shared[c].as_ref() == Some(value)));

        match &value {
            Some(value) if value != UNDEFINED => {
                tree[index].set_trait(trait_key, value.clone());
                defined += 1;
            }
            _ => tree[index].set_trait(trait_key, UNDEFINED),
        }
        shared[index] = value;
    }

    debug!("Assigned {trait_key} to {defined} internal vertices");
    defined
}
