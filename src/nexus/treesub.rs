//! Normalisation of treesub output into minimal NEXUS.
//!
//! treesub annotates every branch of its output tree with a block like
//! `[&REALNAME="A",NUMBER="7",NONSYNSUBS="[A123T,G4S]",...]`. FigTree can show
//! these, but most tree readers choke on them. [normalize_treesub] strips
//! each block down to its node number (`[&7]`) and collects the
//! substitutions into a [SubstitutionTable], which can later be attached to
//! the parsed tree again with [SubstitutionTable::attach].

use crate::error::PhyloError;
use crate::model::Tree;
use crate::nexus::defs::{ANNOTATION_START, BEGIN_TREES, BLOCK_END, TAXLABELS, TREESUB_BLOCK_PATTERN};
use crate::nexus::writer::{NexusWriter, minimal_nexus_lines};
use log::{info, warn};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default field holding the node number
pub const DEFAULT_ID_FIELD: &str = "NUMBER";
/// Default field holding non-synonymous substitutions
pub const DEFAULT_SUBSTITUTION_FIELD: &str = "NONSYNSUBS";
/// Default value for branches without substitution field
pub const DEFAULT_PLACEHOLDER: &str = "*";
/// Default prefix of the tree line, after removing spaces
pub const DEFAULT_TREE_PREFIX: &str = "treetree_1=[&R]";

/// Number of lines previewed after writing
const PREVIEW_LINES: usize = 10;
/// Number of characters of the tree line previewed after writing
const PREVIEW_TREE_CHARS: usize = 50;

// =#========================================================================#=
// CONFIG
// =#========================================================================#=
/// Names and defaults used when normalising treesub output.
///
/// # Configuration
/// * `with_id_field(name)` - annotation field with the node number, default [DEFAULT_ID_FIELD]
/// * `with_substitution_field(name)` - default [DEFAULT_SUBSTITUTION_FIELD]
/// * `with_placeholder(p)` - default [DEFAULT_PLACEHOLDER]
/// * `with_tree_prefix(p)` - removed from the tree line, default [DEFAULT_TREE_PREFIX]
/// * `with_preview(false)` - do not log a preview of the written file
#[derive(Debug, Clone)]
pub struct TreesubConfig {
    id_field: String,
    substitution_field: String,
    placeholder: String,
    tree_prefix: String,
    preview: bool,
}

impl Default for TreesubConfig {
    fn default() -> Self {
        Self {
            id_field: DEFAULT_ID_FIELD.to_string(),
            substitution_field: DEFAULT_SUBSTITUTION_FIELD.to_string(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            tree_prefix: DEFAULT_TREE_PREFIX.to_string(),
            preview: true,
        }
    }
}

impl TreesubConfig {
    pub fn with_id_field(mut self, field: &str) -> Self {
        self.id_field = field.to_string();
        self
    }

    pub fn with_substitution_field(mut self, field: &str) -> Self {
        self.substitution_field = field.to_string();
        self
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_tree_prefix(mut self, prefix: &str) -> Self {
        self.tree_prefix = prefix.to_string();
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Regex capturing the (quoted, trailing comma) value of `field`.
    fn field_regex(field: &str, value: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!(r#"{}="({value})","#, regex::escape(field)))
    }
}

// =#========================================================================#=
// SUBSTITUTION TABLE
// =#========================================================================#=
/// Node number and substitutions of one annotated branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionRow {
    /// Node number; empty if the block had none
    pub node_num: String,
    /// Comma separated substitutions, e.g. `A123T,G4S`, or the placeholder
    pub substitutions: String,
}

/// Substitutions per node, in order of appearance in the tree string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubstitutionTable {
    rows: Vec<SubstitutionRow>,
}

impl SubstitutionTable {
    /// Returns all rows.
    pub fn rows(&self) -> &[SubstitutionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the substitutions of the first row with node number `node_num`.
    pub fn get(&self, node_num: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.node_num == node_num)
            .map(|row| row.substitutions.as_str())
    }

    /// Attaches substitutions to the vertices of a tree parsed from
    /// normalised output.
    ///
    /// A vertex with bare annotation `[&7]` gets trait `node_num` set to `7`
    /// and trait `trait_key` set to the substitutions of node 7.
    ///
    /// # Returns
    /// The number of vertices that received substitutions.
    pub fn attach(&self, tree: &mut Tree, trait_key: &str) -> usize {
        let mut by_node: HashMap<&str, &str> = HashMap::with_capacity(self.rows.len());
        for row in self.rows.iter().filter(|row| !row.node_num.is_empty()) {
            by_node.entry(row.node_num.as_str()).or_insert(row.substitutions.as_str());
        }

        let mut attached = 0;
        for index in 0..tree.num_vertices() {
            let matched = tree[index]
                .annotations()
                .flags()
                .find_map(|flag| by_node.get(flag).map(|subs| (flag.to_string(), subs.to_string())));

            if let Some((node_num, substitutions)) = matched {
                let vertex = &mut tree[index];
                vertex.set_trait("node_num", node_num);
                vertex.set_trait(trait_key, substitutions);
                attached += 1;
            }
        }
        attached
    }

    /// Writes the table as CSV with header `node_num,nonsynsubs`.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<(), PhyloError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["node_num", "nonsynsubs"])?;
        for row in &self.rows {
            writer.write_record([&row.node_num, &row.substitutions])?;
        }
        writer.flush()?;
        Ok(())
    }
}

// =#========================================================================#=
// NORMALISATION
// =#========================================================================#=
/// Result of [normalize_treesub].
#[derive(Debug, Clone, PartialEq)]
pub struct TreesubOutput {
    /// Taxon labels in order of the `taxlabels` command
    pub tip_labels: Vec<String>,
    /// Tree string with every annotation block reduced to its node number
    pub tree_string: String,
    /// Substitutions per annotation block
    pub table: SubstitutionTable,
}

/// Normalises treesub NEXUS output.
///
/// * The tree string is the line following `begin trees;`, with all spaces
///   and the configured prefix removed.
/// * Tip labels are the lines after `taxlabels` up to a `;` line directly
///   followed by `end;`, each cut before any `[&`.
/// * Every `[&...]` block directly followed by `:` is replaced by `[&id]`
///   and its substitutions are recorded, square brackets removed.
///
/// # Errors
/// [PhyloError::MissingTree] if there is no tree line.
///
/// # Example
/// ```
/// use phylokit::nexus::{normalize_treesub, TreesubConfig};
///
/// let text = "begin trees;\n\
///             tree tree_1 = [&R] (A[&NUMBER=\"1\",NONSYNSUBS=\"[A123T]\",]:0.1,B[&NUMBER=\"2\",]:0.2);\n\
///             end;";
/// let output = normalize_treesub(text, &TreesubConfig::default()).unwrap();
/// assert_eq!(output.tree_string, "(A[&1]:0.1,B[&2]:0.2);");
/// assert_eq!(output.table.get("1"), Some("A123T"));
/// assert_eq!(output.table.get("2"), Some("*"));
/// ```
pub fn normalize_treesub(text: &str, config: &TreesubConfig) -> Result<TreesubOutput, PhyloError> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    let tree_line = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.eq_ignore_ascii_case(BEGIN_TREES))
        .filter_map(|(i, _)| lines.get(i + 1))
        .last()
        .ok_or_else(|| PhyloError::MissingTree("treesub output".to_string()))?;
    let tree_string = tree_line.replace(' ', "").replace(&config.tree_prefix, "");

    let tip_labels = taxon_labels(&lines);

    let block_regex = Regex::new(TREESUB_BLOCK_PATTERN)?;
    let id_regex = TreesubConfig::field_regex(&config.id_field, r"\d*?")?;
    let subs_regex = TreesubConfig::field_regex(&config.substitution_field, r"[\s\S]*?")?;

    let mut rows = Vec::new();
    let tree_string = block_regex
        .replace_all(&tree_string, |captures: &Captures| {
            let block = &captures[1];
            let node_num = match id_regex.captures(block) {
                Some(id) => id[1].to_string(),
                None => {
                    warn!("No {} found in annotation block [&{block}]", config.id_field);
                    String::new()
                }
            };
            let substitutions = match subs_regex.captures(block) {
                Some(subs) => subs[1].replace(['[', ']'], ""),
                None => config.placeholder.clone(),
            };
            let replacement = format!("[&{node_num}]:");
            rows.push(SubstitutionRow { node_num, substitutions });
            replacement
        })
        .into_owned();

    Ok(TreesubOutput {
        tip_labels,
        tree_string,
        table: SubstitutionTable { rows },
    })
}

/// Labels of the `taxlabels` command.
fn taxon_labels(lines: &[&str]) -> Vec<String> {
    let mut labels = Vec::new();
    let mut in_taxlabels = false;

    for (i, line) in lines.iter().enumerate() {
        if line.eq_ignore_ascii_case(TAXLABELS) {
            in_taxlabels = true;
            continue;
        }
        if *line == ";" && lines.get(i + 1).is_some_and(|next| next.eq_ignore_ascii_case(BLOCK_END)) {
            in_taxlabels = false;
        }
        if in_taxlabels {
            let label = line.split(ANNOTATION_START).next().unwrap_or_default();
            labels.push(label.to_string());
        }
    }

    labels
}

/// Reads treesub output from `in_path`, writes the normalised minimal NEXUS
/// file to `out_path` and returns the substitutions.
///
/// Unless disabled in `config`, a preview of the written file is logged.
pub fn treesub_to_nexus<P: AsRef<Path>, Q: AsRef<Path>>(
    in_path: P,
    out_path: Q,
    config: &TreesubConfig,
) -> Result<SubstitutionTable, PhyloError> {
    let text = fs::read_to_string(in_path)?;
    let output = normalize_treesub(&text, config)?;

    NexusWriter::for_path(out_path.as_ref())?.write_minimal(&output.tip_labels, &output.tree_string)?;

    if config.preview {
        let lines = minimal_nexus_lines(&output.tip_labels, &output.tree_string);
        let trees_start = lines.len() - 3;
        for line in lines.iter().take(PREVIEW_LINES) {
            info!("{line}");
        }
        info!("...");
        info!("{}", lines[trees_start]);
        info!("{}...", lines[trees_start + 1].chars().take(PREVIEW_TREE_CHARS).collect::<String>());
        info!("{}", lines[trees_start + 2]);
        info!("Written out to file {}", out_path.as_ref().display());
    }

    Ok(output.table)
}
