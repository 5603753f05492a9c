//! Constants for reading and writing NEXUS files.

/// First line of every NEXUS file
pub(crate) const NEXUS_HEADER: &str = "#NEXUS";
/// Opens the TAXA block
pub(crate) const BEGIN_TAXA: &str = "begin taxa;";
/// Opens the TREES block
pub(crate) const BEGIN_TREES: &str = "begin trees;";
/// Closes any block
pub(crate) const BLOCK_END: &str = "end;";
/// Starts the list of taxon labels
pub(crate) const TAXLABELS: &str = "taxlabels";
/// Starts the mapping of tree keys to taxon labels
pub(crate) const TRANSLATE: &str = "translate";
/// Prefix of the single tree command of minimal NEXUS files
pub(crate) const TREE_COMMAND: &str = "tree TREE1 = [&R] ";

/// Number of taxa, matched against the lowercased line
pub(crate) const NTAX_PATTERN: &str = r"dimensions ntax=([0-9]+);";
/// Default pattern recognising a tree command, capturing the tree name
pub(crate) const DEFAULT_TREE_PATTERN: &str = r"(?i)^\s*tree\s+([^\s=]+)\s*=";
/// Pattern for one `key label` pair of a TRANSLATE command
pub(crate) const TRANSLATE_PATTERN: &str = r"([0-9]+)\s+([^,;]+)";

/// Treesub: annotation blocks directly followed by a branch length
pub(crate) const TREESUB_BLOCK_PATTERN: &str = r"\[&([\s\S]*?)\]:";
/// Treesub: text before an annotation block in a taxon label line
pub(crate) const ANNOTATION_START: &str = "[&";
