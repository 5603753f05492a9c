//! Minimal NEXUS file writer.

use crate::model::Tree;
use crate::newick::{NewickStyle, to_newick};
use crate::nexus::defs::{BEGIN_TAXA, BEGIN_TREES, BLOCK_END, NEXUS_HEADER, TAXLABELS, TREE_COMMAND};
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::Path;

// =#========================================================================#=
// NEXUS WRITER
// =#========================================================================#=
/// Writer for a single phylogenetic tree in minimal NEXUS format.
///
/// # Format Structure
/// One item per line:
/// ```text
/// #NEXUS
/// begin taxa;
/// dimensions ntax=3;
/// taxlabels
/// A_2020-01-01
/// B_2020-02-01
/// C_2020-03-01
/// ;
/// end;
/// begin trees;
/// tree TREE1 = [&R] ((A_2020-01-01:0.1,B_2020-02-01:0.2):0.1,C_2020-03-01:0.3);
/// end;
/// ```
/// This is what FigTree and the BEAST reader of this crate accept.
///
/// # Example
/// ```no_run
/// use phylokit::newick::{parse_str, NewickStyle};
/// use phylokit::nexus::NexusWriter;
///
/// let tree = parse_str("(A:1,B:1);").unwrap();
/// let mut writer = NexusWriter::for_path("output.tree")?;
/// writer.write_tree(&tree, NewickStyle::WithTraits)?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct NexusWriter {
    bw: BufWriter<File>,
}

// ============================================================================
// API (public)
// ============================================================================
impl NexusWriter {
    /// Creates a new NEXUS writer for the given file.
    pub fn new(file: File) -> NexusWriter {
        NexusWriter { bw: BufWriter::new(file) }
    }

    /// Creates (or truncates) the file at `path` and returns a writer for it.
    pub fn for_path<P: AsRef<Path>>(path: P) -> io::Result<NexusWriter> {
        Ok(Self::new(File::create(path)?))
    }

    /// Writes taxon labels and an already formatted tree string.
    ///
    /// Labels and tree string are written verbatim.
    pub fn write_minimal(&mut self, labels: &[String], tree_string: &str) -> io::Result<()> {
        for line in minimal_nexus_lines(labels, tree_string) {
            self.line(&line)?;
        }
        self.bw.flush()
    }

    /// Writes a [Tree] with its (escaped) leaf names as taxon labels,
    /// leaves listed in drawing order.
    pub fn write_tree(&mut self, tree: &Tree, style: NewickStyle) -> io::Result<()> {
        let labels: Vec<String> = tree
            .pre_order_iter()
            .filter(|v| v.is_leaf())
            .filter_map(|v| v.name())
            .map(escape_label)
            .collect();
        self.write_minimal(&labels, &to_newick(tree, style))
    }
}

// ============================================================================
// Little Helpers (private)
// ============================================================================
impl NexusWriter {
    /// Appends a line to the [BufWriter], returning itself for chaining.
    fn line(&mut self, line: &str) -> io::Result<&mut Self> {
        self.bw.write_all(line.as_bytes())?;
        self.bw.write_all(b"\n")?;
        Ok(self)
    }
}

/// Lines of a minimal NEXUS file as written by [NexusWriter::write_minimal].
pub(crate) fn minimal_nexus_lines(labels: &[String], tree_string: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(labels.len() + 9);
    lines.push(NEXUS_HEADER.to_string());
    lines.push(BEGIN_TAXA.to_string());
    lines.push(format!("dimensions ntax={};", labels.len()));
    lines.push(TAXLABELS.to_string());
    lines.extend(labels.iter().cloned());
    lines.push(";".to_string());
    lines.push(BLOCK_END.to_string());
    lines.push(BEGIN_TREES.to_string());
    lines.push(format!("{TREE_COMMAND}{tree_string}"));
    lines.push(BLOCK_END.to_string());
    lines
}

/// Writes taxon labels and a tree string as minimal NEXUS file to `path`.
///
/// See [NexusWriter] for the layout.
pub fn write_minimal_nexus<P: AsRef<Path>>(path: P, labels: &[String], tree_string: &str) -> io::Result<()> {
    NexusWriter::for_path(path)?.write_minimal(labels, tree_string)
}
