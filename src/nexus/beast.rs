//! Reader for dated trees in BEAST/FigTree NEXUS files.

use crate::dates::{DateError, DateFormat, date_token, decimal_date};
use crate::error::PhyloError;
use crate::model::Tree;
use crate::newick;
use crate::nexus::defs::{DEFAULT_TREE_PATTERN, NTAX_PATTERN, TRANSLATE, TRANSLATE_PATTERN};
use log::{debug, info, warn};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Default delimiter of fields in tip names
pub const DEFAULT_DATE_DELIMITER: &str = "_";

/// Default field of tip names holding the date (the last one)
pub const DEFAULT_DATE_POSITION: isize = -1;

// =#========================================================================#=
// BEAST READER
// =#========================================================================#=
/// Reader (configuration) for a single tree from a NEXUS file as written by
/// BEAST, TreeAnnotator or FigTree, laid out in absolute time.
///
/// The file is scanned line by line:
/// * `dimensions ntax=N;` gives the expected number of tips
/// * lines following a `translate` line, up to the next line with `;`, map
///   tree keys to tip names (`1 'MN908947_2019-12-26',`)
/// * a tree command (`tree TREE1 = [&R] (...);`) holds the tree, parsed
///   from its first `(`; with several tree commands the last one is kept
///
/// Afterwards tips are renamed by the translation, dates are read from tip
/// names, and the tree is sorted and set to absolute time with the most
/// recent tip date.
///
/// # Configuration
/// * `with_date_delimiter(d)` / `with_date_position(p)` - which field of a tip
///   name holds the date, default the last field after splitting on `_`
/// * `with_date_format(fmt)` - how dates are written, default `%Y-%m-%d` with
///   variable granularity
/// * `with_dates(false)` - skip reading dates (absolute times stay unset)
/// * `with_tree_pattern(p)` - regex recognising tree command lines
/// * `with_sort_descending(true)` - sort direction of branches
///
/// # Example
/// ```no_run
/// use phylokit::nexus::BeastReader;
///
/// let tree = BeastReader::default()
///     .with_date_delimiter("|")
///     .read("mcc.tree")?;
/// println!("Root at {:?}", tree.root().absolute_time());
/// # Ok::<(), phylokit::PhyloError>(())
/// ```
#[derive(Debug, Clone)]
pub struct BeastReader {
    tree_pattern: String,
    date_delimiter: String,
    date_position: isize,
    date_format: DateFormat,
    use_dates: bool,
    sort_descending: bool,
}

impl Default for BeastReader {
    fn default() -> Self {
        Self {
            tree_pattern: DEFAULT_TREE_PATTERN.to_string(),
            date_delimiter: DEFAULT_DATE_DELIMITER.to_string(),
            date_position: DEFAULT_DATE_POSITION,
            date_format: DateFormat::variable(),
            use_dates: true,
            sort_descending: false,
        }
    }
}

impl BeastReader {
    /// Sets the regex recognising tree command lines.
    pub fn with_tree_pattern(mut self, pattern: &str) -> Self {
        self.tree_pattern = pattern.to_string();
        self
    }

    /// Sets the delimiter splitting tip names into fields.
    pub fn with_date_delimiter(mut self, delimiter: &str) -> Self {
        self.date_delimiter = delimiter.to_string();
        self
    }

    /// Sets the field of the tip name holding the date; negative counts from the end.
    pub fn with_date_position(mut self, position: isize) -> Self {
        self.date_position = position;
        self
    }

    /// Sets the format of tip dates.
    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = format;
        self
    }

    /// Sets whether tip dates are read and absolute times set.
    pub fn with_dates(mut self, use_dates: bool) -> Self {
        self.use_dates = use_dates;
        self
    }

    /// Sets the direction used for [Tree::sort_branches].
    pub fn with_sort_descending(mut self, descending: bool) -> Self {
        self.sort_descending = descending;
        self
    }

    /// Reads the tree from the NEXUS file at `path`.
    ///
    /// # Errors
    /// * [PhyloError::Io] if the file cannot be read
    /// * [PhyloError::MissingTree] if there is no tree command
    /// * [PhyloError::Parsing] if the tree string is invalid
    /// * [PhyloError::Date] if a tip date cannot be read
    /// * [PhyloError::NoTipDates] if dates are used but no tip is named
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<Tree, PhyloError> {
        let contents = fs::read_to_string(path.as_ref())?;
        self.read_named(&contents, &path.as_ref().display().to_string())
    }

    /// Reads the tree from NEXUS text; see [BeastReader::read].
    pub fn read_str(&self, contents: &str) -> Result<Tree, PhyloError> {
        self.read_named(contents, "input")
    }
}

// ============================================================================
// Reading (private)
// ============================================================================
impl BeastReader {
    fn read_named(&self, contents: &str, source: &str) -> Result<Tree, PhyloError> {
        let ntax_regex = Regex::new(NTAX_PATTERN)?;
        let tree_regex = Regex::new(&self.tree_pattern)?;
        let translate_regex = Regex::new(TRANSLATE_PATTERN)?;

        let mut num_taxa: Option<usize> = None;
        let mut tree: Option<Tree> = None;
        let mut tips: HashMap<String, String> = HashMap::new();
        let mut in_translate = false;

        for line in contents.lines() {
            if let Some(captures) = ntax_regex.captures(&line.to_lowercase()) {
                num_taxa = captures[1].parse().ok();
            }

            if let Some(captures) = tree_regex.captures(line) {
                let name = captures.get(1).map_or("", |m| m.as_str());
                if tree.is_some() {
                    debug!("Replacing previously read tree by tree '{name}'");
                }
                let mut parsed = newick::parse_str(line)?;
                if !name.is_empty() {
                    parsed = parsed.with_name(name.to_string());
                }
                tree = Some(parsed);
            }

            if in_translate {
                if let Some(captures) = translate_regex.captures(line) {
                    let name = captures[2].trim().trim_matches('\'');
                    tips.insert(captures[1].to_string(), name.to_string());
                } else if !line.contains(';') && !line.trim().is_empty() {
                    warn!("tip not captured by regex: {}", line.replace('\t', ""));
                }
            }

            if line.to_lowercase().contains(TRANSLATE) {
                in_translate = true;
            }
            if line.contains(';') {
                in_translate = false;
            }
        }

        let mut tree = tree.ok_or_else(|| PhyloError::MissingTree(source.to_string()))?;
        info!("Number of objects found in tree string: {}", tree.num_vertices());
        if let Some(num_taxa) = num_taxa {
            if num_taxa != tree.num_leaves() {
                warn!("Expected {num_taxa} taxa but tree has {} leaves", tree.num_leaves());
            }
        }

        let highest_tip = if self.use_dates {
            Some(self.highest_tip_date(&tree, &tips)?)
        } else {
            None
        };
        if !tips.is_empty() {
            tree.rename_tips(&tips);
        }

        tree.tree_stats();
        tree.sort_branches(self.sort_descending);
        if let Some(highest_tip) = highest_tip {
            tree.set_absolute_time(highest_tip);
            info!("Highest tip date: {highest_tip:.4}");
        }

        Ok(tree)
    }

    /// Most recent tip date, from translated names if given, otherwise from
    /// leaf names. Unnamed leaves are skipped.
    fn highest_tip_date(&self, tree: &Tree, tips: &HashMap<String, String>) -> Result<f64, PhyloError> {
        let names: Vec<&str> = if tips.is_empty() {
            tree.leaves().filter_map(|v| v.name()).collect()
        } else {
            tips.values().map(String::as_str).collect()
        };
        let unnamed = tree.num_leaves().saturating_sub(names.len());
        if tips.is_empty() && unnamed > 0 {
            warn!("{unnamed} unnamed leaves without tip date");
        }

        let mut highest: Option<f64> = None;
        for name in names {
            let token = date_token(name, &self.date_delimiter, self.date_position)
                .ok_or_else(|| DateError::MissingToken(name.to_string()))?;
            let date = decimal_date(token, &self.date_format)?;
            highest = Some(highest.map_or(date, |h| h.max(date)));
        }

        highest.ok_or(PhyloError::NoTipDates)
    }
}
