//! Newick string parser building a [Tree].

use crate::model::annotation::{AnnotationValue, Annotations};
use crate::model::tree::{Tree, VertexIndex};
use crate::model::vertex::BranchLength;
use crate::newick::defs::{
    ANNOTATION_KEY_DELIMITERS, ANNOTATION_START, ANNOTATION_VALUE_DELIMITERS, DEFAULT_NUM_VERTICES_GUESS,
    NEWICK_LABEL_DELIMITERS,
};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

/// Parser (configuration) for Newick format phylogenetic [Tree]s.
///
/// Vertices may have any number of children. Labels of internal vertices
/// (support values, node numbers) are kept as vertex names.
///
/// # Configuration
/// * `with_annotations(false)` - Skip `[&...]` blocks like comments instead of
///   parsing them into [Annotations] (parsed by default).
///
/// # Format
/// * `tree ::= vertex ';'`
/// * `vertex ::= ( '(' vertex (',' vertex)* ')' [label] | label ) annotations [':' annotations number annotations]`
/// * `annotations ::= ('[&' entry (',' entry)* ']')*`
/// * `entry ::= key ['=' value]`, where value is a number, a (quoted) string,
///   or a list `{value,...}`
///
/// Furthermore:
/// * Whitespace can occur between elements,
///   just not within an unquoted label or in a branch length
/// * Plain `[...]` comments can occur anywhere where whitespace is allowed
///
/// # Example
/// ```
/// use phylokit::newick::NewickParser;
/// use phylokit::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("(A[&country=\"Laos\"]:1.0,B:1.0)90:0.0;");
/// let tree = NewickParser::new().parse_tree(&mut byte_parser).unwrap();
///
/// assert_eq!(tree.num_leaves(), 2);
/// assert_eq!(tree.root().name(), Some("90"));
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    parse_annotations: bool,
    num_vertices_guess: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

impl NewickParser {
    /// Creates a new `NewickParser` parsing annotations.
    pub fn new() -> Self {
        Self {
            parse_annotations: true,
            num_vertices_guess: DEFAULT_NUM_VERTICES_GUESS,
        }
    }

    /// Sets whether `[&...]` blocks get parsed into [Annotations] or skipped.
    pub fn with_annotations(mut self, parse_annotations: bool) -> Self {
        self.parse_annotations = parse_annotations;
        self
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(Tree)` - The parsed phylogenetic tree
    /// * `Err(ParsingError)` - If the Newick format is invalid
    pub fn parse_tree<S: ByteSource>(&mut self, parser: &mut ByteParser<S>) -> Result<Tree, ParsingError> {
        let mut tree = Tree::with_capacity(self.num_vertices_guess);

        let root = self.parse_vertex(parser, &mut tree)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected ';' at end of tree but found {:?}", parser.peek().map(|b| b as char)),
            ));
        }

        tree.set_root(root);
        // Next tree of same source is likely of similar size
        self.num_vertices_guess = tree.num_vertices();

        Ok(tree)
    }

    /// Parses a vertex (either internal vertex or leaf), adds it to the tree and returns its index:
    /// - Skips leading comments and whitespace
    /// - Parses children if starting with `(`
    /// - Then optional label, annotations and branch length
    fn parse_vertex<S: ByteSource>(&mut self, parser: &mut ByteParser<S>, tree: &mut Tree) -> Result<VertexIndex, ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let children = if parser.peek_is(b'(') {
            Some(self.parse_children(parser, tree)?)
        } else {
            None
        };

        if parser.is_eof() {
            return Err(ParsingError::unexpected_eof(parser));
        }

        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        let name = (!label.is_empty()).then_some(label);

        let mut annotations = Annotations::new();
        let branch_length = self.parse_branch_length(parser, &mut annotations)?;

        let index = match children {
            Some(children) => {
                let index = tree.add_internal(children, branch_length);
                if let Some(name) = name {
                    tree[index].set_name(name);
                }
                index
            }
            None => tree.add_leaf(name, branch_length),
        };
        *tree[index].annotations_mut() = annotations;

        Ok(index)
    }

    /// Parses children `(vertex, ..., vertex)` and returns their indices:
    /// - Expects parser at opening `(`
    fn parse_children<S: ByteSource>(&mut self, parser: &mut ByteParser<S>, tree: &mut Tree) -> Result<Vec<VertexIndex>, ParsingError> {
        if !parser.consume_if(b'(') {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Expected '(' before children but found {:?}", parser.peek().map(|b| b as char)),
            ));
        }

        let mut children = Vec::with_capacity(2);
        loop {
            children.push(self.parse_vertex(parser, tree)?);

            parser.skip_comment_and_whitespace()?;
            match parser.next_byte() {
                Some(b',') => continue,
                Some(b')') => break,
                Some(b) => {
                    return Err(ParsingError::invalid_newick_string(
                        parser,
                        format!("Expected ',' or ')' after child but found {:?}", b as char),
                    ));
                }
                None => return Err(ParsingError::unexpected_eof(parser)),
            }
        }

        Ok(children)
    }

    /// Parses optional annotations and branch length `[annotations][:[annotations]number][annotations]`:
    /// - Skips comments/whitespace in between
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - [BranchLength] if found branch length and was able to parse it
    /// - `None` if found no branch length
    /// - [ParsingError] if it couldn't parse branch length value or it is not finite
    fn parse_branch_length<S: ByteSource>(
        &mut self,
        parser: &mut ByteParser<S>,
        annotations: &mut Annotations,
    ) -> Result<Option<BranchLength>, ParsingError> {
        self.parse_annotations(parser, annotations)?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        self.parse_annotations(parser, annotations)?;

        let mut branch_length_str = String::new();
        while let Some(b) = parser.peek() {
            // Valid characters for a float: digits, '.', '-', '+', 'e', 'E'
            if b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+' || b == b'e' || b == b'E' {
                branch_length_str.push(b as char);
                parser.next_byte();
            } else {
                break;
            }
        }

        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(parser, format!("Invalid branch length: '{branch_length_str}'"))
        })?;
        let branch_length = BranchLength::try_new(value).ok_or_else(|| {
            ParsingError::invalid_newick_string(parser, format!("Branch length not finite: '{branch_length_str}'"))
        })?;

        self.parse_annotations(parser, annotations)?;
        Ok(Some(branch_length))
    }

    /// Parses all consecutive annotation blocks (skipping comments and whitespace in between).
    fn parse_annotations<S: ByteSource>(&mut self, parser: &mut ByteParser<S>, annotations: &mut Annotations) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        while parser.peek_is_annotation() {
            if self.parse_annotations {
                parse_annotation_block(parser, annotations)?;
            } else {
                parser.skip_bracket_block()?;
            }
            parser.skip_comment_and_whitespace()?;
        }
        Ok(())
    }
}

// ============================================================================
// ANNOTATIONS (private)
// ============================================================================
/// Parses one `[&key=value,key,...]` block into `annotations`.
///
/// Expects parser at `[&`.
fn parse_annotation_block<S: ByteSource>(parser: &mut ByteParser<S>, annotations: &mut Annotations) -> Result<(), ParsingError> {
    parser.consume_if_sequence(ANNOTATION_START);

    loop {
        parser.skip_whitespace();
        match parser.peek() {
            None => return Err(ParsingError::unclosed_comment(parser)),
            Some(b']') => {
                parser.next_byte();
                return Ok(());
            }
            Some(b',') => {
                parser.next_byte();
                continue;
            }
            Some(_) => {}
        }

        let key = parse_annotation_text(parser, ANNOTATION_KEY_DELIMITERS)?;
        let key = key.trim().to_string();
        parser.skip_whitespace();

        let value = if parser.consume_if(b'=') {
            parse_annotation_value(parser)?
        } else {
            AnnotationValue::Flag
        };
        annotations.insert(key, value);

        parser.skip_whitespace();
        match parser.peek() {
            Some(b',') | Some(b']') => {}
            None => return Err(ParsingError::unclosed_comment(parser)),
            Some(b) => {
                return Err(ParsingError::invalid_annotation(
                    parser,
                    format!("Expected ',' or ']' after annotation value but found {:?}", b as char),
                ));
            }
        }
    }
}

/// Parses an annotation value: quoted string, `{...}` list, or number/text token.
fn parse_annotation_value<S: ByteSource>(parser: &mut ByteParser<S>) -> Result<AnnotationValue, ParsingError> {
    parser.skip_whitespace();
    match parser.peek() {
        Some(b'"') | Some(b'\'') => {
            let text = parse_annotation_text(parser, ANNOTATION_VALUE_DELIMITERS)?;
            Ok(AnnotationValue::Text(text))
        }
        Some(b'{') => {
            parser.next_byte();
            let mut values = Vec::new();
            loop {
                parser.skip_whitespace();
                if parser.consume_if(b'}') {
                    break;
                }
                values.push(parse_annotation_value(parser)?);
                parser.skip_whitespace();
                match parser.next_byte() {
                    Some(b',') => continue,
                    Some(b'}') => break,
                    Some(b) => {
                        return Err(ParsingError::invalid_annotation(
                            parser,
                            format!("Expected ',' or '}}' in list but found {:?}", b as char),
                        ));
                    }
                    None => return Err(ParsingError::unclosed_comment(parser)),
                }
            }
            Ok(AnnotationValue::List(values))
        }
        Some(_) => {
            let token = parse_annotation_text(parser, ANNOTATION_VALUE_DELIMITERS)?;
            Ok(AnnotationValue::from_token(token.trim()))
        }
        None => Err(ParsingError::unclosed_comment(parser)),
    }
}

/// Parses annotation text, either enclosed in double/single quotes (which
/// are removed, a doubled quote standing for one) or up to one of `delimiters`.
fn parse_annotation_text<S: ByteSource>(parser: &mut ByteParser<S>, delimiters: &[u8]) -> Result<String, ParsingError> {
    let quote = match parser.peek() {
        Some(q @ (b'"' | b'\'')) => q,
        _ => return parser.parse_unquoted_label(delimiters),
    };
    parser.next_byte();

    let mut bytes = Vec::new();
    loop {
        match parser.next_byte() {
            Some(b) if b == quote => {
                if parser.peek() == Some(quote) {
                    bytes.push(quote);
                    parser.next_byte();
                } else {
                    break;
                }
            }
            Some(b) => bytes.push(b),
            None => return Err(ParsingError::unclosed_quote(parser)),
        }
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Tree, ParsingError> {
        NewickParser::new().parse_tree(&mut ByteParser::for_str(input))
    }

    #[test]
    fn test_multifurcating_root() {
        let tree = parse("(A:0.1,B:0.2,(C:0.3,D:0.4)0.95:0.5);").unwrap();
        assert!(tree.is_valid());
        assert_eq!(tree.root().children().len(), 3);
        assert_eq!(tree.num_leaves(), 4);
        let c = tree.leaf_by_name("C").unwrap();
        let parent = tree[c].parent_index().unwrap();
        assert_eq!(tree[parent].name(), Some("0.95"));
    }

    #[test]
    fn test_annotation_after_label_and_colon() {
        let tree = parse("(A[&rate=0.5,host=\"bat\"]:1.0,B:[&height_95%_HPD={0.1,0.3}]2.0)[&R];").unwrap();
        let a = tree.leaf_by_name("A").unwrap();
        assert_eq!(tree[a].annotations().get("rate"), Some(&AnnotationValue::Float(0.5)));
        assert_eq!(tree[a].annotations().get("host"), Some(&AnnotationValue::Text("bat".into())));
        assert_eq!(*tree[a].branch_length().unwrap(), 1.0);

        let b = tree.leaf_by_name("B").unwrap();
        assert_eq!(
            tree[b].annotations().get("height_95%_HPD"),
            Some(&AnnotationValue::List(vec![0.1.into(), 0.3.into()]))
        );
        assert_eq!(*tree[b].branch_length().unwrap(), 2.0);
        assert!(tree.root().annotations().contains_key("R"));
    }

    #[test]
    fn test_bare_id_annotation() {
        let tree = parse("((A[&3]:0.1,B[&4]:0.2)[&2]:0.3,C[&5]:0.4)[&1];").unwrap();
        let a = tree.leaf_by_name("A").unwrap();
        assert_eq!(tree[a].annotations().flags().collect::<Vec<_>>(), vec!["3"]);
        let ab = tree[a].parent_index().unwrap();
        assert_eq!(tree[ab].annotations().flags().collect::<Vec<_>>(), vec!["2"]);
    }

    #[test]
    fn test_annotations_skipped() {
        let mut parser = NewickParser::new().with_annotations(false);
        let tree = parser.parse_tree(&mut ByteParser::for_str("(A[&x=1]:1,B:1);")).unwrap();
        let a = tree.leaf_by_name("A").unwrap();
        assert!(tree[a].annotations().is_empty());
    }

    #[test]
    fn test_comments_and_whitespace() {
        let tree = parse("( A [comment] : 1.5 ,\n 'B c':2 ) ;").unwrap();
        assert_eq!(tree.num_leaves(), 2);
        assert!(tree.leaf_by_name("B c").is_some());
    }

    #[test]
    fn test_negative_branch_length_kept() {
        let tree = parse("(A:-0.01,B:1e-3);").unwrap();
        let a = tree.leaf_by_name("A").unwrap();
        assert_eq!(*tree[a].branch_length().unwrap(), -0.01);
    }

    #[test]
    fn test_errors() {
        assert!(parse("(A:1,B:1)").is_err()); // missing ;
        assert!(parse("(A:1,B:abc);").is_err());
        assert!(parse("(A:1,B:1e999);").is_err());
        assert!(parse("(A:1,B:1").is_err());
        assert!(parse("(A[&x=1:1,B:1);").is_err());
    }
}
