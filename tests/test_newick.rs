use phylokit::model::AnnotationValue;
use phylokit::newick::{NewickParser, NewickStyle, parse_str, read_tree, to_newick, write_newick_file};
use phylokit::parser::ByteParser;
use phylokit::parser::ParsingErrorType;
use std::path::Path;

// --- TESTS NEWICK STRING PARSING ---
#[test]
fn test_basic_tree() {
    let tree = parse_str("((A:1.0,B:2.0):3.0,C:4.0):0.5;").unwrap();

    // Test counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Test relationships
    // - Root has children (internal, C)
    let root = tree.root();
    let (root_left, root_right) = (root.children()[0], root.children()[1]);

    // - Internal vertex has children (A, B)
    let internal = tree.vertex(root_left);
    assert!(internal.is_internal());
    assert_eq!(*internal.branch_length().unwrap(), 3.0);
    let leaf_a = tree.vertex(internal.children()[0]);
    let leaf_b = tree.vertex(internal.children()[1]);
    let leaf_c = tree.vertex(root_right);
    assert_eq!(leaf_a.name(), Some("A"));
    assert_eq!(leaf_b.name(), Some("B"));
    assert_eq!(leaf_c.name(), Some("C"));
    assert_eq!(*leaf_b.branch_length().unwrap(), 2.0);
}

#[test]
fn test_quoted_labels_and_comments() {
    let tree = parse_str("('Homo sapiens':0.1,[a comment]'O''Brien':0.2,C_x:1e-3);").unwrap();
    assert!(tree.leaf_by_name("Homo sapiens").is_some());
    assert!(tree.leaf_by_name("O'Brien").is_some());
    let c = tree.leaf_by_name("C_x").unwrap();
    assert_eq!(*tree[c].branch_length().unwrap(), 0.001);
}

#[test]
fn test_beast_annotations() {
    let newick = "((A[&rate=1.5,host=\"bat\"]:0.1,B:0.2)[&posterior=0.99,height_95%_HPD={0.1,0.4}]:0.3,C:[&rate=0.8]0.4);";
    let tree = parse_str(newick).unwrap();

    let a = tree.leaf_by_name("A").unwrap();
    assert_eq!(tree[a].annotations().get("rate"), Some(&AnnotationValue::Float(1.5)));
    assert_eq!(tree[a].annotations().get("host").and_then(|v| v.as_str()), Some("bat"));

    let ab = tree[a].parent_index().unwrap();
    assert_eq!(tree[ab].annotations().get("posterior").and_then(|v| v.as_f64()), Some(0.99));
    assert!(matches!(tree[ab].annotations().get("height_95%_HPD"), Some(AnnotationValue::List(l)) if l.len() == 2));

    let c = tree.leaf_by_name("C").unwrap();
    assert_eq!(tree[c].annotations().get("rate").and_then(|v| v.as_f64()), Some(0.8));
    assert_eq!(*tree[c].branch_length().unwrap(), 0.4);
}

#[test]
fn test_annotations_skipped_when_disabled() {
    let mut parser = ByteParser::for_str("(A[&rate=1.5]:0.1,B:0.2);");
    let tree = NewickParser::new().with_annotations(false).parse_tree(&mut parser).unwrap();
    let a = tree.leaf_by_name("A").unwrap();
    assert!(tree[a].annotations().is_empty());
}

#[test]
fn test_missing_semicolon() {
    let result = parse_str("(A:1,B:1)");
    assert!(result.is_err());
}

#[test]
fn test_missing_tree_string() {
    let err = parse_str("no tree here;").unwrap_err();
    assert_eq!(*err.kind(), ParsingErrorType::MissingTreeString);
}

#[test]
fn test_invalid_branch_length() {
    assert!(parse_str("(A:1,B:abc);").is_err());
}

// --- TESTS FILES ---
#[test]
fn test_read_fasttree_file() {
    let path = Path::new("tests").join("fixtures").join("fasttree.nwk");
    let result = read_tree(path, true);
    if let Err(e) = &result {
        eprintln!("Error reading FastTree output: {:?}", e);
    }
    let tree = result.unwrap();

    assert_eq!(tree.num_leaves(), 6);
    assert!(tree.is_valid());
    assert_eq!(tree.root().children().len(), 3);
    assert!(tree.height().is_some());
    assert!(tree.root().y().is_some());
    assert!(tree.root().absolute_time().is_none());
}

#[test]
fn test_write_and_read_back() {
    let tree = parse_str("((A:1,B:2)[&posterior=0.9]:1,'C d':3);").unwrap();
    let newick = to_newick(&tree, NewickStyle::Plain);
    assert_eq!(newick, "((A:1,B:2):1,C_d:3);");

    let with_annotations = to_newick(&tree, NewickStyle::WithAnnotations);
    assert!(with_annotations.contains("[&posterior=0.9]"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.nwk");
    write_newick_file(&path, &[tree.clone(), tree], NewickStyle::Plain).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 2);
    let reread = parse_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(reread.num_leaves(), 3);
    assert!(reread.leaf_by_name("C_d").is_some());
}

#[test]
fn test_quoted_text_values_read_back() {
    let mut tree = parse_str("((A:1,B:2):1,C:3);").unwrap();
    let a = tree.leaf_by_name("A").unwrap();
    tree[a].set_trait("note", "5\" dish, \"rare\"");

    let with_traits = to_newick(&tree, NewickStyle::WithTraits);
    let reread = parse_str(&with_traits).unwrap();
    let a = reread.leaf_by_name("A").unwrap();
    assert_eq!(
        reread[a].annotations().get("note"),
        Some(&AnnotationValue::Text("5\" dish, \"rare\"".into()))
    );

    let with_annotations = to_newick(&reread, NewickStyle::WithAnnotations);
    let again = parse_str(&with_annotations).unwrap();
    let a = again.leaf_by_name("A").unwrap();
    assert_eq!(again[a].annotations(), reread[a].annotations());
}
