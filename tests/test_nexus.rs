use phylokit::PhyloError;
use phylokit::dates::{DateFormat, decimal_date};
use phylokit::model::AnnotationValue;
use phylokit::newick::NewickStyle;
use phylokit::nexus::{BeastReader, NexusWriter, read_beast_tree, write_minimal_nexus};
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

#[test]
fn test_beast_tree_with_translate() {
    let _ = env_logger::builder().is_test(true).try_init();
    let result = read_beast_tree(fixture("beast_translate.tree"));
    if let Err(e) = &result {
        eprintln!("Error reading BEAST tree: {:?}", e);
    }
    let tree = result.unwrap();

    assert_eq!(tree.name(), Some("TREE1"));
    assert_eq!(tree.num_leaves(), 4);
    assert!(tree.is_valid());
    for name in ["hCoV_A_2019-12-30", "hCoV_B_2020-01-15", "hCoV_C_2020-02", "hCoV_D_2020-03-10"] {
        assert!(tree.leaf_by_name(name).is_some(), "missing tip {name}");
    }

    // Annotations survive translation
    let a = tree.leaf_by_name("hCoV_A_2019-12-30").unwrap();
    assert_eq!(tree[a].annotations().get("rate"), Some(&AnnotationValue::Float(1.0)));
    let ab = tree[a].parent_index().unwrap();
    assert_eq!(tree[ab].annotations().get("posterior").and_then(|v| v.as_f64()), Some(0.98));

    // Most recent tip is 2020-03-10, the tree is 0.2 years high
    let most_recent = 2020.0 + 69.0 / 366.0;
    assert!((tree.most_recent_sample().unwrap() - most_recent).abs() < 1e-9);
    assert!((tree.height().unwrap() - 0.2).abs() < 1e-9);
    let root_time = tree.root().absolute_time().unwrap();
    assert!((root_time - (most_recent - 0.2)).abs() < 1e-9);

    // Every vertex is placed in time and on the y-axis
    for vertex in tree.vertices() {
        assert!(vertex.absolute_time().unwrap() >= root_time);
        assert!(vertex.y().is_some());
    }
}

#[test]
fn test_beast_tree_without_translate() {
    let tree = BeastReader::default().read(fixture("beast_plain.tree")).unwrap();

    assert_eq!(tree.name(), Some("tree_1"));
    assert_eq!(tree.num_leaves(), 3);
    let c = tree.leaf_by_name("C_2020-12-31").unwrap();
    let most_recent = decimal_date("2020-12-31", &DateFormat::default()).unwrap();
    assert_eq!(tree.most_recent_sample(), Some(most_recent));
    // C is the highest tip, so sits at the most recent date
    assert!((tree[c].absolute_time().unwrap() - most_recent).abs() < 1e-9);
    assert!((tree.root().absolute_time().unwrap() - (most_recent - 2.0)).abs() < 1e-9);
}

#[test]
fn test_beast_date_configuration() {
    let text = "#NEXUS\nbegin trees;\n\
                tree t1 = [&R] ('2019-12-30|EPI_1':1,'2020-01-15|EPI_2':1.5);\n\
                end;\n";
    let tree = BeastReader::default()
        .with_date_delimiter("|")
        .with_date_position(0)
        .with_sort_descending(true)
        .read_str(text)
        .unwrap();
    let expected = decimal_date("2020-01-15", &DateFormat::default()).unwrap();
    assert_eq!(tree.most_recent_sample(), Some(expected));
}

#[test]
fn test_beast_custom_date_format() {
    let text = "tree t1 = (A_30/12/2019:1,B_15/01/2020:1);";
    let format = DateFormat::default().with_format("%d/%m/%Y").with_splitter("/");
    let tree = BeastReader::default().with_date_format(format).read_str(text).unwrap();
    let expected = decimal_date("2020-01-15", &DateFormat::default()).unwrap();
    assert_eq!(tree.most_recent_sample(), Some(expected));
}

#[test]
fn test_last_tree_wins() {
    let text = "tree first = (A_2020:1,B_2020:1);\ntree second = ((A_2020:1,B_2020:1):1,C_2021:1);\n";
    let tree = BeastReader::default().read_str(text).unwrap();
    assert_eq!(tree.name(), Some("second"));
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.most_recent_sample(), Some(2021.0));
}

#[test]
fn test_missing_tree_file() {
    let result = read_beast_tree(fixture("does_not_exist.tree"));
    assert!(matches!(result, Err(PhyloError::Io(_))));
}

#[test]
fn test_no_tree_line() {
    let result = BeastReader::default().read_str("#NEXUS\nbegin taxa;\ndimensions ntax=2;\nend;\n");
    assert!(matches!(result, Err(PhyloError::MissingTree(_))));
}

#[test]
fn test_write_tree_and_read_back() {
    let tree = BeastReader::default().read(fixture("beast_translate.tree")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("written.nex");
    let mut writer = NexusWriter::for_path(&path).unwrap();
    writer.write_tree(&tree, NewickStyle::Plain).unwrap();
    drop(writer);

    let reread = BeastReader::default().read(&path).unwrap();
    assert_eq!(reread.num_leaves(), 4);
    assert_eq!(reread.most_recent_sample(), tree.most_recent_sample());
    assert!((reread.root().absolute_time().unwrap() - tree.root().absolute_time().unwrap()).abs() < 1e-9);
}

#[test]
fn test_write_minimal_nexus() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("minimal.nex");
    let labels = vec!["A_2020-01-01".to_string(), "B_2020-02-01".to_string()];
    write_minimal_nexus(&path, &labels, "(A_2020-01-01:0.1,B_2020-02-01:0.2);").unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with("#NEXUS"));
    assert!(contents.contains("dimensions ntax=2;"));
    assert!(contents.contains("tree TREE1 = [&R] (A_2020-01-01:0.1,B_2020-02-01:0.2);"));

    let tree = read_beast_tree(&path).unwrap();
    assert_eq!(tree.num_leaves(), 2);
}
