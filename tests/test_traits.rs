use phylokit::PhyloError;
use phylokit::distance::{CLADE_LABEL_TRAIT, label_by_nearest_reference, pairwise_tip_distances};
use phylokit::newick::read_tree;
use phylokit::nexus::read_beast_tree;
use phylokit::palette::{Palette, assign_colours};
use phylokit::render::{RenderOptions, render_tree};
use phylokit::traits::{MetadataTable, UNDEFINED, assign_internal_traits, assign_leaf_traits};
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new("tests").join("fixtures").join(name)
}

#[test]
fn test_metadata_to_internal_traits() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut tree = read_beast_tree(fixture("beast_translate.tree")).unwrap();
    let table = MetadataTable::from_path(fixture("metadata.csv"), b',').unwrap();
    assert_eq!(table.len(), 5);

    let ambiguities = assign_leaf_traits(&mut tree, &table, "strain", "host", "host").unwrap();
    // D is listed twice
    assert_eq!(ambiguities.len(), 1);
    assert_eq!(ambiguities[0].name, "hCoV_D_2020-03-10");
    assert_eq!(ambiguities[0].matches, 2);

    assign_leaf_traits(&mut tree, &table, "strain", "country", "country").unwrap();
    assert_eq!(assign_internal_traits(&mut tree, "host"), 1);
    assert_eq!(assign_internal_traits(&mut tree, "country"), 1);

    let a = tree.leaf_by_name("hCoV_A_2019-12-30").unwrap();
    let ab = tree[a].parent_index().unwrap();
    assert_eq!(tree[ab].trait_value("host"), Some("bat"));
    assert_eq!(tree.root().trait_value("host"), Some(UNDEFINED));
    assert_eq!(tree.root().trait_value("country"), Some(UNDEFINED));

    let c = tree.leaf_by_name("hCoV_C_2020-02").unwrap();
    let cd = tree[c].parent_index().unwrap();
    assert_eq!(tree[cd].trait_value("host"), Some(UNDEFINED));
    // D is ambiguous for every column, so C and D share no value
    assert_eq!(tree[cd].trait_value("country"), Some(UNDEFINED));
    assert_eq!(tree[ab].trait_value("country"), Some("China"));
}

#[test]
fn test_missing_metadata_column() {
    let mut tree = read_beast_tree(fixture("beast_translate.tree")).unwrap();
    let table = MetadataTable::from_path(fixture("metadata.csv"), b',').unwrap();
    let result = assign_leaf_traits(&mut tree, &table, "name", "host", "host");
    assert!(matches!(result, Err(PhyloError::MissingColumn(c)) if c == "name"));
}

#[test]
fn test_genotyping_by_nearest_reference() {
    let mut tree = read_tree(fixture("fasttree.nwk"), false).unwrap();
    let references = ["ref_genotypeI", "ref_genotypeII", "ref_genotypeIII"];
    let labels = label_by_nearest_reference(&mut tree, &references).unwrap();

    assert_eq!(labels.len(), 3);
    assert_eq!(labels.get("sample1").unwrap().clade_label, "ref_genotypeI");
    assert_eq!(labels.get("sample2").unwrap().clade_label, "ref_genotypeI");
    // sample3 is 0.06 from its sister ref_genotypeIII but 0.04 from ref_genotypeII
    let sample3 = labels.get("sample3").unwrap();
    assert_eq!(sample3.clade_label, "ref_genotypeII");
    assert!((sample3.distance - 0.04).abs() < 1e-9);

    let index = tree.leaf_by_name("sample1").unwrap();
    assert_eq!(tree[index].trait_value(CLADE_LABEL_TRAIT), Some("ref_genotypeI"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clades.csv");
    labels.write_csv(&path).unwrap();
    let table = MetadataTable::from_path(&path, b',').unwrap();
    assert_eq!(table.lookup("tip", "sample3", "clade_label").unwrap(), vec!["ref_genotypeII"]);
}

#[test]
fn test_unknown_reference_tip() {
    let mut tree = read_tree(fixture("fasttree.nwk"), false).unwrap();
    let result = label_by_nearest_reference(&mut tree, &["ref_genotypeIV"]);
    assert!(matches!(result, Err(PhyloError::UnknownTip(t)) if t == "ref_genotypeIV"));
}

#[test]
fn test_pairwise_distances_csv() {
    let tree = read_tree(fixture("fasttree.nwk"), false).unwrap();
    let distances = pairwise_tip_distances(&tree);
    assert_eq!(distances.len(), 15);
    assert!((distances.get("sample1", "sample2").unwrap() - 0.025).abs() < 1e-9);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("distances.csv");
    distances.write_csv(&path).unwrap();
    let table = MetadataTable::from_path(&path, b',').unwrap();
    assert_eq!(table.len(), 15);
}

#[test]
fn test_colour_and_draw() {
    let mut tree = read_beast_tree(fixture("beast_translate.tree")).unwrap();
    let table = MetadataTable::from_path(fixture("metadata.csv"), b',').unwrap();
    assign_leaf_traits(&mut tree, &table, "strain", "host", "host").unwrap();

    let hosts: Vec<&str> = tree.leaves().filter_map(|v| v.trait_value("host")).collect();
    let colours = assign_colours(&hosts, Palette::Tab10, None);
    assert_eq!(colours.len(), 2 + 1); // bat, pangolin, undef

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.png");
    let options = RenderOptions::default()
        .with_size(400, 300)
        .with_trait_key("host")
        .with_palette(Palette::Tab10)
        .with_allow_list(["bat"]);
    render_tree(&mut tree, &options, &path).unwrap();

    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!((img.width(), img.height()), (400, 300));
}
