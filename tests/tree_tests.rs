use phylokit::model::{BranchLength, Tree};
use phylokit::newick::parse_str;

#[test]
fn test_building_tree() {
    let mut tree = Tree::with_capacity(5);
    let index_l1 = tree.add_leaf(Some("A".to_string()), Some(BranchLength::new(1.0)));
    let index_l2 = tree.add_leaf(Some("B".to_string()), Some(BranchLength::new(1.0)));
    let index_l3 = tree.add_leaf(Some("C".to_string()), Some(BranchLength::new(0.5)));
    let index_i1 = tree.add_internal(vec![index_l1, index_l2], Some(BranchLength::new(1.5)));
    let index_root = tree.add_root(vec![index_l3, index_i1]);

    // Counts
    assert_eq!(tree.num_leaves(), 3);
    assert_eq!(tree.num_internal(), 1);
    assert_eq!(tree.num_vertices(), 5);
    assert!(tree.is_valid());

    // Root
    let root = tree.root();
    assert_eq!(root.index(), index_root);
    assert!(root.is_root());
    assert_eq!(root.children(), &[index_l3, index_i1]);

    // Leaf
    let l2 = &tree[index_l2];
    assert!(l2.is_leaf());
    assert_eq!(l2.name(), Some("B"));
    assert_eq!(l2.parent_index(), Some(index_i1));

    // Internal
    let internal = &tree[index_i1];
    assert!(internal.is_internal());
    assert_eq!(internal.branch_length(), Some(BranchLength::new(1.5)));
    assert_eq!(tree.total_branch_length(), 4.5);
}

#[test]
#[should_panic]
fn test_get_root_panics_on_empty_tree() {
    let tree = Tree::new();
    tree.root();
}

#[test]
#[should_panic]
fn test_get_vertex_out_of_bounds() {
    let tree = Tree::new();
    let _ = &tree[55];
}

#[test]
fn test_stats_of_polytomy() {
    let tree = parse_str("(A:1,B:1,(C:1,D:1,E:1):1,(F:1):1);").unwrap();
    let stats = tree.tree_stats();
    assert_eq!(stats.num_leaves, 6);
    assert_eq!(stats.num_polytomies, 2);
    assert_eq!(stats.num_single_child, 1);
    assert!(stats.has_branch_lengths);
    assert!(!stats.is_bifurcating());
}

#[test]
fn test_layout_of_fasttree_output() {
    let mut tree = parse_str("(X:0.1,(Y:0.2,Z:0.3)0.97:0.4,W:0.05);").unwrap();
    assert!((tree.compute_heights() - 0.7).abs() < 1e-12);
    tree.sort_branches(false);

    let leaf_ys: Vec<f64> = tree.leaves().map(|v| v.y().unwrap()).collect();
    let mut sorted = leaf_ys.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(sorted, vec![0.0, 1.0, 2.0, 3.0]);

    // Internal vertices sit between their children
    let y = tree.leaf_by_name("Y").unwrap();
    let yz = tree[y].parent_index().unwrap();
    assert_eq!(tree[yz].name(), Some("0.97"));
    let child_ys: Vec<f64> = tree[yz].children().iter().map(|&c| tree[c].y().unwrap()).collect();
    assert_eq!(tree[yz].y().unwrap(), (child_ys[0] + child_ys[1]) / 2.0);
}

#[test]
fn test_absolute_time() {
    let mut tree = parse_str("((A:1,B:2):1,C:1);").unwrap();
    tree.set_absolute_time(2021.0);
    assert_eq!(tree.height(), Some(3.0));
    assert_eq!(tree.root().absolute_time(), Some(2018.0));
    let c = tree.leaf_by_name("C").unwrap();
    assert_eq!(tree[c].absolute_time(), Some(2019.0));
}

#[test]
fn test_traversals_and_ancestors() {
    let tree = parse_str("((A:1,B:1):1,(C:1,D:1):1);").unwrap();
    let post: Vec<Option<&str>> = tree.post_order_iter().filter(|v| v.is_leaf()).map(|v| v.name()).collect();
    assert_eq!(post, vec![Some("A"), Some("B"), Some("C"), Some("D")]);

    let a = tree.leaf_by_name("A").unwrap();
    let b = tree.leaf_by_name("B").unwrap();
    let d = tree.leaf_by_name("D").unwrap();
    assert_eq!(tree.common_ancestor(a, b), tree[a].parent_index().unwrap());
    assert_eq!(tree.common_ancestor(a, d), tree.root_index());
    assert_eq!(tree.path_to_root(a).len(), 3);
    assert_eq!(tree.leaf_descendants(tree.root_index()).len(), 4);
}
