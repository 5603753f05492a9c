use criterion::{Criterion, criterion_group, criterion_main};
use phylokit::distance::{label_by_nearest_reference, pairwise_tip_distances};
use phylokit::newick::parse_str;
use phylokit::nexus::BeastReader;
use std::hint::black_box;

const BEAST_FILES: &[(&str, &str)] = &[
    ("beast_translate", "tests/fixtures/beast_translate.tree"),
    ("beast_plain", "tests/fixtures/beast_plain.tree"),
];

/// Caterpillar tree with `n` dated tips, `((t0:1,t1:1):1,t2:2)...`
fn caterpillar(n: usize) -> String {
    let mut newick = String::from("t0_2020-01-01:1");
    for i in 1..n {
        newick = format!("({newick},t{i}_2020-01-{:02}:{i})", i % 28 + 1);
    }
    newick.push(';');
    newick
}

fn beast_reading(c: &mut Criterion) {
    for (name, path) in BEAST_FILES {
        c.bench_function(name, |b| {
            b.iter(|| BeastReader::default().read(black_box(path)).unwrap());
        });
    }
}

fn newick_layout(c: &mut Criterion) {
    let newick = caterpillar(500);
    c.bench_function("newick_parse_sort_500", |b| {
        b.iter(|| {
            let mut tree = parse_str(black_box(&newick)).unwrap();
            tree.sort_branches(true);
            tree
        });
    });
}

fn distances(c: &mut Criterion) {
    let tree = parse_str(caterpillar(200)).unwrap();
    c.bench_function("pairwise_200", |b| b.iter(|| pairwise_tip_distances(black_box(&tree))));

    let references = ["t0_2020-01-01", "t100_2020-01-17", "t199_2020-01-04"];
    c.bench_function("nearest_reference_200", |b| {
        b.iter(|| {
            let mut tree = tree.clone();
            label_by_nearest_reference(&mut tree, &references).unwrap()
        });
    });
}

criterion_group!(regression, beast_reading, newick_layout);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = distances
}
criterion_main!(regression, reporting);
