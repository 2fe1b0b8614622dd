//! Benchmarks for DOT serialization.
//!
//! Run with: `cargo bench`

use astdot::domain::{DotSerializer, IdScheme, TreeNode};
use astdot::infrastructure::SexprProducer;
use astdot::ports::TreeProducer;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Root with `width` leaf children.
fn wide_tree(width: usize) -> TreeNode {
    let mut root = TreeNode::leaf("LIST");
    for i in 0..width {
        root.push_child(TreeNode::new("NUM", i.to_string()));
    }
    root
}

/// Complete binary tree of the given height.
fn balanced_tree(height: usize) -> TreeNode {
    if height == 0 {
        return TreeNode::new("LEAF", "x");
    }
    TreeNode::new("BIN", "+")
        .with_child(balanced_tree(height - 1))
        .with_child(balanced_tree(height - 1))
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("dot/serialize");

    for (name, tree) in [
        ("wide", wide_tree(10_000)),
        ("balanced", balanced_tree(13)),
    ] {
        group.throughput(Throughput::Elements(tree.node_count() as u64));
        for scheme in [IdScheme::Depth, IdScheme::PreOrder] {
            let serializer = DotSerializer::new(scheme);
            group.bench_with_input(
                BenchmarkId::new(name, scheme),
                &tree,
                |b, tree| {
                    b.iter(|| {
                        let mut buf = Vec::with_capacity(1 << 20);
                        serializer.write(black_box(tree), &mut buf).unwrap();
                        buf
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_parse_notation(c: &mut Criterion) {
    let mut group = c.benchmark_group("sexpr/parse");
    group.sample_size(30);

    for width in [100, 1_000, 10_000].iter() {
        let src = format!(
            "(LIST {})",
            (0..*width).map(|i| format!("(NUM \"{}\")", i)).collect::<Vec<_>>().join(" ")
        );
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::new("children", width), &src, |b, src| {
            b.iter(|| SexprProducer::new(black_box(src.as_str())).produce().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_serialize, bench_parse_notation);
criterion_main!(benches);
