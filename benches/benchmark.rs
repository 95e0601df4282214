use acgtree::marginal::MarginalTreeBuilder;
use acgtree::model::{Block, ClonalFrame, ClonalFrameBuilder, ConversionSet};
use acgtree::newick::{NewickStyle, parse_str, to_newick};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const HISTORIES: &[(&str, usize, usize, usize)] = &[
    ("n50-c200", 50, 200, 10),
    ("n200-c2k", 200, 2_000, 50),
    ("n1k-c10k", 1_000, 10_000, 100),
];

fn random_frame(num_leaves: usize, rng: &mut SmallRng) -> ClonalFrame {
    let mut builder = ClonalFrameBuilder::new(num_leaves);
    let mut lineages: Vec<(usize, f64)> =
        (0..num_leaves).map(|i| (builder.add_leaf(&format!("t{i}"), 0.0), 0.0)).collect();

    while lineages.len() > 1 {
        let (left, left_height) = lineages.swap_remove(rng.random_range(0..lineages.len()));
        let (right, right_height) = lineages.swap_remove(rng.random_range(0..lineages.len()));
        let height = left_height.max(right_height) + rng.random_range(0.01..0.5);
        let handle = if lineages.is_empty() {
            builder.add_root((left, right), height)
        } else {
            builder.add_internal((left, right), height)
        };
        lineages.push((handle, height));
    }

    builder.build().unwrap()
}

fn random_history(
    num_leaves: usize,
    num_conversions: usize,
    num_blocks: usize,
) -> (ClonalFrame, ConversionSet) {
    let mut rng = SmallRng::seed_from_u64(42);
    let frame = random_frame(num_leaves, &mut rng);
    let mut conversions = ConversionSet::new();

    while conversions.len() < num_conversions {
        let donor = rng.random_range(0..frame.num_nodes());
        let recipient = rng.random_range(0..frame.num_nodes());
        let (donor_low, donor_high) = frame.branch_range(donor).unwrap();
        let (recipient_low, recipient_high) = frame.branch_range(recipient).unwrap();
        let (low, high) = (donor_low.max(recipient_low), donor_high.min(recipient_high));
        if donor == recipient || high - low < 1e-6 {
            continue;
        }
        let height = low + (high - low) * rng.random_range(0.05..0.95);
        conversions.add(donor, recipient, height, [rng.random_range(0..num_blocks)]);
    }

    (frame, conversions)
}

fn single_block(c: &mut Criterion) {
    for &(name, leaves, num_conversions, blocks) in HISTORIES {
        let (frame, conversions) = random_history(leaves, num_conversions, blocks);
        let builder = MarginalTreeBuilder::new(&frame, &conversions);
        let block = Block::new(0);
        c.bench_function(&format!("marginal/{name}"), |b| {
            b.iter(|| builder.build(black_box(&block)).unwrap());
        });
    }
}

fn all_blocks(c: &mut Criterion) {
    for &(name, leaves, num_conversions, num_blocks) in HISTORIES {
        let (frame, conversions) = random_history(leaves, num_conversions, num_blocks);
        let builder = MarginalTreeBuilder::new(&frame, &conversions);
        let blocks: Vec<Block> = (0..num_blocks).map(Block::new).collect();
        c.bench_function(&format!("build_all/{name}"), |b| {
            b.iter(|| builder.build_all(black_box(&blocks)));
        });
    }
}

fn newick_io(c: &mut Criterion) {
    let (frame, _) = random_history(1_000, 0, 1);
    let newick = to_newick(NewickStyle::Label, &frame, Some(frame.labels()));

    c.bench_function("newick/parse-n1k", |b| {
        b.iter(|| parse_str(black_box(&newick)).unwrap());
    });
    c.bench_function("newick/write-n1k", |b| {
        b.iter(|| to_newick(NewickStyle::Label, black_box(&frame), Some(frame.labels())));
    });
}

criterion_group!(regression, single_block, newick_io);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = all_blocks
}
criterion_main!(regression, reporting);
