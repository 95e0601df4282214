use acgtree::model::{BlockId, ClonalFrame, ClonalFrameBuilder, ConversionSet};
use acgtree::newick::parse_str;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// `((A:1,B:1):1,C:2);` with A=0, B=1, C=2, D=(A,B)=3 at 1.0 and root R=4 at 2.0
#[allow(dead_code)]
pub fn three_taxa_frame() -> ClonalFrame {
    parse_str("((A:1,B:1):1,C:2);").unwrap()
}

/// Random clonal frame on `num_leaves` taxa (some sampled above height 0)
/// with `num_conversions` valid conversions spread over `num_blocks` blocks.
#[allow(dead_code)]
pub fn random_history(
    num_leaves: usize,
    num_conversions: usize,
    num_blocks: usize,
    seed: u64,
) -> (ClonalFrame, ConversionSet) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let frame = random_frame(num_leaves, &mut rng);
    let conversions = random_conversions(&frame, num_conversions, num_blocks, &mut rng);
    (frame, conversions)
}

/// Joins random pairs of lineages until one is left.
#[allow(dead_code)]
pub fn random_frame(num_leaves: usize, rng: &mut SmallRng) -> ClonalFrame {
    let mut builder = ClonalFrameBuilder::new(num_leaves);
    let mut lineages: Vec<(usize, f64)> = (0..num_leaves)
        .map(|i| {
            let height = if rng.random_bool(0.3) { rng.random_range(0.0..0.5) } else { 0.0 };
            (builder.add_leaf(&format!("t{i}"), height), height)
        })
        .collect();

    while lineages.len() > 1 {
        let (left, left_height) = lineages.swap_remove(rng.random_range(0..lineages.len()));
        let (right, right_height) = lineages.swap_remove(rng.random_range(0..lineages.len()));
        let height = left_height.max(right_height) + rng.random_range(0.1..1.0);

        let handle = if lineages.is_empty() {
            builder.add_root((left, right), height)
        } else {
            builder.add_internal((left, right), height)
        };
        lineages.push((handle, height));
    }

    builder.build().unwrap()
}

/// Places conversions strictly inside the overlap of random donor and recipient branches.
#[allow(dead_code)]
pub fn random_conversions(
    frame: &ClonalFrame,
    num_conversions: usize,
    num_blocks: usize,
    rng: &mut SmallRng,
) -> ConversionSet {
    let mut conversions = ConversionSet::new();
    let num_nodes = frame.num_nodes();
    if num_nodes < 2 {
        return conversions;
    }

    let mut attempts = 0;
    while conversions.len() < num_conversions && attempts < 100 * (num_conversions + 1) {
        attempts += 1;

        let donor = rng.random_range(0..num_nodes);
        let recipient = rng.random_range(0..num_nodes);
        if donor == recipient {
            continue;
        }

        let (donor_low, donor_high) = frame.branch_range(donor).unwrap();
        let (recipient_low, recipient_high) = frame.branch_range(recipient).unwrap();
        let low = donor_low.max(recipient_low);
        let high = donor_high.min(recipient_high);
        if high - low < 1e-6 {
            continue;
        }

        let height = low + (high - low) * rng.random_range(0.05..0.95);
        let mut blocks: Vec<BlockId> = (0..num_blocks).filter(|_| rng.random_bool(0.5)).collect();
        if blocks.is_empty() {
            blocks.push(rng.random_range(0..num_blocks.max(1)));
        }
        conversions.add(donor, recipient, height, blocks);
    }

    conversions
}
