//! Selection of the conversions relevant to one block.

use crate::model::{Block, Conversion, ConversionSet};

/// Returns the conversions affecting `block`, sorted ascending by height.
///
/// Conversions of equal height are ordered by id, so the sweep sees them in
/// a reproducible order.
///
/// # Example
/// ```
/// use acgtree::marginal::block_conversions;
/// use acgtree::model::{Block, ConversionSet};
///
/// let mut conversions = ConversionSet::new();
/// conversions.add(2, 0, 0.5, [0]);
/// conversions.add(1, 0, 0.25, [1]);
/// conversions.add(1, 2, 0.25, [0]);
///
/// let heights: Vec<f64> = block_conversions(&conversions, &Block::new(0))
///     .iter()
///     .map(|c| c.height())
///     .collect();
/// assert_eq!(heights, vec![0.25, 0.5]);
/// ```
pub fn block_conversions<'a>(conversions: &'a ConversionSet, block: &Block) -> Vec<&'a Conversion> {
    let mut selected: Vec<&Conversion> = conversions
        .iter()
        .filter(|conversion| conversion.affects(block.id()))
        .collect();

    selected.sort_by(|c1, c2| {
        c1.height()
            .total_cmp(&c2.height())
            .then_with(|| c1.id().cmp(&c2.id()))
    });

    selected
}
