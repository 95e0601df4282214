//! Newick writing for any [TimeTree].

use crate::model::{LeafLabelMap, TimeTree};
use crate::parser::utils::escape_label;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing a tree to Newick format,
/// controlling how leaf labels are represented in the output string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NewickStyle {
    /// Use full leaf labels from the LeafLabelMap
    #[default]
    Label,
    /// Use 0-based leaf ids (0, 1, 2, ...)
    ZeroIndexed,
    /// Use 1-based leaf ids (1, 2, 3, ...)
    OneIndexed,
}

/// Writes the given trees to a file in Newick format, one tree per line.
///
/// # Arguments
/// * `file` - The file to write to
/// * `trees` - Trees to write, e.g. the marginal trees of several blocks
/// * `style` - The [NewickStyle] used for leaf labels
/// * `leaf_label_map` - Shared leaf labels, required for [NewickStyle::Label]
///
/// # Errors
/// Returns an I/O error if writing fails, or an `InvalidInput` error if
/// [NewickStyle::Label] is requested without labels.
pub fn write_newick_file<T: TimeTree>(
    file: File,
    trees: &[T],
    style: NewickStyle,
    leaf_label_map: Option<&LeafLabelMap>,
) -> io::Result<()> {
    let Some(first) = trees.first() else {
        return Ok(());
    };
    if style == NewickStyle::Label && leaf_label_map.is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Label style requires a leaf label map",
        ));
    }

    let mut writer = BufWriter::new(file);
    let estimated_capacity = estimate_newick_len(style, first, leaf_label_map);
    for tree in trees {
        let newick = to_newick_with_capacity(style, tree, leaf_label_map, estimated_capacity);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns the Newick representation of a tree with closing semicolon.
///
/// Branch lengths are height differences to the parent; the root gets none.
///
/// # Arguments
/// * `style` - The [NewickStyle] used to represent leaf labels in the output
/// * `tree` - Any [TimeTree], e.g. a clonal frame or a marginal tree
/// * `leaf_label_map` - [Mapping](LeafLabelMap) required when using
///   [NewickStyle::Label], otherwise can be `None`
///
/// # Returns
/// A Newick format string terminated with `;`. Returns an empty string if
/// `NewickStyle::Label` is used without providing a [LeafLabelMap].
///
/// # Example
/// ```
/// use acgtree::newick::{NewickStyle, parse_str, to_newick};
///
/// let frame = parse_str("((A:1,B:1):1,C:2);").unwrap();
/// assert_eq!(to_newick(NewickStyle::Label, &frame, Some(frame.labels())), "((A:1,B:1):1,C:2);");
/// assert_eq!(to_newick(NewickStyle::OneIndexed, &frame, None), "((1:1,2:1):1,3:2);");
/// ```
pub fn to_newick<T: TimeTree>(
    style: NewickStyle,
    tree: &T,
    leaf_label_map: Option<&LeafLabelMap>,
) -> String {
    if style == NewickStyle::Label && leaf_label_map.is_none() {
        return String::new();
    }

    let estimated_capacity = estimate_newick_len(style, tree, leaf_label_map);
    to_newick_with_capacity(style, tree, leaf_label_map, estimated_capacity)
}

/// Returns the Newick representation of a tree with pre-allocated capacity.
fn to_newick_with_capacity<T: TimeTree>(
    style: NewickStyle,
    tree: &T,
    leaf_label_map: Option<&LeafLabelMap>,
    estimated_capacity: usize,
) -> String {
    // Recursive helper for building the Newick string
    fn build_newick<T: TimeTree>(
        tree: &T,
        newick: &mut String,
        index: usize,
        style: NewickStyle,
        leaf_label_map: Option<&LeafLabelMap>,
    ) {
        match tree.children_of(index) {
            None => {
                let leaf_id = tree.leaf_id_of(index).unwrap_or(index);
                match (style, leaf_label_map) {
                    (NewickStyle::Label, Some(labels)) => {
                        let label = labels.get_label(leaf_id).unwrap_or_default();
                        newick.push_str(&escape_label(label))
                    }
                    (NewickStyle::OneIndexed, _) => newick.push_str(&(leaf_id + 1).to_string()),
                    _ => newick.push_str(&leaf_id.to_string()),
                }
            }
            Some((left, right)) => {
                newick.push('(');
                build_newick(tree, newick, left, style, leaf_label_map);
                newick.push(',');
                build_newick(tree, newick, right, style, leaf_label_map);
                newick.push(')');
            }
        }

        if let Some(branch_length) = tree.branch_length_of(index) {
            newick.push(':');
            newick.push_str(&branch_length.to_string());
        }
    }

    let mut newick = String::with_capacity(estimated_capacity);
    build_newick(tree, &mut newick, tree.root_index(), style, leaf_label_map);
    newick.push(';');

    newick
}

/// Estimates the length of a Newick string for a given tree.
///
/// Accounts for structure, labels/indices, and branch lengths, and is used
/// to pre-allocate string capacity.
fn estimate_newick_len<T: TimeTree>(
    style: NewickStyle,
    tree: &T,
    leaf_label_map: Option<&LeafLabelMap>,
) -> usize {
    // Each internal node: "(,)"
    const INTERNAL_NODE_CHARS: usize = 3;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let structure_capacity = tree.num_internal() * INTERNAL_NODE_CHARS;

    let num_leaves = tree.num_leaves();
    let label_capacity = match (style, leaf_label_map) {
        (NewickStyle::Label, Some(labels)) => {
            labels.labels().iter().map(|label| escape_label(label).len()).sum()
        }
        (NewickStyle::OneIndexed, _) => index_digit_capacity(1, num_leaves),
        _ => index_digit_capacity(0, num_leaves.saturating_sub(1)),
    };

    let branch_capacity = tree.num_vertices().saturating_sub(1) * BRANCH_LENGTH_CHARS;

    structure_capacity + label_capacity + branch_capacity + BUFFER_CHARS
}

/// Total number of decimal digits of all integers in `first..=last`.
///
/// Sums up, per digit count, the size of the overlap of the range with
/// `[10^(d-1), 10^d)`, e.g. `1..=14` gives `9 * 1 + 5 * 2 = 19`.
fn index_digit_capacity(first: usize, last: usize) -> usize {
    if first > last {
        return 0;
    }

    let mut total = 0;
    let (mut lower, mut digits) = (0usize, 1usize);
    while lower <= last {
        let upper = lower.saturating_mul(10).max(10) - 1;
        let from = lower.max(first);
        let to = upper.min(last);
        if from <= to {
            total += (to - from + 1) * digits;
        }
        if upper == usize::MAX - 1 || upper >= last {
            break;
        }
        lower = upper + 1;
        digits += 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_digit_capacity() {
        assert_eq!(index_digit_capacity(1, 14), 19);
        assert_eq!(index_digit_capacity(0, 9), 10);
        assert_eq!(index_digit_capacity(1, 102), 9 + 180 + 9);
        assert_eq!(index_digit_capacity(1, 0), 0);
    }
}
