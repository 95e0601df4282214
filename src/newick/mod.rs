//! Newick format reader for clonal frames and writer for any tree.
//!
//! This module provides [`NewickParser`] to parse Newick strings into
//! [`ClonalFrame`]s, and [`to_newick`] / [`write_newick_file`] to write any
//! [`TimeTree`](crate::model::TimeTree), in particular marginal trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single string into a [`ClonalFrame`]
//! * [`parse_file`] - parses all trees of a file
//!
//! # Format
//! The Newick format has the following simple grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex ',' vertex ')' branch_length`
//! * `leaf ::= label branch_length`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Branch lengths are required, except for the root (where it is ignored)
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere whitespace is allowed
//! * Labels with special characters are enclosed in single quotes

mod defs;
mod parser;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::ClonalFrame;
use crate::parser::byte_parser::ByteParser;
use crate::parser::ParsingError;
use std::fs;
use std::path::Path;
use tracing::debug;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a file containing a semicolon-separated list of Newick strings
/// and returns one [`ClonalFrame`] per tree.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
///
/// # Returns
/// * `Vec<ClonalFrame>` - All parsed frames, in file order
/// * [`ParsingError`] - If file reading fails or a tree is invalid
///
/// # Example
/// ```no_run
/// use acgtree::newick::parse_file;
///
/// let frames = parse_file("frames.nwk")?;
/// println!("Parsed {} clonal frames", frames.len());
/// # Ok::<(), acgtree::parser::ParsingError>(())
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<ClonalFrame>, ParsingError> {
    let contents = fs::read(path.as_ref())?;
    let byte_parser = ByteParser::from_vec(contents);

    let frames = NewickParser::new().parse_all(byte_parser)?;
    debug!(path = %path.as_ref().display(), frames = frames.len(), "parsed newick file");
    Ok(frames)
}

/// Parses a single Newick string into a [`ClonalFrame`].
///
/// Only whitespace and comments may follow the terminating `;`.
///
/// # Arguments
/// * `newick` - The Newick format string to parse
///
/// # Returns
/// * [`ClonalFrame`] - Frame with heights derived from the branch lengths
/// * [`ParsingError`] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use acgtree::model::TimeTree;
/// use acgtree::newick::parse_str;
///
/// let frame = parse_str("((A:1,B:1):1,C:2);").unwrap();
/// assert_eq!(frame.num_leaves(), 3);
/// assert_eq!(frame.tree_height(), 2.0);
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<ClonalFrame, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    let frame = NewickParser::new().parse_str(&mut byte_parser)?;

    byte_parser.skip_comment_and_whitespace()?;
    if !byte_parser.is_eof() {
        return Err(ParsingError::invalid_newick_string(
            &byte_parser,
            "Unexpected content after end of tree".to_string(),
        ));
    }

    Ok(frame)
}
