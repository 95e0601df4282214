//! Structs and logic to parse clonal frames from Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses single
//! strings or all trees of a byte source into [ClonalFrame]s.

use crate::model::{ClonalFrame, ClonalFrameBuilder, HEIGHT_EPSILON};
use crate::newick::defs::{DEFAULT_NUM_LEAVES_GUESS, NEWICK_LABEL_DELIMITERS, is_number_byte};
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::ParsingError;
use tracing::trace;

/// Vertex as read from the string: heights are only known once the whole
/// tree (and thus its depth) has been read.
#[derive(Debug)]
struct RawVertex {
    label: Option<String>,
    children: Option<(usize, usize)>,
    branch_length: f64,
}

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================#=
/// Parser (configuration) for Newick strings of clonal frames.
///
/// Trees must be binary, and every vertex other than the root must carry a
/// branch length; a branch length of the root is accepted and ignored.
/// Node heights are derived from the branch lengths: the vertex furthest
/// from the root has height 0, every other vertex the distance to that depth.
/// Trees with leaves at different heights (serial samples) are supported.
///
/// # Configuration
/// * [`with_num_leaves(num_leaves)`](Self::with_num_leaves)
///     - Can be configured with the number of leaves of the trees to parse,
///       otherwise it is inferred from the first parsed tree.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str): Parse single tree
/// * [`parse_all`](Self::parse_all): Parse all trees until EOF
///
/// # Example
/// ```
/// use acgtree::model::TimeTree;
/// use acgtree::newick::NewickParser;
/// use acgtree::parser::byte_parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((Kiwi:1.0,Moa:1.0):0.5,Emu:1.5);");
/// let mut newick_parser = NewickParser::new().with_num_leaves(3);
///
/// let frame = newick_parser.parse_str(&mut byte_parser).unwrap();
/// assert_eq!(frame.tree_height(), 1.5);
/// ```
#[derive(Debug)]
pub struct NewickParser {
    know_num_leaves: bool,
    num_leaves: usize,
    vertices: Vec<RawVertex>,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a parser with default settings.
    pub fn new() -> Self {
        Self {
            know_num_leaves: false,
            num_leaves: DEFAULT_NUM_LEAVES_GUESS,
            vertices: Vec::new(),
        }
    }

    /// Sets the number of leaves of the trees to parse (allocation hint).
    pub fn with_num_leaves(mut self, num_leaves: usize) -> Self {
        self.num_leaves = num_leaves;
        self.know_num_leaves = true;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses all Newick trees from the byte parser until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser over input containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<ClonalFrame>)` - All parsed frames
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(
        &mut self,
        mut byte_parser: ByteParser,
    ) -> Result<Vec<ClonalFrame>, ParsingError> {
        let mut frames = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            frames.push(self.parse_str(&mut byte_parser)?);
        }
        Ok(frames)
    }

    /// Parses a single Newick tree from the given [ByteParser].
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick tree string
    ///
    /// # Returns
    /// * `Ok(ClonalFrame)` - The parsed clonal frame
    /// * `Err(ParsingError)` - If the Newick format is invalid, a branch length
    ///   is missing, or the tree does not make a valid clonal frame
    pub fn parse_str(&mut self, parser: &mut ByteParser) -> Result<ClonalFrame, ParsingError> {
        self.vertices.clear();
        self.vertices.reserve((2 * self.num_leaves).saturating_sub(1));

        self.parse_root(parser)?;
        let frame = self.assemble()?;

        if !self.know_num_leaves {
            self.num_leaves = frame.labels().num_labels();
            self.know_num_leaves = true;
        }

        Ok(frame)
    }
}

// ============================================================================
// Parsing
// ============================================================================
impl NewickParser {
    /// Parses root of tree:
    /// - `(left, right)[:branch_length];` or `label[:branch_length];`
    /// - Skips leading comments and whitespace
    /// - Ignores the branch length of the root
    fn parse_root(&mut self, parser: &mut ByteParser) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let (label, children) = if parser.peek_is(b'(') {
            (None, Some(self.parse_children(parser)?))
        } else {
            (Some(self.parse_leaf_label(parser)?), None)
        };

        // Root may have an optional branch length
        self.parse_branch_length(parser)?;

        // Consume the terminating semicolon
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            return Err(match parser.peek() {
                None => ParsingError::unexpected_eof(parser),
                Some(b) => ParsingError::invalid_newick_string(
                    parser,
                    format!("Expected ';' at end of tree but found {:?}", char::from(b)),
                ),
            });
        }

        self.vertices.push(RawVertex {
            label,
            children,
            branch_length: 0.0,
        });
        Ok(())
    }

    /// Parses a vertex (either internal vertex or leaf) and returns its index:
    /// - `(left, right):branch_length` or `label:branch_length`
    /// - Skips leading comments and whitespace
    fn parse_vertex(&mut self, parser: &mut ByteParser) -> Result<usize, ParsingError> {
        parser.skip_comment_and_whitespace()?;

        let (label, children) = if parser.peek_is(b'(') {
            (None, Some(self.parse_children(parser)?))
        } else {
            (Some(self.parse_leaf_label(parser)?), None)
        };

        let Some(branch_length) = self.parse_branch_length(parser)? else {
            return Err(ParsingError::missing_branch_length(parser));
        };

        self.vertices.push(RawVertex {
            label,
            children,
            branch_length,
        });
        Ok(self.vertices.len() - 1)
    }

    /// Parses children pair `(left, right)` and returns their indices:
    /// - Expects parser at opening `(`
    fn parse_children(&mut self, parser: &mut ByteParser) -> Result<(usize, usize), ParsingError> {
        // Parse: "(left"
        if !parser.consume_if(b'(') {
            return Err(Self::unexpected(parser, "'(' before children"));
        }
        let left = self.parse_vertex(parser)?;

        // Parse: ",right"
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b',') {
            return Err(Self::unexpected(parser, "',' between children"));
        }
        let right = self.parse_vertex(parser)?;

        // Parse: ")"
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b')') {
            return Err(Self::unexpected(
                parser,
                "')' after children (only binary trees are supported)",
            ));
        }

        Ok((left, right))
    }

    /// Parses the (non-empty) label of a leaf.
    fn parse_leaf_label(&mut self, parser: &mut ByteParser) -> Result<String, ParsingError> {
        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if label.is_empty() {
            return Err(match parser.peek() {
                None => ParsingError::unexpected_eof(parser),
                Some(_) => {
                    ParsingError::invalid_newick_string(parser, "Empty leaf label".to_string())
                }
            });
        }
        Ok(label)
    }

    /// Parses optional branch length `[:number]`:
    /// - Skips comments/whitespace before and after `:`
    /// - Supports scientific notation (e.g., `1.5e-10`)
    ///
    /// # Returns
    /// - `Ok(Some(branch_length))` if found a non-negative branch length
    /// - `Ok(None)` if no branch length found
    /// - [ParsingError] if it couldn't parse the value or it is negative
    fn parse_branch_length(
        &mut self,
        parser: &mut ByteParser,
    ) -> Result<Option<f64>, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_comment_and_whitespace()?;

        let branch_length_str = parser.consume_while(is_number_byte);
        let value: f64 = branch_length_str.parse().map_err(|_| {
            ParsingError::invalid_newick_string(
                parser,
                format!("Invalid branch length: {branch_length_str:?}"),
            )
        })?;

        if !value.is_finite() || value < 0.0 {
            return Err(ParsingError::invalid_newick_string(
                parser,
                format!("Branch length must be finite and non-negative: {value}"),
            ));
        }

        Ok(Some(value))
    }

    fn unexpected(parser: &ByteParser, expected: &str) -> ParsingError {
        match parser.peek() {
            None => ParsingError::unexpected_eof(parser),
            Some(b) => ParsingError::invalid_newick_string(
                parser,
                format!("Expected {expected} but found {:?}", char::from(b)),
            ),
        }
    }
}

// ============================================================================
// Assembly
// ============================================================================
impl NewickParser {
    /// Turns the parsed vertices into a frame.
    ///
    /// Vertices were pushed children first, so the root is last and
    /// iterating backwards visits parents before their children.
    fn assemble(&mut self) -> Result<ClonalFrame, ParsingError> {
        let num_vertices = self.vertices.len();
        let mut depths = vec![0.0_f64; num_vertices];
        for index in (0..num_vertices).rev() {
            if let Some((left, right)) = self.vertices[index].children {
                depths[left] = depths[index] + self.vertices[left].branch_length;
                depths[right] = depths[index] + self.vertices[right].branch_length;
            }
        }
        let max_depth = depths.iter().copied().fold(0.0, f64::max);

        let mut builder = ClonalFrameBuilder::new(num_vertices.div_ceil(2));
        for (index, vertex) in self.vertices.drain(..).enumerate() {
            let mut height = max_depth - depths[index];
            if height < HEIGHT_EPSILON {
                height = 0.0;
            }

            // Builder handles coincide with vertex indices
            match (vertex.children, vertex.label) {
                (Some(children), _) if index + 1 == num_vertices => {
                    builder.add_root(children, height)
                }
                (Some(children), _) => builder.add_internal(children, height),
                (None, label) => builder.add_leaf(label.as_deref().unwrap_or_default(), height),
            };
        }

        let frame = builder.build()?;
        trace!(leaves = frame.labels().num_labels(), height = max_depth, "parsed clonal frame");
        Ok(frame)
    }
}
