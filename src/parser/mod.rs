//! Low-level parsing infrastructure.
//!
//! This module provides the byte parser the Newick reader is built on,
//! the error type for parsing, and label escaping helpers.

pub mod byte_parser;
pub mod parsing_error;
pub mod utils;

pub use parsing_error::{ParsingError, ParsingErrorType};
