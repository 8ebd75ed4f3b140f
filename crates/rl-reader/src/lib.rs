//! The rlang reader (spec §4.1): source text in, an ordered sequence of
//! values out. Re-entrant, deterministic, and never evaluates anything.

pub mod lexer;
pub mod parser;
pub mod token;

use rl_core::Value;
use tracing::debug;

/// Parses `source` into the ordered sequence of values it denotes.
/// `source_name` is carried only for diagnostics (teacher convention: the
/// compiler's own `parse`/`compile` entry points take a file label purely
/// for error reporting, never to change parsing behavior).
pub fn parse_source(source: &str, source_name: &str) -> Result<Vec<Value>, rl_core::RlError> {
    debug!(source_name, len = source.len(), "parsing source");
    let tokens = lexer::tokenize(source)?;
    parser::Parser::new(tokens).parse_all()
}
