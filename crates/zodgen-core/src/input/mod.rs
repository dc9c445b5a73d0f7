//! Input parsers.
//!
//! Each parser reads source text and produces the declaration list consumed
//! by [`generate`](crate::generate::generate).

#[cfg(feature = "input-typescript")]
pub mod typescript;

#[cfg(feature = "input-typescript")]
pub use typescript::parse_declarations;

/// Errors surfaced while parsing input source text.
///
/// Unsupported *declarations* are skipped, not errored; this covers failures
/// to make sense of the input at all.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported input construct: {0}")]
    Unsupported(String),
}
