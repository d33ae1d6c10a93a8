//! Error types for position resolution.
//!
//! A position that hits no node is not an error; these variants describe
//! broken preconditions on the input tree or the caller's arguments.

use angular_compiler::AbsoluteSourceSpan;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The position lies past the end of the template text.
    #[error("position {position} is outside the template (length {len})")]
    PositionOutOfRange { position: usize, len: usize },

    /// A node span ends before it starts.
    #[error("{kind} has an inverted span [{start}, {end})")]
    InvalidSpan {
        kind: &'static str,
        start: usize,
        end: usize,
    },

    /// A node span runs past the end of the template text.
    #[error("{kind} span ends at {end}, past the end of the template (length {len})")]
    SpanOutOfBounds {
        kind: &'static str,
        end: usize,
        len: usize,
    },

    /// A node is not contained in its structural parent.
    #[error("{child} {child_span} is not contained in its parent {parent} {parent_span}")]
    ChildOutsideParent {
        child: &'static str,
        child_span: AbsoluteSourceSpan,
        parent: &'static str,
        parent_span: AbsoluteSourceSpan,
    },

    #[error("invalid resolver options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("failed to read resolver options: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
