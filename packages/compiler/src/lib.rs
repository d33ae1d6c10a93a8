#![deny(clippy::all)]

/**
 * Angular Template AST
 *
 * Data model shared by the template parser and the tooling that consumes
 * its output: absolute source spans, the template (render3) AST and the
 * embedded expression AST.
 */

pub mod expression_parser;
pub mod parse_util;
pub mod render3;

// Re-exports
pub use expression_parser::ast::AST;
pub use parse_util::{AbsoluteSourceSpan, ParseError, ParseErrorLevel, ParseSourceFile};
pub use render3::r3_ast::{R3Node, Render3ParseResult};
