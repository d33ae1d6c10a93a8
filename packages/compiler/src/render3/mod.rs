//! Render3 Module
//!
//! Template AST consumed by editor tooling.

pub mod r3_ast;

pub use r3_ast::{Node, R3Node, Render3ParseResult, Visitor};
