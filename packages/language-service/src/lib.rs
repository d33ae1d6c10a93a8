#![deny(clippy::all)]

//! Angular Language Service
//!
//! Resolves a cursor offset in a template to the AST node under it, across
//! both the template grammar and the embedded expression grammar.

pub mod config;
pub mod error;
pub mod span_validation;
pub mod target_node;
pub mod template_target;

pub use config::ResolverOptions;
pub use error::{ResolveError, Result};
pub use span_validation::validate_spans;
pub use target_node::{
    classify, is_expression_node, is_template_node, NodeFamily, NodeSummary, TargetNode,
};
pub use template_target::{
    find_node_at_position, get_path_to_node_at_position, get_target_at_position,
    PositionResolver, TargetContext, TemplateTarget,
};
