/**
 * Expression Parser Module
 *
 * Data model of the embedded expression language. Parsing itself happens
 * upstream; this module only describes the trees it produces.
 */
pub mod ast;

pub use ast::*;
