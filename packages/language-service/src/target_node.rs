//! Node handles spanning both grammars.
//!
//! Template nodes and expression nodes live in different trees with different
//! shapes. [`TargetNode`] is a borrowed handle over either, and
//! [`classify`] reports which family a handle belongs to.

use angular_compiler::expression_parser::ast::AST;
use angular_compiler::parse_util::AbsoluteSourceSpan;
use angular_compiler::render3::r3_ast as t;
use serde::Serialize;
use std::ptr;

/// The grammar a node comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeFamily {
    Template,
    Expression,
}

/// A borrowed node of a parsed template, from either grammar.
///
/// Two handles are equal when they point at the same node.
#[derive(Debug, Clone, Copy)]
pub enum TargetNode<'a> {
    Element(&'a t::Element),
    Template(&'a t::Template),
    Content(&'a t::Content),
    Text(&'a t::Text),
    BoundText(&'a t::BoundText),
    Icu(&'a t::Icu),
    TextAttribute(&'a t::TextAttribute),
    BoundAttribute(&'a t::BoundAttribute),
    BoundEvent(&'a t::BoundEvent),
    Reference(&'a t::Reference),
    Variable(&'a t::Variable),
    Expression(&'a AST),
}

/// Reports the family of `node`.
pub fn classify(node: &TargetNode<'_>) -> NodeFamily {
    match node {
        TargetNode::Element(_)
        | TargetNode::Template(_)
        | TargetNode::Content(_)
        | TargetNode::Text(_)
        | TargetNode::BoundText(_)
        | TargetNode::Icu(_)
        | TargetNode::TextAttribute(_)
        | TargetNode::BoundAttribute(_)
        | TargetNode::BoundEvent(_)
        | TargetNode::Reference(_)
        | TargetNode::Variable(_) => NodeFamily::Template,
        TargetNode::Expression(_) => NodeFamily::Expression,
    }
}

pub fn is_template_node(node: &TargetNode<'_>) -> bool {
    classify(node) == NodeFamily::Template
}

pub fn is_expression_node(node: &TargetNode<'_>) -> bool {
    classify(node) == NodeFamily::Expression
}

impl<'a> TargetNode<'a> {
    pub fn family(&self) -> NodeFamily {
        classify(self)
    }

    /// Variant name, e.g. `"BoundAttribute"` or `"PropertyRead"`.
    pub fn kind(&self) -> &'static str {
        match self {
            TargetNode::Element(_) => "Element",
            TargetNode::Template(_) => "Template",
            TargetNode::Content(_) => "Content",
            TargetNode::Text(_) => "Text",
            TargetNode::BoundText(_) => "BoundText",
            TargetNode::Icu(_) => "Icu",
            TargetNode::TextAttribute(_) => "TextAttribute",
            TargetNode::BoundAttribute(_) => "BoundAttribute",
            TargetNode::BoundEvent(_) => "BoundEvent",
            TargetNode::Reference(_) => "Reference",
            TargetNode::Variable(_) => "Variable",
            TargetNode::Expression(ast) => ast.kind(),
        }
    }

    /// Semantic name of the node, if its variant has one. For desugared
    /// nodes this is the synthesized name, which may differ from the text
    /// under the node's span.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            TargetNode::Element(n) => Some(n.name.as_str()),
            TargetNode::Template(n) => n.tag_name.as_deref(),
            TargetNode::Content(_) => Some("ng-content"),
            TargetNode::TextAttribute(n) => Some(n.name.as_str()),
            TargetNode::BoundAttribute(n) => Some(n.name.as_str()),
            TargetNode::BoundEvent(n) => Some(n.name.as_str()),
            TargetNode::Reference(n) => Some(n.name.as_str()),
            TargetNode::Variable(n) => Some(n.name.as_str()),
            TargetNode::Expression(ast) => ast.name(),
            TargetNode::Text(_) | TargetNode::BoundText(_) | TargetNode::Icu(_) => None,
        }
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            TargetNode::Element(n) => n.source_span,
            TargetNode::Template(n) => n.source_span,
            TargetNode::Content(n) => n.source_span,
            TargetNode::Text(n) => n.source_span,
            TargetNode::BoundText(n) => n.source_span,
            TargetNode::Icu(n) => n.source_span,
            TargetNode::TextAttribute(n) => n.source_span,
            TargetNode::BoundAttribute(n) => n.source_span,
            TargetNode::BoundEvent(n) => n.source_span,
            TargetNode::Reference(n) => n.source_span,
            TargetNode::Variable(n) => n.source_span,
            TargetNode::Expression(ast) => ast.source_span(),
        }
    }

    /// Whether the node is made of a key and an optional value, like an
    /// attribute, a binding, a reference or a variable.
    pub fn is_key_value(&self) -> bool {
        matches!(
            self,
            TargetNode::TextAttribute(_)
                | TargetNode::BoundAttribute(_)
                | TargetNode::BoundEvent(_)
                | TargetNode::Reference(_)
                | TargetNode::Variable(_)
        )
    }

    pub fn key_span(&self) -> Option<AbsoluteSourceSpan> {
        match self {
            TargetNode::TextAttribute(n) => n.key_span,
            TargetNode::BoundAttribute(n) => Some(n.key_span),
            TargetNode::BoundEvent(n) => Some(n.key_span),
            TargetNode::Reference(n) => Some(n.key_span),
            TargetNode::Variable(n) => Some(n.key_span),
            _ => None,
        }
    }

    /// Span of the value part. A binding without an explicit value span
    /// falls back to the span of its expression.
    pub fn value_span(&self) -> Option<AbsoluteSourceSpan> {
        match self {
            TargetNode::TextAttribute(n) => n.value_span,
            TargetNode::BoundAttribute(n) => n.value_span.or(Some(n.value.source_span())),
            TargetNode::BoundEvent(n) => Some(n.handler_span),
            TargetNode::Reference(n) => n.value_span,
            TargetNode::Variable(n) => n.value_span,
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&'a AST> {
        match *self {
            TargetNode::Expression(ast) => Some(ast),
            _ => None,
        }
    }

    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            family: self.family(),
            kind: self.kind(),
            name: self.name().map(str::to_string),
            span: self.source_span(),
        }
    }
}

impl PartialEq for TargetNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TargetNode::Element(a), TargetNode::Element(b)) => ptr::eq(*a, *b),
            (TargetNode::Template(a), TargetNode::Template(b)) => ptr::eq(*a, *b),
            (TargetNode::Content(a), TargetNode::Content(b)) => ptr::eq(*a, *b),
            (TargetNode::Text(a), TargetNode::Text(b)) => ptr::eq(*a, *b),
            (TargetNode::BoundText(a), TargetNode::BoundText(b)) => ptr::eq(*a, *b),
            (TargetNode::Icu(a), TargetNode::Icu(b)) => ptr::eq(*a, *b),
            (TargetNode::TextAttribute(a), TargetNode::TextAttribute(b)) => ptr::eq(*a, *b),
            (TargetNode::BoundAttribute(a), TargetNode::BoundAttribute(b)) => ptr::eq(*a, *b),
            (TargetNode::BoundEvent(a), TargetNode::BoundEvent(b)) => ptr::eq(*a, *b),
            (TargetNode::Reference(a), TargetNode::Reference(b)) => ptr::eq(*a, *b),
            (TargetNode::Variable(a), TargetNode::Variable(b)) => ptr::eq(*a, *b),
            (TargetNode::Expression(a), TargetNode::Expression(b)) => ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl Eq for TargetNode<'_> {}

/// Plain description of a node, for logs and JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSummary {
    pub family: NodeFamily,
    pub kind: &'static str,
    pub name: Option<String>,
    pub span: AbsoluteSourceSpan,
}

impl<'a> From<&'a t::R3Node> for TargetNode<'a> {
    fn from(node: &'a t::R3Node) -> Self {
        match node {
            t::R3Node::Text(n) => TargetNode::Text(n),
            t::R3Node::BoundText(n) => TargetNode::BoundText(n),
            t::R3Node::TextAttribute(n) => TargetNode::TextAttribute(n),
            t::R3Node::BoundAttribute(n) => TargetNode::BoundAttribute(n),
            t::R3Node::BoundEvent(n) => TargetNode::BoundEvent(n),
            t::R3Node::Element(n) => TargetNode::Element(n),
            t::R3Node::Template(n) => TargetNode::Template(n),
            t::R3Node::Content(n) => TargetNode::Content(n),
            t::R3Node::Variable(n) => TargetNode::Variable(n),
            t::R3Node::Reference(n) => TargetNode::Reference(n),
            t::R3Node::Icu(n) => TargetNode::Icu(n),
        }
    }
}

impl<'a> From<&'a t::TemplateAttr> for TargetNode<'a> {
    fn from(attr: &'a t::TemplateAttr) -> Self {
        match attr {
            t::TemplateAttr::Bound(b) => TargetNode::BoundAttribute(b),
            t::TemplateAttr::Text(a) => TargetNode::TextAttribute(a),
        }
    }
}

impl<'a> From<&'a t::IcuPlaceholder> for TargetNode<'a> {
    fn from(placeholder: &'a t::IcuPlaceholder) -> Self {
        match placeholder {
            t::IcuPlaceholder::Text(n) => TargetNode::Text(n),
            t::IcuPlaceholder::BoundText(n) => TargetNode::BoundText(n),
        }
    }
}

impl<'a> From<&'a AST> for TargetNode<'a> {
    fn from(ast: &'a AST) -> Self {
        TargetNode::Expression(ast)
    }
}

macro_rules! impl_from_template_node {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a t::$ty> for TargetNode<'a> {
                fn from(node: &'a t::$ty) -> Self {
                    TargetNode::$ty(node)
                }
            }
        )*
    };
}

impl_from_template_node!(
    Element,
    Template,
    Content,
    Text,
    BoundText,
    Icu,
    TextAttribute,
    BoundAttribute,
    BoundEvent,
    Reference,
    Variable,
);
