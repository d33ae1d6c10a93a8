//! Render3 AST
//!
//! Template-level nodes produced by transforming parsed HTML: elements,
//! `<ng-template>`s (including the ones synthesized from `*directive`
//! attributes), attributes, bindings, references and variables. Bindings
//! embed expression trees from [`crate::expression_parser`].

use crate::expression_parser::ast::AST as ExprAST;
use crate::parse_util::{AbsoluteSourceSpan, ParseError, ParseSourceFile};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Base trait for all R3 AST nodes
pub trait Node {
    fn source_span(&self) -> AbsoluteSourceSpan;
    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result;
}

/// Text node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    pub source_span: AbsoluteSourceSpan,
}

impl Node for Text {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_text(self)
    }
}

/// Bound text node (interpolation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundText {
    pub value: ExprAST,
    pub source_span: AbsoluteSourceSpan,
}

impl Node for BoundText {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_bound_text(self)
    }
}

/// Text attribute in the template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextAttribute {
    pub name: String,
    pub value: String,
    pub source_span: AbsoluteSourceSpan,
    pub key_span: Option<AbsoluteSourceSpan>,
    pub value_span: Option<AbsoluteSourceSpan>,
}

impl Node for TextAttribute {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_text_attribute(self)
    }
}

/// Binding types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingType {
    #[default]
    Property,
    Attribute,
    Class,
    Style,
    Animation,
    /// `[(prop)]="value"`; paired with a `propChange` [`BoundEvent`].
    TwoWay,
}

/// Parsed event types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedEventType {
    #[default]
    Regular,
    Animation,
    TwoWay,
}

/// Bound attribute node.
///
/// `name` is semantic: for microsyntax it is the synthesized input name
/// (`ngForOf`), while `key_span` still points at the surface token (`of`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundAttribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: BindingType,
    pub value: ExprAST,
    pub unit: Option<String>,
    pub source_span: AbsoluteSourceSpan,
    pub key_span: AbsoluteSourceSpan,
    pub value_span: Option<AbsoluteSourceSpan>,
}

impl Node for BoundAttribute {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_bound_attribute(self)
    }
}

/// Bound event node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundEvent {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ParsedEventType,
    pub handler: ExprAST,
    pub target: Option<String>,
    pub phase: Option<String>,
    pub source_span: AbsoluteSourceSpan,
    pub handler_span: AbsoluteSourceSpan,
    pub key_span: AbsoluteSourceSpan,
}

impl Node for BoundEvent {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_bound_event(self)
    }
}

/// Element node. `source_span` covers the start tag, the children and the
/// end tag (when there is one).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub source_span: AbsoluteSourceSpan,
    pub start_source_span: AbsoluteSourceSpan,
    pub end_source_span: Option<AbsoluteSourceSpan>,
}

impl Node for Element {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_element(self)
    }
}

/// Template attribute (either bound or text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateAttr {
    Bound(BoundAttribute),
    Text(TextAttribute),
}

/// Template node: an explicit `<ng-template>`, or the wrapper synthesized
/// for an element carrying a `*directive` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub tag_name: Option<String>,
    pub attributes: Vec<TextAttribute>,
    pub inputs: Vec<BoundAttribute>,
    pub outputs: Vec<BoundEvent>,
    /// Attributes produced by desugaring the `*directive` microsyntax.
    pub template_attrs: Vec<TemplateAttr>,
    pub children: Vec<R3Node>,
    pub references: Vec<Reference>,
    pub variables: Vec<Variable>,
    pub source_span: AbsoluteSourceSpan,
    pub start_source_span: AbsoluteSourceSpan,
    pub end_source_span: Option<AbsoluteSourceSpan>,
}

impl Node for Template {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_template(self)
    }
}

/// Content node (ng-content)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub selector: String,
    pub attributes: Vec<TextAttribute>,
    pub children: Vec<R3Node>,
    pub source_span: AbsoluteSourceSpan,
    pub start_source_span: AbsoluteSourceSpan,
    pub end_source_span: Option<AbsoluteSourceSpan>,
}

impl Content {
    pub fn name(&self) -> &str {
        "ng-content"
    }
}

impl Node for Content {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_content(self)
    }
}

/// Variable node: `let-name="value"` on an `<ng-template>`, or a `let`
/// clause of a microsyntax expression. For the latter `source_span` covers
/// the whole clause including the `let` keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: String,
    pub source_span: AbsoluteSourceSpan,
    pub key_span: AbsoluteSourceSpan,
    pub value_span: Option<AbsoluteSourceSpan>,
}

impl Node for Variable {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_variable(self)
    }
}

/// Reference node (`#name` or `ref-name`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    pub value: String,
    pub source_span: AbsoluteSourceSpan,
    pub key_span: AbsoluteSourceSpan,
    pub value_span: Option<AbsoluteSourceSpan>,
}

impl Node for Reference {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_reference(self)
    }
}

/// ICU expression (`{count, plural, =0 {none} other {{{count}} items}}`).
/// Maps keep insertion order, which is document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Icu {
    pub vars: IndexMap<String, BoundText>,
    pub placeholders: IndexMap<String, IcuPlaceholder>,
    pub source_span: AbsoluteSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IcuPlaceholder {
    Text(Text),
    BoundText(BoundText),
}

impl Node for IcuPlaceholder {
    fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            IcuPlaceholder::Text(t) => t.source_span,
            IcuPlaceholder::BoundText(t) => t.source_span,
        }
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        match self {
            IcuPlaceholder::Text(t) => visitor.visit_text(t),
            IcuPlaceholder::BoundText(t) => visitor.visit_bound_text(t),
        }
    }
}

impl Node for Icu {
    fn source_span(&self) -> AbsoluteSourceSpan {
        self.source_span
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        visitor.visit_icu(self)
    }
}

/// Enum for all R3 node types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum R3Node {
    Text(Text),
    BoundText(BoundText),
    TextAttribute(TextAttribute),
    BoundAttribute(BoundAttribute),
    BoundEvent(BoundEvent),
    Element(Element),
    Template(Template),
    Content(Content),
    Variable(Variable),
    Reference(Reference),
    Icu(Icu),
}

impl Node for R3Node {
    fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            R3Node::Text(n) => n.source_span,
            R3Node::BoundText(n) => n.source_span,
            R3Node::TextAttribute(n) => n.source_span,
            R3Node::BoundAttribute(n) => n.source_span,
            R3Node::BoundEvent(n) => n.source_span,
            R3Node::Element(n) => n.source_span,
            R3Node::Template(n) => n.source_span,
            R3Node::Content(n) => n.source_span,
            R3Node::Variable(n) => n.source_span,
            R3Node::Reference(n) => n.source_span,
            R3Node::Icu(n) => n.source_span,
        }
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        match self {
            R3Node::Text(n) => n.visit(visitor),
            R3Node::BoundText(n) => n.visit(visitor),
            R3Node::TextAttribute(n) => n.visit(visitor),
            R3Node::BoundAttribute(n) => n.visit(visitor),
            R3Node::BoundEvent(n) => n.visit(visitor),
            R3Node::Element(n) => n.visit(visitor),
            R3Node::Template(n) => n.visit(visitor),
            R3Node::Content(n) => n.visit(visitor),
            R3Node::Variable(n) => n.visit(visitor),
            R3Node::Reference(n) => n.visit(visitor),
            R3Node::Icu(n) => n.visit(visitor),
        }
    }
}

impl Node for TemplateAttr {
    fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            TemplateAttr::Bound(b) => b.source_span,
            TemplateAttr::Text(t) => t.source_span,
        }
    }

    fn visit<'a, V: Visitor<'a>>(&'a self, visitor: &mut V) -> V::Result {
        match self {
            TemplateAttr::Bound(b) => visitor.visit_bound_attribute(b),
            TemplateAttr::Text(t) => visitor.visit_text_attribute(t),
        }
    }
}

/// Visitor trait for R3 AST. The lifetime lets visitors keep references to
/// the nodes they are handed.
pub trait Visitor<'a> {
    type Result;

    fn visit_element(&mut self, element: &'a Element) -> Self::Result;
    fn visit_template(&mut self, template: &'a Template) -> Self::Result;
    fn visit_content(&mut self, content: &'a Content) -> Self::Result;
    fn visit_variable(&mut self, variable: &'a Variable) -> Self::Result;
    fn visit_reference(&mut self, reference: &'a Reference) -> Self::Result;
    fn visit_text_attribute(&mut self, attribute: &'a TextAttribute) -> Self::Result;
    fn visit_bound_attribute(&mut self, attribute: &'a BoundAttribute) -> Self::Result;
    fn visit_bound_event(&mut self, event: &'a BoundEvent) -> Self::Result;
    fn visit_text(&mut self, text: &'a Text) -> Self::Result;
    fn visit_bound_text(&mut self, text: &'a BoundText) -> Self::Result;
    fn visit_icu(&mut self, icu: &'a Icu) -> Self::Result;
}

/// Visit all nodes in a list
pub fn visit_all<'a, V: Visitor<'a>>(visitor: &mut V, nodes: &'a [R3Node]) -> Vec<V::Result> {
    nodes.iter().map(|node| node.visit(visitor)).collect()
}

/// Output of the template parser: the root nodes plus the diagnostics
/// reported while producing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Render3ParseResult {
    pub source_file: ParseSourceFile,
    pub nodes: Vec<R3Node>,
    #[serde(default)]
    pub errors: Vec<ParseError>,
}

impl Render3ParseResult {
    pub fn new(source_file: ParseSourceFile, nodes: Vec<R3Node>) -> Self {
        Render3ParseResult {
            source_file,
            nodes,
            errors: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.level == crate::parse_util::ParseErrorLevel::Error)
    }
}
