//! Position resolution
//!
//! Maps an offset in the template text to the innermost node whose span
//! covers it. The walk is depth-first over the template tree and continues
//! into the expression trees embedded in bindings and interpolations.

use crate::config::ResolverOptions;
use crate::error::{ResolveError, Result};
use crate::span_validation::validate_spans;
use crate::target_node::TargetNode;
use angular_compiler::expression_parser::ast::AST;
use angular_compiler::parse_util::AbsoluteSourceSpan;
use angular_compiler::render3::r3_ast::{self as t, Node, R3Node, Render3ParseResult, Visitor};
use rayon::prelude::*;
use smallvec::SmallVec;

/// Containing nodes from the root down to the innermost match.
type NodePath<'a> = SmallVec<[TargetNode<'a>; 8]>;

/// Walks the tree, recording every node that contains `position`.
///
/// Only the first sibling containing the position is entered; its siblings
/// are not looked at. Each `visit_*` method therefore handles a node that
/// is already on the path and only has to pick among its children.
struct R3Visitor<'a> {
    position: usize,
    path: NodePath<'a>,
    /// Resolve microsyntax keywords and punctuation to nothing instead of to
    /// the binding or host element around them.
    skip_microsyntax_tokens: bool,
    /// Set when the walk stopped between microsyntax bindings.
    in_microsyntax_gap: bool,
    /// The attribute or variable desugared from a `*directive` value that
    /// the walk entered, if any.
    desugared: Option<TargetNode<'a>>,
}

impl<'a> R3Visitor<'a> {
    fn new(position: usize, options: &ResolverOptions) -> Self {
        R3Visitor {
            position,
            path: SmallVec::new(),
            skip_microsyntax_tokens: options.key_value_spans_only,
            in_microsyntax_gap: false,
            desugared: None,
        }
    }

    fn run(nodes: &'a [R3Node], position: usize, options: &ResolverOptions) -> Self {
        let mut visitor = R3Visitor::new(position, options);
        visitor.visit_first(nodes);
        visitor
    }

    /// Records `node` and descends into it if it contains the position.
    fn visit<N>(&mut self, node: &'a N) -> bool
    where
        N: Node,
        TargetNode<'a>: From<&'a N>,
    {
        if !node.source_span().contains(self.position) {
            return false;
        }
        let target = TargetNode::from(node);
        log::trace!(
            "position {} in {} {}",
            self.position,
            target.kind(),
            target.source_span()
        );
        self.path.push(target);
        node.visit(self);
        true
    }

    fn visit_first<N, I>(&mut self, nodes: I) -> bool
    where
        N: Node + 'a,
        I: IntoIterator<Item = &'a N>,
        TargetNode<'a>: From<&'a N>,
    {
        nodes.into_iter().any(|node| self.visit(node))
    }

    /// Like `visit_first`, remembering the match when `nodes` were
    /// desugared from microsyntax.
    fn visit_first_desugared<N>(&mut self, nodes: &'a [N], desugared: bool) -> bool
    where
        N: Node + 'a,
        TargetNode<'a>: From<&'a N>,
    {
        let depth = self.path.len();
        if !self.visit_first(nodes) {
            return false;
        }
        if desugared {
            self.desugared = self.path.get(depth).copied();
        }
        true
    }

    /// Whether the walk ended on microsyntax text that no node stands for:
    /// a gap between bindings, or a desugared binding away from its key and
    /// value (`let`, `=`).
    fn on_microsyntax_token(&self) -> bool {
        if self.in_microsyntax_gap {
            return true;
        }
        match (self.path.last(), self.desugared) {
            (Some(last), Some(desugared)) if *last == desugared => {
                self.skip_microsyntax_tokens && !on_key_or_value(last, self.position)
            }
            _ => false,
        }
    }

    fn visit_expression(&mut self, ast: &'a AST) -> bool {
        if !ast.source_span().contains(self.position) {
            return false;
        }
        match ast {
            // No text of its own, so it is never a target.
            AST::ImplicitReceiver(_) => false,
            // `value | ` with the pipe name missing: not a target, but the
            // piped expression and arguments are.
            AST::BindingPipe(pipe) if pipe.is_missing_name() => {
                self.visit_expressions(ast.children())
            }
            _ => {
                log::trace!(
                    "position {} in {} {}",
                    self.position,
                    ast.kind(),
                    ast.source_span()
                );
                self.path.push(TargetNode::Expression(ast));
                self.visit_expressions(ast.children());
                true
            }
        }
    }

    fn visit_expressions(&mut self, children: impl IntoIterator<Item = &'a AST>) -> bool {
        children.into_iter().any(|child| self.visit_expression(child))
    }
}

impl<'a> Visitor<'a> for R3Visitor<'a> {
    type Result = ();

    fn visit_element(&mut self, element: &'a t::Element) {
        let _ = self.visit_first(&element.attributes)
            || self.visit_first(&element.inputs)
            || self.visit_first(&element.outputs)
            || self.visit_first(&element.references)
            || self.visit_first(&element.children);
    }

    fn visit_template(&mut self, template: &'a t::Template) {
        let inline = !template.template_attrs.is_empty();
        if self.visit_first(&template.attributes)
            || self.visit_first(&template.inputs)
            || self.visit_first(&template.outputs)
            || self.visit_first_desugared(&template.template_attrs, inline)
            || self.visit_first(&template.references)
            || self.visit_first_desugared(&template.variables, inline)
        {
            return;
        }
        // `=`, quotes, `;` and whitespace between the bindings of a
        // `*directive` value. The host element also covers them.
        if self.skip_microsyntax_tokens
            && microsyntax_span(template).is_some_and(|s| s.contains(self.position))
        {
            log::trace!("position {} between microsyntax bindings", self.position);
            self.in_microsyntax_gap = true;
            return;
        }
        self.visit_first(&template.children);
    }

    fn visit_content(&mut self, content: &'a t::Content) {
        let _ = self.visit_first(&content.attributes) || self.visit_first(&content.children);
    }

    fn visit_variable(&mut self, _variable: &'a t::Variable) {}

    fn visit_reference(&mut self, _reference: &'a t::Reference) {}

    fn visit_text_attribute(&mut self, _attribute: &'a t::TextAttribute) {}

    fn visit_bound_attribute(&mut self, attribute: &'a t::BoundAttribute) {
        self.visit_expression(&attribute.value);
    }

    fn visit_bound_event(&mut self, event: &'a t::BoundEvent) {
        // `(click)` without a handler gets a synthetic "ERROR" literal.
        if let AST::LiteralPrimitive(literal) = &event.handler {
            if literal.is_error_placeholder() {
                return;
            }
        }
        self.visit_expression(&event.handler);
    }

    fn visit_text(&mut self, _text: &'a t::Text) {}

    fn visit_bound_text(&mut self, text: &'a t::BoundText) {
        self.visit_expression(&text.value);
    }

    fn visit_icu(&mut self, icu: &'a t::Icu) {
        let _ = self.visit_first(icu.vars.values()) || self.visit_first(icu.placeholders.values());
    }
}

/// Hull of the attributes and variables desugared from a `*directive`
/// value. `None` for templates written as `<ng-template>`.
fn microsyntax_span(template: &t::Template) -> Option<AbsoluteSourceSpan> {
    if template.template_attrs.is_empty() {
        return None;
    }
    template
        .template_attrs
        .iter()
        .map(Node::source_span)
        .chain(template.variables.iter().map(|v| v.source_span))
        .reduce(|hull, span| {
            AbsoluteSourceSpan::new(hull.start.min(span.start), hull.end.max(span.end))
        })
}

/// Whether `position` is on the key or the value of a key/value node.
/// Other nodes always pass.
fn on_key_or_value(node: &TargetNode<'_>, position: usize) -> bool {
    if !node.is_key_value() {
        return true;
    }
    let in_span =
        |span: Option<AbsoluteSourceSpan>| span.is_some_and(|s| s.contains(position));
    in_span(node.key_span()) || in_span(node.value_span())
}

/// Where inside the resolved node the position falls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetContext<'a> {
    /// An expression node; the enclosing binding or expression is the
    /// target's parent.
    RawExpression,
    /// Text, interpolation, ICU or `<ng-content>`.
    RawTemplateNode,
    /// An element or template, on its start tag.
    ElementInTag,
    /// An element or template, between its start and end tags.
    ElementInBody,
    AttributeInKey,
    AttributeInValue,
    /// `[(name)]="value"`: the input and its `nameChange` output share one
    /// key in the source.
    TwoWayBinding {
        input: &'a t::BoundAttribute,
        output: &'a t::BoundEvent,
    },
}

impl TargetContext<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            TargetContext::RawExpression => "RawExpression",
            TargetContext::RawTemplateNode => "RawTemplateNode",
            TargetContext::ElementInTag => "ElementInTag",
            TargetContext::ElementInBody => "ElementInBody",
            TargetContext::AttributeInKey => "AttributeInKey",
            TargetContext::AttributeInValue => "AttributeInValue",
            TargetContext::TwoWayBinding { .. } => "TwoWayBinding",
        }
    }
}

/// A resolved node together with its parent and the context of the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateTarget<'a> {
    pub node: TargetNode<'a>,
    pub parent: Option<TargetNode<'a>>,
    pub context: TargetContext<'a>,
}

impl<'a> TemplateTarget<'a> {
    fn from_path(path: &NodePath<'a>, position: usize) -> Option<Self> {
        let (&node, ancestors) = path.split_last()?;
        let parent = ancestors.last().copied();
        let context = match node {
            TargetNode::Expression(_) => TargetContext::RawExpression,
            TargetNode::Element(element) => element_context(element.start_source_span, position),
            TargetNode::Template(template) => element_context(template.start_source_span, position),
            TargetNode::BoundAttribute(input) => match two_way_output(input, parent) {
                Some(output) => TargetContext::TwoWayBinding { input, output },
                None => attribute_context(&node, position),
            },
            _ if node.is_key_value() => attribute_context(&node, position),
            _ => TargetContext::RawTemplateNode,
        };
        Some(TemplateTarget {
            node,
            parent,
            context,
        })
    }
}

fn element_context<'a>(start_tag: AbsoluteSourceSpan, position: usize) -> TargetContext<'a> {
    if start_tag.contains(position) {
        TargetContext::ElementInTag
    } else {
        TargetContext::ElementInBody
    }
}

fn attribute_context<'a>(node: &TargetNode<'a>, position: usize) -> TargetContext<'a> {
    if node.key_span().is_some_and(|s| s.contains(position)) {
        TargetContext::AttributeInKey
    } else if node.value_span().is_some_and(|s| s.contains(position)) {
        TargetContext::AttributeInValue
    } else {
        TargetContext::RawTemplateNode
    }
}

/// The `nameChange` output paired with a two-way `input` on the same host.
fn two_way_output<'a>(
    input: &'a t::BoundAttribute,
    host: Option<TargetNode<'a>>,
) -> Option<&'a t::BoundEvent> {
    if input.type_ != t::BindingType::TwoWay {
        return None;
    }
    let outputs = match host? {
        TargetNode::Element(element) => &element.outputs,
        TargetNode::Template(template) => &template.outputs,
        _ => return None,
    };
    let event_name = format!("{}Change", input.name);
    outputs
        .iter()
        .find(|output| output.name == event_name && output.key_span == input.key_span)
}

/// Resolves positions against a template tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionResolver {
    options: ResolverOptions,
}

impl PositionResolver {
    pub fn new(options: ResolverOptions) -> Self {
        PositionResolver { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Innermost node containing `position`, or `None`.
    pub fn find<'a>(&self, nodes: &'a [R3Node], position: usize) -> Option<TargetNode<'a>> {
        let visitor = R3Visitor::run(nodes, position, &self.options);
        let found = visitor
            .path
            .last()
            .copied()
            .filter(|_| !visitor.on_microsyntax_token());
        match &found {
            Some(node) => log::debug!("resolved {} to {:?}", position, node.summary()),
            None => log::debug!("resolved {} to nothing", position),
        }
        found
    }

    /// Every node containing `position`, outermost first. The last entry is
    /// the innermost match, even on a microsyntax keyword that `find`
    /// rejects. Positions between microsyntax bindings end the path at their
    /// template.
    pub fn path<'a>(&self, nodes: &'a [R3Node], position: usize) -> Vec<TargetNode<'a>> {
        R3Visitor::run(nodes, position, &self.options).path.into_vec()
    }

    pub fn target<'a>(&self, nodes: &'a [R3Node], position: usize) -> Option<TemplateTarget<'a>> {
        let visitor = R3Visitor::run(nodes, position, &self.options);
        let target = TemplateTarget::from_path(&visitor.path, position)?;
        if visitor.on_microsyntax_token() {
            log::debug!("resolved {} to nothing", position);
            return None;
        }
        log::debug!(
            "resolved {} to {:?} ({:?})",
            position,
            target.node.summary(),
            target.context
        );
        Some(target)
    }

    /// Like [`find`](Self::find), but checks the position against the source
    /// text first. The end of the text is a valid position that matches
    /// nothing.
    pub fn find_in<'a>(
        &self,
        parsed: &'a Render3ParseResult,
        position: usize,
    ) -> Result<Option<TargetNode<'a>>> {
        let len = parsed.source_file.len();
        if position > len {
            return Err(ResolveError::PositionOutOfRange { position, len });
        }
        if self.options.validate_spans {
            validate_spans(&parsed.nodes, len)?;
        }
        Ok(self.find(&parsed.nodes, position))
    }

    /// Resolves each of `positions` in parallel. Results are in input order.
    pub fn find_many<'a>(
        &self,
        nodes: &'a [R3Node],
        positions: &[usize],
    ) -> Vec<Option<TargetNode<'a>>> {
        positions
            .par_iter()
            .map(|&position| self.find(nodes, position))
            .collect()
    }
}

/// Innermost node of `nodes` containing `position`, with default options.
pub fn find_node_at_position(nodes: &[R3Node], position: usize) -> Option<TargetNode<'_>> {
    PositionResolver::default().find(nodes, position)
}

pub fn get_path_to_node_at_position(nodes: &[R3Node], position: usize) -> Vec<TargetNode<'_>> {
    PositionResolver::default().path(nodes, position)
}

pub fn get_target_at_position(nodes: &[R3Node], position: usize) -> Option<TemplateTarget<'_>> {
    PositionResolver::default().target(nodes, position)
}
