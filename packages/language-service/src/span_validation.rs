//! Span preconditions of a template tree.
//!
//! The resolver assumes that spans are well formed, fit in the template text
//! and nest the way the tree does. Trees from the template parser satisfy
//! this; hand-built or deserialized trees may not.

use crate::error::{ResolveError, Result};
use angular_compiler::expression_parser::ast::AST;
use angular_compiler::parse_util::AbsoluteSourceSpan;
use angular_compiler::render3::r3_ast::{self as t, Node, R3Node, Visitor};

/// Checks every span in `nodes` and returns the first violation found in
/// document order.
pub fn validate_spans(nodes: &[R3Node], source_len: usize) -> Result<()> {
    let mut validator = SpanValidator::new(source_len);
    let result = validator.visit_all(nodes);
    if let Err(err) = &result {
        log::debug!("span validation failed: {}", err);
    }
    result
}

struct SpanValidator {
    source_len: usize,
    parents: Vec<(&'static str, AbsoluteSourceSpan)>,
}

impl SpanValidator {
    fn new(source_len: usize) -> Self {
        SpanValidator {
            source_len,
            parents: Vec::new(),
        }
    }

    fn check_bounds(&self, kind: &'static str, span: AbsoluteSourceSpan) -> Result<()> {
        if span.start > span.end {
            return Err(ResolveError::InvalidSpan {
                kind,
                start: span.start,
                end: span.end,
            });
        }
        if span.end > self.source_len {
            return Err(ResolveError::SpanOutOfBounds {
                kind,
                end: span.end,
                len: self.source_len,
            });
        }
        Ok(())
    }

    fn check(&self, kind: &'static str, span: AbsoluteSourceSpan) -> Result<()> {
        self.check_bounds(kind, span)?;
        match self.parents.last() {
            Some(&(parent, parent_span)) if !parent_span.encloses(&span) => {
                Err(ResolveError::ChildOutsideParent {
                    child: kind,
                    child_span: span,
                    parent,
                    parent_span,
                })
            }
            _ => Ok(()),
        }
    }

    /// Checks `span`, then runs `f` with it as the enclosing parent.
    fn within<F>(&mut self, kind: &'static str, span: AbsoluteSourceSpan, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.check(kind, span)?;
        self.parents.push((kind, span));
        let result = f(self);
        self.parents.pop();
        result
    }

    fn visit_all<'a, N, I>(&mut self, nodes: I) -> Result<()>
    where
        N: Node + 'a,
        I: IntoIterator<Item = &'a N>,
    {
        nodes.into_iter().try_for_each(|node| node.visit(self))
    }

    fn key_value(
        &mut self,
        kind: &'static str,
        source_span: AbsoluteSourceSpan,
        key_span: Option<AbsoluteSourceSpan>,
        value_span: Option<AbsoluteSourceSpan>,
    ) -> Result<()> {
        self.check(kind, source_span)?;
        key_span
            .into_iter()
            .chain(value_span)
            .try_for_each(|span| self.check_bounds(kind, span))
    }

    fn expression(&mut self, ast: &AST) -> Result<()> {
        if ast.is_implicit_receiver() {
            return self.check_bounds(ast.kind(), ast.source_span());
        }
        self.within(ast.kind(), ast.source_span(), |v| {
            ast.children()
                .into_iter()
                .try_for_each(|child| v.expression(child))
        })
    }
}

impl<'a> Visitor<'a> for SpanValidator {
    type Result = Result<()>;

    fn visit_element(&mut self, element: &'a t::Element) -> Result<()> {
        self.within("Element", element.source_span, |v| {
            v.check_bounds("Element", element.start_source_span)?;
            if let Some(end) = element.end_source_span {
                v.check_bounds("Element", end)?;
            }
            v.visit_all(&element.attributes)?;
            v.visit_all(&element.inputs)?;
            v.visit_all(&element.outputs)?;
            v.visit_all(&element.references)?;
            v.visit_all(&element.children)
        })
    }

    fn visit_template(&mut self, template: &'a t::Template) -> Result<()> {
        self.within("Template", template.source_span, |v| {
            v.check_bounds("Template", template.start_source_span)?;
            if let Some(end) = template.end_source_span {
                v.check_bounds("Template", end)?;
            }
            v.visit_all(&template.attributes)?;
            v.visit_all(&template.inputs)?;
            v.visit_all(&template.outputs)?;
            v.visit_all(&template.template_attrs)?;
            v.visit_all(&template.references)?;
            v.visit_all(&template.variables)?;
            v.visit_all(&template.children)
        })
    }

    fn visit_content(&mut self, content: &'a t::Content) -> Result<()> {
        self.within("Content", content.source_span, |v| {
            v.visit_all(&content.attributes)?;
            v.visit_all(&content.children)
        })
    }

    fn visit_variable(&mut self, variable: &'a t::Variable) -> Result<()> {
        self.key_value(
            "Variable",
            variable.source_span,
            Some(variable.key_span),
            variable.value_span,
        )
    }

    fn visit_reference(&mut self, reference: &'a t::Reference) -> Result<()> {
        self.key_value(
            "Reference",
            reference.source_span,
            Some(reference.key_span),
            reference.value_span,
        )
    }

    fn visit_text_attribute(&mut self, attribute: &'a t::TextAttribute) -> Result<()> {
        self.key_value(
            "TextAttribute",
            attribute.source_span,
            attribute.key_span,
            attribute.value_span,
        )
    }

    fn visit_bound_attribute(&mut self, attribute: &'a t::BoundAttribute) -> Result<()> {
        self.key_value(
            "BoundAttribute",
            attribute.source_span,
            Some(attribute.key_span),
            attribute.value_span,
        )?;
        self.within("BoundAttribute", attribute.source_span, |v| {
            v.expression(&attribute.value)
        })
    }

    fn visit_bound_event(&mut self, event: &'a t::BoundEvent) -> Result<()> {
        self.key_value(
            "BoundEvent",
            event.source_span,
            Some(event.key_span),
            Some(event.handler_span),
        )?;
        self.within("BoundEvent", event.source_span, |v| v.expression(&event.handler))
    }

    fn visit_text(&mut self, text: &'a t::Text) -> Result<()> {
        self.check("Text", text.source_span)
    }

    fn visit_bound_text(&mut self, text: &'a t::BoundText) -> Result<()> {
        self.within("BoundText", text.source_span, |v| v.expression(&text.value))
    }

    fn visit_icu(&mut self, icu: &'a t::Icu) -> Result<()> {
        self.within("Icu", icu.source_span, |v| {
            v.visit_all(icu.vars.values())?;
            v.visit_all(icu.placeholders.values())
        })
    }
}
