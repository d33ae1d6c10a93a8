//! R3 AST Tests
//!
//! Serialized shape of the template tree and source spans of its nodes.

use angular_compiler::expression_parser::ast::{ImplicitReceiver, PropertyRead, AST};
use angular_compiler::render3::r3_ast::{self as t, visit_all, Node, Visitor};
use angular_compiler::{AbsoluteSourceSpan, ParseSourceFile, Render3ParseResult};

/// (node kind, source text under the node's span)
type HumanizedSpan = (String, String);

/// Visitor that records every template and expression node with the text
/// its span covers.
struct SpanHumanizer<'s> {
    file: &'s ParseSourceFile,
    result: Vec<HumanizedSpan>,
}

impl<'s> SpanHumanizer<'s> {
    fn record(&mut self, kind: &str, node: &impl Node) {
        self.record_span(kind, node.source_span());
    }

    fn record_span(&mut self, kind: &str, span: AbsoluteSourceSpan) {
        let text = self.file.text(span).unwrap_or("<out of range>").to_string();
        self.result.push((kind.to_string(), text));
    }

    fn visit_ast(&mut self, ast: &AST) {
        self.record_span(ast.kind(), ast.source_span());
        for child in ast.children() {
            self.visit_ast(child);
        }
    }
}

impl<'a, 's> Visitor<'a> for SpanHumanizer<'s> {
    type Result = ();

    fn visit_element(&mut self, element: &'a t::Element) {
        self.record("Element", element);
        for attr in &element.attributes {
            attr.visit(self);
        }
        for input in &element.inputs {
            input.visit(self);
        }
        for output in &element.outputs {
            output.visit(self);
        }
        let _ = visit_all(self, &element.children);
    }

    fn visit_template(&mut self, template: &'a t::Template) {
        self.record("Template", template);
        for attr in &template.template_attrs {
            attr.visit(self);
        }
        for variable in &template.variables {
            variable.visit(self);
        }
        let _ = visit_all(self, &template.children);
    }

    fn visit_content(&mut self, content: &'a t::Content) {
        self.record("Content", content);
    }

    fn visit_variable(&mut self, variable: &'a t::Variable) {
        self.record("Variable", variable);
    }

    fn visit_reference(&mut self, reference: &'a t::Reference) {
        self.record("Reference", reference);
    }

    fn visit_text_attribute(&mut self, attribute: &'a t::TextAttribute) {
        self.record("TextAttribute", attribute);
    }

    fn visit_bound_attribute(&mut self, attribute: &'a t::BoundAttribute) {
        self.record("BoundAttribute", attribute);
        self.visit_ast(&attribute.value);
    }

    fn visit_bound_event(&mut self, event: &'a t::BoundEvent) {
        self.record("BoundEvent", event);
        self.visit_ast(&event.handler);
    }

    fn visit_text(&mut self, text: &'a t::Text) {
        self.record("Text", text);
    }

    fn visit_bound_text(&mut self, text: &'a t::BoundText) {
        self.record("BoundText", text);
        self.visit_ast(&text.value);
    }

    fn visit_icu(&mut self, icu: &'a t::Icu) {
        self.record("Icu", icu);
    }
}

fn humanize_spans(parsed: &Render3ParseResult) -> Vec<HumanizedSpan> {
    let mut humanizer = SpanHumanizer {
        file: &parsed.source_file,
        result: vec![],
    };
    let _ = visit_all(&mut humanizer, &parsed.nodes);
    humanizer.result
}

fn pairs(expected: &[(&str, &str)]) -> Vec<HumanizedSpan> {
    expected
        .iter()
        .map(|(kind, text)| (kind.to_string(), text.to_string()))
        .collect()
}

const INTERPOLATION_JSON: &str = r#"{
  "source_file": {"content": "<p>{{a}}</p>", "url": "a.html"},
  "nodes": [{
    "kind": "Element",
    "name": "p",
    "source_span": {"start": 0, "end": 12},
    "start_source_span": {"start": 0, "end": 3},
    "end_source_span": {"start": 8, "end": 12},
    "children": [{
      "kind": "BoundText",
      "source_span": {"start": 3, "end": 8},
      "value": {"type": "Interpolation", "data": {
        "source_span": {"start": 3, "end": 8},
        "strings": ["", ""],
        "expressions": [{"type": "PropertyRead", "data": {
          "source_span": {"start": 5, "end": 6},
          "name_span": {"start": 5, "end": 6},
          "receiver": {"type": "ImplicitReceiver", "data": {"source_span": {"start": 5, "end": 5}}},
          "name": "a"
        }}]
      }}
    }]
  }]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_a_parse_result() {
        let parsed: Render3ParseResult = serde_json::from_str(INTERPOLATION_JSON).unwrap();
        assert_eq!(parsed.source_file.url, "a.html");
        assert!(parsed.errors.is_empty());
        assert!(!parsed.has_errors());
        match &parsed.nodes[0] {
            t::R3Node::Element(element) => {
                assert_eq!(element.name, "p");
                assert!(element.attributes.is_empty());
                assert_eq!(element.children.len(), 1);
            }
            other => panic!("Expected Element, got {:?}", other),
        }
    }

    #[test]
    fn should_cover_the_source_text_of_each_node() {
        let parsed: Render3ParseResult = serde_json::from_str(INTERPOLATION_JSON).unwrap();
        assert_eq!(
            humanize_spans(&parsed),
            pairs(&[
                ("Element", "<p>{{a}}</p>"),
                ("BoundText", "{{a}}"),
                ("Interpolation", "{{a}}"),
                ("PropertyRead", "a"),
                ("ImplicitReceiver", ""),
            ])
        );
    }

    #[test]
    fn should_keep_structure_through_serialization() {
        let parsed: Render3ParseResult = serde_json::from_str(INTERPOLATION_JSON).unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        let back: Render3ParseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }

    #[test]
    fn should_report_microsyntax_spans() {
        // <li *ngFor="let item of items">{{item}}</li>
        let content = r#"<li *ngFor="let item of items">{{item}}</li>"#;
        let at = |s: &str| {
            let start = content.find(s).unwrap();
            AbsoluteSourceSpan::new(start, start + s.len())
        };
        let read = |name: &str, span: AbsoluteSourceSpan| {
            AST::PropertyRead(PropertyRead::new(
                span,
                span,
                AST::ImplicitReceiver(ImplicitReceiver::at(span.start)),
                name,
            ))
        };
        let items = AbsoluteSourceSpan::new(at("items\"").start, at("items\"").start + 5);
        let template = t::Template {
            tag_name: Some("li".into()),
            template_attrs: vec![t::TemplateAttr::Bound(t::BoundAttribute {
                name: "ngForOf".into(),
                value: read("items", items),
                source_span: at("of items"),
                key_span: at("of"),
                ..Default::default()
            })],
            variables: vec![t::Variable {
                name: "item".into(),
                value: "$implicit".into(),
                source_span: at("let item"),
                key_span: at("item"),
                value_span: None,
            }],
            source_span: at(content),
            start_source_span: at(r#"<li *ngFor="let item of items">"#),
            end_source_span: Some(at("</li>")),
            ..Default::default()
        };
        let parsed = Render3ParseResult::new(
            ParseSourceFile::new(content, "list.html"),
            vec![t::R3Node::Template(template)],
        );
        assert_eq!(
            humanize_spans(&parsed),
            pairs(&[
                ("Template", content),
                ("BoundAttribute", "of items"),
                ("PropertyRead", "items"),
                ("ImplicitReceiver", ""),
                ("Variable", "let item"),
            ])
        );
    }
}
