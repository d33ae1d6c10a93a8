//! Template Fixture Utilities for Tests
//!
//! A fixture is template text with a `¦` marking the cursor. Spans are
//! found by searching the text, and the builders below assemble nodes the
//! way the template parser would for that text.

#![allow(dead_code)]

use angular_compiler::expression_parser::ast::{
    BindingPipe, BindingPipeType, ImplicitReceiver, Interpolation, LiteralPrimitive, MethodCall,
    PropertyRead, PropertyWrite, AST,
};
use angular_compiler::render3::r3_ast as t;
use angular_compiler::{AbsoluteSourceSpan, ParseSourceFile, R3Node, Render3ParseResult};
use indexmap::IndexMap;

pub const CURSOR: char = '¦';

/// Template text with the cursor marker removed, plus the cursor offset.
pub struct Fixture {
    pub text: String,
    pub position: usize,
}

impl Fixture {
    /// Strips the single `¦` in `marked`; the cursor is the byte offset it
    /// was found at.
    pub fn new(marked: &str) -> Self {
        let position = marked
            .find(CURSOR)
            .unwrap_or_else(|| panic!("no cursor in {:?}", marked));
        let text = marked.replacen(CURSOR, "", 1);
        assert!(!text.contains(CURSOR), "more than one cursor in {:?}", marked);
        Fixture { text, position }
    }

    /// Fixture without a cursor.
    pub fn plain(text: &str) -> Self {
        Fixture {
            text: text.to_string(),
            position: 0,
        }
    }

    /// Span of the first occurrence of `needle`.
    pub fn span(&self, needle: &str) -> AbsoluteSourceSpan {
        self.span_from(0, needle)
    }

    /// Span of the first occurrence of `needle` at or after `from`.
    pub fn span_from(&self, from: usize, needle: &str) -> AbsoluteSourceSpan {
        let start = self.text[from..]
            .find(needle)
            .map(|i| i + from)
            .unwrap_or_else(|| panic!("{:?} not found in {:?} after {}", needle, self.text, from));
        AbsoluteSourceSpan::new(start, start + needle.len())
    }

    /// Span of `needle` inside the first occurrence of `within`.
    pub fn span_in(&self, within: &str, needle: &str) -> AbsoluteSourceSpan {
        let outer = self.span(within);
        let inner = self.span_from(outer.start, needle);
        assert!(outer.encloses(&inner), "{:?} not inside {:?}", needle, within);
        inner
    }

    pub fn whole(&self) -> AbsoluteSourceSpan {
        AbsoluteSourceSpan::new(0, self.text.len())
    }

    pub fn parse_result(&self, nodes: Vec<R3Node>) -> Render3ParseResult {
        Render3ParseResult::new(ParseSourceFile::new(self.text.clone(), "test.html"), nodes)
    }
}

/// Places the cursor in `template` by locating `marked_needle` with its `¦`
/// removed and inserting the marker at the same spot.
pub fn mark(template: &str, marked_needle: &str) -> String {
    let offset = marked_needle
        .find(CURSOR)
        .unwrap_or_else(|| panic!("no cursor in {:?}", marked_needle));
    let needle = marked_needle.replacen(CURSOR, "", 1);
    let start = template
        .find(&needle)
        .unwrap_or_else(|| panic!("{:?} not found in {:?}", needle, template));
    let mut marked = template.to_string();
    marked.insert(start + offset, CURSOR);
    marked
}

// Expressions

pub fn read(name: &str, span: AbsoluteSourceSpan) -> AST {
    AST::PropertyRead(PropertyRead::new(
        span,
        span,
        AST::ImplicitReceiver(ImplicitReceiver::at(span.start)),
        name,
    ))
}

pub fn interpolation(span: AbsoluteSourceSpan, expressions: Vec<AST>) -> AST {
    AST::Interpolation(Interpolation {
        source_span: span,
        strings: vec![String::new(); expressions.len() + 1],
        expressions,
    })
}

/// `name(args)` on the implicit receiver.
pub fn call(
    name: &str,
    name_span: AbsoluteSourceSpan,
    span: AbsoluteSourceSpan,
    args: Vec<AST>,
) -> AST {
    AST::MethodCall(MethodCall {
        source_span: span,
        name_span,
        receiver: Box::new(AST::ImplicitReceiver(ImplicitReceiver::at(span.start))),
        name: name.to_string(),
        args,
    })
}

/// `exp | name`. An empty `name_span` gives a pipe with a missing name.
pub fn pipe(exp: AST, name: &str, name_span: AbsoluteSourceSpan, span: AbsoluteSourceSpan) -> AST {
    AST::BindingPipe(BindingPipe {
        source_span: span,
        name_span,
        exp: Box::new(exp),
        name: name.to_string(),
        args: vec![],
        pipe_type: BindingPipeType::ReferencedByName,
    })
}

/// Handler of `[(name)]="target"`: `target = $event`, spanning the target.
pub fn two_way_handler(target: &str, span: AbsoluteSourceSpan) -> AST {
    AST::PropertyWrite(PropertyWrite {
        source_span: span,
        name_span: span,
        receiver: Box::new(AST::ImplicitReceiver(ImplicitReceiver::at(span.start))),
        name: target.to_string(),
        value: Box::new(read("$event", AbsoluteSourceSpan::empty_at(span.end))),
    })
}

/// What the binding parser substitutes for `(event)` without a handler.
pub fn error_handler(span: AbsoluteSourceSpan) -> AST {
    AST::LiteralPrimitive(LiteralPrimitive::string(span, "ERROR"))
}

// Template nodes

pub fn text(value: &str, span: AbsoluteSourceSpan) -> R3Node {
    R3Node::Text(t::Text {
        value: value.to_string(),
        source_span: span,
    })
}

pub fn bound_text(value: AST, span: AbsoluteSourceSpan) -> R3Node {
    R3Node::BoundText(t::BoundText {
        value,
        source_span: span,
    })
}

pub fn text_attribute(
    name: &str,
    value: &str,
    span: AbsoluteSourceSpan,
    key_span: AbsoluteSourceSpan,
    value_span: Option<AbsoluteSourceSpan>,
) -> t::TextAttribute {
    t::TextAttribute {
        name: name.to_string(),
        value: value.to_string(),
        source_span: span,
        key_span: Some(key_span),
        value_span,
    }
}

pub fn input(
    name: &str,
    value: AST,
    span: AbsoluteSourceSpan,
    key_span: AbsoluteSourceSpan,
) -> t::BoundAttribute {
    let value_span = Some(value.source_span());
    t::BoundAttribute {
        name: name.to_string(),
        value,
        source_span: span,
        key_span,
        value_span,
        ..Default::default()
    }
}

pub fn output(
    name: &str,
    handler: AST,
    span: AbsoluteSourceSpan,
    key_span: AbsoluteSourceSpan,
) -> t::BoundEvent {
    t::BoundEvent {
        name: name.to_string(),
        handler_span: handler.source_span(),
        handler,
        source_span: span,
        key_span,
        ..Default::default()
    }
}

pub fn reference(name: &str, span: AbsoluteSourceSpan, key_span: AbsoluteSourceSpan) -> t::Reference {
    t::Reference {
        name: name.to_string(),
        value: String::new(),
        source_span: span,
        key_span,
        value_span: None,
    }
}

pub fn variable(
    name: &str,
    value: &str,
    span: AbsoluteSourceSpan,
    key_span: AbsoluteSourceSpan,
    value_span: Option<AbsoluteSourceSpan>,
) -> t::Variable {
    t::Variable {
        name: name.to_string(),
        value: value.to_string(),
        source_span: span,
        key_span,
        value_span,
    }
}

/// Element spanning `open` through the matching `close` tag.
pub fn element(fx: &Fixture, name: &str, open: &str, close: Option<&str>) -> t::Element {
    let start = fx.span(open);
    let end = close.map(|close| fx.span_from(start.end, close));
    t::Element {
        name: name.to_string(),
        source_span: AbsoluteSourceSpan::new(start.start, end.map_or(start.end, |e| e.end)),
        start_source_span: start,
        end_source_span: end,
        ..Default::default()
    }
}

// Sample templates

pub const INTERPOLATION: &str = "<div>{{ title }}</div>";
pub const BINDINGS: &str = r#"<cmp [foo]="bar" id="main" (click)="go()" #box></cmp>"#;
pub const TWO_WAY: &str = r#"<cmp [(foo)]="bar"></cmp>"#;
pub const NG_FOR: &str = r#"<div *ngFor="let item of items; let i = index">{{item}}</div>"#;
pub const PIPES: &str = "<p>{{ v | upper }} {{ w | }}</p>";
pub const NO_HANDLER: &str = "<button (click)>Go</button>";
pub const ICU: &str = "<span>{count, plural, =0 {none} other {{{count}} items}}</span>";
pub const CONTENT: &str = r#"<ng-content select="[slot]"></ng-content>"#;

pub type TreeBuilder = fn(&Fixture) -> Vec<R3Node>;

/// Every sample template with the builder of its tree.
pub fn samples() -> Vec<(&'static str, TreeBuilder)> {
    vec![
        (INTERPOLATION, interpolation_tree as TreeBuilder),
        (BINDINGS, bindings_tree),
        (TWO_WAY, two_way_tree),
        (NG_FOR, ng_for_tree),
        (PIPES, pipes_tree),
        (NO_HANDLER, no_handler_tree),
        (ICU, icu_tree),
        (CONTENT, content_tree),
    ]
}

pub fn interpolation_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut div = element(fx, "div", "<div>", Some("</div>"));
    let braces = fx.span("{{ title }}");
    div.children = vec![bound_text(
        interpolation(braces, vec![read("title", fx.span("title"))]),
        braces,
    )];
    vec![R3Node::Element(div)]
}

pub fn bindings_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut cmp = element(
        fx,
        "cmp",
        r#"<cmp [foo]="bar" id="main" (click)="go()" #box>"#,
        Some("</cmp>"),
    );
    cmp.attributes = vec![text_attribute(
        "id",
        "main",
        fx.span(r#"id="main""#),
        fx.span("id"),
        Some(fx.span("main")),
    )];
    cmp.inputs = vec![input(
        "foo",
        read("bar", fx.span("bar")),
        fx.span(r#"[foo]="bar""#),
        fx.span("foo"),
    )];
    cmp.outputs = vec![output(
        "click",
        call("go", fx.span("go"), fx.span("go()"), vec![]),
        fx.span(r#"(click)="go()""#),
        fx.span("click"),
    )];
    cmp.references = vec![reference("box", fx.span("#box"), fx.span("box"))];
    vec![R3Node::Element(cmp)]
}

pub fn two_way_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut cmp = element(fx, "cmp", r#"<cmp [(foo)]="bar">"#, Some("</cmp>"));
    let binding = fx.span(r#"[(foo)]="bar""#);
    cmp.inputs = vec![t::BoundAttribute {
        type_: t::BindingType::TwoWay,
        ..input("foo", read("bar", fx.span("bar")), binding, fx.span("foo"))
    }];
    cmp.outputs = vec![t::BoundEvent {
        type_: t::ParsedEventType::TwoWay,
        ..output(
            "fooChange",
            two_way_handler("bar", fx.span("bar")),
            binding,
            fx.span("foo"),
        )
    }];
    vec![R3Node::Element(cmp)]
}

/// `*ngFor` desugars into a template wrapping the host element.
pub fn ng_for_tree(fx: &Fixture) -> Vec<R3Node> {
    let start_tag = r#"<div *ngFor="let item of items; let i = index">"#;
    let mut div = element(fx, "div", start_tag, Some("</div>"));
    let braces = fx.span("{{item}}");
    div.children = vec![bound_text(
        interpolation(braces, vec![read("item", fx.span_in("{{item}}", "item"))]),
        braces,
    )];

    let ng_for = fx.span("ngFor");
    let template = t::Template {
        tag_name: Some("div".into()),
        template_attrs: vec![
            t::TemplateAttr::Text(text_attribute("ngFor", "", ng_for, ng_for, None)),
            t::TemplateAttr::Bound(input(
                "ngForOf",
                read("items", fx.span("items")),
                fx.span("of items"),
                fx.span("of"),
            )),
        ],
        variables: vec![
            variable(
                "item",
                "$implicit",
                fx.span("let item"),
                fx.span("item"),
                None,
            ),
            variable(
                "i",
                "index",
                fx.span("let i = index"),
                fx.span_in("let i = index", "i"),
                Some(fx.span("index")),
            ),
        ],
        source_span: div.source_span,
        start_source_span: div.start_source_span,
        end_source_span: div.end_source_span,
        children: vec![R3Node::Element(div)],
        ..Default::default()
    };
    vec![R3Node::Template(template)]
}

pub fn pipes_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut p = element(fx, "p", "<p>", Some("</p>"));
    let run = fx.span("{{ v | upper }} {{ w | }}");
    let upper = pipe(
        read("v", fx.span("v")),
        "upper",
        fx.span("upper"),
        fx.span("v | upper"),
    );
    let unnamed_span = fx.span("w |");
    let unnamed = pipe(
        read("w", fx.span("w")),
        "",
        AbsoluteSourceSpan::empty_at(unnamed_span.end),
        unnamed_span,
    );
    p.children = vec![bound_text(interpolation(run, vec![upper, unnamed]), run)];
    vec![R3Node::Element(p)]
}

pub fn no_handler_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut button = element(fx, "button", "<button (click)>", Some("</button>"));
    button.outputs = vec![output(
        "click",
        error_handler(fx.span("click")),
        fx.span("(click)"),
        fx.span("click"),
    )];
    button.children = vec![text("Go", fx.span("Go"))];
    vec![R3Node::Element(button)]
}

pub fn icu_tree(fx: &Fixture) -> Vec<R3Node> {
    let mut span = element(fx, "span", "<span>", Some("</span>"));
    let braces = fx.span("{{count}}");
    let vars: IndexMap<String, t::BoundText> = [(
        "VAR_PLURAL".to_string(),
        t::BoundText {
            value: read("count", fx.span("count")),
            source_span: fx.span("count"),
        },
    )]
    .into_iter()
    .collect();
    let placeholders: IndexMap<String, t::IcuPlaceholder> = [(
        "INTERPOLATION".to_string(),
        t::IcuPlaceholder::BoundText(t::BoundText {
            value: interpolation(braces, vec![read("count", fx.span_in("{{count}}", "count"))]),
            source_span: braces,
        }),
    )]
    .into_iter()
    .collect();
    span.children = vec![R3Node::Icu(t::Icu {
        vars,
        placeholders,
        source_span: fx.span("{count, plural, =0 {none} other {{{count}} items}}"),
    })];
    vec![R3Node::Element(span)]
}

pub fn content_tree(fx: &Fixture) -> Vec<R3Node> {
    let start = fx.span(r#"<ng-content select="[slot]">"#);
    let end = fx.span("</ng-content>");
    vec![R3Node::Content(t::Content {
        selector: "[slot]".into(),
        attributes: vec![text_attribute(
            "select",
            "[slot]",
            fx.span(r#"select="[slot]""#),
            fx.span("select"),
            Some(fx.span("[slot]")),
        )],
        children: vec![],
        source_span: AbsoluteSourceSpan::new(start.start, end.end),
        start_source_span: start,
        end_source_span: Some(end),
    })]
}
