/**
 * Angular Expression AST
 *
 * Node types of the embedded expression language: property reads and writes,
 * calls, pipes, literals and operators. Every node carries an absolute
 * source span into the template text it was parsed from.
 */

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub use crate::parse_util::AbsoluteSourceSpan;

/// Children of an expression node, in source order.
pub type AstChildren<'a> = SmallVec<[&'a AST; 4]>;

/// Main AST enum containing all node types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AST {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    ThisReceiver(ThisReceiver),
    Chain(Chain),
    Conditional(Conditional),
    PropertyRead(PropertyRead),
    SafePropertyRead(SafePropertyRead),
    KeyedRead(KeyedRead),
    SafeKeyedRead(SafeKeyedRead),
    PropertyWrite(PropertyWrite),
    KeyedWrite(KeyedWrite),
    BindingPipe(BindingPipe),
    MethodCall(MethodCall),
    SafeMethodCall(SafeMethodCall),
    Call(Call),
    LiteralPrimitive(LiteralPrimitive),
    LiteralArray(LiteralArray),
    LiteralMap(LiteralMap),
    Interpolation(Interpolation),
    Binary(Binary),
    PrefixNot(PrefixNot),
    Unary(Unary),
    NonNullAssert(NonNullAssert),
}

/// Empty expression, e.g. the value of `[foo]=""`. Usually zero-width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmptyExpr {
    pub source_span: AbsoluteSourceSpan,
}

/// Implicit receiver (the component instance) of an unqualified reference.
/// It has no text of its own in the template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImplicitReceiver {
    pub source_span: AbsoluteSourceSpan,
}

/// This receiver (explicit `this`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThisReceiver {
    pub source_span: AbsoluteSourceSpan,
}

/// Chain of expressions (e.g., `a; b; c`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<AST>,
}

/// Ternary conditional (e.g., `condition ? true : false`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conditional {
    pub source_span: AbsoluteSourceSpan,
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
}

/// Property read (e.g., `obj.property`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRead {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Safe property read (e.g., `obj?.property`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafePropertyRead {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Keyed read (e.g., `obj[key]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedRead {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

/// Safe keyed read (e.g., `obj?.[key]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeKeyedRead {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

/// Property write (e.g., `obj.property = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub value: Box<AST>,
}

/// Keyed write (e.g., `obj[key] = value`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedWrite {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub value: Box<AST>,
}

/// Pipe types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingPipeType {
    /// Referenced by name: `{{value | pipeName}}`
    #[default]
    ReferencedByName,
    /// Referenced directly: `{{value | PipeClass}}`
    ReferencedDirectly,
}

/// Pipe binding (e.g., `value | pipeName:arg1:arg2`).
///
/// The parser still produces a pipe when the identifier after `|` is missing;
/// `name` is then empty and `name_span` zero-width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingPipe {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub exp: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
    pub pipe_type: BindingPipeType,
}

impl BindingPipe {
    pub fn is_missing_name(&self) -> bool {
        self.name.is_empty()
    }
}

/// Method call on a receiver (e.g., `obj.method(a, b)` or `method(a)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

/// Safe method call (e.g., `obj?.method(a)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafeMethodCall {
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<AST>,
}

/// Call of an arbitrary callee expression (e.g., `fns[0](a)`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub args: Vec<AST>,
}

/// Value of a literal primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "literalType", content = "value")]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

/// Literal primitive (string, number, boolean, null, undefined)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralPrimitive {
    pub source_span: AbsoluteSourceSpan,
    pub value: LiteralValue,
}

impl LiteralPrimitive {
    pub fn string(source_span: AbsoluteSourceSpan, value: impl Into<String>) -> Self {
        LiteralPrimitive {
            source_span,
            value: LiteralValue::String(value.into()),
        }
    }

    pub fn number(source_span: AbsoluteSourceSpan, value: f64) -> Self {
        LiteralPrimitive {
            source_span,
            value: LiteralValue::Number(value),
        }
    }

    pub fn boolean(source_span: AbsoluteSourceSpan, value: bool) -> Self {
        LiteralPrimitive {
            source_span,
            value: LiteralValue::Boolean(value),
        }
    }

    pub fn null(source_span: AbsoluteSourceSpan) -> Self {
        LiteralPrimitive {
            source_span,
            value: LiteralValue::Null,
        }
    }

    /// Whether this is the placeholder the binding parser substitutes for an
    /// event binding written without a handler, e.g. `(click)`.
    pub fn is_error_placeholder(&self) -> bool {
        matches!(&self.value, LiteralValue::String(s) if s == "ERROR")
    }
}

/// Array literal (e.g., `[1, 2, 3]`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralArray {
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<AST>,
}

/// Map literal key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralMapKey {
    pub key: String,
    pub quoted: bool,
}

/// Object literal (e.g., `{a: 1, b: 2}`). Keys are plain data, only values
/// are expression nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiteralMap {
    pub source_span: AbsoluteSourceSpan,
    pub keys: Vec<LiteralMapKey>,
    pub values: Vec<AST>,
}

/// Interpolation (`{{a}} text {{b}}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpolation {
    pub source_span: AbsoluteSourceSpan,
    pub strings: Vec<String>,
    pub expressions: Vec<AST>,
}

/// Binary operator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub source_span: AbsoluteSourceSpan,
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
}

/// Prefix not operator (e.g., `!expr`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixNot {
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// Unary operator (e.g., `+expr`, `-expr`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub source_span: AbsoluteSourceSpan,
    pub operator: String,
    pub expr: Box<AST>,
}

/// Non-null assertion (e.g., `expr!`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonNullAssert {
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

// Helper constructors

impl ImplicitReceiver {
    /// Zero-width receiver placed at the start of the reference it belongs to.
    pub fn at(offset: usize) -> Self {
        ImplicitReceiver {
            source_span: AbsoluteSourceSpan::empty_at(offset),
        }
    }
}

impl PropertyRead {
    pub fn new(
        source_span: AbsoluteSourceSpan,
        name_span: AbsoluteSourceSpan,
        receiver: AST,
        name: impl Into<String>,
    ) -> Self {
        PropertyRead {
            source_span,
            name_span,
            receiver: Box::new(receiver),
            name: name.into(),
        }
    }
}

impl Binary {
    pub fn new(
        source_span: AbsoluteSourceSpan,
        operation: impl Into<String>,
        left: AST,
        right: AST,
    ) -> Self {
        Binary {
            source_span,
            operation: operation.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

impl Default for AST {
    fn default() -> Self {
        AST::EmptyExpr(EmptyExpr {
            source_span: AbsoluteSourceSpan::default(),
        })
    }
}

impl AST {
    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            AST::EmptyExpr(e) => e.source_span,
            AST::ImplicitReceiver(e) => e.source_span,
            AST::ThisReceiver(e) => e.source_span,
            AST::Chain(e) => e.source_span,
            AST::Conditional(e) => e.source_span,
            AST::PropertyRead(e) => e.source_span,
            AST::SafePropertyRead(e) => e.source_span,
            AST::KeyedRead(e) => e.source_span,
            AST::SafeKeyedRead(e) => e.source_span,
            AST::PropertyWrite(e) => e.source_span,
            AST::KeyedWrite(e) => e.source_span,
            AST::BindingPipe(e) => e.source_span,
            AST::MethodCall(e) => e.source_span,
            AST::SafeMethodCall(e) => e.source_span,
            AST::Call(e) => e.source_span,
            AST::LiteralPrimitive(e) => e.source_span,
            AST::LiteralArray(e) => e.source_span,
            AST::LiteralMap(e) => e.source_span,
            AST::Interpolation(e) => e.source_span,
            AST::Binary(e) => e.source_span,
            AST::PrefixNot(e) => e.source_span,
            AST::Unary(e) => e.source_span,
            AST::NonNullAssert(e) => e.source_span,
        }
    }

    /// Variant name, e.g. `"PropertyRead"`.
    pub fn kind(&self) -> &'static str {
        match self {
            AST::EmptyExpr(_) => "EmptyExpr",
            AST::ImplicitReceiver(_) => "ImplicitReceiver",
            AST::ThisReceiver(_) => "ThisReceiver",
            AST::Chain(_) => "Chain",
            AST::Conditional(_) => "Conditional",
            AST::PropertyRead(_) => "PropertyRead",
            AST::SafePropertyRead(_) => "SafePropertyRead",
            AST::KeyedRead(_) => "KeyedRead",
            AST::SafeKeyedRead(_) => "SafeKeyedRead",
            AST::PropertyWrite(_) => "PropertyWrite",
            AST::KeyedWrite(_) => "KeyedWrite",
            AST::BindingPipe(_) => "BindingPipe",
            AST::MethodCall(_) => "MethodCall",
            AST::SafeMethodCall(_) => "SafeMethodCall",
            AST::Call(_) => "Call",
            AST::LiteralPrimitive(_) => "LiteralPrimitive",
            AST::LiteralArray(_) => "LiteralArray",
            AST::LiteralMap(_) => "LiteralMap",
            AST::Interpolation(_) => "Interpolation",
            AST::Binary(_) => "Binary",
            AST::PrefixNot(_) => "PrefixNot",
            AST::Unary(_) => "Unary",
            AST::NonNullAssert(_) => "NonNullAssert",
        }
    }

    /// Identifier of named nodes (property, method and pipe names).
    pub fn name(&self) -> Option<&str> {
        match self {
            AST::PropertyRead(e) => Some(e.name.as_str()),
            AST::SafePropertyRead(e) => Some(e.name.as_str()),
            AST::PropertyWrite(e) => Some(e.name.as_str()),
            AST::BindingPipe(e) => Some(e.name.as_str()),
            AST::MethodCall(e) => Some(e.name.as_str()),
            AST::SafeMethodCall(e) => Some(e.name.as_str()),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> AstChildren<'_> {
        let mut out = AstChildren::new();
        match self {
            AST::PropertyRead(p) => out.push(&*p.receiver),
            AST::SafePropertyRead(p) => out.push(&*p.receiver),
            AST::PropertyWrite(p) => {
                out.push(&*p.receiver);
                out.push(&*p.value);
            }
            AST::KeyedRead(k) => {
                out.push(&*k.receiver);
                out.push(&*k.key);
            }
            AST::SafeKeyedRead(k) => {
                out.push(&*k.receiver);
                out.push(&*k.key);
            }
            AST::KeyedWrite(k) => {
                out.push(&*k.receiver);
                out.push(&*k.key);
                out.push(&*k.value);
            }
            AST::BindingPipe(p) => {
                out.push(&*p.exp);
                out.extend(p.args.iter());
            }
            AST::MethodCall(m) => {
                out.push(&*m.receiver);
                out.extend(m.args.iter());
            }
            AST::SafeMethodCall(m) => {
                out.push(&*m.receiver);
                out.extend(m.args.iter());
            }
            AST::Call(c) => {
                out.push(&*c.receiver);
                out.extend(c.args.iter());
            }
            AST::Binary(b) => {
                out.push(&*b.left);
                out.push(&*b.right);
            }
            AST::Conditional(c) => {
                out.push(&*c.condition);
                out.push(&*c.true_exp);
                out.push(&*c.false_exp);
            }
            AST::Chain(c) => out.extend(c.expressions.iter()),
            AST::LiteralArray(a) => out.extend(a.expressions.iter()),
            AST::LiteralMap(m) => out.extend(m.values.iter()),
            AST::Interpolation(i) => out.extend(i.expressions.iter()),
            AST::PrefixNot(p) => out.push(&*p.expression),
            AST::NonNullAssert(n) => out.push(&*n.expression),
            AST::Unary(u) => out.push(&*u.expr),
            AST::EmptyExpr(_)
            | AST::ImplicitReceiver(_)
            | AST::ThisReceiver(_)
            | AST::LiteralPrimitive(_) => {
                // Leaf nodes
            }
        }
        out
    }

    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver(_))
    }
}
