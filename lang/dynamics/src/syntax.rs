use derive_more::From;
use std::rc::Rc;
use unminify_syntax::JsString;

/* ---------------------------------- Value --------------------------------- */

/// A value known at rewrite time.
///
/// Arrays and regular expressions are objects: they take part in coercions but are never
/// written back into the tree as literals.
#[derive(From, Clone, Debug)]
pub enum Value {
    #[from(ignore)]
    Undefined,
    Bool(bool),
    Number(f64),
    String(JsString),
    Array(Rc<Vec<Value>>),
    RegExp(Rc<RegExp>),
    Builtin(Builtin),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegExp {
    pub pattern: String,
    pub flags: String,
}

/// The global functions that are safe to run at rewrite time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    DecodeUri,
    DecodeUriComponent,
    Unescape,
    ParseInt,
    ParseFloat,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            | Builtin::DecodeUri => "decodeURI",
            | Builtin::DecodeUriComponent => "decodeURIComponent",
            | Builtin::Unescape => "unescape",
            | Builtin::ParseInt => "parseInt",
            | Builtin::ParseFloat => "parseFloat",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(JsString::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }
}

impl Value {
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Array(_) | Value::RegExp(_) | Value::Builtin(_))
    }
    pub fn type_of(&self) -> &'static str {
        match self {
            | Value::Undefined => "undefined",
            | Value::Bool(_) => "boolean",
            | Value::Number(_) => "number",
            | Value::String(_) => "string",
            | Value::Array(_) | Value::RegExp(_) => "object",
            | Value::Builtin(_) => "function",
        }
    }
}

/* ---------------------------------- Error --------------------------------- */

/// Why an operation gave no value. Every case leaves the expression as written.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum EvalError {
    #[error("TypeError: {0}")]
    Type(String),
    #[error("RangeError: {0}")]
    Range(String),
    #[error("URIError: malformed URI sequence")]
    Uri,
    /// Defined behavior the evaluator does not model.
    #[error("not modeled: {0}")]
    Unmodeled(String),
}

pub type Result<T> = std::result::Result<T, EvalError>;
