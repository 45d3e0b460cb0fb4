use crate::syntax::*;
use std::fmt;
use unminify_syntax::number_to_string;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            | Value::Undefined => write!(f, "undefined"),
            | Value::Bool(b) => write!(f, "{b}"),
            | Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            | Value::String(s) => write!(f, "{s:?}"),
            | Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            | Value::RegExp(re) => write!(f, "/{}/{}", re.pattern, re.flags),
            | Value::Builtin(b) => write!(f, "{}", b.name()),
        }
    }
}
