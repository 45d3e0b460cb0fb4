//! Moving values between the tree and the evaluator.

use crate::syntax::*;
use std::rc::Rc;
use unminify_syntax::*;

impl Value {
    /// The value of a literal node. Regular expressions count only without flags.
    pub fn of_literal(node: &Node) -> Option<Value> {
        match node {
            | Node::LiteralNumericExpression(LiteralNumericExpression { value }) => {
                Some(Value::Number(*value))
            }
            | Node::LiteralStringExpression(LiteralStringExpression { value }) => {
                Some(Value::String(value.clone()))
            }
            | Node::LiteralBooleanExpression(LiteralBooleanExpression { value }) => {
                Some(Value::Bool(*value))
            }
            | Node::LiteralRegExpExpression(LiteralRegExpExpression { pattern, flags })
                if flags.is_empty() =>
            {
                Some(Value::RegExp(Rc::new(RegExp { pattern: pattern.clone(), flags: flags.clone() })))
            }
            | _ => None,
        }
    }

    /// A fresh expression spelling this value; `None` for objects and functions.
    pub fn to_tree(&self) -> Option<Tree> {
        match self {
            | Value::Undefined => Some(void_zero()),
            | Value::Bool(b) => Some(boolean(*b)),
            | Value::String(s) => Some(string(s.clone())),
            | Value::Number(n) => Some(number_tree(*n)),
            | Value::Array(_) | Value::RegExp(_) | Value::Builtin(_) => None,
        }
    }

    /// Like [`Value::to_tree`], but arrays become array literals.
    pub fn to_tree_deep(&self) -> Option<Tree> {
        match self {
            | Value::Array(items) => {
                let elements =
                    items.iter().map(|item| item.to_tree_deep().map(Some)).collect::<Option<Vec<_>>>()?;
                Some(mk(ArrayExpression { elements }))
            }
            | _ => self.to_tree(),
        }
    }
}

/// `NaN` and the infinities are spelled through their global names.
fn number_tree(n: f64) -> Tree {
    if n.is_nan() {
        identifier("NaN")
    } else if n == f64::INFINITY {
        identifier("Infinity")
    } else if n == f64::NEG_INFINITY {
        unary(UnaryOp::Minus, identifier("Infinity"))
    } else {
        number(n)
    }
}
