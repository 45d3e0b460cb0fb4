use crate::{lit::JsString, node::*, ops::*};
use std::rc::Rc;

#[inline]
pub fn mk(node: impl Into<Node>) -> Tree {
    Rc::new(node.into())
}

/* ------------------------------- Expressions ------------------------------ */

pub fn number(value: f64) -> Tree {
    mk(LiteralNumericExpression { value })
}

pub fn string(value: impl Into<JsString>) -> Tree {
    mk(LiteralStringExpression { value: value.into() })
}

pub fn boolean(value: bool) -> Tree {
    mk(LiteralBooleanExpression { value })
}

pub fn null() -> Tree {
    mk(LiteralNullExpression {})
}

pub fn identifier(name: impl Into<String>) -> Tree {
    mk(IdentifierExpression { name: name.into() })
}

pub fn binding_identifier(name: impl Into<String>) -> Tree {
    mk(BindingIdentifier { name: name.into() })
}

pub fn unary(operator: UnaryOp, operand: Tree) -> Tree {
    mk(UnaryExpression { operator, operand })
}

pub fn not(operand: Tree) -> Tree {
    unary(UnaryOp::Not, operand)
}

/// `void 0`, the canonical spelling of `undefined`.
pub fn void_zero() -> Tree {
    unary(UnaryOp::Void, number(0.0))
}

pub fn void_null() -> Tree {
    unary(UnaryOp::Void, null())
}

pub fn binary(left: Tree, operator: BinaryOp, right: Tree) -> Tree {
    mk(BinaryExpression { left, operator, right })
}

/// Folds expressions into a left-nested comma chain.
pub fn sequence(mut expressions: Vec<Tree>) -> Option<Tree> {
    if expressions.is_empty() {
        return None;
    }
    let first = expressions.remove(0);
    Some(expressions.into_iter().fold(first, |acc, e| binary(acc, BinaryOp::Sequence, e)))
}

/// Unfolds a comma chain into its operands, left to right.
pub fn flatten_sequence(expr: &Tree) -> Vec<Tree> {
    match &**expr {
        | Node::BinaryExpression(BinaryExpression {
            left,
            operator: BinaryOp::Sequence,
            right,
        }) => {
            let mut items = flatten_sequence(left);
            items.extend(flatten_sequence(right));
            items
        }
        | _ => vec![expr.clone()],
    }
}

/* ------------------------------- Statements ------------------------------- */

pub fn expression_statement(expression: Tree) -> Tree {
    mk(ExpressionStatement { expression })
}

pub fn empty_statement() -> Tree {
    mk(EmptyStatement {})
}

pub fn block(statements: Vec<Tree>) -> Tree {
    mk(BlockStatement { statements })
}

pub fn return_statement(expression: Option<Tree>) -> Tree {
    mk(ReturnStatement { expression })
}

pub fn if_statement(test: Tree, consequent: Tree, alternate: Option<Tree>) -> Tree {
    mk(IfStatement { test, consequent, alternate })
}

pub fn var_declaration(kind: VarKind, declarators: Vec<Tree>) -> Tree {
    mk(VariableDeclaration { kind, declarators })
}

pub fn declarator(binding: Tree, init: Option<Tree>) -> Tree {
    mk(VariableDeclarator { binding, init })
}

/// Wraps a statement in a block unless it already is one.
pub fn ensure_block(statement: &Tree) -> Tree {
    match &**statement {
        | Node::BlockStatement(_) => statement.clone(),
        | _ => block(vec![statement.clone()]),
    }
}

/* ------------------------------- Predicates ------------------------------- */

/// Literals that can be duplicated or dropped freely: numbers, strings, booleans and `null`.
pub fn is_inlinable(node: &Node) -> bool {
    matches!(
        node,
        Node::LiteralNumericExpression(_)
            | Node::LiteralStringExpression(_)
            | Node::LiteralBooleanExpression(_)
            | Node::LiteralNullExpression(_)
    )
}

pub fn is_void_zero(node: &Node) -> bool {
    match node {
        | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Void, operand }) => {
            matches!(&**operand, Node::LiteralNumericExpression(LiteralNumericExpression { value }) if *value == 0.0)
        }
        | _ => false,
    }
}

/// `return`, `throw`, `break` and `continue`.
pub fn is_abnormal_completion(node: &Node) -> bool {
    matches!(
        node,
        Node::ReturnStatement(_)
            | Node::ThrowStatement(_)
            | Node::BreakStatement(_)
            | Node::ContinueStatement(_)
    )
}

impl Node {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            | Node::LiteralNumericExpression(LiteralNumericExpression { value }) => Some(*value),
            | _ => None,
        }
    }
    pub fn as_string(&self) -> Option<&JsString> {
        match self {
            | Node::LiteralStringExpression(LiteralStringExpression { value }) => Some(value),
            | _ => None,
        }
    }
    /// The key of a static property name.
    pub fn as_static_name(&self) -> Option<&str> {
        match self {
            | Node::StaticPropertyName(StaticPropertyName { value }) => Some(value),
            | _ => None,
        }
    }
}
