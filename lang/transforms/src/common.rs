use std::rc::Rc;
use unminify_syntax::*;

/// Whether two lists hold the same allocations in the same order.
pub(crate) fn same_list(a: &[Tree], b: &[Tree]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Rc::ptr_eq(x, y))
}

pub(crate) fn same_opt(a: &Option<Tree>, b: &Option<Tree>) -> bool {
    match (a, b) {
        | (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        | (None, None) => true,
        | _ => false,
    }
}

pub(crate) fn is_sequence(expr: &Node) -> bool {
    matches!(expr, Node::BinaryExpression(BinaryExpression { operator: BinaryOp::Sequence, .. }))
}

/// Splits a comma chain into statements for all operands but the last, which is returned.
pub(crate) fn split_sequence(expr: &Tree, out: &mut Vec<Tree>) -> Tree {
    let mut items = flatten_sequence(expr);
    let last = items.pop().unwrap_or_else(|| expr.clone());
    out.extend(items.into_iter().map(expression_statement));
    last
}

pub(crate) fn is_block(node: &Node) -> bool {
    matches!(node, Node::BlockStatement(_))
}

/// Statement lists of blocks, `case`s, function bodies and the script, rebuilt with new
/// statements.
pub(crate) fn with_statements(holder: &Node, statements: Vec<Tree>) -> Option<Tree> {
    Some(match holder {
        | Node::Script(Script { directives, .. }) => {
            mk(Script { directives: directives.clone(), statements })
        }
        | Node::FunctionBody(FunctionBody { directives, .. }) => {
            mk(FunctionBody { directives: directives.clone(), statements })
        }
        | Node::BlockStatement(_) => block(statements),
        | Node::SwitchCase(SwitchCase { test, .. }) => {
            mk(SwitchCase { test: test.clone(), consequent: statements })
        }
        | _ => return None,
    })
}

/// The parameter list and body of a function expression.
pub(crate) fn function_expression(node: &Node) -> Option<(&FunctionExpression, &FormalParameters, &FunctionBody)> {
    let Node::FunctionExpression(function) = node else { return None };
    let Node::FormalParameters(params) = &*function.params else { return None };
    let Node::FunctionBody(body) = &*function.body else { return None };
    Some((function, params, body))
}

/// `{ a }` whose `a` was replaced by a value, as `{ a: value }`.
pub(crate) fn expand_shorthand(original: &Tree, reduced: &Tree) -> Option<Tree> {
    let Node::ShorthandProperty(ShorthandProperty { name: old }) = &**original else { return None };
    let Node::ShorthandProperty(ShorthandProperty { name: new }) = &**reduced else { return None };
    if matches!(&**new, Node::IdentifierExpression(_)) {
        return None;
    }
    let key = old.identifier_name()?;
    Some(mk(DataProperty {
        name: mk(StaticPropertyName { value: key.to_string() }),
        expression: new.clone(),
    }))
}
