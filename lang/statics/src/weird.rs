use unminify_syntax::*;

/// Whether a function's parameters or body depend on its caller through `this` or
/// `arguments`. Nested non-arrow functions bind their own and are not searched.
pub fn function_contains_weirdness(params: &Tree, body: &Tree) -> bool {
    expression_contains_weirdness(params) || expression_contains_weirdness(body)
}

pub fn expression_contains_weirdness(tree: &Tree) -> bool {
    exists(tree, &mut |node| match &**node {
        | Node::ThisExpression(_) => Some(true),
        | Node::IdentifierExpression(IdentifierExpression { name }) => Some(name == "arguments"),
        | node if node.is_function_boundary() => Some(false),
        | _ => None,
    })
}

/// The parameters and body of any function-like node.
pub fn function_parts(node: &Node) -> Option<(Option<&Tree>, &Tree)> {
    match node {
        | Node::FunctionDeclaration(FunctionDeclaration { params, body, .. })
        | Node::FunctionExpression(FunctionExpression { params, body, .. })
        | Node::MethodDefinition(MethodDefinition { params, body, .. })
        | Node::ArrowExpression(ArrowExpression { params, body }) => Some((Some(params), body)),
        | Node::Setter(Setter { param, body, .. }) => Some((Some(param), body)),
        | Node::Getter(Getter { body, .. }) => Some((None, body)),
        | _ => None,
    }
}
