//! Local rewrites toward one canonical spelling of each construct.
//!
//! Every rule looks at a single node over its already normalized children; nothing here needs
//! to know what a name refers to. Rules that expose further work leave it to the next pass of
//! the driver.

use crate::{common::*, err::*};
use std::{convert::Infallible, rc::Rc};
use unminify_statics::function_contains_weirdness;
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct Normalize;

impl Pass<Tree> for Normalize {
    type Error = TransformError;
    fn name(&self) -> &str {
        "normalize"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        let Ok(tree) = reduce(&mut Normalizer, tree);
        Ok(tree)
    }
}

struct Normalizer;

impl Reducer for Normalizer {
    type Error = Infallible;
    fn reduce(&mut self, _original: &Tree, reduced: Tree) -> std::result::Result<Tree, Infallible> {
        let rewritten = match &*reduced {
            | Node::Script(_) | Node::BlockStatement(_) | Node::SwitchCase(_) => {
                let statements = reduced.statement_list().unwrap_or_default();
                fix_statement_list(statements).and_then(|fixed| with_statements(&reduced, fixed))
            }
            | Node::FunctionBody(node) => function_body(node),
            | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Not, operand }) => {
                negate(operand, false, false)
            }
            | Node::BinaryExpression(node) => binary_expression(node),
            | Node::ExpressionStatement(ExpressionStatement { expression }) => {
                expression_statement_rule(expression)
            }
            | Node::IfStatement(node) => if_statement_rule(node),
            | Node::ConditionalExpression(ConditionalExpression { test, consequent, alternate }) => {
                negated_test(test).map(|test| {
                    mk(ConditionalExpression {
                        test,
                        consequent: consequent.clone(),
                        alternate: alternate.clone(),
                    })
                })
            }
            | Node::ForStatement(node) => for_statement(node),
            | Node::ForInStatement(ForInStatement { left, right, body }) => {
                force_block(body).map(|body| {
                    mk(ForInStatement { left: left.clone(), right: right.clone(), body })
                })
            }
            | Node::ForOfStatement(ForOfStatement { left, right, body }) => {
                force_block(body).map(|body| {
                    mk(ForOfStatement { left: left.clone(), right: right.clone(), body })
                })
            }
            | Node::WhileStatement(WhileStatement { test, body }) => {
                force_block(body).map(|body| mk(WhileStatement { test: test.clone(), body }))
            }
            | Node::DoWhileStatement(DoWhileStatement { body, test }) => {
                force_block(body).map(|body| mk(DoWhileStatement { body, test: test.clone() }))
            }
            | Node::ComputedMemberExpression(ComputedMemberExpression { object, expression }) => {
                static_key(expression).map(|property| {
                    mk(StaticMemberExpression { object: object.clone(), property })
                })
            }
            | Node::ComputedMemberAssignmentTarget(ComputedMemberAssignmentTarget {
                object,
                expression,
            }) => static_key(expression).map(|property| {
                mk(StaticMemberAssignmentTarget { object: object.clone(), property })
            }),
            | Node::CallExpression(node) => simple_iife(node),
            | _ => None,
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}

/* ----------------------------- Statement lists ---------------------------- */

/// Rewrites a statement list; `None` when every statement stays as it is.
fn fix_statement_list(statements: &[Tree]) -> Option<Vec<Tree>> {
    let mut out = Vec::with_capacity(statements.len());
    for statement in statements {
        fix_statement(statement, &mut out);
    }
    (!same_list(&out, statements)).then_some(out)
}

fn fix_statement(statement: &Tree, out: &mut Vec<Tree>) {
    match &**statement {
        | Node::EmptyStatement(_) => {}
        | Node::TryStatement(TryStatement { block, handler: Some(handler), finalizer: None })
            if block.statement_list().is_some_and(|s| s.is_empty()) =>
        {
            match &**handler {
                | Node::CatchClause(CatchClause { body, .. }) => {
                    out.push(if_statement(boolean(false), body.clone(), None))
                }
                | _ => out.push(statement.clone()),
            }
        }
        | Node::ExpressionStatement(ExpressionStatement { expression }) => match &**expression {
            | expr if is_sequence(expr) => {
                out.extend(flatten_sequence(expression).into_iter().map(expression_statement))
            }
            | expr if is_side_effect_free(expr) => {}
            | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Void, operand }) => {
                if !is_inlinable(operand) {
                    out.push(expression_statement(operand.clone()))
                }
            }
            | _ => out.push(statement.clone()),
        },
        | Node::ThrowStatement(ThrowStatement { expression }) if is_sequence(expression) => {
            let last = split_sequence(expression, out);
            out.push(mk(ThrowStatement { expression: last }))
        }
        | Node::ReturnStatement(ReturnStatement { expression: Some(expression) }) => {
            match &**expression {
                | expr if is_sequence(expr) => {
                    let last = split_sequence(expression, out);
                    out.push(return_statement(Some(last)))
                }
                | Node::ConditionalExpression(ConditionalExpression {
                    test,
                    consequent,
                    alternate,
                }) => out.push(if_statement(
                    test.clone(),
                    return_statement(Some(consequent.clone())),
                    Some(return_statement(Some(alternate.clone()))),
                )),
                | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Void, operand }) => {
                    out.push(expression_statement(operand.clone()));
                    out.push(return_statement(None))
                }
                | _ => out.push(statement.clone()),
            }
        }
        | Node::BlockStatement(BlockStatement { statements })
            if !statements.iter().any(|s| declares_in_block(s)) =>
        {
            out.extend(statements.iter().cloned())
        }
        | Node::IfStatement(IfStatement { test, consequent, alternate }) if is_sequence(test) => {
            let last = split_sequence(test, out);
            out.push(if_statement(last, consequent.clone(), alternate.clone()))
        }
        | Node::VariableDeclaration(VariableDeclaration { kind, declarators }) => {
            match declarators.as_slice() {
                | [_, _, ..] => out.extend(
                    declarators.iter().map(|d| var_declaration(*kind, vec![d.clone()])),
                ),
                | [only] => match &**only {
                    | Node::VariableDeclarator(VariableDeclarator { binding, init: Some(init) })
                        if is_sequence(init) =>
                    {
                        let last = split_sequence(init, out);
                        out.push(var_declaration(
                            *kind,
                            vec![declarator(binding.clone(), Some(last))],
                        ))
                    }
                    | _ => out.push(statement.clone()),
                },
                | [] => out.push(statement.clone()),
            }
        }
        | Node::ForStatement(ForStatement { init: Some(init), test, update, body }) => {
            let rebuild = |init: Tree| {
                mk(ForStatement {
                    init: Some(init),
                    test: test.clone(),
                    update: update.clone(),
                    body: body.clone(),
                })
            };
            match &**init {
                | Node::VariableDeclaration(VariableDeclaration { kind, declarators })
                    if declarators.len() > 1 =>
                {
                    let (lifted, last) = declarators.split_at(declarators.len() - 1);
                    out.extend(lifted.iter().map(|d| var_declaration(*kind, vec![d.clone()])));
                    out.push(rebuild(var_declaration(*kind, last.to_vec())))
                }
                | expr if is_sequence(expr) => {
                    let last = split_sequence(init, out);
                    out.push(rebuild(last))
                }
                | _ => out.push(statement.clone()),
            }
        }
        | _ => out.push(statement.clone()),
    }
}

/// Expressions whose evaluation is unobservable when the value is dropped.
fn is_side_effect_free(expr: &Node) -> bool {
    is_inlinable(expr) || matches!(expr, Node::ThisExpression(_) | Node::FunctionExpression(_))
}

/// Statements that bind names to the enclosing block: function declarations, `let` and `const`.
fn declares_in_block(statement: &Node) -> bool {
    match statement {
        | Node::FunctionDeclaration(_) => true,
        | Node::VariableDeclaration(VariableDeclaration { kind, .. }) => kind.is_lexical(),
        | _ => false,
    }
}

/* ----------------------------- Function bodies ---------------------------- */

fn function_body(node: &FunctionBody) -> Option<Tree> {
    let mut statements =
        fix_statement_list(&node.statements).unwrap_or_else(|| node.statements.clone());
    let (declarations, rest): (Vec<_>, Vec<_>) = statements
        .into_iter()
        .partition(|s| matches!(&**s, Node::FunctionDeclaration(_)));
    statements = declarations.into_iter().chain(rest).collect();
    if node.directives.is_empty() {
        if let Some(body) = flatten_wrapped_body(&statements) {
            return Some(body);
        }
    }
    if let Some(Node::ReturnStatement(ReturnStatement { expression: None })) =
        statements.last().map(|s| &**s)
    {
        statements.pop();
    }
    (!same_list(&statements, &node.statements))
        .then(|| mk(FunctionBody { directives: node.directives.clone(), statements }))
}

/// A body that only calls an anonymous niladic function is that function's body. When the
/// call's value was discarded, the inner returns are made to return nothing.
fn flatten_wrapped_body(statements: &[Tree]) -> Option<Tree> {
    let [statement] = statements else { return None };
    let (expression, discarded) = match &**statement {
        | Node::ExpressionStatement(ExpressionStatement { expression }) => (expression, true),
        | Node::ReturnStatement(ReturnStatement { expression: Some(expression) }) => {
            (expression, false)
        }
        | _ => return None,
    };
    let Node::CallExpression(CallExpression { callee, arguments }) = &**expression else {
        return None;
    };
    let (function, params, _) = function_expression(callee)?;
    if !arguments.is_empty()
        || function.name.is_some()
        || !params.items.is_empty()
        || params.rest.is_some()
        || function_contains_weirdness(&function.params, &function.body)
    {
        return None;
    }
    Some(if discarded {
        map_children(&function.body, &mut returns_undefined)
    } else {
        function.body.clone()
    })
}

/// `return e` becomes `return void e`, outside nested functions.
fn returns_undefined(tree: &Tree) -> Tree {
    match &**tree {
        | Node::FunctionBody(_) => tree.clone(),
        | Node::ReturnStatement(ReturnStatement { expression: Some(expression) })
            if !is_void(expression) =>
        {
            return_statement(Some(unary(UnaryOp::Void, expression.clone())))
        }
        | _ => map_children(tree, &mut returns_undefined),
    }
}

fn is_void(expr: &Node) -> bool {
    matches!(expr, Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Void, .. }))
}

/* -------------------------------- Negation -------------------------------- */

/// The simplest spelling of `!expr`.
///
/// In a boolean context only truthiness matters, so `!!x` may become `x`. Without `require`,
/// `None` stands for "no simpler form than wrapping in `!`".
pub(crate) fn negate(expr: &Tree, boolean_context: bool, require: bool) -> Option<Tree> {
    match &**expr {
        | Node::LiteralBooleanExpression(LiteralBooleanExpression { value }) => {
            return Some(boolean(!value));
        }
        | Node::LiteralNumericExpression(LiteralNumericExpression { value }) => {
            return Some(boolean(*value == 0.0 || value.is_nan()));
        }
        | Node::ArrayExpression(ArrayExpression { elements }) if elements.is_empty() => {
            return Some(boolean(false));
        }
        | Node::ObjectExpression(ObjectExpression { properties }) if properties.is_empty() => {
            return Some(boolean(false));
        }
        | Node::BinaryExpression(BinaryExpression { left, operator, right }) => {
            let flipped = match operator {
                | BinaryOp::And | BinaryOp::Or => {
                    let operator =
                        if *operator == BinaryOp::And { BinaryOp::Or } else { BinaryOp::And };
                    let left = negate(left, boolean_context, true)?;
                    let right = negate(right, boolean_context, true)?;
                    Some(binary(left, operator, right))
                }
                | _ => operator.negated().map(|op| binary(left.clone(), op, right.clone())),
            };
            if flipped.is_some() {
                return flipped;
            }
        }
        | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Not, operand })
            if boolean_context =>
        {
            return Some(operand.clone());
        }
        | _ => {}
    }
    require.then(|| not(expr.clone()))
}

/// The un-negated test of `!e` when the negation folds away.
fn negated_test(test: &Tree) -> Option<Tree> {
    match &**test {
        | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Not, operand }) => {
            negate(operand, true, false)
        }
        | _ => None,
    }
}

/* ------------------------------- Expressions ------------------------------ */

/// Literals and unary operators over literals.
fn is_constant(expr: &Node) -> bool {
    match expr {
        | Node::UnaryExpression(UnaryExpression { operand, .. }) => is_inlinable(operand),
        | _ => is_inlinable(expr),
    }
}

fn binary_expression(node: &BinaryExpression) -> Option<Tree> {
    let BinaryExpression { left, operator, right } = node;
    if operator.is_equality() && is_constant(left) && !is_constant(right) {
        return Some(binary(right.clone(), *operator, left.clone()));
    }
    if *operator == BinaryOp::Sequence && is_inlinable(left) {
        return Some(right.clone());
    }
    None
}

fn static_key(expression: &Node) -> Option<String> {
    let name = expression.as_string()?.to_rust_string()?;
    is_identifier_name(&name).then_some(name)
}

/// A niladic immediately invoked function of at most one statement, as an expression.
fn simple_iife(node: &CallExpression) -> Option<Tree> {
    let (function, params, body) = function_expression(&node.callee)?;
    if !node.arguments.is_empty()
        || !params.items.is_empty()
        || params.rest.is_some()
        || !body.directives.is_empty()
        || function_contains_weirdness(&function.params, &function.body)
    {
        return None;
    }
    if let Some(name) = &function.name {
        let name = name.identifier_name().unwrap_or_default();
        let mentioned = exists(&function.body, &mut |node| {
            node.identifier_name().map(|found| found == name).filter(|found| *found)
        });
        if mentioned {
            return None;
        }
    }
    match body.statements.as_slice() {
        | [] => Some(void_null()),
        | [statement] => match &**statement {
            | Node::ReturnStatement(ReturnStatement { expression }) => {
                Some(expression.clone().unwrap_or_else(void_null))
            }
            | Node::ExpressionStatement(ExpressionStatement { expression }) => {
                Some(binary(expression.clone(), BinaryOp::Sequence, void_zero()))
            }
            | _ => None,
        },
        | _ => None,
    }
}

/* ------------------------------- Statements ------------------------------- */

fn expression_statement_rule(expression: &Tree) -> Option<Tree> {
    match &**expression {
        | Node::ConditionalExpression(ConditionalExpression { test, consequent, alternate }) => {
            Some(if_statement(
                test.clone(),
                expression_statement(consequent.clone()),
                Some(expression_statement(alternate.clone())),
            ))
        }
        | Node::BinaryExpression(BinaryExpression { left, operator: BinaryOp::And, right }) => {
            Some(if_statement(left.clone(), expression_statement(right.clone()), None))
        }
        | Node::BinaryExpression(BinaryExpression { left, operator: BinaryOp::Or, right }) => {
            Some(if_statement(not(left.clone()), expression_statement(right.clone()), None))
        }
        | Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Not, operand }) => {
            Some(expression_statement(operand.clone()))
        }
        | _ => None,
    }
}

fn if_statement_rule(node: &IfStatement) -> Option<Tree> {
    let mut test = node.test.clone();
    let mut consequent = node.consequent.clone();
    let mut alternate = node.alternate.clone();
    if let Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Not, operand }) = &*node.test
    {
        match negate(operand, true, false) {
            | Some(negated) => test = negated,
            | None => {
                if let Some(other) = alternate.take() {
                    test = operand.clone();
                    alternate = Some(std::mem::replace(&mut consequent, other));
                }
            }
        }
    }
    let flipped = match &*test {
        | Node::BinaryExpression(BinaryExpression {
            left,
            operator: operator @ (BinaryOp::NotEq | BinaryOp::StrictNotEq),
            right,
        }) if alternate.is_some() => {
            operator.negated().map(|op| binary(left.clone(), op, right.clone()))
        }
        | _ => None,
    };
    if let Some(flipped) = flipped {
        test = flipped;
        if let Some(other) = alternate.take() {
            alternate = Some(std::mem::replace(&mut consequent, other));
        }
    }
    consequent = ensure_block(&consequent);
    alternate = alternate.and_then(|other| {
        let other = match &*other {
            | Node::BlockStatement(BlockStatement { statements })
                if matches!(statements.as_slice(), [only] if matches!(&**only, Node::IfStatement(_))) =>
            {
                statements[0].clone()
            }
            | Node::BlockStatement(_) | Node::IfStatement(_) => other.clone(),
            | _ => block(vec![other.clone()]),
        };
        match other.statement_list() {
            | Some([]) => None,
            | _ => Some(other),
        }
    });
    let unchanged = Rc::ptr_eq(&test, &node.test)
        && Rc::ptr_eq(&consequent, &node.consequent)
        && same_opt(&alternate, &node.alternate);
    (!unchanged).then(|| if_statement(test, consequent, alternate))
}

fn force_block(body: &Tree) -> Option<Tree> {
    (!is_block(body)).then(|| block(vec![body.clone()]))
}

fn for_statement(node: &ForStatement) -> Option<Tree> {
    let ForStatement { init, test, update, body } = node;
    let forced = force_block(body);
    if let (None, Some(test), None) = (init, test, update) {
        let body = forced.unwrap_or_else(|| body.clone());
        return Some(mk(WhileStatement { test: test.clone(), body }));
    }
    forced.map(|body| {
        mk(ForStatement { init: init.clone(), test: test.clone(), update: update.clone(), body })
    })
}
