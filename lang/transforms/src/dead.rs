//! Removal of statements that can never run.

use crate::{common::*, err::*};
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct EliminateDead;

impl Pass<Tree> for EliminateDead {
    type Error = TransformError;
    fn name(&self) -> &str {
        "eliminate-dead"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        reduce(&mut DeadCode, tree)
    }
}

struct DeadCode;

impl Reducer for DeadCode {
    type Error = TransformError;
    fn reduce(&mut self, _original: &Tree, reduced: Tree) -> Result<Tree> {
        let rewritten = match &*reduced {
            | Node::SwitchStatement(node) => constant_switch(node)?,
            | Node::WhileStatement(node) => single_iteration(node),
            | Node::LabeledStatement(node) => labeled_single_iteration(node),
            | node => match node.statement_list() {
                | Some(statements) => match cut_after_completion(statements)? {
                    | Some(statements) => with_statements(node, statements),
                    | None => None,
                },
                | None => None,
            },
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}

/// Drops everything after the first `return`, `throw`, `break` or `continue`, keeping the
/// declarations the dropped statements hoist in front of the list.
fn cut_after_completion(statements: &[Tree]) -> Result<Option<Vec<Tree>>> {
    let Some(end) = statements.iter().position(|s| is_abnormal_completion(s)) else {
        return Ok(None);
    };
    if end + 1 == statements.len() {
        return Ok(None);
    }
    let mut out = hoisted(&statements[end + 1..])?;
    out.extend(statements[..=end].iter().cloned());
    Ok(Some(out))
}

/// The declarations `statements` make visible to the rest of their scope: function
/// declarations verbatim, and every variable declaration without its initializer. Nested
/// functions are not searched.
fn hoisted(statements: &[Tree]) -> Result<Vec<Tree>> {
    let mut out = Vec::new();
    for statement in statements {
        match &**statement {
            | Node::FunctionDeclaration(_) => out.push(statement.clone()),
            | Node::VariableDeclaration(declaration) => out.push(stripped(declaration)?),
            | _ => nested_vars(statement, &mut out)?,
        }
    }
    Ok(out)
}

fn nested_vars(tree: &Tree, out: &mut Vec<Tree>) -> Result<()> {
    match &**tree {
        | node if node.is_function_like() => {}
        | Node::VariableDeclaration(declaration) if !declaration.kind.is_lexical() => {
            out.push(stripped(declaration)?)
        }
        | _ => {
            for child in tree.children() {
                nested_vars(child, out)?;
            }
        }
    }
    Ok(())
}

/// `var a = 1, b;` as `var a, b;`. A `const` without initializer is not valid, so it turns
/// into `let`.
fn stripped(declaration: &VariableDeclaration) -> Result<Tree> {
    let mut declarators = Vec::with_capacity(declaration.declarators.len());
    for d in &declaration.declarators {
        let Node::VariableDeclarator(VariableDeclarator { binding, .. }) = &**d else { continue };
        let Some(name) = binding.identifier_name() else {
            return Err(TransformError::Unsupported {
                pass: "eliminate-dead",
                construct: format!("{} pattern in a discarded declaration", binding.kind()),
            });
        };
        declarators.push(declarator(binding_identifier(name), None));
    }
    let kind = match declaration.kind {
        | VarKind::Const => VarKind::Let,
        | kind => kind,
    };
    Ok(var_declaration(kind, declarators))
}

/// Whether an unlabeled `break` inside `tree` leaves it.
fn has_break(tree: &Tree) -> bool {
    exists(tree, &mut |node| match &**node {
        | Node::BreakStatement(BreakStatement { label }) => Some(label.is_none()),
        | Node::SwitchStatement(_)
        | Node::WhileStatement(_)
        | Node::DoWhileStatement(_)
        | Node::ForStatement(_)
        | Node::ForInStatement(_)
        | Node::ForOfStatement(_)
        | Node::FunctionBody(_) => Some(false),
        | node if node.is_function_like() => Some(false),
        | _ => None,
    })
}

fn has_continue(tree: &Tree) -> bool {
    exists(tree, &mut |node| match &**node {
        | Node::ContinueStatement(_) => Some(true),
        | node if node.is_function_like() => Some(false),
        | _ => None,
    })
}

/// The statements a case runs when it ends in `return`, `throw` or `break`, without the final
/// unlabeled `break`.
fn without_final_break(statements: &[Tree]) -> Option<&[Tree]> {
    let (last, init) = statements.split_last()?;
    match &**last {
        | Node::BreakStatement(BreakStatement { label: None }) => Some(init),
        | Node::BreakStatement(_) => None,
        | node if is_abnormal_completion(node) => Some(statements),
        | _ => None,
    }
}

/// `switch (2) { case 1: a(); break; case 2: b(); break; }` is `{ b(); }`.
fn constant_switch(node: &SwitchStatement) -> Result<Option<Tree>> {
    let Some(discriminant) = node.discriminant.as_number() else { return Ok(None) };
    let mut tests = Vec::with_capacity(node.cases.len());
    for case in &node.cases {
        let Node::SwitchCase(SwitchCase { test: Some(test), consequent }) = &**case else {
            return Ok(None);
        };
        if !is_inlinable(test) {
            return Ok(None);
        }
        tests.push((test, consequent));
    }
    let Some(matched) = tests.iter().position(|(test, _)| test.as_number() == Some(discriminant))
    else {
        return Ok(None);
    };
    let (_, consequent) = tests[matched];
    let Some(included) = without_final_break(consequent) else { return Ok(None) };
    if included.iter().any(has_break) {
        return Ok(None);
    }
    let mut statements = Vec::new();
    for (i, (_, other)) in tests.iter().enumerate() {
        if i != matched {
            statements.extend(hoisted(other)?);
        }
    }
    statements.extend(included.iter().cloned());
    Ok(Some(block(statements)))
}

/// `while (true) { body; return; }` runs its body once.
fn single_iteration(node: &WhileStatement) -> Option<Tree> {
    if !matches!(&*node.test, Node::LiteralBooleanExpression(LiteralBooleanExpression { value: true }))
    {
        return None;
    }
    let statements = node.body.statement_list().filter(|_| is_block(&node.body))?;
    let included = without_final_break(statements)?;
    if matches!(statements.last().map(|s| &**s), Some(Node::ContinueStatement(_))) {
        return None;
    }
    if included.iter().any(|s| has_break(s) || has_continue(s)) {
        return None;
    }
    Some(block(included.to_vec()))
}

/// `a: while (true) { body; break a; }` runs its body once. The label stays only while the body
/// still breaks out of it.
fn labeled_single_iteration(node: &LabeledStatement) -> Option<Tree> {
    let Node::WhileStatement(WhileStatement { test, body }) = &*node.body else { return None };
    if !matches!(&**test, Node::LiteralBooleanExpression(LiteralBooleanExpression { value: true })) {
        return None;
    }
    let statements = body.statement_list().filter(|_| is_block(body))?;
    let (last, init) = statements.split_last()?;
    let included = match &**last {
        | Node::BreakStatement(BreakStatement { label: Some(label) }) if *label == node.label => init,
        | _ => return None,
    };
    if included.iter().any(|s| has_break(s) || has_continue(s)) {
        return None;
    }
    let body = block(included.to_vec());
    if included.iter().any(|s| breaks_to(s, &node.label)) {
        return Some(mk(LabeledStatement { label: node.label.clone(), body }));
    }
    Some(body)
}

/// Whether a `break label` inside `tree` targets `label`.
fn breaks_to(tree: &Tree, label: &str) -> bool {
    exists(tree, &mut |node| match &**node {
        | Node::BreakStatement(BreakStatement { label: Some(target) }) => Some(target == label),
        | node if node.is_function_like() => Some(false),
        | _ => None,
    })
}
