//! Rewrites that need to know what names refer to: moving a bare `var x;` down to the first
//! assignment of `x`, and turning the arguments of an immediately invoked function into
//! `var`s of its body.

use crate::{common::*, err::*};
use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    rc::Rc,
};
use unminify_statics::*;
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct Restructure;

impl Pass<Tree> for Restructure {
    type Error = TransformError;
    fn name(&self) -> &str {
        "restructure"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        let analysis = ScopeAnalysis::analyze(tree);
        let parents = ParentMap::build(tree);
        let unhoisting = Unhoisting::plan(&analysis, &parents);
        let Ok(tree) = reduce(&mut Restructurer { analysis: &analysis, unhoisting }, tree);
        Ok(tree)
    }
}

/* ------------------------------- Unhoisting ------------------------------- */

/// Which statements to drop and which assignments become declarations.
#[derive(Default)]
struct Unhoisting {
    /// `var x;` statements.
    removed: HashSet<NodeId>,
    /// Assignment statements (or `for` loops with an assignment head) that take over the
    /// declaration.
    promoted: HashSet<NodeId>,
}

impl Unhoisting {
    fn plan(analysis: &ScopeAnalysis, parents: &ParentMap) -> Self {
        let mut plan = Unhoisting::default();
        let mut promoted_for: HashMap<VariableId, NodeId> = HashMap::new();
        visit(parents.root(), &mut |node, parent| {
            let Some(holder) = parent.filter(|p| p.statement_list().is_some()) else { return };
            let Some(binding) = bare_var(node) else { return };
            let Some(var) = analysis.variable_of(binding) else { return };
            let writes = simple_writes(analysis, parents, var);
            if writes.is_empty()
                || !writes.iter().all(|(_, p)| p.is_some_and(|p| Rc::ptr_eq(p, holder)))
            {
                return;
            }
            plan.removed.insert(NodeId::of(node));
            let first = writes
                .iter()
                .filter_map(|(statement, _)| Some((parents.list_position(statement)?.1, statement)))
                .min_by_key(|(index, _)| *index);
            if let Some((_, statement)) = first {
                let id = *promoted_for.entry(var).or_insert_with(|| NodeId::of(statement));
                plan.promoted.insert(id);
            }
        });
        log::trace!(
            "[restructure] unhoisting {} declaration(s) into {} assignment(s)",
            plan.removed.len(),
            plan.promoted.len()
        );
        plan
    }

    fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.promoted.is_empty()
    }

    fn touches(&self, statement: &Tree) -> bool {
        let id = NodeId::of(statement);
        self.removed.contains(&id) || self.promoted.contains(&id)
    }
}

/// The binding of `var x;`.
fn bare_var(statement: &Node) -> Option<&Tree> {
    let Node::VariableDeclaration(VariableDeclaration { kind: VarKind::Var, declarators }) =
        statement
    else {
        return None;
    };
    let [only] = declarators.as_slice() else { return None };
    let Node::VariableDeclarator(VariableDeclarator { binding, init: None }) = &**only else {
        return None;
    };
    matches!(&**binding, Node::BindingIdentifier(_)).then_some(binding)
}

/// Plain stores `x = e` standing as a whole statement or as the head of a `for` loop, with the
/// parent of that statement.
fn simple_writes<'a>(
    analysis: &ScopeAnalysis, parents: &'a ParentMap, var: VariableId,
) -> Vec<(&'a Tree, Option<&'a Tree>)> {
    let mut writes = Vec::new();
    for reference in analysis.variable(var).references.iter().filter(|r| r.write && !r.read) {
        if !matches!(&*reference.node, Node::AssignmentTargetIdentifier(_)) {
            continue;
        }
        let Some(assignment) = parents.parent(&reference.node) else { continue };
        if !matches!(&**assignment, Node::AssignmentExpression(_)) {
            continue;
        }
        let Some(statement) = parents.parent(assignment) else { continue };
        let standalone = match &**statement {
            | Node::ExpressionStatement(_) => true,
            | Node::ForStatement(ForStatement { init: Some(init), .. }) => {
                Rc::ptr_eq(init, assignment)
            }
            | _ => false,
        };
        if standalone {
            writes.push((statement, parents.parent(statement)));
        }
    }
    writes
}

/// `x = e;` as `var x = e;`, and `for (x = e; ...)` as `for (var x = e; ...)`.
fn promote(statement: &Tree) -> Option<Tree> {
    let as_declaration = |assignment: &Tree| match &**assignment {
        | Node::AssignmentExpression(AssignmentExpression { binding, expression }) => {
            let name = binding.identifier_name()?;
            Some(var_declaration(
                VarKind::Var,
                vec![declarator(binding_identifier(name), Some(expression.clone()))],
            ))
        }
        | _ => None,
    };
    match &**statement {
        | Node::ExpressionStatement(ExpressionStatement { expression }) => as_declaration(expression),
        | Node::ForStatement(ForStatement { init: Some(init), test, update, body }) => {
            Some(mk(ForStatement {
                init: Some(as_declaration(init)?),
                test: test.clone(),
                update: update.clone(),
                body: body.clone(),
            }))
        }
        | _ => None,
    }
}

/* ------------------------------ The reducer ------------------------------- */

struct Restructurer<'a> {
    analysis: &'a ScopeAnalysis,
    unhoisting: Unhoisting,
}

impl Reducer for Restructurer<'_> {
    type Error = Infallible;
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> std::result::Result<Tree, Infallible> {
        let rewritten = match &*reduced {
            | Node::CallExpression(_) => self.materialize_parameters(original, &reduced),
            | node if node.statement_list().is_some() => self.unhoist(original, &reduced),
            | _ => None,
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}

impl Restructurer<'_> {
    fn unhoist(&self, original: &Tree, reduced: &Tree) -> Option<Tree> {
        if self.unhoisting.is_empty() {
            return None;
        }
        let before = original.statement_list()?;
        if !before.iter().any(|s| self.unhoisting.touches(s)) {
            return None;
        }
        let after = reduced.statement_list()?;
        let mut statements = Vec::with_capacity(after.len());
        for (old, new) in before.iter().zip(after) {
            let id = NodeId::of(old);
            if self.unhoisting.removed.contains(&id) {
                continue;
            }
            if self.unhoisting.promoted.contains(&id) {
                statements.push(promote(new).unwrap_or_else(|| new.clone()));
                continue;
            }
            statements.push(new.clone());
        }
        with_statements(reduced, statements)
    }

    /// `(function (a, b) { body })(x, y)` becomes
    /// `(function () { var a = x; var b = y; body })()`.
    fn materialize_parameters(&self, original: &Tree, reduced: &Tree) -> Option<Tree> {
        let Node::CallExpression(CallExpression { callee: old_callee, arguments: old_arguments }) =
            &**original
        else {
            return None;
        };
        let Node::CallExpression(CallExpression { callee, arguments }) = &**reduced else {
            return None;
        };
        let (function, params, body) = function_expression(old_callee)?;
        if old_arguments.is_empty()
            || params.rest.is_some()
            || !params.items.iter().all(|p| matches!(&**p, Node::BindingIdentifier(_)))
            || function_contains_weirdness(&function.params, &function.body)
        {
            return None;
        }
        if old_arguments
            .iter()
            .any(|arg| matches!(&**arg, Node::SpreadElement(_)) || expression_contains_weirdness(arg))
        {
            return None;
        }
        let scope = self.analysis.scope(self.analysis.scope_of(old_callee)?);
        let mut names = HashSet::new();
        for argument in old_arguments {
            self.free_names(argument, &mut names);
        }
        if names.iter().any(|name| scope.variables.contains_key(name)) {
            return None;
        }
        let param_names: HashSet<_> = params.items.iter().filter_map(|p| p.identifier_name()).collect();
        let redeclared = body.statements.iter().any(|s| match &**s {
            | Node::FunctionDeclaration(FunctionDeclaration { name, .. }) => {
                name.identifier_name().is_some_and(|n| param_names.contains(n))
            }
            | _ => false,
        });
        if redeclared {
            return None;
        }

        let (function, params, body) = function_expression(callee)?;
        let mut statements = Vec::with_capacity(params.items.len() + body.statements.len());
        for (i, param) in params.items.iter().enumerate() {
            let init = arguments.get(i).cloned();
            statements.push(var_declaration(VarKind::Var, vec![declarator(param.clone(), init)]));
        }
        statements.extend(arguments.iter().skip(params.items.len()).cloned().map(expression_statement));
        statements.extend(body.statements.iter().cloned());
        let callee = mk(FunctionExpression {
            name: function.name.clone(),
            params: mk(FormalParameters { items: Vec::new(), rest: None }),
            body: mk(FunctionBody { directives: body.directives.clone(), statements }),
        });
        Some(mk(CallExpression { callee, arguments: Vec::new() }))
    }

    /// Names an expression mentions. Functions contribute the names that pass through them.
    fn free_names(&self, tree: &Tree, names: &mut HashSet<String>) {
        if tree.is_function_like() {
            if let Some(scope) = self.analysis.scope_of(tree) {
                names.extend(self.analysis.scope(scope).through.iter().cloned());
            }
            return;
        }
        if let Some(name) = tree.identifier_name() {
            names.insert(name.to_string());
        }
        for child in tree.children() {
            self.free_names(child, names);
        }
    }
}
