//! Replacement of names by the constants they hold.
//!
//! Constancy is judged from declarations and stores alone. Nothing checks that a variable is
//! initialized before it is first read, so a read that used to see `undefined` may now see the
//! initializer.

use crate::{common::*, err::*};
use std::{
    collections::{HashMap, HashSet},
    convert::Infallible,
    rc::Rc,
};
use unminify_statics::*;
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct InlineConstants;

impl Pass<Tree> for InlineConstants {
    type Error = TransformError;
    fn name(&self) -> &str {
        "inline-constants"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        let analysis = ScopeAnalysis::analyze(tree);
        let parents = ParentMap::build(tree);
        let Ok(tree) = reduce(&mut Inliner { facts: Constants::new(&analysis, &parents) }, tree);
        Ok(tree)
    }
}

/* -------------------------------- Constancy ------------------------------- */

/// Which variables and objects of one tree snapshot never change.
pub(crate) struct Constants<'a> {
    pub(crate) analysis: &'a ScopeAnalysis,
    pub(crate) parents: &'a ParentMap,
}

impl<'a> Constants<'a> {
    pub(crate) fn new(analysis: &'a ScopeAnalysis, parents: &'a ParentMap) -> Self {
        Constants { analysis, parents }
    }

    /// Declared once, as a parameter or by a plain declarator, and never stored to after.
    pub(crate) fn is_constant(&self, var: VariableId) -> bool {
        let variable = self.analysis.variable(var);
        let [declaration] = variable.declarations.as_slice() else { return false };
        let declared_plainly = match self.parents.parent(declaration).map(|p| &**p) {
            | Some(Node::VariableDeclarator(VariableDeclarator { binding, .. })) => {
                Rc::ptr_eq(binding, declaration) && !self.is_loop_head(declaration)
            }
            | Some(Node::FormalParameters(_)) => true,
            | _ => false,
        };
        declared_plainly
            && !variable.references.iter().any(|r| r.write && !Rc::ptr_eq(&r.node, declaration))
    }

    /// Whether a binding is declared by the head of a `for-in` or `for-of` loop.
    fn is_loop_head(&self, binding: &Tree) -> bool {
        self.parents.ancestors(binding).nth(2).is_some_and(|loop_| {
            matches!(&**loop_, Node::ForInStatement(_) | Node::ForOfStatement(_))
        })
    }

    /// The initializer of a constant variable.
    pub(crate) fn init(&self, var: VariableId) -> Option<&'a Tree> {
        if !self.is_constant(var) {
            return None;
        }
        let declaration = self.analysis.variable(var).declarations.first()?;
        match &**self.parents.parent(declaration)? {
            | Node::VariableDeclarator(VariableDeclarator { init, .. }) => init.as_ref(),
            | _ => None,
        }
    }

    /// The initializer of the local a name refers to, when it is constant.
    pub(crate) fn init_of(&self, identifier: &Tree) -> Option<(VariableId, &'a Tree)> {
        let var = self.analysis.variable_of(identifier)?;
        if self.analysis.is_global(var) {
            return None;
        }
        Some((var, self.init(var)?))
    }

    /// The properties of a constant object or array literal that no one stores to or deletes,
    /// by key. Array elements are keyed by their index.
    pub(crate) fn constant_object(&self, identifier: &Tree) -> Option<HashMap<String, &'a Tree>> {
        let (var, init) = self.init_of(identifier)?;
        for reference in &self.analysis.variable(var).references {
            let Some(parent) = self.parents.parent(&reference.node) else { continue };
            match &**parent {
                | Node::StaticMemberAssignmentTarget(_) => return None,
                | Node::ComputedMemberAssignmentTarget(ComputedMemberAssignmentTarget {
                    object,
                    ..
                }) if Rc::ptr_eq(object, &reference.node) => return None,
                | Node::StaticMemberExpression(_) | Node::ComputedMemberExpression(_) => {
                    let deleted = self.parents.parent(parent).is_some_and(|gp| {
                        matches!(
                            &**gp,
                            Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Delete, .. })
                        )
                    });
                    if deleted {
                        return None;
                    }
                }
                | _ => {}
            }
        }
        let mut properties = HashMap::new();
        match &**init {
            | Node::ObjectExpression(ObjectExpression { properties: items }) => {
                for item in items {
                    let (name, value) = match &**item {
                        | Node::DataProperty(DataProperty { name, expression }) => {
                            (name, Some(expression))
                        }
                        | Node::ShorthandProperty(ShorthandProperty { name }) => (name, None),
                        | Node::MethodDefinition(MethodDefinition { name, .. })
                        | Node::Getter(Getter { name, .. })
                        | Node::Setter(Setter { name, .. }) => (name, None),
                        | _ => return None,
                    };
                    let key = match &**name {
                        | Node::StaticPropertyName(StaticPropertyName { value }) => value,
                        | Node::IdentifierExpression(IdentifierExpression { name }) => name,
                        | _ => return None,
                    };
                    match value {
                        | Some(value) => properties.insert(key.clone(), value),
                        | None => properties.remove(key),
                    };
                }
            }
            | Node::ArrayExpression(ArrayExpression { elements }) => {
                for (i, element) in elements.iter().enumerate() {
                    if let Some(element) = element {
                        properties.insert(i.to_string(), element);
                    }
                }
            }
            | _ => return None,
        }
        Some(properties)
    }

    /// Whether `name` read at `at` finds `var`.
    pub(crate) fn resolves_to(&self, at: &Tree, name: &str, var: VariableId) -> bool {
        for ancestor in self.parents.ancestors(at) {
            if let Some(scope) = self.analysis.scope_of(ancestor) {
                if let Some(found) = self.analysis.lookup(scope, name) {
                    return found == var;
                }
            }
        }
        self.analysis.lookup(self.analysis.global(), name) == Some(var)
    }
}

/// A computed key as a property name.
pub(crate) fn property_key(key: &Node) -> Option<String> {
    match key {
        | Node::LiteralNumericExpression(LiteralNumericExpression { value }) => {
            Some(number_to_string(*value))
        }
        | Node::LiteralStringExpression(LiteralStringExpression { value }) => {
            value.to_rust_string()
        }
        | _ => None,
    }
}

/* ------------------------------- The reducer ------------------------------ */

struct Inliner<'a> {
    facts: Constants<'a>,
}

impl Reducer for Inliner<'_> {
    type Error = Infallible;
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> std::result::Result<Tree, Infallible> {
        let rewritten = match (&**original, &*reduced) {
            | (_, Node::ExpressionStatement(ExpressionStatement { expression }))
                if matches!(&**expression, Node::IdentifierExpression(_)) =>
            {
                Some(empty_statement())
            }
            | (Node::IdentifierExpression(IdentifierExpression { name }), _) => {
                self.constant_value(original, name)
            }
            | (Node::CallExpression(call), Node::CallExpression(CallExpression { arguments, .. })) => {
                self.call(call, arguments)
            }
            | (
                Node::StaticMemberExpression(StaticMemberExpression { object, property }),
                _,
            ) => self.stored_literal(object, property),
            | (
                Node::ComputedMemberExpression(ComputedMemberExpression { object, .. }),
                Node::ComputedMemberExpression(ComputedMemberExpression { expression, .. }),
            ) => property_key(expression).and_then(|key| self.stored_literal(object, &key)),
            | (_, Node::ShorthandProperty(_)) => expand_shorthand(original, &reduced),
            | _ => None,
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}

impl Inliner<'_> {
    /// A read of a constant becomes a copy of the literal it holds, looking through other
    /// constants. Failing that, it becomes a read of the constant it was initialized from.
    fn constant_value(&self, read: &Tree, name: &str) -> Option<Tree> {
        let (var, init) = self.facts.init_of(read)?;
        if is_inlinable(init) {
            return Some(deep_copy(init));
        }
        let Node::IdentifierExpression(IdentifierExpression { name: source }) = &**init else {
            return None;
        };
        let first = self.facts.analysis.variable_of(init)?;
        if !self.facts.is_constant(first) {
            return None;
        }
        let mut seen = HashSet::from([var]);
        let mut current = first;
        loop {
            if !seen.insert(current) {
                log::trace!("[inline-constants] `{name}` is initialized in a cycle");
                return None;
            }
            match self.facts.init(current) {
                | Some(init) if is_inlinable(init) => return Some(deep_copy(init)),
                | Some(init) if matches!(&**init, Node::IdentifierExpression(_)) => {
                    match self.facts.analysis.variable_of(init) {
                        | Some(next) if self.facts.is_constant(next) => current = next,
                        | _ => break,
                    }
                }
                | _ => break,
            }
        }
        self.facts.resolves_to(read, source, first).then(|| identifier(source.as_str()))
    }

    fn stored_literal(&self, object: &Tree, key: &str) -> Option<Tree> {
        if !matches!(&**object, Node::IdentifierExpression(_)) {
            return None;
        }
        let properties = self.facts.constant_object(object)?;
        let value = properties.get(key)?;
        is_inlinable(value).then(|| deep_copy(value))
    }

    fn call(&self, call: &CallExpression, arguments: &[Tree]) -> Option<Tree> {
        match &*call.callee {
            | Node::StaticMemberExpression(StaticMemberExpression { object, property })
                if matches!(&**object, Node::IdentifierExpression(_)) =>
            {
                let properties = self.facts.constant_object(object)?;
                self.trivial_call(properties.get(property.as_str())?, arguments)
            }
            | Node::IdentifierExpression(_) => self.local_function_call(&call.callee, arguments),
            | _ => None,
        }
    }

    /// A call of a function that only combines its parameters with binary operators, in order,
    /// as that combination of the arguments.
    fn trivial_call(&self, function: &Tree, arguments: &[Tree]) -> Option<Tree> {
        let (_, params, body) = function_expression(function)?;
        if params.items.len() != arguments.len() || params.rest.is_some() || !body.directives.is_empty()
        {
            return None;
        }
        let [statement] = body.statements.as_slice() else { return None };
        let Node::ReturnStatement(ReturnStatement { expression: Some(expression) }) = &**statement
        else {
            return None;
        };
        let is_param = |expr: &Tree, i: usize| {
            let analysis = self.facts.analysis;
            matches!(&**expr, Node::IdentifierExpression(_))
                && analysis.variable_of(expr).is_some()
                && analysis.variable_of(expr) == analysis.variable_of(&params.items[i])
        };
        let Node::BinaryExpression(BinaryExpression { left, operator, right }) = &**expression else {
            return None;
        };
        if is_short_circuit(*operator) {
            return None;
        }
        match arguments {
            | [a, b] if is_param(left, 0) && is_param(right, 1) => {
                Some(binary(a.clone(), *operator, b.clone()))
            }
            | [a, b, c] if is_param(right, 2) => {
                let Node::BinaryExpression(BinaryExpression {
                    left: inner_left,
                    operator: inner,
                    right: inner_right,
                }) = &**left
                else {
                    return None;
                };
                if is_short_circuit(*inner) || !is_param(inner_left, 0) || !is_param(inner_right, 1)
                {
                    return None;
                }
                Some(binary(binary(a.clone(), *inner, b.clone()), *operator, c.clone()))
            }
            | _ => None,
        }
    }

    /// Calls of constant, closed function expressions bound to a local name.
    fn local_function_call(&self, callee: &Tree, arguments: &[Tree]) -> Option<Tree> {
        let (var, init) = self.facts.init_of(callee)?;
        let (function, params, body) = function_expression(init)?;
        let scope = self.facts.analysis.scope(self.facts.analysis.scope_of(init)?);
        let closed = scope.through.is_empty();
        if closed && params.items.len() == 1 && arguments.len() <= 1 {
            if let Some(conditional) = self.selector_call(function, params, body, arguments) {
                return Some(conditional);
            }
        }
        let references = &self.facts.analysis.variable(var).references;
        if references.len() != 2 {
            return None;
        }
        let declaration = self.facts.analysis.variable(var).declarations.first()?;
        if !closed && !self.same_statement_list(declaration, callee) {
            return None;
        }
        log::trace!("[inline-constants] inlining the only call of `{}`", self.facts.analysis.variable(var).name);
        Some(mk(CallExpression { callee: deep_copy(init), arguments: arguments.to_vec() }))
    }

    /// `f(x)` for `function (p) { if (p == k) { return a; } else { return b; } }` is
    /// `x == k ? a : b`.
    fn selector_call(
        &self, function: &FunctionExpression, params: &FormalParameters, body: &FunctionBody,
        arguments: &[Tree],
    ) -> Option<Tree> {
        if function_contains_weirdness(&function.params, &function.body) {
            return None;
        }
        let param = self.facts.analysis.variable_of(params.items.first()?)?;
        if self.facts.analysis.variable(param).references.len() != 1 {
            return None;
        }
        let [statement] = body.statements.as_slice() else { return None };
        let Node::IfStatement(IfStatement { test, consequent, alternate: Some(alternate) }) =
            &**statement
        else {
            return None;
        };
        let (Some(consequent), Some(alternate)) = (sole_return(consequent), sole_return(alternate))
        else {
            return None;
        };
        let Node::BinaryExpression(BinaryExpression { left, operator, right }) = &**test else {
            return None;
        };
        if !matches!(operator, BinaryOp::Eq | BinaryOp::StrictEq)
            || !matches!(&**left, Node::IdentifierExpression(_))
            || self.facts.analysis.variable_of(left) != Some(param)
            || !is_inlinable(right)
        {
            return None;
        }
        let argument = arguments.first().cloned().unwrap_or_else(void_zero);
        Some(mk(ConditionalExpression {
            test: binary(argument, *operator, deep_copy(right)),
            consequent: deep_copy(consequent),
            alternate: deep_copy(alternate),
        }))
    }

    /// Whether the statements holding `a` and `b` sit in the same statement list.
    fn same_statement_list(&self, a: &Tree, b: &Tree) -> bool {
        let holder = |node: &Tree| {
            std::iter::once(node)
                .chain(self.facts.parents.ancestors(node))
                .find_map(|n| self.facts.parents.list_position(n).map(|(holder, _)| holder))
        };
        match (holder(a), holder(b)) {
            | (Some(x), Some(y)) => Rc::ptr_eq(x, y),
            | _ => false,
        }
    }
}

/// The returned expression of `{ return e; }`.
fn sole_return(statement: &Tree) -> Option<&Tree> {
    let [only] = statement.statement_list().filter(|_| is_block(statement))? else { return None };
    match &**only {
        | Node::ReturnStatement(ReturnStatement { expression: Some(expression) }) => Some(expression),
        | _ => None,
    }
}

fn is_short_circuit(operator: BinaryOp) -> bool {
    matches!(operator, BinaryOp::And | BinaryOp::Or | BinaryOp::Sequence)
}
