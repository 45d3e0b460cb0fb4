//! Folding of expressions whose value is known before the script runs.
//!
//! Values come from literals, from constant variables (assuming no read happens before the
//! initializer runs) and from a handful of pure built-ins. Arrays and regular expressions are
//! tracked but never written back; everything else that folds is replaced by a literal.

use crate::{common::*, err::*, inline::Constants};
use std::{collections::HashMap, convert::Infallible, rc::Rc};
use unminify_dynamics::{self as dynamics, Builtin, Value};
use unminify_statics::*;
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct PartialEvaluate;

impl Pass<Tree> for PartialEvaluate {
    type Error = TransformError;
    fn name(&self) -> &str {
        "partial-evaluate"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        let analysis = ScopeAnalysis::analyze(tree);
        let parents = ParentMap::build(tree);
        let mut evaluator =
            Evaluator { facts: Constants::new(&analysis, &parents), memo: HashMap::new() };
        let Ok(tree) = reduce(&mut evaluator, tree);
        Ok(tree)
    }
}

/* ------------------------------ The evaluator ----------------------------- */

struct Evaluator<'a> {
    facts: Constants<'a>,
    /// Results by node. The node is kept alive so that its identity is not reused while the
    /// entry exists; `None` is also what a node under evaluation reads for itself.
    memo: HashMap<NodeId, (Tree, Option<Value>)>,
}

impl Evaluator<'_> {
    fn evaluate(&mut self, node: &Tree) -> Option<Value> {
        let id = NodeId::of(node);
        if let Some((_, value)) = self.memo.get(&id) {
            return value.clone();
        }
        self.memo.insert(id, (node.clone(), None));
        let value = self.evaluate_core(node);
        if let Some(value) = &value {
            self.memo.insert(id, (node.clone(), Some(value.clone())));
        }
        value
    }

    fn evaluate_core(&mut self, node: &Tree) -> Option<Value> {
        match &**node {
            | Node::ArrayExpression(ArrayExpression { elements }) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(match element {
                        | Some(element) => self.evaluate(element)?,
                        | None => Value::Undefined,
                    });
                }
                Some(Value::from(items))
            }
            | Node::UnaryExpression(UnaryExpression { operator, operand }) => {
                let operand = self.evaluate(operand)?;
                known(dynamics::unary(*operator, &operand))
            }
            | Node::BinaryExpression(BinaryExpression { left, operator, right }) => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                known(dynamics::binary(*operator, &left, &right))
            }
            | Node::IdentifierExpression(IdentifierExpression { name }) => {
                if let Some(builtin) = self.untouched_global(node, name) {
                    return Some(Value::Builtin(builtin));
                }
                let (var, init) = self.facts.init_of(node)?;
                let value = self.evaluate(init)?;
                if matches!(value, Value::Array(_)) && !self.array_stays_intact(var) {
                    return None;
                }
                Some(value)
            }
            | Node::CallExpression(CallExpression { callee, arguments }) => {
                self.call(callee, arguments)
            }
            | Node::StaticMemberExpression(StaticMemberExpression { object, property }) => {
                if let Node::ArrayExpression(ArrayExpression { elements }) = &**object {
                    if property == "length" {
                        return Some(Value::Number(elements.len() as f64));
                    }
                }
                self.static_property(object, property)
            }
            | node => Value::of_literal(node),
        }
    }

    /// One of the allowed global functions, when nothing declares or assigns its name.
    fn untouched_global(&self, identifier: &Tree, name: &str) -> Option<Builtin> {
        let builtin = dynamics::global(name)?;
        let analysis = self.facts.analysis;
        let var = analysis.variable_of(identifier)?;
        let variable = analysis.variable(var);
        let untouched = analysis.is_global(var)
            && variable.declarations.is_empty()
            && variable.writes().next().is_none();
        untouched.then_some(builtin)
    }

    /// An array bound to a variable keeps its value if the variable is only read, measured,
    /// or passed to methods that leave the array alone.
    fn array_stays_intact(&self, var: VariableId) -> bool {
        let parents = self.facts.parents;
        self.facts.analysis.variable(var).references.iter().all(|reference| {
            let Some(parent) = parents.parent(&reference.node) else { return true };
            match &**parent {
                | Node::StaticMemberExpression(StaticMemberExpression { property, .. }) => {
                    property == "length" || dynamics::is_non_mutating_array_method(property)
                }
                | Node::StaticMemberAssignmentTarget(_)
                | Node::ComputedMemberAssignmentTarget(_) => false,
                | Node::ComputedMemberExpression(_) => !is_callee(parents, parent),
                | _ => true,
            }
        })
    }

    fn call(&mut self, callee: &Tree, arguments: &[Tree]) -> Option<Value> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            values.push(self.evaluate(argument)?);
        }
        if let Node::StaticMemberExpression(StaticMemberExpression { object, property }) =
            &**callee
        {
            if self.is_from_char_code(object, property, arguments) {
                return known(dynamics::from_char_code(&values));
            }
            match self.evaluate(object) {
                | Some(Value::Builtin(_)) | None => {}
                | Some(this @ Value::Array(_)) => {
                    if dynamics::is_non_mutating_array_method(property) {
                        return known(dynamics::call_method(&this, property, &values));
                    }
                }
                | Some(Value::RegExp(_)) => {}
                | Some(this) => return known(dynamics::call_method(&this, property, &values)),
            }
        }
        match self.evaluate(callee)? {
            | Value::Builtin(builtin) => known(builtin.call(&values)),
            | _ => None,
        }
    }

    /// `String.fromCharCode(<number>)` with `String` the global one.
    fn is_from_char_code(&self, object: &Tree, property: &str, arguments: &[Tree]) -> bool {
        let Node::IdentifierExpression(IdentifierExpression { name }) = &**object else {
            return false;
        };
        let global = self.facts.analysis.variable_of(object).is_some_and(|var| {
            let analysis = self.facts.analysis;
            analysis.is_global(var) && analysis.variable(var).declarations.is_empty()
        });
        name == "String"
            && property == "fromCharCode"
            && global
            && matches!(arguments, [argument] if argument.as_number().is_some())
    }

    /// `o.p` for a primitive or array `o`, or for an object or function bound to a constant
    /// whose property `p` is set in exactly one visible place.
    fn static_property(&mut self, object: &Tree, property: &str) -> Option<Value> {
        match self.evaluate(object) {
            | Some(this @ (Value::Undefined | Value::Bool(_) | Value::Number(_) | Value::String(_))) => {
                return known(dynamics::get_property(&this, property));
            }
            | Some(this @ Value::Array(_)) if property == "length" => {
                return known(dynamics::get_property(&this, property));
            }
            | _ => {}
        }
        if !matches!(&**object, Node::IdentifierExpression(_)) {
            return None;
        }
        let (var, init) = self.facts.init_of(object)?;
        let properties = match &**init {
            | Node::FunctionExpression(_) => &[][..],
            | Node::ObjectExpression(ObjectExpression { properties }) => properties.as_slice(),
            | _ => return None,
        };
        let mut stored = Vec::new();
        for item in properties {
            let Node::DataProperty(DataProperty { name, expression }) = &**item else {
                return None;
            };
            let Some(key) = name.as_static_name() else { return None };
            if key == property {
                stored.push(expression);
            }
        }
        let parents = self.facts.parents;
        let mut writes = Vec::new();
        for reference in &self.facts.analysis.variable(var).references {
            let Some(parent) = parents.parent(&reference.node) else { continue };
            match &**parent {
                | Node::StaticMemberExpression(_) => {}
                | Node::StaticMemberAssignmentTarget(StaticMemberAssignmentTarget {
                    property: written,
                    ..
                }) => {
                    if written == property {
                        writes.push(parent);
                    }
                }
                | Node::ComputedMemberAssignmentTarget(ComputedMemberAssignmentTarget {
                    object,
                    ..
                }) if Rc::ptr_eq(object, &reference.node) => return None,
                | Node::ComputedMemberAssignmentTarget(_) => {}
                | _ if reference.read => return None,
                | _ => {}
            }
        }
        let value = match (stored.as_slice(), writes.as_slice()) {
            | ([expression], []) => *expression,
            | ([], [target]) => match parents.parent(target).map(|p| &**p) {
                | Some(Node::AssignmentExpression(AssignmentExpression { expression, .. })) => {
                    expression
                }
                | _ => return None,
            },
            | _ => return None,
        };
        let value = value.clone();
        self.evaluate(&value)
    }

    /// The literal spelling of a foldable expression.
    fn literal_for(&mut self, node: &Tree) -> Option<Tree> {
        let value = self.evaluate(node)?;
        if value.is_object() || (matches!(value, Value::Undefined) && is_void_zero(node)) {
            return None;
        }
        log::trace!("[partial-evaluate] {} folds to {}", node.kind(), value);
        value.to_tree()
    }

    /// `[a, b][1]` is `b`, `'ab'[0]` is `'a'`, and indices past the end are `void 0`.
    fn index_literal(&mut self, original: &Tree, node: &ComputedMemberExpression) -> Option<Tree> {
        if is_callee(self.facts.parents, original) {
            return None;
        }
        let len = match &*node.object {
            | Node::ArrayExpression(ArrayExpression { elements }) => elements.len(),
            | Node::LiteralStringExpression(LiteralStringExpression { value }) => value.len(),
            | _ => return None,
        };
        let key = dynamics::to_string(&self.evaluate(&node.expression)?).ok()?.to_rust_string()?;
        if key == "length" {
            return Some(number(len as f64));
        }
        let index = array_index(&key)?;
        if index >= len {
            return Some(void_zero());
        }
        match &*node.object {
            | Node::ArrayExpression(ArrayExpression { elements }) => {
                Some(elements[index].clone().unwrap_or_else(void_zero))
            }
            | Node::LiteralStringExpression(LiteralStringExpression { value }) => {
                Some(string(JsString::from_units(vec![value.units()[index]])))
            }
            | _ => None,
        }
    }

    fn known_test(&mut self, test: &Tree) -> Option<bool> {
        self.evaluate(test).map(|value| dynamics::to_boolean(&value))
    }
}

/// Whether `node` is the callee of the call holding it.
fn is_callee(parents: &ParentMap, node: &Tree) -> bool {
    parents.parent(node).is_some_and(|parent| match &**parent {
        | Node::CallExpression(CallExpression { callee, .. }) => Rc::ptr_eq(callee, node),
        | _ => false,
    })
}

fn known(result: dynamics::Result<Value>) -> Option<Value> {
    match result {
        | Ok(value) => Some(value),
        | Err(err) => {
            log::trace!("[partial-evaluate] left as written: {}", err);
            None
        }
    }
}

/* ------------------------------- The reducer ------------------------------ */

impl Reducer for Evaluator<'_> {
    type Error = Infallible;
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> std::result::Result<Tree, Infallible> {
        let rewritten = match &*reduced {
            | Node::UnaryExpression(_)
            | Node::BinaryExpression(_)
            | Node::CallExpression(_)
            | Node::StaticMemberExpression(_)
            | Node::IdentifierExpression(_) => self.literal_for(&reduced),
            | Node::ComputedMemberExpression(node) => self.index_literal(original, node),
            | Node::ConditionalExpression(ConditionalExpression { test, consequent, alternate }) => {
                self.known_test(test)
                    .map(|taken| if taken { consequent.clone() } else { alternate.clone() })
            }
            | Node::IfStatement(IfStatement { test, consequent, alternate }) => {
                self.known_test(test).map(|taken| match (taken, alternate) {
                    | (true, _) => consequent.clone(),
                    | (false, Some(alternate)) => alternate.clone(),
                    | (false, None) => empty_statement(),
                })
            }
            | Node::ShorthandProperty(_) => expand_shorthand(original, &reduced),
            | _ => None,
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}
