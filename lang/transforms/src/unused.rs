//! Removal of variables, properties and stores nothing ever reads.
//!
//! This assumes the script is the whole program: top-level names are not observed from
//! elsewhere, and dropped initializers of objects and arrays had no effect worth keeping.

use crate::err::*;
use std::{collections::HashSet, convert::Infallible, rc::Rc};
use unminify_statics::*;
use unminify_syntax::*;
use unminify_utils::pass::Pass;

pub struct EliminateUnused;

impl Pass<Tree> for EliminateUnused {
    type Error = TransformError;
    fn name(&self) -> &str {
        "eliminate-unused"
    }
    fn run(&self, tree: &Tree) -> Result<Tree> {
        let analysis = ScopeAnalysis::analyze(tree);
        let parents = ParentMap::build(tree);
        let Ok(tree) = reduce(&mut Remover { analysis: &analysis, parents: &parents }, tree);
        Ok(tree)
    }
}

struct Remover<'a> {
    analysis: &'a ScopeAnalysis,
    parents: &'a ParentMap,
}

impl Reducer for Remover<'_> {
    type Error = Infallible;
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> std::result::Result<Tree, Infallible> {
        let rewritten = match (&**original, &*reduced) {
            | (Node::VariableDeclaration(old), Node::VariableDeclaration(new)) => {
                self.declaration(original, old, new)
            }
            | (Node::VariableDeclarator(old), Node::VariableDeclarator(new)) => {
                self.prune_object(old, new)
            }
            | (
                Node::AssignmentExpression(AssignmentExpression { binding, .. }),
                Node::AssignmentExpression(AssignmentExpression { expression, .. }),
            )
            | (
                Node::CompoundAssignmentExpression(CompoundAssignmentExpression { binding, .. }),
                Node::CompoundAssignmentExpression(CompoundAssignmentExpression {
                    expression, ..
                }),
            ) if self.is_only_written(binding) => Some(expression.clone()),
            | _ => None,
        };
        Ok(rewritten.unwrap_or(reduced))
    }
}

impl Remover<'_> {
    /// The declared variable behind a binding identifier, unless it is global.
    fn local(&self, binding: &Tree) -> Option<&Variable> {
        let var = self.analysis.variable_of(binding)?;
        (!self.analysis.is_global(var)).then(|| self.analysis.variable(var))
    }

    fn declaration(
        &self, original: &Tree, old: &VariableDeclaration, new: &VariableDeclaration,
    ) -> Option<Tree> {
        let in_list = self.parents.parent(original).is_some_and(|p| p.statement_list().is_some());
        if !in_list {
            return None;
        }
        let kept: Vec<(&Tree, &Tree)> = old
            .declarators
            .iter()
            .zip(&new.declarators)
            .filter(|(old, new)| !self.is_unused_constant(old, new))
            .collect();
        match kept.as_slice() {
            | [] => return Some(empty_statement()),
            | [(old, new)] => {
                if let (
                    Node::VariableDeclarator(VariableDeclarator { binding, .. }),
                    Node::VariableDeclarator(VariableDeclarator { init, .. }),
                ) = (&***old, &***new)
                {
                    let unreferenced = self.local(binding).is_some_and(|var| {
                        var.references.iter().all(|r| Rc::ptr_eq(&r.node, binding))
                    });
                    if unreferenced {
                        return Some(match init {
                            | Some(init) => expression_statement(init.clone()),
                            | None => empty_statement(),
                        });
                    }
                }
            }
            | _ => {}
        }
        if kept.len() == new.declarators.len() {
            return None;
        }
        let declarators = kept.into_iter().map(|(_, new)| new.clone()).collect();
        Some(var_declaration(new.kind, declarators))
    }

    /// A declarator of a variable initialized to a value without effects and never mentioned
    /// again.
    fn is_unused_constant(&self, old: &Tree, new: &Tree) -> bool {
        let Node::VariableDeclarator(VariableDeclarator { binding, .. }) = &**old else {
            return false;
        };
        let Node::VariableDeclarator(VariableDeclarator { init: Some(init), .. }) = &**new else {
            return false;
        };
        if !matches!(&**binding, Node::BindingIdentifier(_)) || !is_droppable(init) {
            return false;
        }
        self.local(binding)
            .is_some_and(|var| var.declarations.len() == 1 && var.references.len() == 1)
    }

    /// Drops data properties of an object no one reads by name, when the object is only ever
    /// used through static property reads.
    fn prune_object(&self, old: &VariableDeclarator, new: &VariableDeclarator) -> Option<Tree> {
        let Node::ObjectExpression(ObjectExpression { properties }) = &**new.init.as_ref()? else {
            return None;
        };
        if !properties.iter().all(|p| matches!(&**p, Node::DataProperty(_))) {
            return None;
        }
        let var = self.analysis.variable(self.analysis.variable_of(&old.binding)?);
        let mut read = HashSet::new();
        for reference in &var.references {
            if Rc::ptr_eq(&reference.node, &old.binding) {
                continue;
            }
            match self.parents.parent(&reference.node).map(|p| &**p) {
                | Some(Node::StaticMemberExpression(StaticMemberExpression { property, .. })) => {
                    read.insert(property.as_str());
                }
                | _ => return None,
            }
        }
        let kept: Vec<Tree> = properties
            .iter()
            .filter(|p| {
                let Node::DataProperty(DataProperty { name, expression }) = &***p else {
                    return true;
                };
                let pure = is_inlinable(expression)
                    || matches!(&**expression, Node::FunctionExpression(_));
                match name.as_static_name() {
                    | Some(name) => !pure || read.contains(name),
                    | None => true,
                }
            })
            .cloned()
            .collect();
        if kept.len() == properties.len() {
            return None;
        }
        log::trace!("[eliminate-unused] pruned {} propert(ies)", properties.len() - kept.len());
        Some(declarator(new.binding.clone(), Some(mk(ObjectExpression { properties: kept }))))
    }

    /// A local that is never read, except by updates of itself standing as statements.
    fn is_only_written(&self, target: &Tree) -> bool {
        if !matches!(&**target, Node::AssignmentTargetIdentifier(_)) {
            return false;
        }
        let Some(var) = self.local(target) else { return false };
        var.reads().all(|r| {
            let Some(parent) = self.parents.parent(&r.node).filter(|_| r.write) else {
                return false;
            };
            if !matches!(
                &**parent,
                Node::CompoundAssignmentExpression(_) | Node::UpdateExpression(_)
            ) {
                return false;
            }
            self.parents
                .parent(parent)
                .is_some_and(|gp| matches!(&**gp, Node::ExpressionStatement(_)))
        })
    }
}

/// Initializers that may be dropped along with their variable.
fn is_droppable(init: &Node) -> bool {
    match init {
        | Node::FunctionExpression(_) => true,
        | Node::ObjectExpression(ObjectExpression { properties }) => properties.is_empty(),
        | Node::ArrayExpression(ArrayExpression { elements }) => {
            elements.iter().all(|e| e.as_ref().is_some_and(|e| is_inlinable(e)))
        }
        | init => is_inlinable(init),
    }
}
