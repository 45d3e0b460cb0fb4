use crate::node::*;
use std::{convert::Infallible, rc::Rc};

/// A post-order rewrite over a tree.
///
/// Children are reduced first. The node is then rebuilt from its reduced children only when one
/// of them changed; otherwise `reduced` is `original` itself. A reducer that keeps a node hands
/// `reduced` back untouched.
pub trait Reducer {
    type Error;
    /// `original` is the node of the input tree, `reduced` the same node over reduced children.
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> Result<Tree, Self::Error>;
}

pub fn reduce<R: Reducer + ?Sized>(reducer: &mut R, tree: &Tree) -> Result<Tree, R::Error> {
    let reduced = match tree.try_map_children(&mut |child| reduce(reducer, child))? {
        | Some(node) => Rc::new(node),
        | None => tree.clone(),
    };
    reducer.reduce(tree, reduced)
}

/// Rebuilds `tree` with `f` applied to each direct child.
pub fn map_children(tree: &Tree, f: &mut dyn FnMut(&Tree) -> Tree) -> Tree {
    match tree.try_map_children::<Infallible>(&mut |child| Ok(f(child))) {
        | Ok(Some(node)) => Rc::new(node),
        | Ok(None) => tree.clone(),
        | Err(never) => match never {},
    }
}

/// Short-circuiting search. `check` either decides a node outright (without descending into
/// it) or returns `None` to search its children.
pub fn exists(tree: &Tree, check: &mut dyn FnMut(&Tree) -> Option<bool>) -> bool {
    match check(tree) {
        | Some(found) => found,
        | None => tree.children().into_iter().any(|child| exists(child, check)),
    }
}

/// Visits every node with its parent, parents before children.
pub fn visit(tree: &Tree, f: &mut dyn FnMut(&Tree, Option<&Tree>)) {
    fn go(tree: &Tree, parent: Option<&Tree>, f: &mut dyn FnMut(&Tree, Option<&Tree>)) {
        f(tree, parent);
        for child in tree.children() {
            go(child, Some(tree), f);
        }
    }
    go(tree, None, f)
}

/// A structurally equal tree made of fresh allocations.
pub fn deep_copy(tree: &Tree) -> Tree {
    match tree.try_map_children::<Infallible>(&mut |child| Ok(deep_copy(child))) {
        | Ok(Some(node)) => Rc::new(node),
        | Ok(None) => Rc::new((**tree).clone()),
        | Err(never) => match never {},
    }
}
