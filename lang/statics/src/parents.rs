use std::{collections::HashMap, convert::Infallible};
use unminify_syntax::*;

/// Parents of every node of one tree snapshot.
///
/// The map holds the root, and through it every node, so identities stay valid for as long as
/// the map lives. A map built for one tree says nothing about any other tree.
pub struct ParentMap {
    root: Tree,
    parents: HashMap<NodeId, Tree>,
}

impl ParentMap {
    pub fn build(root: &Tree) -> Self {
        let mut finder = ParentFinder { parents: HashMap::new() };
        let Ok(_) = reduce(&mut finder, root);
        ParentMap { root: root.clone(), parents: finder.parents }
    }
    /// `None` for the root and for nodes of other trees.
    pub fn parent(&self, node: &Tree) -> Option<&Tree> {
        self.parents.get(&NodeId::of(node))
    }
    pub fn root(&self) -> &Tree {
        &self.root
    }
    /// Parent, grandparent and so on, up to the root.
    pub fn ancestors<'a>(&'a self, node: &Tree) -> impl Iterator<Item = &'a Tree> + 'a {
        let mut current = self.parent(node);
        std::iter::from_fn(move || {
            let node = current?;
            current = self.parent(node);
            Some(node)
        })
    }
    /// The list-holding node directly containing `node`, and its index there.
    pub fn list_position(&self, node: &Tree) -> Option<(&Tree, usize)> {
        let parent = self.parent(node)?;
        let list = parent.statement_list()?;
        let index = list.iter().position(|s| std::rc::Rc::ptr_eq(s, node))?;
        Some((parent, index))
    }
}

struct ParentFinder {
    parents: HashMap<NodeId, Tree>,
}

impl Reducer for ParentFinder {
    type Error = Infallible;
    fn reduce(&mut self, original: &Tree, reduced: Tree) -> Result<Tree, Infallible> {
        for child in original.children() {
            self.parents.insert(NodeId::of(child), original.clone());
        }
        Ok(reduced)
    }
}
