//! Which declaration each identifier refers to.
//!
//! The analyzer walks the tree once, opening a scope at every node that introduces one. Each
//! reference is parked in the scope it occurs in and only resolved when that scope closes, by
//! which time every hoisted `var` and function of the scope has been declared. References that
//! no scope declares end up as implicit variables of the global scope.

use derive_more::{From, Into};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use unminify_syntax::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct ScopeId(usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, From, Into)]
pub struct VariableId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    /// Holds only the implicit globals.
    Global,
    /// Top-level declarations of the input.
    Script,
    /// Functions, arrows, methods and accessors.
    Function,
    /// Blocks, `catch` clauses, `switch` bodies and loops with lexical heads.
    Block,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// The node opening the scope; `None` for the global scope.
    pub node: Option<Tree>,
    pub variables: IndexMap<String, VariableId>,
    /// Names referenced in or below this scope but declared outside it.
    pub through: IndexSet<String>,
}

#[derive(Clone, Debug)]
pub struct Reference {
    pub node: Tree,
    pub read: bool,
    pub write: bool,
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    /// Binding identifiers declaring the variable; empty for implicit ones.
    pub declarations: Vec<Tree>,
    pub references: Vec<Reference>,
}

impl Variable {
    pub fn reads(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.read)
    }
    pub fn writes(&self) -> impl Iterator<Item = &Reference> {
        self.references.iter().filter(|r| r.write)
    }
}

/// The scopes and variables of one tree snapshot.
///
/// Like [`crate::ParentMap`], the analysis keeps the root alive so node identities stay valid.
pub struct ScopeAnalysis {
    root: Tree,
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    scope_of: HashMap<NodeId, ScopeId>,
    variable_of: HashMap<NodeId, VariableId>,
}

impl ScopeAnalysis {
    pub fn analyze(root: &Tree) -> Self {
        let analysis = Collector::new(root).run();
        log::trace!("[scope]\n{analysis}");
        analysis
    }
    pub fn root(&self) -> &Tree {
        &self.root
    }
    pub fn global(&self) -> ScopeId {
        ScopeId(0)
    }
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }
    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.0]
    }
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes.iter().enumerate().map(|(i, s)| (ScopeId(i), s))
    }
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().enumerate().map(|(i, v)| (VariableId(i), v))
    }
    /// The variable an identifier node (of any of the three identifier kinds) belongs to.
    pub fn variable_of(&self, node: &Tree) -> Option<VariableId> {
        self.variable_of.get(&NodeId::of(node)).copied()
    }
    /// The scope a scope-opening node introduces. A function gives its function scope.
    pub fn scope_of(&self, node: &Tree) -> Option<ScopeId> {
        self.scope_of.get(&NodeId::of(node)).copied()
    }
    pub fn is_global(&self, var: VariableId) -> bool {
        self.variable(var).scope == self.global()
    }
    /// The variable named `name` declared directly in `scope`.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<VariableId> {
        self.scope(scope).variables.get(name).copied()
    }
}

struct Pending {
    name: String,
    reference: Reference,
}

struct Collector {
    root: Tree,
    scopes: Vec<Scope>,
    pending: Vec<Vec<Pending>>,
    variables: Vec<Variable>,
    scope_of: HashMap<NodeId, ScopeId>,
    variable_of: HashMap<NodeId, VariableId>,
    current: ScopeId,
}

impl Collector {
    fn new(root: &Tree) -> Self {
        let global = Scope {
            kind: ScopeKind::Global,
            parent: None,
            children: Vec::new(),
            node: None,
            variables: IndexMap::new(),
            through: IndexSet::new(),
        };
        Collector {
            root: root.clone(),
            scopes: vec![global],
            pending: vec![Vec::new()],
            variables: Vec::new(),
            scope_of: HashMap::new(),
            variable_of: HashMap::new(),
            current: ScopeId(0),
        }
    }

    fn run(mut self) -> ScopeAnalysis {
        let root = self.root.clone();
        match &*root {
            | Node::Script(Script { statements, .. }) => {
                self.open(ScopeKind::Script, &root);
                self.nodes(statements);
                self.close();
            }
            | _ => self.node(&root),
        }
        self.close_global();
        let Collector { root, scopes, variables, scope_of, variable_of, .. } = self;
        ScopeAnalysis { root, scopes, variables, scope_of, variable_of }
    }

    /* --------------------------------- Scopes -------------------------------- */

    fn open(&mut self, kind: ScopeKind, node: &Tree) {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            parent: Some(self.current),
            children: Vec::new(),
            node: Some(node.clone()),
            variables: IndexMap::new(),
            through: IndexSet::new(),
        });
        self.pending.push(Vec::new());
        self.scopes[self.current.0].children.push(id);
        self.scope_of.insert(NodeId::of(node), id);
        self.current = id;
    }

    /// Resolves what the current scope can and hands the rest to its parent.
    fn close(&mut self) {
        let id = self.current;
        let Some(parent) = self.scopes[id.0].parent else { return };
        let pending = std::mem::take(&mut self.pending[id.0]);
        for Pending { name, reference } in pending {
            match self.scopes[id.0].variables.get(&name).copied() {
                | Some(var) => self.attach(var, reference),
                | None => {
                    self.scopes[id.0].through.insert(name.clone());
                    self.pending[parent.0].push(Pending { name, reference });
                }
            }
        }
        self.current = parent;
    }

    fn close_global(&mut self) {
        let global = ScopeId(0);
        let pending = std::mem::take(&mut self.pending[global.0]);
        for Pending { name, reference } in pending {
            let var = self.declare_in(global, &name);
            self.attach(var, reference);
        }
    }

    /// The nearest scope `var` declarations land in.
    fn hoisting_target(&self) -> ScopeId {
        let mut id = self.current;
        loop {
            let scope = &self.scopes[id.0];
            match (scope.kind, scope.parent) {
                | (ScopeKind::Function | ScopeKind::Script | ScopeKind::Global, _) => return id,
                | (ScopeKind::Block, Some(parent)) => id = parent,
                | (ScopeKind::Block, None) => return id,
            }
        }
    }

    /* ------------------------------- Variables ------------------------------- */

    fn declare_in(&mut self, scope: ScopeId, name: &str) -> VariableId {
        if let Some(var) = self.scopes[scope.0].variables.get(name) {
            return *var;
        }
        let var = VariableId(self.variables.len());
        self.variables.push(Variable {
            name: name.to_string(),
            scope,
            declarations: Vec::new(),
            references: Vec::new(),
        });
        self.scopes[scope.0].variables.insert(name.to_string(), var);
        var
    }

    /// Declares the name of a binding identifier; `write` also records the binding as a store.
    fn declare(&mut self, scope: ScopeId, binding: &Tree, write: bool) {
        let Some(name) = binding.identifier_name() else { return };
        let var = self.declare_in(scope, name);
        self.variables[var.0].declarations.push(binding.clone());
        self.variable_of.insert(NodeId::of(binding), var);
        if write {
            self.attach(var, Reference { node: binding.clone(), read: false, write: true });
        }
    }

    fn attach(&mut self, var: VariableId, reference: Reference) {
        self.variable_of.insert(NodeId::of(&reference.node), var);
        self.variables[var.0].references.push(reference);
    }

    fn refer(&mut self, node: &Tree, read: bool, write: bool) {
        let Some(name) = node.identifier_name() else { return };
        let reference = Reference { node: node.clone(), read, write };
        self.pending[self.current.0].push(Pending { name: name.to_string(), reference });
    }

    /* -------------------------------- Walking -------------------------------- */

    fn nodes(&mut self, nodes: &[Tree]) {
        for node in nodes {
            self.node(node);
        }
    }

    fn children(&mut self, node: &Tree) {
        for child in node.children() {
            self.node(child);
        }
    }

    fn node(&mut self, node: &Tree) {
        match &**node {
            | Node::IdentifierExpression(_) => self.refer(node, true, false),
            | Node::AssignmentTargetIdentifier(_) => self.refer(node, false, true),
            | Node::BindingIdentifier(_) => self.declare(self.current, node, false),
            | Node::AssignmentExpression(AssignmentExpression { binding, expression }) => {
                self.node(binding);
                self.node(expression);
            }
            | Node::CompoundAssignmentExpression(CompoundAssignmentExpression {
                binding,
                expression,
                ..
            }) => {
                self.target(binding, true);
                self.node(expression);
            }
            | Node::UpdateExpression(UpdateExpression { operand, .. }) => self.target(operand, true),
            | Node::VariableDeclaration(VariableDeclaration { kind, declarators }) => {
                let scope = if kind.is_lexical() { self.current } else { self.hoisting_target() };
                for declarator in declarators {
                    let Node::VariableDeclarator(VariableDeclarator { binding, init }) = &**declarator
                    else {
                        continue;
                    };
                    self.pattern(binding, scope, init.is_some());
                    if let Some(init) = init {
                        self.node(init);
                    }
                }
            }
            | Node::BlockStatement(BlockStatement { statements }) => {
                self.open(ScopeKind::Block, node);
                self.nodes(statements);
                self.close();
            }
            | Node::SwitchStatement(SwitchStatement { discriminant, cases }) => {
                self.node(discriminant);
                self.open(ScopeKind::Block, node);
                self.nodes(cases);
                self.close();
            }
            | Node::CatchClause(CatchClause { binding, body }) => {
                self.open(ScopeKind::Block, node);
                if let Some(binding) = binding {
                    self.pattern(binding, self.current, false);
                }
                self.node(body);
                self.close();
            }
            | Node::ForStatement(ForStatement { init, .. }) => {
                let lexical = init.as_ref().is_some_and(|init| is_lexical_declaration(init));
                if lexical {
                    self.open(ScopeKind::Block, node);
                }
                self.children(node);
                if lexical {
                    self.close();
                }
            }
            | Node::ForInStatement(ForInStatement { left, right, body })
            | Node::ForOfStatement(ForOfStatement { left, right, body }) => {
                let lexical = is_lexical_declaration(left);
                if lexical {
                    self.open(ScopeKind::Block, node);
                }
                match &**left {
                    | Node::VariableDeclaration(VariableDeclaration { kind, declarators }) => {
                        let scope = if kind.is_lexical() { self.current } else { self.hoisting_target() };
                        for declarator in declarators {
                            if let Node::VariableDeclarator(VariableDeclarator { binding, init }) =
                                &**declarator
                            {
                                self.pattern(binding, scope, true);
                                if let Some(init) = init {
                                    self.node(init);
                                }
                            }
                        }
                    }
                    | _ => self.node(left),
                }
                self.node(right);
                self.node(body);
                if lexical {
                    self.close();
                }
            }
            | Node::FunctionDeclaration(FunctionDeclaration { name, params, body }) => {
                self.declare(self.current, name, false);
                self.function(node, params, body);
            }
            | Node::FunctionExpression(FunctionExpression { name, params, body }) => {
                self.open(ScopeKind::Function, node);
                if let Some(name) = name {
                    self.declare(self.current, name, false);
                }
                self.declare_in(self.current, "arguments");
                self.params(params);
                self.body(body);
                self.close();
            }
            | Node::ArrowExpression(ArrowExpression { params, body }) => {
                self.open(ScopeKind::Function, node);
                self.params(params);
                self.body(body);
                self.close();
            }
            | Node::MethodDefinition(MethodDefinition { name, params, body }) => {
                self.node(name);
                self.function(node, params, body);
            }
            | Node::Getter(Getter { name, body }) => {
                self.node(name);
                self.open(ScopeKind::Function, node);
                self.declare_in(self.current, "arguments");
                self.body(body);
                self.close();
            }
            | Node::Setter(Setter { name, param, body }) => {
                self.node(name);
                self.open(ScopeKind::Function, node);
                self.declare_in(self.current, "arguments");
                self.pattern(param, self.current, false);
                self.body(body);
                self.close();
            }
            | _ => self.children(node),
        }
    }

    /// A non-arrow function's own scope.
    fn function(&mut self, node: &Tree, params: &Tree, body: &Tree) {
        self.open(ScopeKind::Function, node);
        self.declare_in(self.current, "arguments");
        self.params(params);
        self.body(body);
        self.close();
    }

    fn params(&mut self, params: &Tree) {
        match &**params {
            | Node::FormalParameters(FormalParameters { items, rest }) => {
                for item in items.iter().chain(rest) {
                    self.pattern(item, self.current, false);
                }
            }
            | _ => self.pattern(params, self.current, false),
        }
    }

    /// Function bodies share the function scope instead of opening a block.
    fn body(&mut self, body: &Tree) {
        match &**body {
            | Node::FunctionBody(FunctionBody { statements, .. }) => self.nodes(statements),
            | _ => self.node(body),
        }
    }

    /// The store side of an assignment; `read` for compound stores and updates.
    fn target(&mut self, target: &Tree, read: bool) {
        match &**target {
            | Node::AssignmentTargetIdentifier(_) => self.refer(target, read, true),
            | _ => self.node(target),
        }
    }

    /// Declares every name a binding pattern introduces into `scope`. Defaults and computed
    /// keys are ordinary expressions of the current scope.
    fn pattern(&mut self, pattern: &Tree, scope: ScopeId, write: bool) {
        match &**pattern {
            | Node::BindingIdentifier(_) => self.declare(scope, pattern, write),
            | Node::BindingWithDefault(BindingWithDefault { binding, init }) => {
                self.pattern(binding, scope, write);
                self.node(init);
            }
            | Node::ArrayBinding(ArrayBinding { elements, rest }) => {
                for element in elements.iter().flatten().chain(rest) {
                    self.pattern(element, scope, write);
                }
            }
            | Node::ObjectBinding(ObjectBinding { properties }) => {
                for property in properties {
                    self.pattern(property, scope, write);
                }
            }
            | Node::BindingPropertyIdentifier(BindingPropertyIdentifier { binding, init }) => {
                self.pattern(binding, scope, write);
                if let Some(init) = init {
                    self.node(init);
                }
            }
            | Node::BindingPropertyProperty(BindingPropertyProperty { name, binding }) => {
                self.node(name);
                self.pattern(binding, scope, write);
            }
            | _ => self.node(pattern),
        }
    }
}

fn is_lexical_declaration(node: &Tree) -> bool {
    matches!(&**node, Node::VariableDeclaration(VariableDeclaration { kind, .. }) if kind.is_lexical())
}
