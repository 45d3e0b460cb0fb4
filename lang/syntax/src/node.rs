//! Every syntax kind, declared once in a table.
//!
//! Each row names a kind and its fields in source order. A field's shape is one of
//! `one` (a child node), `opt` (a nullable child), `many` (a sequence of children),
//! `sparse` (a sequence with holes, for array elisions) or `data(T)` (a plain value).
//! The table expands into one payload struct per kind, the closed [`Node`] union,
//! and the generic child access used by traversal and rebuilding.

use crate::{lit::JsString, ops::*};
use derive_more::From;
use std::rc::Rc;

/// A shared, immutable subtree. Identity is the allocation.
pub type Tree = Rc<Node>;

/// The identity of a node within one live tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn of(tree: &Tree) -> Self {
        NodeId(Rc::as_ptr(tree) as usize)
    }
}

/// A borrowed view of one field holding children.
#[derive(Clone, Copy, Debug)]
pub enum Field<'a> {
    One(&'a Tree),
    Opt(&'a Option<Tree>),
    Many(&'a [Tree]),
    Sparse(&'a [Option<Tree>]),
}

impl<'a> Field<'a> {
    pub fn children(self) -> Vec<&'a Tree> {
        match self {
            | Field::One(tree) => vec![tree],
            | Field::Opt(tree) => tree.iter().collect(),
            | Field::Many(trees) => trees.iter().collect(),
            | Field::Sparse(trees) => trees.iter().flatten().collect(),
        }
    }
}

macro_rules! shape_ty {
    (one) => { Tree };
    (opt) => { Option<Tree> };
    (many) => { Vec<Tree> };
    (sparse) => { Vec<Option<Tree>> };
    (data($t:ty)) => { $t };
}

macro_rules! shape_field {
    (one, $name:expr, $x:expr, $out:ident) => {
        $out.push(($name, Field::One($x)))
    };
    (opt, $name:expr, $x:expr, $out:ident) => {
        $out.push(($name, Field::Opt($x)))
    };
    (many, $name:expr, $x:expr, $out:ident) => {
        $out.push(($name, Field::Many($x)))
    };
    (sparse, $name:expr, $x:expr, $out:ident) => {
        $out.push(($name, Field::Sparse($x)))
    };
    (data, $name:expr, $x:expr, $out:ident) => {{
        let _ = ($name, $x);
    }};
}

macro_rules! shape_map {
    (one, $x:expr, $f:ident, $changed:ident) => {{
        let old: &Tree = $x;
        let new = $f(old)?;
        if !Rc::ptr_eq(old, &new) {
            $changed = true;
        }
        new
    }};
    (opt, $x:expr, $f:ident, $changed:ident) => {{
        let old: &Option<Tree> = $x;
        match old {
            | Some(old) => {
                let new = $f(old)?;
                if !Rc::ptr_eq(old, &new) {
                    $changed = true;
                }
                Some(new)
            }
            | None => None,
        }
    }};
    (many, $x:expr, $f:ident, $changed:ident) => {{
        let old: &Vec<Tree> = $x;
        let mut new = Vec::with_capacity(old.len());
        for old in old {
            let item = $f(old)?;
            if !Rc::ptr_eq(old, &item) {
                $changed = true;
            }
            new.push(item);
        }
        new
    }};
    (sparse, $x:expr, $f:ident, $changed:ident) => {{
        let old: &Vec<Option<Tree>> = $x;
        let mut new = Vec::with_capacity(old.len());
        for old in old {
            match old {
                | Some(old) => {
                    let item = $f(old)?;
                    if !Rc::ptr_eq(old, &item) {
                        $changed = true;
                    }
                    new.push(Some(item));
                }
                | None => new.push(None),
            }
        }
        new
    }};
    (data, $x:expr, $f:ident, $changed:ident) => {
        Clone::clone($x)
    };
}

macro_rules! syntax {
    (
        $(
            $(#[$meta:meta])*
            $kind:ident { $( $field:ident : $shape:ident $(($data:ty))? ),* $(,)? }
        )*
    ) => {
        $(
            $(#[$meta])*
            #[derive(Clone, Debug, PartialEq)]
            pub struct $kind {
                $( pub $field: shape_ty!($shape $(($data))?), )*
            }
        )*

        /// The closed union of all syntax kinds.
        #[derive(Clone, Debug, PartialEq, From)]
        pub enum Node {
            $( $kind($kind), )*
        }

        impl Node {
            pub fn kind(&self) -> &'static str {
                match self {
                    $( | Node::$kind(_) => stringify!($kind), )*
                }
            }
            /// Fields holding children, in source order, with their names.
            pub fn fields(&self) -> Vec<(&'static str, Field<'_>)> {
                match self {
                    $(
                        | Node::$kind(_node) => {
                            #[allow(unused_mut)]
                            let mut fields = Vec::new();
                            $( shape_field!($shape, stringify!($field), &_node.$field, fields); )*
                            fields
                        }
                    )*
                }
            }
            /// Rebuilds this node from `f` applied to each child; `None` when every child came
            /// back as the same allocation.
            pub fn try_map_children<E>(
                &self, f: &mut dyn FnMut(&Tree) -> Result<Tree, E>,
            ) -> Result<Option<Node>, E> {
                match self {
                    $(
                        | Node::$kind(_node) => {
                            #[allow(unused_mut)]
                            let mut changed = false;
                            let rebuilt = $kind {
                                $( $field: shape_map!($shape, &_node.$field, f, changed), )*
                            };
                            Ok(if changed { Some(Node::$kind(rebuilt)) } else { None })
                        }
                    )*
                }
            }
        }
    };
}

syntax! {
    /* --------------------------------- Program -------------------------------- */

    /// A whole input file.
    Script { directives: data(Vec<String>), statements: many }
    /// Directives are kept verbatim, quotes included.
    FunctionBody { directives: data(Vec<String>), statements: many }
    FormalParameters { items: many, rest: opt }

    /* -------------------------------- Statements ------------------------------- */

    /// `{ ... }`
    BlockStatement { statements: many }
    /// Serves both as a statement and as the head of `for` loops.
    VariableDeclaration { kind: data(VarKind), declarators: many }
    VariableDeclarator { binding: one, init: opt }
    EmptyStatement {}
    ExpressionStatement { expression: one }
    IfStatement { test: one, consequent: one, alternate: opt }
    ForStatement { init: opt, test: opt, update: opt, body: one }
    ForInStatement { left: one, right: one, body: one }
    ForOfStatement { left: one, right: one, body: one }
    WhileStatement { test: one, body: one }
    DoWhileStatement { body: one, test: one }
    ReturnStatement { expression: opt }
    ThrowStatement { expression: one }
    BreakStatement { label: data(Option<String>) }
    ContinueStatement { label: data(Option<String>) }
    LabeledStatement { label: data(String), body: one }
    SwitchStatement { discriminant: one, cases: many }
    /// `default:` has no test.
    SwitchCase { test: opt, consequent: many }
    TryStatement { block: one, handler: opt, finalizer: opt }
    CatchClause { binding: opt, body: one }
    DebuggerStatement {}
    FunctionDeclaration { name: one, params: one, body: one }

    /* ------------------------------- Identifiers ------------------------------- */

    /// A read of a name.
    IdentifierExpression { name: data(String) }
    /// A name being declared.
    BindingIdentifier { name: data(String) }
    /// A name being stored to.
    AssignmentTargetIdentifier { name: data(String) }

    /* -------------------------------- Literals --------------------------------- */

    ThisExpression {}
    /// May hold values no source literal spells, e.g. negative numbers after folding.
    LiteralNumericExpression { value: data(f64) }
    LiteralStringExpression { value: data(JsString) }
    LiteralBooleanExpression { value: data(bool) }
    LiteralNullExpression {}
    LiteralRegExpExpression { pattern: data(String), flags: data(String) }
    ArrayExpression { elements: sparse }
    SpreadElement { expression: one }
    ObjectExpression { properties: many }
    DataProperty { name: one, expression: one }
    ShorthandProperty { name: one }
    MethodDefinition { name: one, params: one, body: one }
    Getter { name: one, body: one }
    Setter { name: one, param: one, body: one }
    StaticPropertyName { value: data(String) }
    ComputedPropertyName { expression: one }

    /* ------------------------------- Functions --------------------------------- */

    FunctionExpression { name: opt, params: one, body: one }
    /// The body is either a `FunctionBody` or a single expression.
    ArrowExpression { params: one, body: one }

    /* ------------------------------ Expressions -------------------------------- */

    UnaryExpression { operator: data(UnaryOp), operand: one }
    UpdateExpression { prefix: data(bool), operator: data(UpdateOp), operand: one }
    /// Comma, logical and arithmetic operators alike.
    BinaryExpression { left: one, operator: data(BinaryOp), right: one }
    AssignmentExpression { binding: one, expression: one }
    CompoundAssignmentExpression { binding: one, operator: data(CompoundOp), expression: one }
    ConditionalExpression { test: one, consequent: one, alternate: one }
    CallExpression { callee: one, arguments: many }
    NewExpression { callee: one, arguments: many }
    StaticMemberExpression { object: one, property: data(String) }
    ComputedMemberExpression { object: one, expression: one }
    StaticMemberAssignmentTarget { object: one, property: data(String) }
    ComputedMemberAssignmentTarget { object: one, expression: one }

    /* -------------------------------- Bindings --------------------------------- */

    ArrayBinding { elements: sparse, rest: opt }
    ObjectBinding { properties: many }
    /// `{ a }` or `{ a = init }`
    BindingPropertyIdentifier { binding: one, init: opt }
    /// `{ key: binding }`
    BindingPropertyProperty { name: one, binding: one }
    BindingWithDefault { binding: one, init: one }
}

impl Node {
    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Tree> {
        self.fields().into_iter().flat_map(|(_, field)| field.children()).collect()
    }
    /// Whether this node opens a fresh `this`/`arguments` context.
    pub fn is_function_boundary(&self) -> bool {
        matches!(
            self,
            Node::FunctionDeclaration(_)
                | Node::FunctionExpression(_)
                | Node::MethodDefinition(_)
                | Node::Getter(_)
                | Node::Setter(_)
        )
    }
    /// Whether this node introduces a function scope, arrows included.
    pub fn is_function_like(&self) -> bool {
        self.is_function_boundary() || matches!(self, Node::ArrowExpression(_))
    }
    /// The statement sequence of list-holding nodes.
    pub fn statement_list(&self) -> Option<&[Tree]> {
        match self {
            | Node::Script(Script { statements, .. })
            | Node::FunctionBody(FunctionBody { statements, .. })
            | Node::BlockStatement(BlockStatement { statements })
            | Node::SwitchCase(SwitchCase { consequent: statements, .. }) => {
                Some(statements.as_slice())
            }
            | _ => None,
        }
    }
    /// The name carried by any of the three identifier kinds.
    pub fn identifier_name(&self) -> Option<&str> {
        match self {
            | Node::IdentifierExpression(IdentifierExpression { name })
            | Node::BindingIdentifier(BindingIdentifier { name })
            | Node::AssignmentTargetIdentifier(AssignmentTargetIdentifier { name }) => Some(name),
            | _ => None,
        }
    }
}
