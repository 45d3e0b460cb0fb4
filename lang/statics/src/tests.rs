use super::*;
use pretty_assertions::assert_eq;
use unminify_surface::textual::parse_str;
use unminify_syntax::*;

fn parse(source: &str) -> Tree {
    parse_str(source).unwrap()
}

/// Every node of the tree satisfying `pred`, parents first.
fn find_all(tree: &Tree, pred: impl Fn(&Node) -> bool) -> Vec<Tree> {
    let mut found = Vec::new();
    visit(tree, &mut |node, _| {
        if pred(&**node) {
            found.push(node.clone());
        }
    });
    found
}

fn binding(tree: &Tree, name: &str) -> Tree {
    find_all(tree, |n| matches!(n, Node::BindingIdentifier(BindingIdentifier { name: found }) if found == name))
        .remove(0)
}

fn first_of_kind(tree: &Tree, kind: &str) -> Tree {
    find_all(tree, |n| n.kind() == kind).remove(0)
}

#[test]
fn parents_and_list_positions() {
    let tree = parse("a; if (b) { c; d; }");
    let parents = ParentMap::build(&tree);
    assert!(parents.parent(&tree).is_none());
    let block = first_of_kind(&tree, "BlockStatement");
    let Node::BlockStatement(BlockStatement { statements }) = &*block else { unreachable!() };
    let (holder, index) = parents.list_position(&statements[1]).unwrap();
    assert!(std::rc::Rc::ptr_eq(holder, &block));
    assert_eq!(index, 1);
    let kinds: Vec<_> = parents.ancestors(&statements[1]).map(|n| n.kind()).collect();
    assert_eq!(kinds, vec!["BlockStatement", "IfStatement", "Script"]);
    let other = parse("a;");
    assert!(parents.parent(&first_of_kind(&other, "ExpressionStatement")).is_none());
}

#[test]
fn weirdness_stops_at_function_boundaries() {
    let f = |source: &str| {
        let tree = parse(source);
        let func = first_of_kind(&tree, "FunctionExpression");
        let Node::FunctionExpression(FunctionExpression { params, body, .. }) = &*func else {
            unreachable!()
        };
        function_contains_weirdness(params, body)
    };
    assert!(f("(function () { return this.x; });"));
    assert!(f("(function () { return arguments[0]; });"));
    assert!(f("(function () { return () => this; });"));
    assert!(f("(function (a = arguments) {});"));
    assert!(!f("(function () { return function () { return this; }; });"));
    assert!(!f("(function (a) { return { arguments: a }.arguments; });"));
    assert!(expression_contains_weirdness(&parse("x = [this];")));
}

#[test]
fn var_hoists_out_of_blocks_but_let_does_not() {
    let tree = parse("function f() { if (a) { var x = 1; let y = 2; } return x + y; }");
    let scopes = ScopeAnalysis::analyze(&tree);
    let func = first_of_kind(&tree, "FunctionDeclaration");
    let fscope = scopes.scope_of(&func).unwrap();
    assert_eq!(scopes.scope(fscope).kind, ScopeKind::Function);
    let x = scopes.variable_of(&binding(&tree, "x")).unwrap();
    assert_eq!(scopes.variable(x).scope, fscope);
    assert_eq!(scopes.variable(x).reads().count(), 1);
    assert_eq!(scopes.variable(x).writes().count(), 1);
    let y = scopes.variable_of(&binding(&tree, "y")).unwrap();
    assert_eq!(scopes.scope(scopes.variable(y).scope).kind, ScopeKind::Block);
    // the `y` read after the block is a different, implicit global
    let ys: Vec<_> = find_all(&tree, |n| matches!(n, Node::IdentifierExpression(IdentifierExpression { name }) if name == "y"));
    let outer = scopes.variable_of(&ys[0]).unwrap();
    assert_ne!(outer, y);
    assert!(scopes.is_global(outer));
}

#[test]
fn top_level_declarations_are_not_global() {
    let tree = parse("var a = 5; b = a; function g() {}");
    let scopes = ScopeAnalysis::analyze(&tree);
    let a = scopes.variable_of(&binding(&tree, "a")).unwrap();
    assert!(!scopes.is_global(a));
    assert_eq!(scopes.scope(scopes.variable(a).scope).kind, ScopeKind::Script);
    let g = scopes.variable_of(&binding(&tree, "g")).unwrap();
    assert!(!scopes.is_global(g));
    let target = first_of_kind(&tree, "AssignmentTargetIdentifier");
    let b = scopes.variable_of(&target).unwrap();
    assert!(scopes.is_global(b));
    assert!(scopes.variable(b).declarations.is_empty());
    assert_eq!(scopes.lookup(scopes.global(), "b"), Some(b));
}

#[test]
fn hoisted_functions_resolve_before_their_declaration() {
    let tree = parse("f(); function f() { return g; var g; }");
    let scopes = ScopeAnalysis::analyze(&tree);
    let call = first_of_kind(&tree, "IdentifierExpression");
    let f = scopes.variable_of(&binding(&tree, "f")).unwrap();
    assert_eq!(scopes.variable_of(&call), Some(f));
    let g = scopes.variable_of(&binding(&tree, "g")).unwrap();
    assert_eq!(scopes.variable(g).references.len(), 1);
}

#[test]
fn reads_and_writes_are_classified() {
    let tree = parse("var n; n = 1; n += 2; n++; use(n); for (n in o) {}");
    let scopes = ScopeAnalysis::analyze(&tree);
    let n = scopes.variable(scopes.variable_of(&binding(&tree, "n")).unwrap());
    let flags: Vec<_> = n.references.iter().map(|r| (r.read, r.write)).collect();
    assert_eq!(flags, vec![(false, true), (true, true), (true, true), (true, false), (false, true)]);
    assert_eq!(n.declarations.len(), 1);
}

#[test]
fn declarations_without_stores() {
    let tree = parse("function f(p) { try {} catch (e) {} } var q;");
    let scopes = ScopeAnalysis::analyze(&tree);
    for name in ["f", "p", "e", "q"] {
        let var = scopes.variable(scopes.variable_of(&binding(&tree, name)).unwrap());
        assert!(var.references.is_empty(), "{name}");
        assert_eq!(var.declarations.len(), 1, "{name}");
    }
    let e = scopes.variable_of(&binding(&tree, "e")).unwrap();
    let catch = first_of_kind(&tree, "CatchClause");
    assert_eq!(scopes.variable(e).scope, scopes.scope_of(&catch).unwrap());
}

#[test]
fn named_function_expressions_bind_in_their_own_scope() {
    let tree = parse("x = function h() { return h; }; h;");
    let scopes = ScopeAnalysis::analyze(&tree);
    let func = first_of_kind(&tree, "FunctionExpression");
    let h = scopes.variable_of(&binding(&tree, "h")).unwrap();
    assert_eq!(scopes.variable(h).scope, scopes.scope_of(&func).unwrap());
    assert_eq!(scopes.variable(h).references.len(), 1);
    let outer = find_all(&tree, |n| matches!(n, Node::IdentifierExpression(IdentifierExpression { name }) if name == "h"));
    assert!(scopes.is_global(scopes.variable_of(&outer[1]).unwrap()));
}

#[test]
fn through_sets_record_outer_names() {
    let tree = parse("var k = 1; (function (a) { return function () { return a + k + arguments.length; }; });");
    let scopes = ScopeAnalysis::analyze(&tree);
    let funcs = find_all(&tree, |n| matches!(n, Node::FunctionExpression(_)));
    let outer = scopes.scope(scopes.scope_of(&funcs[0]).unwrap());
    let inner = scopes.scope(scopes.scope_of(&funcs[1]).unwrap());
    let names = |set: &indexmap::IndexSet<String>| set.iter().cloned().collect::<Vec<_>>();
    assert_eq!(names(&inner.through), vec!["a", "k"]);
    assert_eq!(names(&outer.through), vec!["k"]);
    assert!(inner.variables.contains_key("arguments"));
}

#[test]
fn arrows_have_no_arguments_of_their_own() {
    let tree = parse("function f() { return () => arguments; }");
    let scopes = ScopeAnalysis::analyze(&tree);
    let arrow = first_of_kind(&tree, "ArrowExpression");
    let ascope = scopes.scope(scopes.scope_of(&arrow).unwrap());
    assert!(!ascope.variables.contains_key("arguments"));
    let reference = find_all(&tree, |n| n.identifier_name() == Some("arguments")).remove(0);
    let var = scopes.variable_of(&reference).unwrap();
    let func = first_of_kind(&tree, "FunctionDeclaration");
    assert_eq!(scopes.variable(var).scope, scopes.scope_of(&func).unwrap());
}

#[test]
fn scope_dump_lists_the_tree() {
    let tree = parse("var a; { let b = a; }");
    let dump = ScopeAnalysis::analyze(&tree).to_string();
    let lines: Vec<_> = dump.lines().collect();
    assert_eq!(lines[0], "global#0");
    assert_eq!(lines[1], "  script#1 @ Script");
    assert_eq!(lines[2], "    - a#0 (decl 1, r 1, w 0)");
    assert_eq!(lines[3], "    block#2 @ BlockStatement through [a]");
    assert_eq!(lines[4], "      - b#1 (decl 1, r 0, w 1)");
}
