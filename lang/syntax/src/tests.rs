use crate::*;
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn sample() -> Tree {
    // f(1 + x); g;
    mk(Script {
        directives: vec![],
        statements: vec![
            expression_statement(mk(CallExpression {
                callee: identifier("f"),
                arguments: vec![binary(number(1.0), BinaryOp::Add, identifier("x"))],
            })),
            expression_statement(identifier("g")),
        ],
    })
}

struct Keep;
impl Reducer for Keep {
    type Error = ();
    fn reduce(&mut self, _original: &Tree, reduced: Tree) -> Result<Tree, ()> {
        Ok(reduced)
    }
}

struct RenameX;
impl Reducer for RenameX {
    type Error = ();
    fn reduce(&mut self, _original: &Tree, reduced: Tree) -> Result<Tree, ()> {
        match &*reduced {
            | Node::IdentifierExpression(IdentifierExpression { name }) if name == "x" => {
                Ok(identifier("y"))
            }
            | _ => Ok(reduced),
        }
    }
}

#[test]
fn identity_reducer_returns_same_allocation() {
    let tree = sample();
    let out = reduce(&mut Keep, &tree).unwrap();
    assert!(Rc::ptr_eq(&tree, &out));
}

#[test]
fn changed_leaf_rebuilds_only_its_spine() {
    let tree = sample();
    let out = reduce(&mut RenameX, &tree).unwrap();
    assert!(!Rc::ptr_eq(&tree, &out));
    let (Node::Script(before), Node::Script(after)) = (&*tree, &*out) else {
        panic!("expected scripts")
    };
    assert!(!Rc::ptr_eq(&before.statements[0], &after.statements[0]));
    assert!(Rc::ptr_eq(&before.statements[1], &after.statements[1]));
}

#[test]
fn exists_stops_at_decided_nodes() {
    let tree = sample();
    let mut visited = 0;
    let found = exists(&tree, &mut |node| {
        visited += 1;
        match &**node {
            | Node::CallExpression(_) => Some(false),
            | Node::IdentifierExpression(IdentifierExpression { name }) => Some(name == "g"),
            | _ => None,
        }
    });
    assert!(found);
    // script, statement, call, statement, g
    assert_eq!(visited, 5);
}

#[test]
fn deep_copy_is_fresh_and_equal() {
    let tree = sample();
    let copy = deep_copy(&tree);
    assert_eq!(tree, copy);
    assert!(!Rc::ptr_eq(&tree, &copy));
    assert!(!Rc::ptr_eq(&tree.children()[0], &copy.children()[0]));
}

#[test]
fn fields_follow_source_order() {
    let tree = if_statement(identifier("a"), block(vec![]), None);
    let names: Vec<_> = tree.fields().into_iter().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["test", "consequent", "alternate"]);
    assert_eq!(tree.children().len(), 2);
    assert_eq!(tree.kind(), "IfStatement");
}

#[test]
fn sequences_fold_and_unfold() {
    let seq = sequence(vec![identifier("a"), identifier("b"), identifier("c")]).unwrap();
    let items = flatten_sequence(&seq);
    let names: Vec<_> = items.iter().filter_map(|e| e.identifier_name()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert!(sequence(vec![]).is_none());
}

#[test]
fn numbers_print_like_the_language() {
    let cases = [
        (0.0, "0"),
        (-0.0, "0"),
        (1.0, "1"),
        (-1.5, "-1.5"),
        (31.0, "31"),
        (0.1, "0.1"),
        (1e21, "1e+21"),
        (1e20, "100000000000000000000"),
        (1.5e-7, "1.5e-7"),
        (0.000001, "0.000001"),
        (123456789.125, "123456789.125"),
        (f64::NAN, "NaN"),
        (f64::INFINITY, "Infinity"),
        (f64::NEG_INFINITY, "-Infinity"),
    ];
    for (x, expected) in cases {
        assert_eq!(number_to_string(x), expected);
    }
}

#[test]
fn identifier_names_and_keys() {
    assert!(is_identifier_name("foo"));
    assert!(is_identifier_name("$_1"));
    assert!(is_identifier_name("if"));
    assert!(!is_identifier_name("1a"));
    assert!(!is_identifier_name("a-b"));
    assert!(!is_identifier_name(""));
    assert_eq!(array_index("12"), Some(12));
    assert_eq!(array_index("012"), None);
    assert_eq!(array_index("-1"), None);
    assert_eq!(canonical_numeric_key("1.5"), Some(1.5));
    assert_eq!(canonical_numeric_key("1.50"), None);
}

#[test]
fn strings_keep_lone_surrogates() {
    let s = JsString::from_units(vec![0x61, 0xD800, 0xD83D, 0xDE00]);
    assert_eq!(s.code_points(), vec![0x61, 0xD800, 0x1F600]);
    assert_eq!(s.to_rust_string(), None);
    assert_eq!(JsString::from("ab").concat(&JsString::from("c")), JsString::from("abc"));
}
