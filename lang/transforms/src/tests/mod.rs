use crate::*;
use std::rc::Rc;
use unindent::unindent;
use unminify_surface::{codegen::generate, textual::parse_str};
use unminify_syntax::*;
use unminify_utils::pass::Pass;

mod dead;
mod evaluate;
mod inline;
mod restructure;
mod unused;

type DynPass<'a> = &'a dyn Pass<Tree, Error = TransformError>;

fn parse(source: &str) -> Tree {
    parse_str(source).unwrap()
}

fn print(tree: &Tree) -> String {
    generate(tree, 80)
}

/// Runs the passes in order, again and again, until a round leaves the tree alone.
fn settle_all(passes: &[DynPass], source: &str) -> String {
    let mut tree = parse(source);
    for _ in 0..100 {
        let before = tree.clone();
        for pass in passes {
            tree = pass.run(&tree).unwrap();
        }
        if Rc::ptr_eq(&before, &tree) {
            return print(&tree);
        }
    }
    panic!("no fixpoint for {source}")
}

fn settle(pass: DynPass, source: &str) -> String {
    settle_all(&[pass], source)
}

/// Asserts the pass hands back the very tree it was given.
fn assert_untouched(pass: DynPass, source: &str) {
    let tree = parse(source);
    let out = pass.run(&tree).unwrap();
    assert!(Rc::ptr_eq(&tree, &out), "{} rewrote `{source}` into `{}`", pass.name(), print(&out));
}

fn lines(source: &str) -> String {
    unindent(source).trim().to_string()
}

#[test]
fn registry_knows_every_transform() {
    for name in NAMES {
        let pass = by_name(name).unwrap();
        assert_eq!(pass.name(), name);
    }
    assert!(by_name("beautify").is_none());
}

#[test]
fn every_transform_leaves_plain_code_alone() {
    let source = lines(
        "
        var total = f();
        function add(x, y) {
          return x + y;
        }
        while (total < 10) {
          total = add(total, g(total));
        }
        h(total);",
    );
    for name in NAMES {
        assert_untouched(&*by_name(name).unwrap(), &source);
    }
}
