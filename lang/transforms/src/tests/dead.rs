use super::*;
use pretty_assertions::assert_eq;

fn eliminate(source: &str) -> String {
    settle(&EliminateDead, source)
}

#[test]
fn code_after_return_goes_but_declarations_stay() {
    let expected = lines(
        "
        function f() {
          var a;
          function h() {}
          return 1;
        }",
    );
    let source = "function f() { return 1; g(); var a = 2; function h() {} }";
    assert_eq!(eliminate(source), expected);
}

#[test]
fn nested_vars_are_hoisted_and_consts_become_lets() {
    let expected = lines(
        "
        function f() {
          let c;
          var d;
          throw e;
        }",
    );
    let source = "function f() { throw e; const c = 1; if (x) { var d = 2; } }";
    assert_eq!(eliminate(source), expected);
}

#[test]
fn loops_cut_after_break_and_continue() {
    let expected = lines(
        "
        for (;;) {
          a();
          continue;
        }",
    );
    assert_eq!(eliminate("for (;;) { a(); continue; b(); }"), expected);
}

#[test]
fn destructuring_in_dropped_code_is_refused() {
    let tree = parse("function f() { return; var [a] = b; }");
    let result = EliminateDead.run(&tree);
    assert!(matches!(result, Err(TransformError::Unsupported { pass: "eliminate-dead", .. })));
}

#[test]
fn constant_switch_collapses() {
    let expected = lines(
        "
        {
          b();
        }",
    );
    assert_eq!(eliminate("switch (2) { case 1: a(); break; case 2: b(); break; }"), expected);
    let expected = lines(
        "
        {
          var y;
          x();
        }",
    );
    assert_eq!(eliminate("switch (1) { case 1: x(); break; case 2: var y = 2; break; }"), expected);
}

#[test]
fn switch_stays_when_it_may_fall_through() {
    assert_untouched(&EliminateDead, "switch (a) {\n  case 1:\n    b();\n}");
    assert_untouched(&EliminateDead, "switch (1) { case 1: b(); case 2: c(); break; }");
    assert_untouched(&EliminateDead, "switch (1) { case 1: if (a) break; b(); break; }");
    assert_untouched(&EliminateDead, "switch (1) { case 1: b(); break; default: c(); }");
    assert_untouched(&EliminateDead, "switch (3) { case 1: b(); break; }");
}

#[test]
fn loop_that_runs_once() {
    let expected = lines(
        "
        {
          a();
        }",
    );
    assert_eq!(eliminate("while (true) { a(); break; }"), expected);
    let expected = lines(
        "
        function f() {
          {
            a();
            return b;
          }
        }",
    );
    assert_eq!(eliminate("function f() { while (true) { a(); return b; } }"), expected);
    assert_untouched(&EliminateDead, "while (true) { if (a) break; b(); break; }");
    assert_untouched(&EliminateDead, "while (true) { if (a) continue; b(); break; }");
    assert_untouched(&EliminateDead, "while (true) { a(); }");
    assert_untouched(&EliminateDead, "while (x) { a(); break; }");
}

#[test]
fn labeled_loop_that_runs_once() {
    let expected = lines(
        "
        {
          f();
        }",
    );
    assert_eq!(eliminate("a: while (true) { f(); break a; }"), expected);
    let expected = lines(
        "
        a: {
          if (x) {
            break a;
          }
          f();
        }",
    );
    assert_eq!(eliminate("a: while (true) { if (x) { break a; } f(); break a; }"), expected);
    assert_untouched(&EliminateDead, "a: while (true) { f(); break b; }");
    assert_untouched(&EliminateDead, "a: while (true) { if (x) { continue a; } f(); break a; }");
    assert_untouched(&EliminateDead, "a: while (true) { if (x) { break; } f(); break a; }");
}

#[test]
fn live_code_is_untouched() {
    assert_untouched(&EliminateDead, "function f() {\n  a();\n  return b;\n}");
    assert_untouched(&EliminateDead, "for (;;) {\n  if (a) break;\n  b();\n}");
}
