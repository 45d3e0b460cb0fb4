use super::*;
use pretty_assertions::assert_eq;

fn eliminate(source: &str) -> String {
    settle_all(&[&Normalize, &EliminateUnused], source)
}

#[test]
fn unreferenced_constants_disappear() {
    assert_eq!(eliminate("var a = 5;"), "");
    assert_eq!(eliminate("var a = 5;\nf();"), "f();");
    assert_eq!(eliminate("var a = [1, 'x'], b = {};\nf();"), "f();");
    let expected = lines(
        "
        function g() {
          return 1;
        }",
    );
    assert_eq!(eliminate("function g() { var h = function () {}; return 1; }"), expected);
}

#[test]
fn unreferenced_initializers_still_run() {
    assert_eq!(eliminate("var a = f();"), "f();");
    assert_eq!(eliminate("var a;\ng();"), "g();");
}

#[test]
fn referenced_variables_stay() {
    assert_untouched(&EliminateUnused, "var a = 5;\nf(a);");
    assert_untouched(&EliminateUnused, "var a = f();\ng(a);");
    assert_untouched(&EliminateUnused, "for (var i = 0; ; ) {}");
}

#[test]
fn unread_object_properties_are_pruned() {
    assert_eq!(
        eliminate("var o = { a: 1, b: 2, c: f() };\ng(o.a);"),
        "var o = { a: 1, c: f() };\ng(o.a);"
    );
    assert_untouched(&EliminateUnused, "var o = { a: 1, b: 2 };\ng(o);");
    assert_untouched(&EliminateUnused, "var o = { a: 1, b: 2 };\ng(o[k]);");
}

#[test]
fn stores_nothing_reads_become_their_values() {
    let expected = lines(
        "
        function f() {
          g();
          return 2;
        }",
    );
    assert_eq!(eliminate("function f() { var n; n = g(); return 2; }"), expected);
    let expected = lines(
        "
        function f() {
          return 2;
        }",
    );
    assert_eq!(eliminate("function f() { var n = 0; n += 1; n += 2; return 2; }"), expected);
    let expected = lines(
        "
        function f() {
          var n = 0;
          n += 1;
          return n;
        }",
    );
    assert_eq!(eliminate("function f() { var n = 0; n += 1; return n; }"), expected);
}

#[test]
fn globals_are_observable() {
    assert_untouched(&EliminateUnused, "x = 1;");
    assert_untouched(&EliminateUnused, "x += 1;");
}
