use super::*;
use pretty_assertions::assert_eq;

fn restructure(source: &str) -> String {
    settle(&Restructure, source)
}

#[test]
fn bare_var_moves_to_first_assignment() {
    assert_eq!(restructure("var x;\nx = 1;\nf(x);"), "var x = 1;\nf(x);");
    assert_eq!(restructure("var x;\nx = 1;\nx = 2;"), "var x = 1;\nx = 2;");
    let expected = lines(
        "
        function g() {
          a();
          var y = b();
          return y;
        }",
    );
    assert_eq!(restructure("function g() { var y; a(); y = b(); return y; }"), expected);
}

#[test]
fn bare_var_moves_into_for_heads() {
    assert_eq!(
        restructure("var i;\nfor (i = 0; i < 3; i++) {}"),
        "for (var i = 0; i < 3; i++) {}"
    );
}

#[test]
fn bare_var_stays_when_a_write_is_nested() {
    assert_untouched(&Restructure, "var x;\nif (a) {\n  x = 1;\n}");
    assert_untouched(&Restructure, "var x;\nf(x = 1);");
    assert_untouched(&Restructure, "var x;\nf(x);");
}

#[test]
fn parameters_materialize() {
    let expected = lines(
        "
        (function() {
          var a = 1;
          var b = 2;
          return a + b;
        })();",
    );
    assert_eq!(restructure("(function (a, b) { return a + b; })(1, 2);"), expected);
}

#[test]
fn missing_and_surplus_arguments() {
    let expected = lines(
        "
        (function() {
          var a = x;
          var b;
          g(a, b);
        })();",
    );
    assert_eq!(restructure("(function (a, b) { g(a, b); })(x);"), expected);
    let expected = lines(
        "
        (function() {
          var a = x;
          y();
          g(a);
        })();",
    );
    assert_eq!(restructure("(function (a) { g(a); })(x, y());"), expected);
}

#[test]
fn parameters_stay_when_unsafe() {
    assert_untouched(&Restructure, "(function (a) { var x; g(a, x); })(x);");
    assert_untouched(&Restructure, "(function (a) { return this.a + a; })(1);");
    assert_untouched(&Restructure, "(function (a) { return arguments.length; })(1);");
    assert_untouched(&Restructure, "(function (a) { return a; })(this);");
    assert_untouched(&Restructure, "(function (a) { return a; })(...xs);");
    assert_untouched(&Restructure, "(function (a, ...r) { return r; })(1, 2);");
    assert_untouched(&Restructure, "(function ([a]) { return a; })(xs);");
    assert_untouched(&Restructure, "f(function (a) { return a; });");
}
