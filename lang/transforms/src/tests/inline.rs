use super::*;
use pretty_assertions::assert_eq;

fn inline(source: &str) -> String {
    settle(&InlineConstants, source)
}

fn last_line(source: &str) -> String {
    inline(source).lines().last().unwrap_or_default().to_string()
}

#[test]
fn literals_replace_reads() {
    assert_eq!(inline("var a = 1;\nf(a, a);"), "var a = 1;\nf(1, 1);");
    assert_eq!(inline("var a = 'k';\nvar b = a;\nf(b);"), "var a = 'k';\nvar b = 'k';\nf('k');");
    assert_eq!(inline("var a = 1;\nf({ a });"), "var a = 1;\nf({ a: 1 });");
}

#[test]
fn names_chain_to_their_source() {
    let expected = lines(
        "
        function g(p) {
          var q = p;
          return p;
        }",
    );
    assert_eq!(inline("function g(p) { var q = p; return q; }"), expected);
}

#[test]
fn reads_stay_when_unsound_or_circular() {
    assert_untouched(&InlineConstants, "var a = 1;\na = 2;\nf(a);");
    assert_untouched(&InlineConstants, "var a = 1;\nvar a = 2;\nf(a);");
    assert_untouched(&InlineConstants, "var a = b;\nvar b = a;\nf(a, b);");
    assert_untouched(&InlineConstants, "var b = g();\nvar a = b;\nfunction h(b) {\n  return a;\n}");
    assert_untouched(&InlineConstants, "for (var k in o) {\n  var c = k;\n  f(c);\n}");
}

#[test]
fn lone_identifier_statements_vanish() {
    assert_eq!(inline("var a = f();\na;\nb;"), "var a = f();\n;\n;");
}

#[test]
fn constant_object_members() {
    assert_eq!(
        last_line("var o = { x: 1, y: 'two' };\nf(o.x, o['y'], o.z);"),
        "f(1, 'two', o.z);"
    );
    assert_eq!(last_line("var l = [10, , 20];\nf(l[0], l[1], l[2]);"), "f(10, l[1], 20);");
    assert_eq!(last_line("var o = { x: 1, x: 2 };\nf(o.x);"), "f(2);");
}

#[test]
fn objects_stored_to_are_not_constant() {
    assert_untouched(&InlineConstants, "var o = { x: 1 };\no.x = 2;\nf(o.x);");
    assert_untouched(&InlineConstants, "var l = [1];\nl[0] = 2;\nf(l[0]);");
    assert_untouched(&InlineConstants, "var o = { x: 1 };\ndelete o.x;\nf(o.x);");
    assert_untouched(&InlineConstants, "var o = { x: 1, get x() { return 2; } };\nf(o.x);");
    assert_untouched(&InlineConstants, "var o = { [k]: 1 };\nf(o.x);");
}

#[test]
fn trivial_methods_become_operators() {
    let source = "var m = { add: function (a, b) { return a + b; } };\nf(m.add(x, y));";
    assert_eq!(last_line(source), "f(x + y);");
    let source = "var m = { g: function (a, b, c) { return a * b - c; } };\nf(m.g(1, 2, 3));";
    assert_eq!(last_line(source), "f(1 * 2 - 3);");
    let source = "var m = { add: function (a, b) { return b + a; } };\nf(m.add(x, y));";
    assert_eq!(last_line(source), "f(m.add(x, y));");
    let source = "var m = { or: function (a, b) { return a || b; } };\nf(m.or(x, y()));";
    assert_eq!(last_line(source), "f(m.or(x, y()));");
}

#[test]
fn selector_functions_become_conditionals() {
    let source = "var s = function (k) { if (k == 1) { return 'a'; } else { return 'b'; } };\nf(s(x));";
    assert_eq!(last_line(source), "f(x == 1 ? 'a' : 'b');");
    let source = "var s = function (k) { if (k === 1) { return 'a'; } else { return 'b'; } };\nf(s());";
    assert_eq!(last_line(source), "f(void 0 === 1 ? 'a' : 'b');");
}

#[test]
fn functions_called_once_are_inlined() {
    let out = inline("var add = function (a, b) { return a + b; };\nvar r = add(1, 2);");
    assert!(!out.contains("add(1, 2)"), "{out}");
    assert!(out.ends_with("})(1, 2);"), "{out}");
    assert_untouched(
        &InlineConstants,
        "var add = function (a, b) { return a + b; };\nvar r = add(1, 2);\nvar s = add(3, 4);",
    );
    assert_untouched(
        &InlineConstants,
        "var k = f();\nvar g = function () { return k; };\nfunction h() {\n  return g();\n}",
    );
}
