use super::*;
use crate::textual::parse_str;
use pretty_assertions::assert_eq;
use unindent::unindent;
use unminify_syntax::*;

fn reprint(source: &str) -> String {
    generate(&parse_str(source).unwrap(), 80)
}

#[test]
fn statements_one_per_line() {
    let out = reprint("var a=1,b;if(a){b=2}else{b=3}for(;;){break}");
    let expected = unindent(
        "
        var a = 1, b;
        if (a) {
          b = 2;
        } else {
          b = 3;
        }
        for (;;) {
          break;
        }",
    );
    assert_eq!(out, expected.trim());
}

#[test]
fn functions_and_objects() {
    let out = reprint("function f(a,b){'use strict';return{a:a,b:[1,,2]}}");
    let expected = unindent(
        "
        function f(a, b) {
          'use strict';
          return { a: a, b: [1, , 2] };
        }",
    );
    assert_eq!(out, expected.trim());
}

#[test]
fn parentheses_follow_precedence() {
    assert_eq!(reprint("(a+b)*c;"), "(a + b) * c;");
    assert_eq!(reprint("a+(b*c);"), "a + b * c;");
    assert_eq!(reprint("a-(b-c);"), "a - (b - c);");
    assert_eq!(reprint("(a,b)?c:d;"), "(a, b) ? c : d;");
    assert_eq!(reprint("(-a)**2;"), "(-a) ** 2;");
    assert_eq!(reprint("- -a;"), "- -a;");
    assert_eq!(reprint("new (f())();"), "new (f())();");
    assert_eq!(reprint("new a.b;"), "new a.b();");
    assert_eq!(reprint("(1).toString();"), "(1).toString();");
    assert_eq!(reprint("f(a, (b, c));"), "f(a, (b, c));");
}

#[test]
fn statement_starts_are_disambiguated() {
    assert_eq!(reprint("(function(){})();"), "(function() {})();");
    assert_eq!(reprint("({}).x;"), "({}.x);");
    assert_eq!(reprint("(function(){}).call(this);"), "(function() {}).call(this);");
    assert_eq!(reprint("x = () => ({});"), "x = () => ({});");
}

#[test]
fn strings_and_numbers() {
    assert_eq!(reprint(r#"x = "it'sé";"#), r"x = 'it\'s\xE9';");
    assert_eq!(reprint("0x1f;"), "31;");
    assert_eq!(reprint("x = {'a-b': 1, 'c': 2, '1': 3};"), "x = { 'a-b': 1, c: 2, 1: 3 };");
}

#[test]
fn synthesized_values_print() {
    let tree = expression_statement(binary(number(-1.0), BinaryOp::Sub, number(-0.0)));
    assert_eq!(generate(&tree, 80), "-1 - -0;");
    let tree = expression_statement(unary(UnaryOp::Minus, number(-2.0)));
    assert_eq!(generate(&tree, 80), "- -2;");
    let tree = expression_statement(mk(StaticMemberExpression {
        object: number(-2.0),
        property: "x".to_string(),
    }));
    assert_eq!(generate(&tree, 80), "(-2).x;");
}

#[test]
fn for_heads_keep_in_parenthesized() {
    assert_eq!(reprint("for (var a = ('x' in o); ;) {}"), "for (var a = ('x' in o);;) {}");
    assert_eq!(reprint("for (var k in o) {}"), "for (var k in o) {}");
}

#[test]
fn dangling_else_gets_braces() {
    let tree = if_statement(
        identifier("a"),
        if_statement(identifier("b"), expression_statement(identifier("c")), None),
        Some(expression_statement(identifier("d"))),
    );
    let expected = unindent(
        "
        if (a) {
          if (b) c;
        } else d;",
    );
    assert_eq!(generate(&tree, 80), expected.trim());
}

#[test]
fn output_reparses_to_the_same_tree() {
    let sources = [
        "var a = [1, 2, , 3], b = { x: 1, 'y z': [a] };",
        "function f(x, ...r) { return x ? f(x - 1) : r.length; }",
        "try { a(); } catch (e) { b(e); } finally { c(); }",
        "switch (x) { case 1: y(); break; default: z(); }",
        "label: for (var i = 0; i < 10; i++) { if (i) continue label; }",
        "do x++; while (x < 3);",
        "o = { get a() { return 1; }, set a(v) {}, m() {} };",
        "x = typeof a === 'string' && !(b instanceof C) || void 0;",
        "a = b ? c = d : (e, f);",
        "new (a().b)();",
    ];
    for source in sources {
        let tree = parse_str(source).unwrap();
        let printed = generate(&tree, 80);
        let again = parse_str(&printed).unwrap_or_else(|e| panic!("{printed}: {e}"));
        assert_eq!(tree, again, "{printed}");
    }
}
