use super::*;
use pretty_assertions::assert_eq;
use unminify_syntax::*;

fn statements(source: &str) -> Vec<Tree> {
    let tree = parse_str(source).unwrap();
    let Node::Script(Script { statements, .. }) = &*tree else { panic!("expected a script") };
    statements.clone()
}

fn only_expression(source: &str) -> Tree {
    let stmts = statements(source);
    assert_eq!(stmts.len(), 1, "{source}");
    match &*stmts[0] {
        | Node::ExpressionStatement(ExpressionStatement { expression }) => expression.clone(),
        | other => panic!("expected an expression statement, got {}", other.kind()),
    }
}

#[test]
fn semicolons_are_inserted_at_line_breaks() {
    let stmts = statements("a = 1\nb = 2\nreturn\nc");
    let kinds: Vec<_> = stmts.iter().map(|s| s.kind()).collect();
    assert_eq!(
        kinds,
        vec!["ExpressionStatement", "ExpressionStatement", "ReturnStatement", "ExpressionStatement"]
    );
    let Node::ReturnStatement(ReturnStatement { expression }) = &*stmts[2] else { unreachable!() };
    assert!(expression.is_none());
}

#[test]
fn missing_semicolon_on_one_line_is_an_error() {
    let err = parse_str("a b").unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedToken { .. }));
    assert_eq!(err.at, Location::Cursor(unminify_utils::span::Cursor2 { line: 1, column: 3 }));
}

#[test]
fn directives_are_only_leading_string_statements() {
    let tree = parse_str("'use strict'; 'other'\nfoo('x')").unwrap();
    let Node::Script(Script { directives, statements }) = &*tree else { unreachable!() };
    assert_eq!(directives, &vec!["'use strict'".to_string(), "'other'".to_string()]);
    assert_eq!(statements.len(), 1);
    let tree = parse_str("'a' + b;").unwrap();
    let Node::Script(Script { directives, .. }) = &*tree else { unreachable!() };
    assert!(directives.is_empty());
}

#[test]
fn precedence_and_associativity() {
    let e = only_expression("a - b - c * d ** e ** f;");
    let Node::BinaryExpression(BinaryExpression { left, operator: BinaryOp::Sub, right }) = &*e
    else {
        panic!("expected subtraction")
    };
    assert!(matches!(&**left, Node::BinaryExpression(BinaryExpression { operator: BinaryOp::Sub, .. })));
    let Node::BinaryExpression(BinaryExpression { right: pow, operator: BinaryOp::Mul, .. }) =
        &**right
    else {
        panic!("expected multiplication")
    };
    let Node::BinaryExpression(BinaryExpression { right: inner, operator: BinaryOp::Exp, .. }) =
        &**pow
    else {
        panic!("expected exponent")
    };
    assert!(matches!(&**inner, Node::BinaryExpression(BinaryExpression { operator: BinaryOp::Exp, .. })));
}

#[test]
fn regex_and_division_are_told_apart() {
    let e = only_expression("x = a / b / c;");
    let Node::AssignmentExpression(AssignmentExpression { expression, .. }) = &*e else {
        panic!("expected assignment")
    };
    assert!(matches!(&**expression, Node::BinaryExpression(BinaryExpression { operator: BinaryOp::Div, .. })));
    let e = only_expression("x = /a[/]b/gi.test(s);");
    let Node::AssignmentExpression(AssignmentExpression { expression, .. }) = &*e else {
        panic!("expected assignment")
    };
    let Node::CallExpression(CallExpression { callee, .. }) = &**expression else {
        panic!("expected call")
    };
    let Node::StaticMemberExpression(StaticMemberExpression { object, .. }) = &**callee else {
        panic!("expected member")
    };
    assert_eq!(
        **object,
        Node::LiteralRegExpExpression(LiteralRegExpExpression {
            pattern: "a[/]b".to_string(),
            flags: "gi".to_string()
        })
    );
}

#[test]
fn assignment_targets() {
    let e = only_expression("a.b[c] += 1;");
    assert!(matches!(
        &*e,
        Node::CompoundAssignmentExpression(CompoundAssignmentExpression { binding, operator: CompoundOp::Add, .. })
            if matches!(&**binding, Node::ComputedMemberAssignmentTarget(_))
    ));
    let e = only_expression("i++;");
    assert!(matches!(
        &*e,
        Node::UpdateExpression(UpdateExpression { prefix: false, operand, .. })
            if matches!(&**operand, Node::AssignmentTargetIdentifier(_))
    ));
    let err = parse_str("f() = 1;").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidAssignmentTarget);
}

#[test]
fn arrows_and_function_forms() {
    let e = only_expression("f = (a, b = 1, ...c) => a + b;");
    let Node::AssignmentExpression(AssignmentExpression { expression, .. }) = &*e else {
        panic!("expected assignment")
    };
    let Node::ArrowExpression(ArrowExpression { params, body }) = &**expression else {
        panic!("expected arrow")
    };
    let Node::FormalParameters(FormalParameters { items, rest }) = &**params else {
        unreachable!()
    };
    assert_eq!(items.len(), 2);
    assert!(matches!(&*items[1], Node::BindingWithDefault(_)));
    assert!(rest.is_some());
    assert!(matches!(&**body, Node::BinaryExpression(_)));
    let stmts = statements("function g(x) { 'use strict'; return x }");
    let Node::FunctionDeclaration(FunctionDeclaration { body, .. }) = &*stmts[0] else {
        panic!("expected function")
    };
    let Node::FunctionBody(FunctionBody { directives, statements }) = &**body else {
        unreachable!()
    };
    assert_eq!(directives.len(), 1);
    assert_eq!(statements.len(), 1);
}

#[test]
fn for_heads() {
    let stmts = statements("for (var k in o) ; for (x of xs) ; for (var i = 0, n = s.length; i < n; i++) {}");
    assert!(matches!(&*stmts[0], Node::ForInStatement(_)));
    let Node::ForOfStatement(ForOfStatement { left, .. }) = &*stmts[1] else {
        panic!("expected for-of")
    };
    assert!(matches!(&**left, Node::AssignmentTargetIdentifier(_)));
    assert!(matches!(&*stmts[2], Node::ForStatement(_)));
    let stmts = statements("for (var i = ('a' in o); ; ) break;");
    assert!(matches!(&*stmts[0], Node::ForStatement(ForStatement { test: None, update: None, .. })));
}

#[test]
fn object_literals() {
    let e = only_expression("({ a: 1, 'b c': 2, 3: 4, [k]: 5, d, get e() { return 1 }, set e(v) {}, m(x) {} });");
    let Node::ObjectExpression(ObjectExpression { properties }) = &*e else {
        panic!("expected object")
    };
    let kinds: Vec<_> = properties.iter().map(|p| p.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            "DataProperty",
            "DataProperty",
            "DataProperty",
            "DataProperty",
            "ShorthandProperty",
            "Getter",
            "Setter",
            "MethodDefinition"
        ]
    );
}

#[test]
fn binding_patterns() {
    let stmts = statements("var [a, , b = 2, ...c] = xs, { d, e: [f], g = 3 } = o;");
    let Node::VariableDeclaration(VariableDeclaration { declarators, .. }) = &*stmts[0] else {
        panic!("expected declaration")
    };
    let Node::VariableDeclarator(VariableDeclarator { binding, .. }) = &*declarators[0] else {
        unreachable!()
    };
    let Node::ArrayBinding(ArrayBinding { elements, rest }) = &**binding else {
        panic!("expected array pattern")
    };
    assert_eq!(elements.len(), 3);
    assert!(elements[1].is_none());
    assert!(rest.is_some());
    let Node::VariableDeclarator(VariableDeclarator { binding, .. }) = &*declarators[1] else {
        unreachable!()
    };
    assert!(matches!(&**binding, Node::ObjectBinding(ObjectBinding { properties }) if properties.len() == 3));
}

#[test]
fn unsupported_syntax_is_reported() {
    for source in ["with (o) {}", "class A {}", "[a, b] = c;"] {
        let err = parse_str(source).unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::Unsupported(_)), "{source}");
    }
}

#[test]
fn literals_are_decoded() {
    let e = only_expression(r#"[0x1F, 1e3, "\x41B", 'it\'s', true, null, , ];"#);
    let Node::ArrayExpression(ArrayExpression { elements }) = &*e else {
        panic!("expected array")
    };
    assert_eq!(elements.len(), 7);
    assert_eq!(elements[0].as_ref().and_then(|n| n.as_number()), Some(31.0));
    assert_eq!(elements[1].as_ref().and_then(|n| n.as_number()), Some(1000.0));
    assert_eq!(
        elements[2].as_ref().and_then(|n| n.as_string().cloned()),
        Some(JsString::from("AB"))
    );
    assert_eq!(
        elements[3].as_ref().and_then(|n| n.as_string().cloned()),
        Some(JsString::from("it's"))
    );
    assert!(elements[6].is_none());
}

#[test]
fn errors_render_as_reports() {
    let source = "var = 1;";
    let info = unminify_utils::span::FileInfo::new(source, None);
    let err = parse(source, &info).unwrap_err();
    let mut out = Vec::new();
    err.to_report(&info)
        .write((info.display_path(), ariadne::Source::from(source)), &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Unrecognized token"));
}
