use super::*;
use pretty_assertions::assert_eq;
use unminify_syntax::{BinaryOp, JsString, UnaryOp};

fn s(text: &str) -> Value {
    Value::from(text)
}

fn n(x: f64) -> Value {
    Value::Number(x)
}

fn show(result: Result<Value>) -> String {
    match result {
        | Ok(value) => value.to_string(),
        | Err(err) => format!("error: {err}"),
    }
}

#[test]
fn string_to_number_follows_the_grammar() {
    let cases = [
        ("", 0.0),
        ("  42\n", 42.0),
        ("0x1F", 31.0),
        ("0b101", 5.0),
        ("0o17", 15.0),
        (".5", 0.5),
        ("5.", 5.0),
        ("-1e3", -1000.0),
        ("-Infinity", f64::NEG_INFINITY),
    ];
    for (text, expected) in cases {
        assert_eq!(string_to_number(&JsString::from(text)), expected, "{text:?}");
    }
    for text in ["inf", "nan", "1_000", "12px", "-0x10", "0x"] {
        assert!(string_to_number(&JsString::from(text)).is_nan(), "{text:?}");
    }
}

#[test]
fn addition_concatenates_or_adds() {
    assert_eq!(show(binary(BinaryOp::Add, &n(1.0), &n(2.0))), "3");
    assert_eq!(show(binary(BinaryOp::Add, &s("a"), &n(1.0))), "\"a1\"");
    assert_eq!(show(binary(BinaryOp::Add, &Value::Bool(true), &n(1.0))), "2");
    assert_eq!(show(binary(BinaryOp::Add, &Value::from(vec![n(1.0), n(2.0)]), &s(""))), "\"1,2\"");
    assert_eq!(show(binary(BinaryOp::Add, &Value::Undefined, &n(1.0))), "NaN");
}

#[test]
fn loose_and_strict_equality() {
    let eq = |op, a: &Value, b: &Value| show(binary(op, a, b));
    assert_eq!(eq(BinaryOp::Eq, &s("1"), &n(1.0)), "true");
    assert_eq!(eq(BinaryOp::StrictEq, &s("1"), &n(1.0)), "false");
    assert_eq!(eq(BinaryOp::Eq, &Value::Bool(true), &s("1")), "true");
    assert_eq!(eq(BinaryOp::Eq, &n(f64::NAN), &n(f64::NAN)), "false");
    assert_eq!(eq(BinaryOp::Eq, &Value::Undefined, &n(0.0)), "false");
    assert_eq!(eq(BinaryOp::Eq, &Value::from(vec![n(1.0)]), &n(1.0)), "true");
    assert_eq!(eq(BinaryOp::NotEq, &s(""), &n(0.0)), "false");
    assert!(binary(BinaryOp::StrictEq, &Value::from(vec![]), &Value::from(vec![])).is_err());
}

#[test]
fn relational_and_bitwise() {
    assert_eq!(show(binary(BinaryOp::Lt, &s("10"), &s("9"))), "true");
    assert_eq!(show(binary(BinaryOp::Lt, &s("10"), &n(9.0))), "false");
    assert_eq!(show(binary(BinaryOp::Ge, &n(f64::NAN), &n(1.0))), "false");
    assert_eq!(show(binary(BinaryOp::Shl, &n(1.0), &n(33.0))), "2");
    assert_eq!(show(binary(BinaryOp::UShr, &n(-1.0), &n(0.0))), "4294967295");
    assert_eq!(show(binary(BinaryOp::Shr, &n(-8.0), &n(1.0))), "-4");
    assert_eq!(show(binary(BinaryOp::BitOr, &n(4294967297.0), &n(0.0))), "1");
    assert_eq!(show(binary(BinaryOp::Rem, &n(-5.0), &n(3.0))), "-2");
    assert_eq!(show(binary(BinaryOp::Exp, &n(1.0), &n(f64::INFINITY))), "NaN");
    assert_eq!(show(binary(BinaryOp::Or, &n(0.0), &s("x"))), "\"x\"");
    assert_eq!(show(binary(BinaryOp::And, &n(0.0), &s("x"))), "0");
    assert!(binary(BinaryOp::In, &s("a"), &Value::from(vec![])).is_err());
}

#[test]
fn unary_operators() {
    assert_eq!(show(unary(UnaryOp::Typeof, &Value::Undefined)), "\"undefined\"");
    assert_eq!(show(unary(UnaryOp::Typeof, &Value::from(vec![]))), "\"object\"");
    assert_eq!(show(unary(UnaryOp::Typeof, &Value::Builtin(Builtin::ParseInt))), "\"function\"");
    assert_eq!(show(unary(UnaryOp::Not, &s(""))), "true");
    assert_eq!(show(unary(UnaryOp::BitNot, &n(5.0))), "-6");
    assert_eq!(show(unary(UnaryOp::Plus, &s(" 12 "))), "12");
    assert_eq!(show(unary(UnaryOp::Void, &n(1.0))), "undefined");
    assert!(unary(UnaryOp::Delete, &n(1.0)).is_err());
}

#[test]
fn global_functions() {
    let call = |name: &str, args: &[Value]| show(global(name).unwrap().call(args));
    assert_eq!(call("parseInt", &[s("  42px")]), "42");
    assert_eq!(call("parseInt", &[s("0x1A")]), "26");
    assert_eq!(call("parseInt", &[s("ff"), n(16.0)]), "255");
    assert_eq!(call("parseInt", &[s("12"), n(1.0)]), "NaN");
    assert_eq!(call("parseInt", &[s("-0")]), "0");
    assert_eq!(call("parseFloat", &[s("3.14abc")]), "3.14");
    assert_eq!(call("parseFloat", &[s("-Infinityx")]), "-Infinity");
    assert_eq!(call("parseFloat", &[s("e5")]), "NaN");
    assert_eq!(call("decodeURIComponent", &[s("a%20b%2Fc%C3%A9")]), "\"a b/cé\"");
    assert_eq!(call("decodeURI", &[s("a%20b%2Fc")]), "\"a b%2Fc\"");
    assert_eq!(call("decodeURIComponent", &[s("%E0%A4%A")]), "error: URIError: malformed URI sequence");
    assert_eq!(call("unescape", &[s("%41%u0042%zz")]), "\"AB%zz\"");
    assert_eq!(call("decodeURIComponent", &[s("%+1")]), "error: URIError: malformed URI sequence");
    assert_eq!(call("decodeURI", &[s("%E0%+1%80")]), "error: URIError: malformed URI sequence");
    assert_eq!(call("unescape", &[s("%+1%u+041")]), "\"%+1%u+041\"");
    assert!(global("eval").is_none());
}

#[test]
fn string_methods() {
    let call = |this: &str, name: &str, args: &[Value]| show(call_method(&s(this), name, args));
    assert_eq!(call("hello", "charAt", &[n(1.0)]), "\"e\"");
    assert_eq!(call("hello", "charAt", &[n(9.0)]), "\"\"");
    assert_eq!(call("hello", "charCodeAt", &[]), "104");
    assert_eq!(call("hello", "indexOf", &[s("l")]), "2");
    assert_eq!(call("hello", "lastIndexOf", &[s("l")]), "3");
    assert_eq!(call("hello", "lastIndexOf", &[s("l"), n(2.0)]), "2");
    assert_eq!(call("hello", "slice", &[n(-3.0)]), "\"llo\"");
    assert_eq!(call("hello", "substring", &[n(3.0), n(1.0)]), "\"el\"");
    assert_eq!(call("hello", "substr", &[n(1.0), n(3.0)]), "\"ell\"");
    assert_eq!(call("Straße", "toUpperCase", &[]), "\"STRASSE\"");
    assert_eq!(call(" \u{FEFF}x\n", "trim", &[]), "\"x\"");
    assert_eq!(call("a,b,,c", "split", &[s(",")]), "[\"a\", \"b\", \"\", \"c\"]");
    assert_eq!(call("abc", "split", &[s("")]), "[\"a\", \"b\", \"c\"]");
    assert_eq!(call("a,b,c", "split", &[s(","), n(2.0)]), "[\"a\", \"b\"]");
    assert_eq!(call("", "split", &[s(",")]), "[\"\"]");
    assert_eq!(call("a", "concat", &[n(1.0), Value::Undefined]), "\"a1undefined\"");
    assert!(call_method(&s("a"), "replace", &[]).is_err());
}

#[test]
fn number_methods() {
    let call = |x: f64, name: &str, args: &[Value]| show(call_method(&n(x), name, args));
    assert_eq!(call(255.0, "toString", &[n(16.0)]), "\"ff\"");
    assert_eq!(call(-10.0, "toString", &[n(2.0)]), "\"-1010\"");
    assert_eq!(call(0.5, "toString", &[]), "\"0.5\"");
    assert_eq!(call(2.5, "toFixed", &[]), "\"3\"");
    assert_eq!(call(1.005, "toFixed", &[n(2.0)]), "\"1.00\"");
    assert_eq!(call(-1.5, "toFixed", &[n(0.0)]), "\"-2\"");
    assert_eq!(call(9.995, "toFixed", &[n(1.0)]), "\"10.0\"");
    assert_eq!(call(1.0, "toFixed", &[n(101.0)]), "error: RangeError: toFixed() digits argument must be between 0 and 100");
}

#[test]
fn array_methods_and_properties() {
    let arr = Value::from(vec![s("1"), s("2"), s("3")]);
    assert_eq!(show(get_property(&arr, "length")), "3");
    assert_eq!(show(get_property(&s("abc"), "length")), "3");
    assert_eq!(show(get_property(&s("abc"), "1")), "\"b\"");
    assert_eq!(show(call_method(&arr, "slice", &[n(1.0)])), "[\"2\", \"3\"]");
    assert_eq!(show(call_method(&arr, "indexOf", &[s("3")])), "2");
    assert_eq!(show(call_method(&arr, "indexOf", &[n(3.0)])), "-1");
    assert_eq!(
        show(call_method(&arr, "map", &[Value::Builtin(Builtin::ParseInt)])),
        "[1, NaN, NaN]"
    );
    assert_eq!(
        show(call_method(&arr, "map", &[Value::Builtin(Builtin::ParseFloat)])),
        "[1, 2, 3]"
    );
    assert!(call_method(&arr, "push", &[n(4.0)]).is_err());
    assert!(call_method(&arr, "map", &[n(4.0)]).is_err());
    assert!(is_non_mutating_array_method("forEach"));
    assert!(!is_non_mutating_array_method("sort"));
}

#[test]
fn from_char_code_wraps() {
    assert_eq!(show(from_char_code(&[n(65.0), n(65536.0 + 66.0)])), "\"AB\"");
}

#[test]
fn values_become_literals() {
    use unminify_syntax::*;
    assert!(is_void_zero(&Value::Undefined.to_tree().unwrap()));
    assert_eq!(
        *Value::Number(f64::NAN).to_tree().unwrap(),
        Node::IdentifierExpression(IdentifierExpression { name: "NaN".to_string() })
    );
    assert_eq!(Value::Number(-3.0).to_tree().unwrap().as_number(), Some(-3.0));
    assert!(matches!(
        &*Value::Number(f64::NEG_INFINITY).to_tree().unwrap(),
        Node::UnaryExpression(UnaryExpression { operator: UnaryOp::Minus, .. })
    ));
    assert!(Value::from(vec![n(1.0)]).to_tree().is_none());
    assert!(matches!(&*Value::from(vec![n(1.0)]).to_tree_deep().unwrap(), Node::ArrayExpression(_)));
    let regex = Node::LiteralRegExpExpression(LiteralRegExpExpression {
        pattern: "a".to_string(),
        flags: "g".to_string(),
    });
    assert!(Value::of_literal(&regex).is_none());
}
