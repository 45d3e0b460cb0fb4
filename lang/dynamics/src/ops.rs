//! Unary and binary operators over known values.

use crate::{coerce::*, syntax::*};
use unminify_syntax::{BinaryOp, JsString, UnaryOp};

pub fn unary(operator: UnaryOp, operand: &Value) -> Result<Value> {
    Ok(match operator {
        | UnaryOp::Plus => Value::Number(to_number(operand)?),
        | UnaryOp::Minus => Value::Number(-to_number(operand)?),
        | UnaryOp::Not => Value::Bool(!to_boolean(operand)),
        | UnaryOp::BitNot => Value::Number(!to_int32(operand)? as f64),
        | UnaryOp::Typeof => Value::from(operand.type_of()),
        | UnaryOp::Void => Value::Undefined,
        | UnaryOp::Delete => return Err(EvalError::Unmodeled("delete".to_string())),
    })
}

/// Numeric operators after ToNumber on both sides.
macro_rules! arith {
    ( $name:ident, |$a:ident, $b:ident| $body:expr ) => {
        fn $name(left: &Value, right: &Value) -> Result<Value> {
            let $a = to_number(left)?;
            let $b = to_number(right)?;
            Ok(Value::Number($body))
        }
    };
}

arith!(sub, |a, b| a - b);
arith!(mul, |a, b| a * b);
arith!(div, |a, b| a / b);
arith!(rem, |a, b| js_rem(a, b));
arith!(exp, |a, b| js_pow(a, b));

/// Bitwise operators after ToInt32 on both sides.
macro_rules! bitwise {
    ( $name:ident, |$a:ident, $b:ident| $body:expr ) => {
        fn $name(left: &Value, right: &Value) -> Result<Value> {
            let $a = to_int32(left)?;
            let $b = to_int32(right)?;
            Ok(Value::Number($body as f64))
        }
    };
}

bitwise!(bit_and, |a, b| a & b);
bitwise!(bit_or, |a, b| a | b);
bitwise!(bit_xor, |a, b| a ^ b);
bitwise!(shl, |a, b| a.wrapping_shl(b as u32 & 31));
bitwise!(shr, |a, b| a.wrapping_shr(b as u32 & 31));

fn ushr(left: &Value, right: &Value) -> Result<Value> {
    let a = to_uint32(left)?;
    let b = to_uint32(right)?;
    Ok(Value::Number((a >> (b & 31)) as f64))
}

/// `%` keeps the sign of the dividend, as `fmod` does.
fn js_rem(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() || a.is_infinite() || b == 0.0 {
        return f64::NAN;
    }
    if b.is_infinite() || a == 0.0 {
        return a;
    }
    a % b
}

/// `**`, which differs from `powf` on a `NaN` exponent and on `±1 ** ±Infinity`.
fn js_pow(a: f64, b: f64) -> f64 {
    if b.is_nan() {
        return f64::NAN;
    }
    if b == 0.0 {
        return 1.0;
    }
    if a.abs() == 1.0 && b.is_infinite() {
        return f64::NAN;
    }
    a.powf(b)
}

fn add(left: &Value, right: &Value) -> Result<Value> {
    let left = to_primitive(left)?;
    let right = to_primitive(right)?;
    match (&left, &right) {
        | (Value::String(_), _) | (_, Value::String(_)) => {
            Ok(Value::String(to_string(&left)?.concat(&to_string(&right)?)))
        }
        | _ => Ok(Value::Number(to_number(&left)? + to_number(&right)?)),
    }
}

#[derive(Clone, Copy)]
enum Order {
    Less,
    NotLess,
    Undefined,
}

/// IsLessThan: strings compare by code units, everything else numerically.
fn less_than(left: &Value, right: &Value) -> Result<Order> {
    let left = to_primitive(left)?;
    let right = to_primitive(right)?;
    if let (Value::String(a), Value::String(b)) = (&left, &right) {
        return Ok(if a.units() < b.units() { Order::Less } else { Order::NotLess });
    }
    let a = to_number(&left)?;
    let b = to_number(&right)?;
    Ok(if a.is_nan() || b.is_nan() {
        Order::Undefined
    } else if a < b {
        Order::Less
    } else {
        Order::NotLess
    })
}

pub fn binary(operator: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    use BinaryOp::*;
    let boolean = |b: bool| -> Result<Value> { Ok(Value::Bool(b)) };
    match operator {
        | Sequence => Ok(right.clone()),
        | Or => Ok(if to_boolean(left) { left.clone() } else { right.clone() }),
        | And => Ok(if to_boolean(left) { right.clone() } else { left.clone() }),
        | Eq => boolean(loose_equals(left, right)?),
        | NotEq => boolean(!loose_equals(left, right)?),
        | StrictEq => boolean(strict_equals(left, right)?),
        | StrictNotEq => boolean(!strict_equals(left, right)?),
        | Lt => boolean(matches!(less_than(left, right)?, Order::Less)),
        | Gt => boolean(matches!(less_than(right, left)?, Order::Less)),
        | Le => boolean(matches!(less_than(right, left)?, Order::NotLess)),
        | Ge => boolean(matches!(less_than(left, right)?, Order::NotLess)),
        | Add => add(left, right),
        | Sub => sub(left, right),
        | Mul => mul(left, right),
        | Div => div(left, right),
        | Rem => rem(left, right),
        | Exp => exp(left, right),
        | BitAnd => bit_and(left, right),
        | BitOr => bit_or(left, right),
        | BitXor => bit_xor(left, right),
        | Shl => shl(left, right),
        | Shr => shr(left, right),
        | UShr => ushr(left, right),
        | In | Instanceof => Err(EvalError::Unmodeled(format!("`{}`", operator))),
    }
}

/// ToString of each value, joined.
pub fn concat_all(values: &[Value]) -> Result<JsString> {
    let mut out = JsString::new();
    for value in values {
        out = out.concat(&to_string(value)?);
    }
    Ok(out)
}
