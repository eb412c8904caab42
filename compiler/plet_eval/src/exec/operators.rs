//! Unary and binary operators on values.
//!
//! `and` and `or` short-circuit and are handled by the frame; everything
//! else is a pure function of its operands.

use std::cmp::Ordering;

use plet_ir::{BinaryOp, UnaryOp};

use crate::errors::{
    binary_type_mismatch, division_by_zero, integer_overflow, modulo_by_zero, unary_type_mismatch,
    EvalError,
};
use crate::{Env, Value};

type OpResult = Result<Value, EvalError>;

#[inline]
fn checked_arith(result: Option<i64>, operation: &str) -> OpResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(operation))
}

/// Evaluate `left op right`. Heap results are allocated in `env`.
pub(crate) fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value, env: &Env) -> OpResult {
    match op {
        BinaryOp::Eq => return Ok(Value::Bool(left.equals(right))),
        BinaryOp::NotEq => return Ok(Value::Bool(!left.equals(right))),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            return compare(op, left, right);
        }
        _ => {}
    }
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => eval_float_binary(op, *a, *b),
        #[allow(clippy::cast_precision_loss, reason = "int operands are promoted to float")]
        (Value::Int(a), Value::Float(b)) => eval_float_binary(op, *a as f64, *b),
        #[allow(clippy::cast_precision_loss, reason = "int operands are promoted to float")]
        (Value::Float(a), Value::Int(b)) => eval_float_binary(op, *a, *b as f64),
        (Value::Time(a), Value::Int(b)) => match op {
            BinaryOp::Add => a
                .checked_add(*b)
                .map(Value::Time)
                .ok_or_else(|| integer_overflow("addition")),
            BinaryOp::Sub => a
                .checked_sub(*b)
                .map(Value::Time)
                .ok_or_else(|| integer_overflow("subtraction")),
            _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
        },
        (Value::Time(a), Value::Time(b)) if op == BinaryOp::Sub => {
            checked_arith(a.checked_sub(*b), "subtraction")
        }
        (Value::String(a), Value::String(b)) if op == BinaryOp::Add => {
            let mut bytes = Vec::with_capacity(a.len() + b.len());
            bytes.extend_from_slice(a.as_bytes());
            bytes.extend_from_slice(b.as_bytes());
            Ok(env.string(bytes))
        }
        (Value::Array(a), Value::Array(b)) if op == BinaryOp::Add => {
            let mut items = a.to_vec();
            items.extend(b.to_vec());
            Ok(env.array(items))
        }
        _ => Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    }
}

fn eval_int_binary(op: BinaryOp, a: i64, b: i64) -> OpResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), "addition"),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), "subtraction"),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), "multiplication"),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        BinaryOp::Div => checked_arith(a.checked_div(b), "division"),
        BinaryOp::Mod if b == 0 => Err(modulo_by_zero()),
        BinaryOp::Mod => checked_arith(a.checked_rem(b), "remainder"),
        _ => Err(binary_type_mismatch(op, "int", "int")),
    }
}

fn eval_float_binary(op: BinaryOp, a: f64, b: f64) -> OpResult {
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div if b == 0.0 => Err(division_by_zero()),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        BinaryOp::Mod if b == 0.0 => Err(modulo_by_zero()),
        BinaryOp::Mod => Ok(Value::Float(a % b)),
        _ => Err(binary_type_mismatch(op, "float", "float")),
    }
}

/// Ordering comparisons: numbers (ints and floats mixed), strings by
/// bytes, times.
fn compare(op: BinaryOp, left: &Value, right: &Value) -> OpResult {
    #[allow(clippy::cast_precision_loss, reason = "int operands are promoted to float")]
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) | (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
        _ => return Err(binary_type_mismatch(op, left.type_name(), right.type_name())),
    };
    // NaN compares false both ways.
    let Some(ordering) = ordering else {
        return Ok(Value::Bool(false));
    };
    let result = match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

pub(crate) fn evaluate_unary(op: UnaryOp, operand: &Value) -> OpResult {
    match (op, operand) {
        (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
        (UnaryOp::Neg, Value::Int(i)) => checked_arith(i.checked_neg(), "negation"),
        (UnaryOp::Neg, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Plus, Value::Int(_) | Value::Float(_)) => Ok(operand.clone()),
        (UnaryOp::Neg, _) => Err(unary_type_mismatch("-", operand.type_name())),
        (UnaryOp::Plus, _) => Err(unary_type_mismatch("+", operand.type_name())),
    }
}
