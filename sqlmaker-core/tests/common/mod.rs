#![allow(dead_code)]

use sqlmaker_core::{ClauseOptions, Scalar, Value};

pub fn value(json: serde_json::Value) -> Value {
    Value::try_from(json).unwrap_or_else(|e| panic!("Failed to convert test input: {e}"))
}

pub fn options(json: serde_json::Value) -> ClauseOptions {
    ClauseOptions::try_from(value(json)).unwrap_or_else(|e| panic!("Bad options: {e}"))
}

pub fn int(n: i64) -> Scalar {
    Scalar::Int(n)
}

pub fn text(s: &str) -> Scalar {
    Scalar::String(s.to_string())
}
