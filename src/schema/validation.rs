//! Request body validation from per-field rules.
//!
//! All failing fields are reported together, in rule order, before the body is
//! deserialized into its typed schema.

use crate::error::{AppError, FieldError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Int,
    Float,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub nullable: bool,
    pub minimum: Option<i64>,
}

impl FieldRule {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldRule {
            name,
            kind,
            required: false,
            nullable: false,
            minimum: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub const fn minimum(mut self, min: i64) -> Self {
        self.minimum = Some(min);
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body: required fields must be present.
    pub fn validate(body: &Value, rules: &[FieldRule]) -> Result<(), AppError> {
        check(body, rules, false)
    }

    /// Validate only the fields present in body (for partial updates).
    pub fn validate_partial(body: &Value, rules: &[FieldRule]) -> Result<(), AppError> {
        check(body, rules, true)
    }

    pub fn parse<T: DeserializeOwned>(mut body: Value, rules: &[FieldRule]) -> Result<T, AppError> {
        Self::validate(&body, rules)?;
        coerce_ints(&mut body, rules);
        into_schema(body)
    }

    pub fn parse_partial<T: DeserializeOwned>(mut body: Value, rules: &[FieldRule]) -> Result<T, AppError> {
        Self::validate_partial(&body, rules)?;
        coerce_ints(&mut body, rules);
        into_schema(body)
    }
}

/// Integer value of a JSON number, accepting floats without a fractional part (`2.0`).
fn whole_number(v: &Value) -> Option<i128> {
    if let Some(n) = v.as_i64() {
        return Some(n as i128);
    }
    if let Some(n) = v.as_u64() {
        return Some(n as i128);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i128)
    } else {
        None
    }
}

/// Rewrite whole floats in validated `Int` fields as integers so they deserialize into `i32`.
fn coerce_ints(body: &mut Value, rules: &[FieldRule]) {
    let Some(map) = body.as_object_mut() else {
        return;
    };
    for rule in rules.iter().filter(|r| r.kind == FieldKind::Int) {
        if let Some(v) = map.get_mut(rule.name) {
            if v.is_f64() {
                if let Some(n) = whole_number(v).and_then(|n| i64::try_from(n).ok()) {
                    *v = Value::from(n);
                }
            }
        }
    }
}

fn into_schema<T: DeserializeOwned>(body: Value) -> Result<T, AppError> {
    serde_json::from_value(body).map_err(|e| AppError::field("", e.to_string()))
}

fn check(body: &Value, rules: &[FieldRule], partial: bool) -> Result<(), AppError> {
    let Some(map) = body.as_object() else {
        return Err(AppError::field("", "value is not a valid dict"));
    };
    let mut errors = Vec::new();
    for rule in rules {
        match map.get(rule.name) {
            None => {
                if rule.required && !partial {
                    errors.push(FieldError::new(rule.name, "field required"));
                }
            }
            Some(Value::Null) => {
                if !rule.nullable {
                    errors.push(FieldError::new(rule.name, "none is not an allowed value"));
                }
            }
            Some(v) => {
                if let Err(msg) = validate_field(v, rule) {
                    errors.push(FieldError::new(rule.name, msg));
                }
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

fn validate_field(v: &Value, rule: &FieldRule) -> Result<(), String> {
    let n = match rule.kind {
        FieldKind::Str => {
            return if v.is_string() {
                Ok(())
            } else {
                Err("str type expected".into())
            };
        }
        FieldKind::Int => {
            let n = whole_number(v).ok_or("value is not a valid integer")?;
            if n > i32::MAX as i128 {
                return Err(format!("ensure this value is less than or equal to {}", i32::MAX));
            }
            if n < i32::MIN as i128 {
                return Err(format!("ensure this value is greater than or equal to {}", i32::MIN));
            }
            n as f64
        }
        FieldKind::Float => v.as_f64().ok_or("value is not a valid float")?,
    };
    if let Some(min) = rule.minimum {
        if n < min as f64 {
            return Err(format!("ensure this value is greater than or equal to {}", min));
        }
    }
    Ok(())
}

/// Deserialize a present field as `Some(value)`, so `Option<Option<T>>` tells
/// "absent" (outer `None` via `#[serde(default)]`) from "explicit null" (`Some(None)`).
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
