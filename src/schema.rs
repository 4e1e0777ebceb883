//! Declared request shapes and the extractor that enforces them.
//!
//! Bodies are checked field by field before a handler runs, so a bad request reports
//! every offending field at once instead of failing on the first serde error.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::{AppError, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A request body with a declared field list.
pub trait RequestSchema: DeserializeOwned {
    const FIELDS: &'static [FieldSpec];
}

/// Checks `value` against `fields` and returns the object with coercions applied.
/// Fields not named in `fields` are dropped.
pub fn validate(value: Value, fields: &[FieldSpec]) -> Result<Value, Vec<FieldError>> {
    let Value::Object(mut input) = value else {
        return Err(vec![FieldError::body(
            "Input should be a valid dictionary",
            "dict_type",
        )]);
    };

    let mut out = Map::new();
    let mut errors = Vec::new();

    for spec in fields {
        match (input.remove(spec.name), spec.required) {
            (None, true) => {
                errors.push(FieldError::field(spec.name, "Field required", "missing"));
            }
            (None | Some(Value::Null), false) => {
                out.insert(spec.name.to_string(), Value::Null);
            }
            (Some(v), _) => match coerce(v, spec.kind) {
                Ok(v) => {
                    out.insert(spec.name.to_string(), v);
                }
                Err((msg, kind)) => errors.push(FieldError::field(spec.name, msg, kind)),
            },
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(errors)
    }
}

fn coerce(v: Value, kind: FieldKind) -> Result<Value, (&'static str, &'static str)> {
    match kind {
        FieldKind::String => match v {
            Value::String(_) => Ok(v),
            _ => Err(("Input should be a valid string", "string_type")),
        },
        FieldKind::Integer => {
            const MSG: (&str, &str) = ("Input should be a valid integer", "int_type");
            match v {
                Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Value::Number(n)),
                // 4.0 is an integer; 4.5 is not.
                Value::Number(n) => match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Value::Number(Number::from(f as i64)))
                    }
                    _ => Err(MSG),
                },
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(|i| Value::Number(Number::from(i)))
                    .map_err(|_| MSG),
                _ => Err(MSG),
            }
        }
    }
}

/// JSON body extractor that runs [`validate`] before deserializing into `T`.
pub struct Validated<T>(pub T);

impl<T: RequestSchema> Validated<T> {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AppError> {
        let raw: Value = serde_json::from_slice(bytes).map_err(|e| {
            AppError::Validation(vec![FieldError::body(
                format!("JSON decode error: {e}"),
                "json_invalid",
            )])
        })?;
        let checked = validate(raw, T::FIELDS).map_err(AppError::Validation)?;
        let parsed = serde_json::from_value(checked).map_err(|e| {
            AppError::Validation(vec![FieldError::body(e.to_string(), "value_error")])
        })?;
        Ok(Self(parsed))
    }
}

#[async_trait]
impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: RequestSchema,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // Reading the body is a transport concern; keep axum's status (413 for oversize).
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BodyRejected {
                status: e.status(),
                detail: e.body_text(),
            })?;
        Self::from_slice(&bytes)
    }
}
