use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::types::PopsicleFields;

/// One entry of an RFC 6902 JSON Patch document as it arrives on the wire.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct JsonPatchOperation {
    pub op: String,
    pub path: String,
    #[serde(default)]
    pub value: Option<Value>,
}

/// A patch instruction against the `{name, flavor, price}` projection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchOperation {
    ReplaceName(String),
    ReplaceFlavor(String),
    ReplacePrice(Decimal),
    Unsupported { op: String, path: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("operation '{op}' on path '{path}' is not supported")]
    Unsupported { op: String, path: String },
    #[error("operation on path '{path}' is missing a value")]
    MissingValue { path: String },
    #[error("invalid value for path '{path}': {reason}")]
    InvalidValue { path: String, reason: String },
}

#[derive(Clone, Copy)]
enum Target {
    Name,
    Flavor,
    Price,
}

fn target_of(path: &str) -> Option<Target> {
    match path.to_ascii_lowercase().as_str() {
        "/name" => Some(Target::Name),
        "/flavor" => Some(Target::Flavor),
        "/price" => Some(Target::Price),
        _ => None,
    }
}

impl TryFrom<JsonPatchOperation> for PatchOperation {
    type Error = PatchError;

    /// `add` on an existing member behaves like `replace` (RFC 6902 §4.1), so
    /// both map to the replace variants. Anything else becomes `Unsupported`.
    fn try_from(raw: JsonPatchOperation) -> Result<Self, Self::Error> {
        let op = raw.op.to_ascii_lowercase();
        let target = match (op.as_str(), target_of(&raw.path)) {
            ("replace" | "add", Some(target)) => target,
            _ => {
                return Ok(PatchOperation::Unsupported {
                    op: raw.op,
                    path: raw.path,
                })
            }
        };

        let value = raw.value.ok_or_else(|| PatchError::MissingValue {
            path: raw.path.clone(),
        })?;

        Ok(match target {
            Target::Name => PatchOperation::ReplaceName(string_value(&raw.path, value)?),
            Target::Flavor => PatchOperation::ReplaceFlavor(string_value(&raw.path, value)?),
            Target::Price => PatchOperation::ReplacePrice(decimal_value(&raw.path, &value)?),
        })
    }
}

fn string_value(path: &str, value: Value) -> Result<String, PatchError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(PatchError::InvalidValue {
            path: path.to_string(),
            reason: format!("expected a string, got {other}"),
        }),
    }
}

fn decimal_value(path: &str, value: &Value) -> Result<Decimal, PatchError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => {
            return Err(PatchError::InvalidValue {
                path: path.to_string(),
                reason: format!("expected a number, got {other}"),
            })
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|err| PatchError::InvalidValue {
            path: path.to_string(),
            reason: err.to_string(),
        })
}

/// Parses a whole document; the first malformed entry rejects it.
pub fn parse_document(document: Vec<JsonPatchOperation>) -> Result<Vec<PatchOperation>, PatchError> {
    document.into_iter().map(PatchOperation::try_from).collect()
}

/// Applies `operations` in order to a copy of `fields`. Either every operation
/// applies and the patched copy is returned, or nothing changes.
pub fn apply(
    fields: &PopsicleFields,
    operations: &[PatchOperation],
) -> Result<PopsicleFields, PatchError> {
    let mut patched = fields.clone();
    for operation in operations {
        match operation {
            PatchOperation::ReplaceName(name) => patched.name = name.clone(),
            PatchOperation::ReplaceFlavor(flavor) => patched.flavor = flavor.clone(),
            PatchOperation::ReplacePrice(price) => patched.price = *price,
            PatchOperation::Unsupported { op, path } => {
                return Err(PatchError::Unsupported {
                    op: op.clone(),
                    path: path.clone(),
                })
            }
        }
    }
    Ok(patched)
}
