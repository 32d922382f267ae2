//! JSON-Patch style partial updates of a [`ProdutoDto`].
//!
//! Only the three public fields can be addressed. A path is resolved to a
//! [`ProdutoField`] and the value is coerced to that field's type, so there is
//! no free-form traversal of the document.
//!
//! Operations are applied one after the other on the target. If operation `k`
//! fails, operations `1..k` have already been applied and are not undone; the
//! caller decides whether to keep or drop the partially patched value.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use crate::domain::ProdutoDto;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatchError {
    #[error("no patch document was supplied")]
    MissingDocument,
    #[error("unsupported content type for a patch document: {0}")]
    UnsupportedMediaType(String),
    #[error("malformed patch document: {0}")]
    Malformed(String),
    #[error("the target location '{0}' does not exist")]
    UnknownPath(String),
    #[error("operation '{op}' on '{path}' requires a value")]
    MissingValue { op: PatchOp, path: String },
    #[error("operation '{0}' requires a 'from' location")]
    MissingFrom(PatchOp),
    #[error("value {value} is not valid for '{field}': expected {expected}")]
    TypeMismatch { field: ProdutoField, expected: &'static str, value: Value },
    #[error("test on '{field}' failed: expected {expected}, found {actual}")]
    TestFailed { field: ProdutoField, expected: Value, actual: Value },
    #[error("patched produto is invalid: {0}")]
    InvalidResult(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
    Copy,
    Move,
    Test,
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
            PatchOp::Copy => "copy",
            PatchOp::Move => "move",
            PatchOp::Test => "test",
        };
        f.write_str(name)
    }
}

/// One entry of a patch document: `{ "op": ..., "path": ..., "value": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    // missing key is None, explicit null is Some(Null); "descricao" accepts null
    #[serde(default, deserialize_with = "present_value", skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self { op: PatchOp::Replace, path: path.into(), from: None, value: Some(value.into()) }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self { op: PatchOp::Remove, path: path.into(), from: None, value: None }
    }
}

/// An ordered list of operations. An empty document is a valid no-op.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument(pub Vec<PatchOperation>);

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self(operations)
    }

    pub fn operations(&self) -> &[PatchOperation] {
        &self.0
    }

    /// Parses a request body. The body must be a JSON array of operations.
    pub fn from_slice(body: &[u8]) -> Result<Self, PatchError> {
        serde_json::from_slice(body).map_err(|e| PatchError::Malformed(e.to_string()))
    }

    /// Applies every operation in order.
    pub fn apply_to(&self, target: &mut ProdutoDto) -> Result<(), PatchError> {
        apply_patch(target, &self.0)
    }
}

/// The fields of [`ProdutoDto`] a patch may address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProdutoField {
    Nome,
    Descricao,
    Valor,
}

impl fmt::Display for ProdutoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProdutoField::Nome => "nome",
            ProdutoField::Descricao => "descricao",
            ProdutoField::Valor => "valor",
        };
        f.write_str(name)
    }
}

impl FromStr for ProdutoField {
    type Err = PatchError;

    /// Accepts `/nome`, `nome`, `/Nome` and so on. Nested paths are rejected.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segment = path.strip_prefix('/').unwrap_or(path);
        match segment.to_ascii_lowercase().as_str() {
            "nome" => Ok(ProdutoField::Nome),
            "descricao" => Ok(ProdutoField::Descricao),
            "valor" => Ok(ProdutoField::Valor),
            _ => Err(PatchError::UnknownPath(path.to_string())),
        }
    }
}

impl ProdutoField {
    fn get(self, target: &ProdutoDto) -> Value {
        match self {
            ProdutoField::Nome => Value::from(target.nome.clone()),
            ProdutoField::Descricao => target.descricao.clone().map(Value::from).unwrap_or(Value::Null),
            ProdutoField::Valor => Value::from(target.valor),
        }
    }

    fn set(self, target: &mut ProdutoDto, value: Value) -> Result<(), PatchError> {
        match (self, value) {
            (ProdutoField::Nome, Value::String(nome)) => target.nome = nome,
            (ProdutoField::Descricao, Value::String(descricao)) => target.descricao = Some(descricao),
            (ProdutoField::Descricao, Value::Null) => target.descricao = None,
            (ProdutoField::Valor, Value::Number(ref n)) if n.as_f64().is_some_and(|v| v.is_finite() && v.abs() <= f32::MAX as f64) => {
                // checked above, the cast cannot overflow
                target.valor = n.as_f64().unwrap_or_default() as f32;
            }
            // a numeric string is coerced, as form-style clients send "9.99"
            (ProdutoField::Valor, Value::String(ref s)) if s.trim().parse::<f32>().is_ok_and(f32::is_finite) => {
                target.valor = s.trim().parse().unwrap_or_default();
            }
            (field, value) => {
                return Err(PatchError::TypeMismatch { field, expected: field.expected(), value });
            }
        }
        Ok(())
    }

    /// Resets the field to its zero/absent value.
    fn clear(self, target: &mut ProdutoDto) {
        match self {
            ProdutoField::Nome => target.nome = String::new(),
            ProdutoField::Descricao => target.descricao = None,
            ProdutoField::Valor => target.valor = 0.0,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            ProdutoField::Nome => "a string",
            ProdutoField::Descricao => "a string or null",
            ProdutoField::Valor => "a number",
        }
    }
}

/// Applies `operations` to `target` in order, stopping at the first failure.
pub fn apply_patch(target: &mut ProdutoDto, operations: &[PatchOperation]) -> Result<(), PatchError> {
    for operation in operations {
        apply_operation(target, operation)?;
    }
    Ok(())
}

fn apply_operation(target: &mut ProdutoDto, operation: &PatchOperation) -> Result<(), PatchError> {
    let field: ProdutoField = operation.path.parse()?;
    let required_value = || {
        operation.value.clone().ok_or_else(|| PatchError::MissingValue {
            op: operation.op,
            path: operation.path.clone(),
        })
    };

    match operation.op {
        // scalar fields: add behaves as replace
        PatchOp::Add | PatchOp::Replace => field.set(target, required_value()?),
        PatchOp::Remove => {
            field.clear(target);
            Ok(())
        }
        PatchOp::Copy | PatchOp::Move => {
            let from: ProdutoField = operation
                .from
                .as_deref()
                .ok_or(PatchError::MissingFrom(operation.op))?
                .parse()?;
            let value = from.get(target);
            field.set(target, value)?;
            if operation.op == PatchOp::Move && from != field {
                from.clear(target);
            }
            Ok(())
        }
        PatchOp::Test => {
            let expected = required_value()?;
            let actual = field.get(target);
            if values_match(&expected, &actual) {
                Ok(())
            } else {
                Err(PatchError::TestFailed { field, expected, actual })
            }
        }
    }
}

// f32 fields round-trip through f64, so numbers are compared at f32 precision
fn values_match(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => (a as f32) == (b as f32),
            _ => false,
        },
        _ => expected == actual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn caneta() -> ProdutoDto {
        ProdutoDto::new("caneta", Some("azul"), 2.5)
    }

    fn parse(body: Value) -> PatchDocument {
        PatchDocument::from_slice(body.to_string().as_bytes()).unwrap()
    }

    #[test]
    fn test_replace_is_case_insensitive_on_path() {
        let mut dto = caneta();
        parse(json!([{ "op": "replace", "path": "/Nome", "value": "Tesoura" }]))
            .apply_to(&mut dto)
            .unwrap();
        assert_eq!(dto.nome, "Tesoura");
    }

    #[test]
    fn test_operations_apply_in_order() {
        let mut dto = caneta();
        let doc = parse(json!([
            { "op": "replace", "path": "/nome", "value": "lapis" },
            { "op": "replace", "path": "/descricao", "value": "grafite" },
            { "op": "add", "path": "/valor", "value": 1.99 },
            { "op": "replace", "path": "/nome", "value": "lapiseira" }
        ]));
        doc.apply_to(&mut dto).unwrap();
        assert_eq!(dto, ProdutoDto::new("lapiseira", Some("grafite"), 1.99));
    }

    #[test]
    fn test_remove_clears_field() {
        let mut dto = caneta();
        apply_patch(&mut dto, &[PatchOperation::remove("/descricao"), PatchOperation::remove("/valor")]).unwrap();
        assert_eq!(dto.descricao, None);
        assert_eq!(dto.valor, 0.0);
    }

    #[test]
    fn test_descricao_accepts_null() {
        let mut dto = caneta();
        apply_patch(&mut dto, &[PatchOperation::replace("/descricao", Value::Null)]).unwrap();
        assert_eq!(dto.descricao, None);
    }

    #[test]
    fn test_replace_without_value_fails() {
        let mut dto = caneta();
        let err = parse(json!([{ "op": "replace", "path": "/nome" }])).apply_to(&mut dto).unwrap_err();
        assert!(matches!(err, PatchError::MissingValue { op: PatchOp::Replace, .. }));
    }

    #[test]
    fn test_unknown_path_fails() {
        let mut dto = caneta();
        let err = apply_patch(&mut dto, &[PatchOperation::replace("/id", 9)]).unwrap_err();
        assert_eq!(err, PatchError::UnknownPath("/id".into()));

        let err = apply_patch(&mut dto, &[PatchOperation::replace("/nome/0", "x")]).unwrap_err();
        assert_eq!(err, PatchError::UnknownPath("/nome/0".into()));
    }

    #[test]
    fn test_type_mismatch_fails() {
        let mut dto = caneta();
        let err = apply_patch(&mut dto, &[PatchOperation::replace("/valor", "barato")]).unwrap_err();
        assert!(matches!(err, PatchError::TypeMismatch { field: ProdutoField::Valor, .. }));

        let err = apply_patch(&mut dto, &[PatchOperation::replace("/nome", 12)]).unwrap_err();
        assert!(matches!(err, PatchError::TypeMismatch { field: ProdutoField::Nome, .. }));
    }

    #[test]
    fn test_numeric_string_is_coerced_for_valor() {
        let mut dto = caneta();
        apply_patch(&mut dto, &[PatchOperation::replace("/valor", "9.90")]).unwrap();
        assert_eq!(dto.valor, 9.9);
    }

    #[test]
    fn test_failure_keeps_earlier_operations() {
        let mut dto = caneta();
        let doc = PatchDocument::new(vec![
            PatchOperation::replace("/nome", "borracha"),
            PatchOperation::replace("/preco", 3),
            PatchOperation::replace("/descricao", "nunca aplicado"),
        ]);

        let err = doc.apply_to(&mut dto).unwrap_err();
        assert_eq!(err, PatchError::UnknownPath("/preco".into()));
        assert_eq!(dto.nome, "borracha");
        assert_eq!(dto.descricao.as_deref(), Some("azul"));
    }

    #[test]
    fn test_empty_document_is_noop() {
        let mut dto = caneta();
        parse(json!([])).apply_to(&mut dto).unwrap();
        assert_eq!(dto, caneta());
    }

    #[test]
    fn test_copy_and_move() {
        let mut dto = caneta();
        parse(json!([{ "op": "copy", "from": "/nome", "path": "/descricao" }]))
            .apply_to(&mut dto)
            .unwrap();
        assert_eq!(dto.descricao.as_deref(), Some("caneta"));

        let mut dto = caneta();
        parse(json!([{ "op": "move", "from": "/descricao", "path": "/nome" }]))
            .apply_to(&mut dto)
            .unwrap();
        assert_eq!(dto.nome, "azul");
        assert_eq!(dto.descricao, None);

        let err = parse(json!([{ "op": "copy", "path": "/nome" }])).apply_to(&mut dto).unwrap_err();
        assert_eq!(err, PatchError::MissingFrom(PatchOp::Copy));
    }

    #[test]
    fn test_test_operation() {
        let mut dto = caneta();
        parse(json!([
            { "op": "test", "path": "/valor", "value": 2.5 },
            { "op": "test", "path": "/nome", "value": "caneta" }
        ]))
        .apply_to(&mut dto)
        .unwrap();

        let err = parse(json!([{ "op": "test", "path": "/nome", "value": "lapis" }]))
            .apply_to(&mut dto)
            .unwrap_err();
        assert!(matches!(err, PatchError::TestFailed { field: ProdutoField::Nome, .. }));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(PatchDocument::from_slice(b"{}"), Err(PatchError::Malformed(_))));
        assert!(matches!(PatchDocument::from_slice(b"not json"), Err(PatchError::Malformed(_))));
        assert!(matches!(
            PatchDocument::from_slice(br#"[{"op":"frobnicate","path":"/nome"}]"#),
            Err(PatchError::Malformed(_))
        ));
    }
}
