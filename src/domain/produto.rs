use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};

pub const NOME_MIN_CHARS: usize = 3;
pub const NOME_MAX_CHARS: usize = 255;
pub const VALOR_MAX: f32 = 99999.0;

/// A catalog product as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Produto {
    pub id: u32,
    pub nome: String,
    pub descricao: Option<String>,
    pub valor: f32,
    pub data_criacao: DateTime<Utc>,
}

/// Public representation of a product. Carries no identifier or timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoDto {
    #[garde(length(chars, min = 3, max = 255))]
    pub nome: String,
    #[garde(skip)]
    #[serde(default)]
    pub descricao: Option<String>,
    #[garde(range(min = 0.01, max = 99999.0))]
    pub valor: f32,
}

/// Payload for creating a new product.
#[derive(Debug, Clone)]
pub struct ProdutoCreate {
    pub nome: String,
    pub descricao: Option<String>,
    pub valor: f32,
}

/// The patchable fields of a product, written back after a patch succeeds.
#[derive(Debug, Clone)]
pub struct ProdutoPatch {
    pub nome: String,
    pub descricao: Option<String>,
    pub valor: f32,
}

impl Produto {
    /// Checks the invariants every stored product must satisfy.
    ///
    /// # Errors
    /// Returns a message naming the first violated field.
    pub fn check_invariants(&self) -> Result<(), String> {
        let chars = self.nome.chars().count();
        if !(NOME_MIN_CHARS..=NOME_MAX_CHARS).contains(&chars) {
            return Err(format!(
                "nome must have between {NOME_MIN_CHARS} and {NOME_MAX_CHARS} characters, got {chars}"
            ));
        }
        if !(self.valor > 0.0 && self.valor <= VALOR_MAX) {
            return Err(format!("valor must be greater than 0 and at most {VALOR_MAX}, got {}", self.valor));
        }
        Ok(())
    }
}

impl ProdutoDto {
    pub fn new(nome: impl Into<String>, descricao: Option<&str>, valor: f32) -> Self {
        Self {
            nome: nome.into(),
            descricao: descricao.map(str::to_string),
            valor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dto_uses_camel_case_field_names() {
        let dto: ProdutoDto = serde_json::from_str(r#"{"nome":"lapis","valor":1.99}"#).unwrap();
        assert_eq!(dto, ProdutoDto::new("lapis", None, 1.99));

        // to_value widens valor to f64, so compare the written text
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(json, r#"{"nome":"lapis","descricao":null,"valor":1.99}"#);
    }

    #[test]
    fn test_dto_validation_bounds() {
        assert!(ProdutoDto::new("abc", None, 0.01).validate().is_ok());
        assert!(ProdutoDto::new("a".repeat(255), None, 99999.0).validate().is_ok());

        assert!(ProdutoDto::new("ab", None, 1.0).validate().is_err());
        assert!(ProdutoDto::new("a".repeat(256), None, 1.0).validate().is_err());
        assert!(ProdutoDto::new("abc", None, 0.0).validate().is_err());
        assert!(ProdutoDto::new("abc", None, 100000.0).validate().is_err());
    }

    #[test]
    fn test_name_length_counts_characters_not_bytes() {
        assert!(ProdutoDto::new("pão", None, 2.5).validate().is_ok());
    }

    #[test]
    fn test_invariants_on_stored_product() {
        let mut produto = Produto {
            id: 1,
            nome: "caneta".into(),
            descricao: None,
            valor: 2.0,
            data_criacao: Utc::now(),
        };
        assert!(produto.check_invariants().is_ok());

        produto.valor = 0.0;
        assert!(produto.check_invariants().is_err());

        produto.valor = 2.0;
        produto.nome = "ab".into();
        assert!(produto.check_invariants().is_err());
    }
}
