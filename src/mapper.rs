//! Conversions between the stored product and its public shape.

use crate::domain::{Produto, ProdutoCreate, ProdutoDto, ProdutoPatch};

impl From<&Produto> for ProdutoDto {
    fn from(produto: &Produto) -> Self {
        Self {
            nome: produto.nome.clone(),
            descricao: produto.descricao.clone(),
            valor: produto.valor,
        }
    }
}

impl From<Produto> for ProdutoDto {
    fn from(produto: Produto) -> Self {
        Self {
            nome: produto.nome,
            descricao: produto.descricao,
            valor: produto.valor,
        }
    }
}

impl From<ProdutoDto> for ProdutoCreate {
    fn from(dto: ProdutoDto) -> Self {
        Self {
            nome: dto.nome,
            descricao: dto.descricao,
            valor: dto.valor,
        }
    }
}

impl From<&ProdutoDto> for ProdutoPatch {
    fn from(dto: &ProdutoDto) -> Self {
        Self {
            nome: dto.nome.clone(),
            descricao: dto.descricao.clone(),
            valor: dto.valor,
        }
    }
}
