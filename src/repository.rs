use std::future::Future;
use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::{Produto, ProdutoCreate, ProdutoPatch};

/// Failures reported by a product store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Produto not found: {0}")]
    NotFound(String),
    #[error("Produto rejected by store: {0}")]
    Rejected(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for StoreError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            FrameworkError::Rejected(msg) => StoreError::Rejected(msg),
            other => StoreError::Unavailable(other.to_string()),
        }
    }
}

/// The five calls the catalog needs from its backing store. Each call is
/// atomic on its own; nothing is promised across calls.
pub trait ProdutoRepository: Clone + Send + Sync + 'static {
    fn create(&self, params: ProdutoCreate) -> impl Future<Output = Result<u32, StoreError>> + Send;

    fn find_by_id(&self, id: u32) -> impl Future<Output = Result<Option<Produto>, StoreError>> + Send;

    fn list_all(&self) -> impl Future<Output = Result<Vec<Produto>, StoreError>> + Send;

    fn update(&self, id: u32, patch: ProdutoPatch) -> impl Future<Output = Result<Produto, StoreError>> + Send;

    fn delete(&self, id: u32) -> impl Future<Output = Result<Produto, StoreError>> + Send;
}
