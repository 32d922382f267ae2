use tracing::{debug, instrument};
use crate::actor_framework::ResourceClient;
use crate::domain::{Produto, ProdutoCreate, ProdutoPatch};
use crate::repository::{ProdutoRepository, StoreError};

/// Client for the product store actor. This is the repository the service
/// is built with.
#[derive(Clone)]
pub struct ProdutoClient {
    inner: ResourceClient<Produto>,
}

impl ProdutoClient {
    pub fn new(inner: ResourceClient<Produto>) -> Self {
        Self { inner }
    }
}

impl ProdutoRepository for ProdutoClient {
    #[instrument(skip(self, params), fields(nome = %params.nome))]
    async fn create(&self, params: ProdutoCreate) -> Result<u32, StoreError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: u32) -> Result<Option<Produto>, StoreError> {
        debug!("Sending request");
        Ok(self.inner.get(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Produto>, StoreError> {
        debug!("Sending request");
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: u32, patch: ProdutoPatch) -> Result<Produto, StoreError> {
        debug!("Sending request");
        Ok(self.inner.update(id, patch).await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u32) -> Result<Produto, StoreError> {
        debug!("Sending request");
        Ok(self.inner.delete(id).await?)
    }
}
