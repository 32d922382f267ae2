use garde::Validate;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use crate::domain::{ProdutoCreate, ProdutoDto, ProdutoPatch};
use crate::patch::{PatchDocument, PatchError};
use crate::repository::{ProdutoRepository, StoreError};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    #[error("Produto not found")]
    NotFound,
    #[error("Invalid produto: {0}")]
    InvalidInput(String),
    #[error("Invalid patch: {0}")]
    InvalidPatch(#[from] PatchError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            // the record went away between our read and our write
            StoreError::NotFound(_) => ServiceError::NotFound,
            other => ServiceError::Store(other),
        }
    }
}

/// Result of a successful create: the assigned id and the submitted input.
#[derive(Debug, Clone, PartialEq)]
pub struct Created {
    pub id: u32,
    pub produto: ProdutoDto,
}

/// Catalog operations over a product store.
///
/// `update` reads, patches and writes in separate store calls with no version
/// check, so two concurrent patches of the same product can overwrite each
/// other (last write wins).
#[derive(Clone)]
pub struct ProdutoService<R> {
    repository: R,
}

impl<R: ProdutoRepository> ProdutoService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Lists every product in store order. An empty catalog is `NotFound`.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ProdutoDto>, ServiceError> {
        let produtos = self.repository.list_all().await?;
        if produtos.is_empty() {
            debug!("Catalog is empty");
            return Err(ServiceError::NotFound);
        }
        info!(count = produtos.len(), "Produtos listed");
        Ok(produtos.iter().map(ProdutoDto::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: u32) -> Result<ProdutoDto, ServiceError> {
        if id == 0 {
            return Err(ServiceError::NotFound);
        }
        let produto = self.repository.find_by_id(id).await?.ok_or(ServiceError::NotFound)?;
        Ok(ProdutoDto::from(produto))
    }

    /// Validates and stores a new product. The returned product is the input
    /// as submitted, not a re-read of the stored record.
    #[instrument(skip(self, input), fields(nome = %input.nome))]
    pub async fn create(&self, input: ProdutoDto) -> Result<Created, ServiceError> {
        if let Err(report) = input.validate() {
            warn!(%report, "Rejected produto");
            return Err(ServiceError::InvalidInput(report.to_string()));
        }
        let id = self.repository.create(ProdutoCreate::from(input.clone())).await?;
        info!(id, "Produto created");
        Ok(Created { id, produto: input })
    }

    /// Applies `document` to the product and stores the result.
    ///
    /// The patch runs on a detached copy. Nothing is written unless every
    /// operation succeeds and the patched product is still valid.
    #[instrument(skip(self, document))]
    pub async fn update(&self, id: u32, document: Option<PatchDocument>) -> Result<ProdutoDto, ServiceError> {
        if id == 0 {
            return Err(ServiceError::NotFound);
        }
        let document = document.ok_or(PatchError::MissingDocument)?;

        let produto = self.repository.find_by_id(id).await?.ok_or(ServiceError::NotFound)?;
        let mut snapshot = ProdutoDto::from(produto);

        if let Err(e) = document.apply_to(&mut snapshot) {
            warn!(error = %e, "Patch failed");
            return Err(e.into());
        }
        if let Err(report) = snapshot.validate() {
            warn!(%report, "Patched produto is invalid");
            return Err(PatchError::InvalidResult(report.to_string()).into());
        }

        self.repository.update(id, ProdutoPatch::from(&snapshot)).await?;
        info!(operations = document.operations().len(), "Produto patched");
        Ok(snapshot)
    }

    /// Removes the product and returns its last known values.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: u32) -> Result<ProdutoDto, ServiceError> {
        if id == 0 {
            return Err(ServiceError::NotFound);
        }
        if self.repository.find_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound);
        }
        let removed = self.repository.delete(id).await?;
        info!("Produto deleted");
        Ok(ProdutoDto::from(removed))
    }
}
