use tracing::{error, info};
use crate::actor_framework::ResourceActor;
use crate::clients::ProdutoClient;
use crate::domain::Produto;
use crate::service::ProdutoService;

/// Owns the product store actor and hands out the service built on it.
///
/// Responsible for starting the store, wiring the service to it, and waiting
/// for the store to drain on shutdown.
pub struct CatalogSystem {
    pub service: ProdutoService<ProdutoClient>,
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Starts the store actor. Must be called inside a tokio runtime.
    pub fn new(buffer_size: usize) -> Self {
        let mut last_id = 0u32;
        let next_produto_id = move || {
            last_id += 1;
            last_id
        };

        let (store_actor, store_client) = ResourceActor::<Produto>::new(buffer_size, next_produto_id);
        let handle = tokio::spawn(store_actor.run());
        info!(buffer_size, "Produto store started");

        Self {
            service: ProdutoService::new(ProdutoClient::new(store_client)),
            handle,
        }
    }

    /// Drops this system's handle on the store and waits for the actor to stop.
    ///
    /// The actor only stops once every clone of the service (for example the
    /// one held by the HTTP router) has been dropped as well.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down catalog...");
        drop(self.service);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(format!("Store task failed: {:?}", e));
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
