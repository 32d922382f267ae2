//! # Mock Framework
//!
//! Utilities for testing the service against a scripted store.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_get`] or [`expect_update`] to assert which
//! store requests were issued and to answer them.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

/// Creates a mock client and a receiver for asserting requests.
///
/// # Testing Strategy
/// Instead of spinning up a `ResourceActor`, the client sends to a channel the
/// test controls. The test reads each request, checks it, and replies through
/// the embedded oneshot sender, which makes store failures easy to simulate.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Patch, oneshot::Sender<Result<T, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Panics if a request is waiting in the queue.
pub fn assert_no_request<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) {
    assert!(receiver.try_recv().is_err(), "unexpected store request");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::clients::ProdutoClient;
    use crate::domain::{Produto, ProdutoDto};
    use crate::patch::{PatchDocument, PatchOperation};
    use crate::repository::StoreError;
    use crate::service::{ProdutoService, ServiceError};

    fn stored(id: u32, nome: &str) -> Produto {
        Produto { id, nome: nome.into(), descricao: None, valor: 5.0, data_criacao: Utc::now() }
    }

    #[tokio::test]
    async fn test_create_forwards_mapped_params() {
        let (client, mut receiver) = create_mock_client::<Produto>(4);
        let service = ProdutoService::new(ProdutoClient::new(client));

        let create_task = tokio::spawn(async move {
            service.create(ProdutoDto::new("lapis", Some("HB"), 1.99)).await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.nome, "lapis");
        assert_eq!(params.descricao.as_deref(), Some("HB"));
        responder.send(Ok(12)).unwrap();

        let created = create_task.await.unwrap().unwrap();
        assert_eq!(created.id, 12);
    }

    #[tokio::test]
    async fn test_update_reads_then_writes_patched_fields() {
        let (client, mut receiver) = create_mock_client::<Produto>(4);
        let service = ProdutoService::new(ProdutoClient::new(client));

        let update_task = tokio::spawn(async move {
            let document = PatchDocument::new(vec![PatchOperation::replace("/nome", "Tesoura")]);
            service.update(3, Some(document)).await
        });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        assert_eq!(id, 3);
        responder.send(Ok(Some(stored(3, "caneta")))).unwrap();

        let (id, patch, responder) = expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, 3);
        assert_eq!(patch.nome, "Tesoura");
        assert_eq!(patch.valor, 5.0);
        responder.send(Ok(stored(3, "Tesoura"))).unwrap();

        let patched = update_task.await.unwrap().unwrap();
        assert_eq!(patched.nome, "Tesoura");
    }

    #[tokio::test]
    async fn test_store_failure_is_surfaced() {
        let (client, mut receiver) = create_mock_client::<Produto>(4);
        let service = ProdutoService::new(ProdutoClient::new(client));

        let get_task = tokio::spawn(async move { service.get_by_id(5).await });

        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        responder.send(Err(FrameworkError::ActorDropped)).unwrap();

        let err = get_task.await.unwrap().unwrap_err();
        assert_eq!(err, ServiceError::Store(StoreError::Unavailable("Actor dropped".into())));
    }
}
