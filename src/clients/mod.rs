//! Typed clients wrapping the generic store actor.

mod produto_client;

pub use produto_client::ProdutoClient;
