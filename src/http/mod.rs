//! HTTP surface: routing, version negotiation and error translation.

pub mod error;
pub mod routes;
pub mod versioning;

pub use error::ApiError;
pub use routes::{cors_layer, router};
pub use versioning::ApiVersion;
