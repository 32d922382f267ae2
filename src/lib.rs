//! # Loja Virtual
//!
//! Product catalog service: list, get, create, patch and delete over a single
//! product entity.
//!
//! - **Store** - an actor owning the records, reached through a typed client → [`actor_framework`], [`clients::ProdutoClient`]
//! - **Repository** - the five calls the catalog needs from a store → [`repository::ProdutoRepository`]
//! - **Patch engine** - ordered field-level operations on the public shape → [`patch`]
//! - **Service** - not-found and validation policy for each operation → [`service::ProdutoService`]
//! - **HTTP** - versioned axum routes → [`http::router`]
//! - **System** - startup, shutdown and tracing → [`app_system`]

pub mod actor_framework;
pub mod app_system;
pub mod clients;
pub mod config;
pub mod domain;
pub mod http;
pub mod mapper;
pub mod patch;
pub mod produto_actor;
pub mod repository;
pub mod service;

#[cfg(test)]
mod mock_framework;
