//! Store-side behaviour of [`Produto`](crate::domain::Produto): id assignment,
//! timestamping and invariant checks inside the store actor.

pub mod entity;
