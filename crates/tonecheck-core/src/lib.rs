//! # Tonecheck Core
//!
//! Shared, runtime-agnostic logic for tonecheck: the data model, response
//! schema validation, the error taxonomy and its user-facing formatter,
//! the key/value storage abstraction, and the result history store.
//!
//! This crate contains no tokio, sqlx, reqwest, or filesystem I/O. The
//! durable storage backend and the HTTP client live in the `tonecheck`
//! crate and plug in through [`store::KeyValueStore`].

pub mod error;
pub mod format;
pub mod history;
pub mod models;
pub mod schema;
pub mod store;
