//! External system integrations for skulabel.
//!
//! - [`http`] - Single-attempt transport, shared rate gate and the retrying
//!   request layer
//! - [`catalog`] - The [`catalog::CatalogApi`] trait and its VTEX implementation
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the batch engine
//! can be exercised with in-memory implementations. Network I/O only happens
//! in [`http::ReqwestTransport`].

pub mod catalog;
pub mod http;
