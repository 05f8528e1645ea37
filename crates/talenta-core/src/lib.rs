//! Core types and trait definitions for the Talenta HR portal.
//!
//! This crate is deliberately free of HTTP, spreadsheet and database
//! dependencies. Every other crate depends on it.

// We intentionally use native `async fn` in trait impls (stabilised in Rust
// 1.75). Suppress the advisory lint about `Send` bounds on returned futures.
#![allow(async_fn_in_trait)]

pub mod application;
pub mod batch;
pub mod company;
pub mod employee;
pub mod error;
pub mod id;
pub mod job;
pub mod scope;
pub mod store;
pub mod user;

pub use error::{Error, Result};
