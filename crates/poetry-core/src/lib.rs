//! Core types and trait definitions for the poetry ingestion pipeline.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the ingestion driver both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod model;
pub mod normalize;
pub mod outcome;
pub mod record;
pub mod store;

pub use outcome::{Outcome, Skip};
