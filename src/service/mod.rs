//! Service layer.
//!
//! The asset aggregation pipeline, its per-owner-kind routing and the retry helper every
//! ESI-facing step runs through.

pub mod asset;
pub mod owners;
pub mod retry;
