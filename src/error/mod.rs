//! Error types for the Stockpile asset engine.
//!
//! Errors are split by domain (configuration, ESI transport, location resolution) and
//! aggregated into [`Error`], which every fallible operation in the crate returns. Conversions
//! use `thiserror`'s `#[from]` so the `?` operator lifts domain errors automatically.

pub mod config;
pub mod esi;
pub mod location;
pub mod retry;

use thiserror::Error;

use crate::error::{config::ConfigError, esi::EsiError};

/// Main error type for Stockpile.
///
/// # Error Categories
/// - Configuration errors (missing/invalid environment variables)
/// - ESI errors (network failures, unexpected statuses, undecodable responses)
/// - Invalid input (requests that can never be encoded for ESI)
/// - Storage errors (reference database, snapshot files)
/// - Scheduler errors
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// ESI request error. Network failures and upstream statuses are retried according to
    /// [`Error::to_retry_strategy`]; decoding failures are never retried.
    #[error(transparent)]
    EsiError(#[from] EsiError),
    /// Malformed request that must not be sent to ESI, such as an oversized ID batch.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Cache snapshot could not be encoded.
    #[error("Failed to encode asset snapshot: {0}")]
    SnapshotEncodeError(#[from] serde_json::Error),
    /// Filesystem error while reading or writing cache snapshots.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// Database error (query failures, connection issues).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
}
