//! Error Types
//!
//! Validation guards fail before any request is made; transport errors
//! come back from the REST collaborator.

use thiserror::Error;

use crate::models::ItemId;

/// Failures of a request to the backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("request to {path} failed: {message}")]
    Request { path: String, message: String },

    #[error("{path} returned HTTP {status}")]
    Status { path: String, status: u16 },

    #[error("could not decode response from {path}: {message}")]
    Decode { path: String, message: String },
}

/// Validation failures caught before any request is sent
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("no items of a compatible type can be added to block {block_id}")]
    NoItemsToAdd { block_id: ItemId },

    #[error("block {block_id} has only {remaining} children left")]
    BlockTooSmall { block_id: ItemId, remaining: usize },

    #[error("nothing selected")]
    EmptySelection,

    #[error("unknown item {0}")]
    UnknownItem(ItemId),

    #[error("item {0} has a request in flight")]
    Busy(ItemId),

    #[error("{action} is not possible while {phase}")]
    WrongPhase { action: &'static str, phase: &'static str },
}

/// Problems reading the page configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("element #{0} not found in page")]
    MissingElement(String),

    #[error("invalid JSON in #{id}: {source}")]
    Json {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type ApiResult<T> = Result<T, ApiError>;
