// Copyright (C) 2015-2025 The Neo Project.
//
// error.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use thiserror::Error;

/// Outcome reported to callers of the node proxy.
///
/// Every asynchronous operation completes with exactly one of these (or success).
/// None of them is fatal; they are all recoverable, caller-visible conditions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeError {
    /// `init` was called while the proxy is initializing or initialized.
    #[error("Node proxy is already initialized")]
    AlreadyInitialized,

    /// An operation was attempted before a successful `init` or after `shutdown`.
    #[error("Node proxy is not initialized")]
    NotInitialized,

    /// The daemon reported that it is busy.
    #[error("Node is busy")]
    NodeBusy,

    /// The transport failed to deliver the request or read the reply.
    #[error("Network error")]
    NetworkError,

    /// The daemon answered with an unexpected status or an unusable envelope.
    #[error("Internal node error")]
    InternalNodeError,

    /// The operation was still queued when the proxy shut down.
    #[error("Operation aborted by shutdown")]
    Aborted,
}

impl NodeError {
    /// Stable numeric code for the error, usable across FFI or log pipelines.
    pub fn code(&self) -> i32 {
        match self {
            Self::NotInitialized => 1,
            Self::AlreadyInitialized => 2,
            Self::NetworkError => 3,
            Self::NodeBusy => 4,
            Self::InternalNodeError => 5,
            Self::Aborted => 6,
        }
    }
}

/// Result type delivered to proxy callbacks.
pub type NodeResult<T> = Result<T, NodeError>;

/// Failure raised by a [`Transport`](crate::Transport) or by payload encoding.
///
/// The command dispatcher folds every variant into [`NodeError::NetworkError`].
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    #[error("Failed to encode request: {0}")]
    Encode(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl From<bincode::Error> for TransportError {
    fn from(err: bincode::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        TransportError::Decode(err.to_string())
    }
}
