// Copyright (C) 2015-2025 The Neo Project.
//
// lib.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! CryptoNote Node RPC Proxy
//!
//! Presents a remote daemon as a local, asynchronous [`Node`]. Callers submit operations
//! from any thread and get results through callbacks; a dedicated background thread owns
//! the daemon transport, serializes every RPC call and polls the daemon for height and
//! peer-count changes, notifying registered [`NodeObserver`]s.

pub mod config;
pub mod dispatcher;
mod error;
pub mod lifecycle;
mod node;
pub mod observer;
pub mod protocol;
mod proxy;
pub mod status;
pub mod transport;
pub mod types;
mod worker;

pub use config::{ConfigError, ConnectionTarget, ProxyConfig};
pub use error::{NodeError, NodeResult, TransportError};
pub use lifecycle::LifecycleState;
pub use node::{Callback, Node};
pub use observer::NodeObserver;
pub use protocol::{OutEntry, OutsForAmount, RawBlock, RpcStatus};
pub use proxy::NodeRpcProxy;
pub use status::NodeStatus;
pub use transport::{
    ContentType, HttpTransport, Transport, TransportFactory, TransportRequest, TransportResponse,
};
pub use types::{BlockEntry, Hash, NewBlocks, PoolDifference, PublicKey, QueriedBlocks, Transaction};
