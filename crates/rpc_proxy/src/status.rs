// Copyright (C) 2015-2025 The Neo Project.
//
// status.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Node status snapshot and the poller that keeps it current.

use crate::dispatcher::{json_command, json_rpc_command};
use crate::observer::ObserverRegistry;
use crate::protocol::{
    BlockHeaderResponse, GetInfoRequest, GetInfoResponse, GetLastBlockHeaderRequest,
    GetLastBlockHeaderResponse, GET_INFO_PATH, GET_LAST_BLOCK_HEADER_METHOD,
};
use crate::transport::Transport;
use crate::types::Hash;
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Locally cached mirror of the daemon state.
///
/// Best effort: values lag the daemon by up to one poll interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeStatus {
    pub peer_count: usize,
    pub node_height: u64,
    pub network_height: u64,
    pub last_known_block_hash: Hash,
    pub last_local_block_timestamp: u64,
}

/// Atomically swapped [`NodeStatus`].
///
/// The background thread is the only writer; any thread may read. Readers always get a
/// complete record, never a mix of old and new fields.
#[derive(Debug, Default)]
pub struct StatusCell {
    current: ArcSwap<NodeStatus>,
}

impl StatusCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Arc<NodeStatus> {
        self.current.load_full()
    }

    pub fn reset(&self) {
        self.current.store(Arc::new(NodeStatus::default()));
    }

    /// Applies `f` to a copy of the current record and publishes the result.
    pub fn update<F>(&self, f: F) -> Arc<NodeStatus>
    where
        F: FnOnce(&mut NodeStatus),
    {
        let mut next = NodeStatus::clone(&self.current.load());
        f(&mut next);
        let next = Arc::new(next);
        self.current.store(Arc::clone(&next));
        next
    }
}

/// Polls `getlastblockheader` and `/getinfo`, publishing changes.
///
/// Call failures leave the snapshot untouched; the next tick simply tries again.
pub struct StatusPoller {
    status: Arc<StatusCell>,
    observers: Arc<ObserverRegistry>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(status: Arc<StatusCell>, observers: Arc<ObserverRegistry>, interval: Duration) -> Self {
        Self {
            status,
            observers,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One poll: block header first, then peer count.
    pub async fn poll_once(&self, transport: &mut dyn Transport) {
        let header = json_rpc_command::<_, GetLastBlockHeaderResponse>(
            transport,
            GET_LAST_BLOCK_HEADER_METHOD,
            &GetLastBlockHeaderRequest {},
        )
        .await;
        match header {
            Ok(response) => self.apply_block_header(&response.block_header),
            Err(err) => warn!(error = %err, "failed to poll last block header"),
        }

        let info = json_command::<_, GetInfoResponse>(transport, GET_INFO_PATH, &GetInfoRequest {})
            .await;
        match info {
            Ok(response) => {
                let peer_count = usize::try_from(response.peer_count()).unwrap_or(usize::MAX);
                self.apply_peer_count(peer_count);
            }
            Err(err) => warn!(error = %err, "failed to poll node info"),
        }
    }

    fn apply_block_header(&self, header: &BlockHeaderResponse) {
        let block_hash: Hash = match header.hash.parse() {
            Ok(hash) => hash,
            Err(err) => {
                warn!(hash = %header.hash, error = %err, "daemon returned unparsable block hash");
                return;
            }
        };

        if block_hash == self.status.load().last_known_block_hash {
            return;
        }

        let status = self.status.update(|status| {
            status.last_known_block_hash = block_hash;
            status.node_height = header.height;
            status.last_local_block_timestamp = header.timestamp;
            // The daemon exposes no network height; mirror the node height.
            status.network_height = header.height;
        });
        debug!(height = status.node_height, hash = %block_hash, "new top block");

        self.observers
            .last_known_block_height_updated(status.network_height);
        self.observers.local_blockchain_updated(status.node_height);
    }

    fn apply_peer_count(&self, peer_count: usize) {
        if peer_count == self.status.load().peer_count {
            return;
        }

        self.status.update(|status| status.peer_count = peer_count);
        debug!(peer_count, "peer count changed");
        self.observers.peer_count_updated(peer_count);
    }
}
