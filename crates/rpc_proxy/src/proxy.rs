// Copyright (C) 2015-2025 The Neo Project.
//
// proxy.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::config::ProxyConfig;
use crate::error::NodeError;
use crate::lifecycle::{InitState, LifecycleState};
use crate::node::{Callback, Node};
use crate::observer::{NodeObserver, ObserverRegistry};
use crate::protocol::OutsForAmount;
use crate::status::{NodeStatus, StatusCell, StatusPoller};
use crate::transport::{HttpTransport, TransportFactory};
use crate::types::{Hash, NewBlocks, PoolDifference, QueriedBlocks, Transaction};
use crate::worker::{PendingOperation, Worker};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

struct WorkerHandle {
    stop: watch::Sender<bool>,
    thread: JoinHandle<()>,
}

/// [`Node`] backed by a remote daemon.
///
/// `init` starts a background thread that owns the daemon transport, polls the daemon
/// status and runs queued operations. Queued operations complete on that thread; if the
/// proxy shuts down before one starts, its callback receives [`NodeError::Aborted`].
///
/// `shutdown` must not be called from a callback or observer (it would have to join its
/// own thread); such calls return `false`.
pub struct NodeRpcProxy {
    config: ProxyConfig,
    factory: TransportFactory,
    state: Arc<InitState>,
    status: Arc<StatusCell>,
    observers: Arc<ObserverRegistry>,
    queue: Mutex<Option<mpsc::UnboundedSender<PendingOperation>>>,
    worker: Mutex<Option<WorkerHandle>>,
}

impl NodeRpcProxy {
    /// Proxy for the daemon at `host:port` with the default timeout and poll interval.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(ProxyConfig::new(host, port))
    }

    pub fn with_config(config: ProxyConfig) -> Self {
        Self::with_transport_factory(config, HttpTransport::factory())
    }

    /// Proxy whose transport is built by `factory` on the background thread.
    ///
    /// Zero timings in `config` are replaced by their defaults.
    pub fn with_transport_factory(config: ProxyConfig, factory: TransportFactory) -> Self {
        if let Err(err) = config.validate() {
            warn!(error = %err, "node proxy config failed validation");
        }
        Self {
            config: config.with_default_timings(),
            factory,
            state: Arc::new(InitState::new()),
            status: Arc::new(StatusCell::new()),
            observers: Arc::new(ObserverRegistry::new()),
            queue: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.state.state()
    }

    /// Current status snapshot.
    pub fn status(&self) -> Arc<NodeStatus> {
        self.status.load()
    }

    fn on_worker_thread(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .map(|worker| worker.thread.thread().id() == thread::current().id())
            .unwrap_or(false)
    }

    fn enqueue(&self, operation: PendingOperation) {
        if !self.state.initialized() {
            operation.abort(NodeError::NotInitialized);
            return;
        }

        let sender = self.queue.lock().clone();
        match sender {
            Some(sender) => {
                if let Err(mpsc::error::SendError(operation)) = sender.send(operation) {
                    debug!(operation = operation.name(), "worker gone, aborting operation");
                    operation.abort(NodeError::Aborted);
                }
            }
            None => operation.abort(NodeError::NotInitialized),
        }
    }
}

impl Node for NodeRpcProxy {
    fn init(&self, callback: Callback<()>) {
        if !self.state.begin_init() {
            callback(Err(NodeError::AlreadyInitialized));
            return;
        }

        self.status.reset();

        // Held until the handle is stored so a racing shutdown always finds it.
        let mut worker_slot = self.worker.lock();
        if let Some(previous) = worker_slot.take() {
            // Left behind by a worker that failed to start. Retrying from its own init
            // callback leaves it detached instead of joining itself.
            if previous.thread.thread().id() != thread::current().id() {
                let _ = previous.thread.join();
            }
        }

        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        *self.queue.lock() = Some(queue_tx);

        let worker = Worker {
            config: self.config.clone(),
            factory: Arc::clone(&self.factory),
            state: Arc::clone(&self.state),
            poller: StatusPoller::new(
                Arc::clone(&self.status),
                Arc::clone(&self.observers),
                self.config.poll_interval(),
            ),
            queue: queue_rx,
            stop: stop_rx,
        };

        // The callback travels with the worker but must survive a failed spawn.
        let pending = Arc::new(Mutex::new(Some(callback)));
        let worker_callback = Arc::clone(&pending);

        let spawned = thread::Builder::new()
            .name("node-rpc-proxy".to_string())
            .spawn(move || {
                if let Some(callback) = worker_callback.lock().take() {
                    worker.run(callback);
                }
            });

        match spawned {
            Ok(thread) => {
                info!(daemon = %self.config.target(), "node proxy worker started");
                *worker_slot = Some(WorkerHandle {
                    stop: stop_tx,
                    thread,
                });
            }
            Err(err) => {
                error!(error = %err, "failed to spawn node proxy worker");
                self.queue.lock().take();
                self.state.abort_init();
                if let Some(callback) = pending.lock().take() {
                    callback(Err(NodeError::NetworkError));
                }
            }
        }
    }

    fn shutdown(&self) -> bool {
        if self.on_worker_thread() {
            warn!("shutdown requested from the node proxy worker thread, ignoring");
            return false;
        }

        if !self.state.begin_shutdown() {
            return false;
        }

        let worker = self.worker.lock().take();
        if let Some(WorkerHandle { stop, thread }) = worker {
            // The receiver is gone if the worker already exited.
            let _ = stop.send(true);
            if thread.join().is_err() {
                error!("node proxy worker panicked");
            }
        }

        self.queue.lock().take();
        self.state.end_shutdown();
        info!("node proxy shut down");
        true
    }

    fn add_observer(&self, observer: &Arc<dyn NodeObserver>) -> bool {
        self.observers.add(observer)
    }

    fn remove_observer(&self, observer: &Arc<dyn NodeObserver>) -> bool {
        self.observers.remove(observer)
    }

    fn get_peer_count(&self) -> usize {
        self.status.load().peer_count
    }

    fn get_last_local_block_height(&self) -> u64 {
        self.status.load().node_height
    }

    fn get_last_known_block_height(&self) -> u64 {
        self.status.load().network_height
    }

    fn get_local_block_count(&self) -> u64 {
        self.status.load().node_height
    }

    fn get_known_block_count(&self) -> u64 {
        self.status.load().network_height
    }

    fn get_last_local_block_timestamp(&self) -> u64 {
        self.status.load().last_local_block_timestamp
    }

    fn relay_transaction(&self, transaction: Transaction, callback: Callback<()>) {
        self.enqueue(PendingOperation::RelayTransaction {
            transaction,
            callback,
        });
    }

    fn get_random_outs_by_amounts(
        &self,
        amounts: Vec<u64>,
        outs_count: u64,
        callback: Callback<Vec<OutsForAmount>>,
    ) {
        self.enqueue(PendingOperation::GetRandomOuts {
            amounts,
            outs_count,
            callback,
        });
    }

    fn get_new_blocks(&self, known_block_ids: Vec<Hash>, callback: Callback<NewBlocks>) {
        self.enqueue(PendingOperation::GetNewBlocks {
            known_block_ids,
            callback,
        });
    }

    fn get_transaction_outs_global_indices(
        &self,
        transaction_hash: Hash,
        callback: Callback<Vec<u64>>,
    ) {
        self.enqueue(PendingOperation::GetOutsGlobalIndices {
            transaction_hash,
            callback,
        });
    }

    fn query_blocks(
        &self,
        known_block_ids: Vec<Hash>,
        timestamp: u64,
        callback: Callback<QueriedBlocks>,
    ) {
        self.enqueue(PendingOperation::QueryBlocks {
            known_block_ids,
            timestamp,
            callback,
        });
    }

    // TODO: ask the daemon for the pool difference once it exposes an endpoint for it.
    fn get_pool_symmetric_difference(
        &self,
        _known_pool_tx_ids: Vec<Hash>,
        _known_block_id: Hash,
        callback: Callback<PoolDifference>,
    ) {
        callback(Ok(PoolDifference {
            is_blockchain_actual: true,
            new_txs: Vec::new(),
            deleted_tx_ids: Vec::new(),
        }));
    }
}

impl Drop for NodeRpcProxy {
    fn drop(&mut self) {
        self.shutdown();
    }
}
