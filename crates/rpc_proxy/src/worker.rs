// Copyright (C) 2015-2025 The Neo Project.
//
// worker.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Background execution context.
//!
//! One OS thread runs a current-thread tokio runtime. It owns the transport, runs the
//! status poll timer and executes queued operations one at a time.

use crate::config::ProxyConfig;
use crate::dispatcher::{binary_command, json_command};
use crate::error::NodeError;
use crate::lifecycle::InitState;
use crate::node::Callback;
use crate::protocol::{
    GetBlocksFastRequest, GetBlocksFastResponse, GetRandomOutsRequest, GetRandomOutsResponse,
    GetTxGlobalIndexesRequest, GetTxGlobalIndexesResponse, OutsForAmount, QueryBlocksRequest,
    QueryBlocksResponse, SendRawTxRequest, SendRawTxResponse, GET_BLOCKS_PATH,
    GET_O_INDEXES_PATH, GET_RANDOM_OUTS_PATH, QUERY_BLOCKS_PATH, SEND_RAW_TX_PATH,
};
use crate::status::StatusPoller;
use crate::transport::{Transport, TransportFactory};
use crate::types::{BlockEntry, Hash, NewBlocks, QueriedBlocks, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

/// Operation waiting for the background thread.
pub(crate) enum PendingOperation {
    RelayTransaction {
        transaction: Transaction,
        callback: Callback<()>,
    },
    GetRandomOuts {
        amounts: Vec<u64>,
        outs_count: u64,
        callback: Callback<Vec<OutsForAmount>>,
    },
    GetNewBlocks {
        known_block_ids: Vec<Hash>,
        callback: Callback<NewBlocks>,
    },
    GetOutsGlobalIndices {
        transaction_hash: Hash,
        callback: Callback<Vec<u64>>,
    },
    QueryBlocks {
        known_block_ids: Vec<Hash>,
        timestamp: u64,
        callback: Callback<QueriedBlocks>,
    },
}

impl PendingOperation {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            PendingOperation::RelayTransaction { .. } => "relay_transaction",
            PendingOperation::GetRandomOuts { .. } => "get_random_outs_by_amounts",
            PendingOperation::GetNewBlocks { .. } => "get_new_blocks",
            PendingOperation::GetOutsGlobalIndices { .. } => "get_transaction_outs_global_indices",
            PendingOperation::QueryBlocks { .. } => "query_blocks",
        }
    }

    /// Completes the operation with `error` without touching the transport.
    pub(crate) fn abort(self, error: NodeError) {
        match self {
            PendingOperation::RelayTransaction { callback, .. } => callback(Err(error)),
            PendingOperation::GetRandomOuts { callback, .. } => callback(Err(error)),
            PendingOperation::GetNewBlocks { callback, .. } => callback(Err(error)),
            PendingOperation::GetOutsGlobalIndices { callback, .. } => callback(Err(error)),
            PendingOperation::QueryBlocks { callback, .. } => callback(Err(error)),
        }
    }

    /// Runs the daemon call and hands the outcome to the callback.
    pub(crate) async fn execute(self, transport: &mut dyn Transport) {
        let name = self.name();
        debug!(operation = name, "executing queued operation");

        match self {
            PendingOperation::RelayTransaction {
                transaction,
                callback,
            } => {
                let request = SendRawTxRequest {
                    tx_as_hex: transaction.to_hex(),
                };
                let result =
                    json_command::<_, SendRawTxResponse>(transport, SEND_RAW_TX_PATH, &request)
                        .await
                        .map(|_| ());
                log_outcome(name, &result);
                callback(result);
            }
            PendingOperation::GetRandomOuts {
                amounts,
                outs_count,
                callback,
            } => {
                let request = GetRandomOutsRequest {
                    amounts,
                    outs_count,
                };
                let result = binary_command::<_, GetRandomOutsResponse>(
                    transport,
                    GET_RANDOM_OUTS_PATH,
                    &request,
                )
                .await
                .map(|response| response.outs);
                log_outcome(name, &result);
                callback(result);
            }
            PendingOperation::GetNewBlocks {
                known_block_ids,
                callback,
            } => {
                let request = GetBlocksFastRequest {
                    block_ids: known_block_ids,
                };
                let result =
                    binary_command::<_, GetBlocksFastResponse>(transport, GET_BLOCKS_PATH, &request)
                        .await
                        .map(|response| NewBlocks {
                            blocks: response.blocks,
                            start_height: response.start_height,
                        });
                log_outcome(name, &result);
                callback(result);
            }
            PendingOperation::GetOutsGlobalIndices {
                transaction_hash,
                callback,
            } => {
                let request = GetTxGlobalIndexesRequest {
                    txid: transaction_hash,
                };
                let result = binary_command::<_, GetTxGlobalIndexesResponse>(
                    transport,
                    GET_O_INDEXES_PATH,
                    &request,
                )
                .await
                .map(|response| response.o_indexes);
                log_outcome(name, &result);
                callback(result);
            }
            PendingOperation::QueryBlocks {
                known_block_ids,
                timestamp,
                callback,
            } => {
                let request = QueryBlocksRequest {
                    block_ids: known_block_ids,
                    timestamp,
                };
                let result =
                    binary_command::<_, QueryBlocksResponse>(transport, QUERY_BLOCKS_PATH, &request)
                        .await
                        .map(|response| QueriedBlocks {
                            blocks: response
                                .items
                                .into_iter()
                                .map(|item| BlockEntry {
                                    block_hash: item.block_id,
                                    block: item.block,
                                    txs: item.txs,
                                })
                                .collect(),
                            start_height: response.start_height,
                        });
                log_outcome(name, &result);
                callback(result);
            }
        }
    }
}

fn log_outcome<T>(operation: &'static str, result: &Result<T, NodeError>) {
    match result {
        Ok(_) => debug!(operation, "operation completed"),
        Err(err) => debug!(operation, error = %err, "operation failed"),
    }
}

/// State moved onto the background thread at `init`.
pub(crate) struct Worker {
    pub(crate) config: ProxyConfig,
    pub(crate) factory: TransportFactory,
    pub(crate) state: Arc<InitState>,
    pub(crate) poller: StatusPoller,
    pub(crate) queue: mpsc::UnboundedReceiver<PendingOperation>,
    pub(crate) stop: watch::Receiver<bool>,
}

impl Worker {
    /// Thread entry point. Returns once the loop has stopped and the queue is drained.
    pub(crate) fn run(self, init_callback: Callback<()>) {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                error!(error = %err, "failed to start node proxy runtime");
                self.state.abort_init();
                init_callback(Err(NodeError::NetworkError));
                return;
            }
        };

        runtime.block_on(self.run_loop(init_callback));
    }

    async fn run_loop(self, init_callback: Callback<()>) {
        let Worker {
            config,
            factory,
            state,
            poller,
            mut queue,
            mut stop,
        } = self;

        let mut transport = match factory(&config) {
            Ok(transport) => transport,
            Err(err) => {
                warn!(daemon = %config.target(), error = %err, "failed to bind daemon transport");
                state.abort_init();
                init_callback(Err(NodeError::NetworkError));
                return;
            }
        };

        if !state.end_init() {
            warn!(state = %state.state(), "lifecycle changed during init");
            init_callback(Err(NodeError::NotInitialized));
            return;
        }

        info!(daemon = %config.target(), "node proxy initialized");
        init_callback(Ok(()));

        // The first poll fires right away, then every interval after the previous one.
        let next_poll = sleep(Duration::ZERO);
        tokio::pin!(next_poll);

        loop {
            tokio::select! {
                biased;

                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
                () = &mut next_poll => {
                    poller.poll_once(transport.as_mut()).await;
                    // A stop issued while the poll was in flight cancels the next tick.
                    if *stop.borrow() {
                        break;
                    }
                    next_poll.as_mut().reset(Instant::now() + poller.interval());
                }
                operation = queue.recv() => match operation {
                    Some(operation) => operation.execute(transport.as_mut()).await,
                    None => break,
                },
            }
        }

        queue.close();
        let mut aborted = 0usize;
        while let Ok(operation) = queue.try_recv() {
            operation.abort(NodeError::Aborted);
            aborted += 1;
        }

        drop(transport);
        info!(aborted, "node proxy worker stopped");
    }
}
