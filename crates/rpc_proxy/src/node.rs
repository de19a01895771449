// Copyright (C) 2015-2025 The Neo Project.
//
// node.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::error::NodeResult;
use crate::observer::NodeObserver;
use crate::protocol::OutsForAmount;
use crate::types::{Hash, NewBlocks, PoolDifference, QueriedBlocks, Transaction};
use std::sync::Arc;

/// Completion handler for an asynchronous node operation.
pub type Callback<T> = Box<dyn FnOnce(NodeResult<T>) + Send + 'static>;

/// Asynchronous view of a blockchain node.
///
/// Operations never block the caller. Results arrive through the callback, which for
/// queued operations runs on the node's background thread.
pub trait Node: Send + Sync {
    /// Starts the node. The callback reports whether the node came up.
    fn init(&self, callback: Callback<()>);

    /// Stops the node and waits for its background thread. Returns `false` if the node
    /// was not initialized.
    fn shutdown(&self) -> bool;

    fn add_observer(&self, observer: &Arc<dyn NodeObserver>) -> bool;
    fn remove_observer(&self, observer: &Arc<dyn NodeObserver>) -> bool;

    fn get_peer_count(&self) -> usize;
    fn get_last_local_block_height(&self) -> u64;
    fn get_last_known_block_height(&self) -> u64;
    fn get_local_block_count(&self) -> u64;
    fn get_known_block_count(&self) -> u64;
    fn get_last_local_block_timestamp(&self) -> u64;

    fn relay_transaction(&self, transaction: Transaction, callback: Callback<()>);

    fn get_random_outs_by_amounts(
        &self,
        amounts: Vec<u64>,
        outs_count: u64,
        callback: Callback<Vec<OutsForAmount>>,
    );

    /// `known_block_ids` lists known block ids, newest first, ending with genesis.
    fn get_new_blocks(&self, known_block_ids: Vec<Hash>, callback: Callback<NewBlocks>);

    fn get_transaction_outs_global_indices(
        &self,
        transaction_hash: Hash,
        callback: Callback<Vec<u64>>,
    );

    fn query_blocks(
        &self,
        known_block_ids: Vec<Hash>,
        timestamp: u64,
        callback: Callback<QueriedBlocks>,
    );

    fn get_pool_symmetric_difference(
        &self,
        known_pool_tx_ids: Vec<Hash>,
        known_block_id: Hash,
        callback: Callback<PoolDifference>,
    );
}
