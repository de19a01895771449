// Copyright (C) 2015-2025 The Neo Project.
//
// protocol.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Daemon RPC payloads.
//!
//! Request/response records for each daemon endpoint the proxy consumes. The proxy
//! fills requests and reads responses; it does not interpret block or transaction bytes.

use crate::types::{Hash, PublicKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status string for a successful call
pub const CORE_RPC_STATUS_OK: &str = "OK";
/// Status string the daemon sends while it cannot serve requests
pub const CORE_RPC_STATUS_BUSY: &str = "BUSY";

/// JSON-RPC endpoint path
pub const JSON_RPC_PATH: &str = "/json_rpc";
pub const GET_INFO_PATH: &str = "/getinfo";
pub const SEND_RAW_TX_PATH: &str = "/sendrawtransaction";
pub const GET_RANDOM_OUTS_PATH: &str = "/getrandom_outs.bin";
pub const GET_BLOCKS_PATH: &str = "/getblocks.bin";
pub const GET_O_INDEXES_PATH: &str = "/get_o_indexes.bin";
pub const QUERY_BLOCKS_PATH: &str = "/queryblocks.bin";

/// JSON-RPC method returning the top block header
pub const GET_LAST_BLOCK_HEADER_METHOD: &str = "getlastblockheader";

/// Application-level status embedded in every daemon response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RpcStatus {
    Ok,
    Busy,
    Other(String),
}

impl Default for RpcStatus {
    fn default() -> Self {
        RpcStatus::Other(String::new())
    }
}

impl From<String> for RpcStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            CORE_RPC_STATUS_OK => RpcStatus::Ok,
            CORE_RPC_STATUS_BUSY => RpcStatus::Busy,
            _ => RpcStatus::Other(value),
        }
    }
}

impl From<&str> for RpcStatus {
    fn from(value: &str) -> Self {
        RpcStatus::from(value.to_string())
    }
}

impl From<RpcStatus> for String {
    fn from(status: RpcStatus) -> Self {
        match status {
            RpcStatus::Ok => CORE_RPC_STATUS_OK.to_string(),
            RpcStatus::Busy => CORE_RPC_STATUS_BUSY.to_string(),
            RpcStatus::Other(value) => value,
        }
    }
}

/// A daemon response carrying an application-level status.
pub trait RpcResponse {
    fn status(&self) -> &RpcStatus;
}

macro_rules! rpc_response {
    ($($response:ty),* $(,)?) => {
        $(
            impl RpcResponse for $response {
                fn status(&self) -> &RpcStatus {
                    &self.status
                }
            }
        )*
    };
}

// getlastblockheader

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLastBlockHeaderRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeaderResponse {
    #[serde(default)]
    pub major_version: u8,
    #[serde(default)]
    pub minor_version: u8,
    pub timestamp: u64,
    #[serde(default)]
    pub prev_hash: String,
    #[serde(default)]
    pub nonce: u32,
    #[serde(default)]
    pub orphan_status: bool,
    pub height: u64,
    #[serde(default)]
    pub depth: u64,
    /// Hex block id; parsed by the poller
    pub hash: String,
    #[serde(default)]
    pub difficulty: u64,
    #[serde(default)]
    pub reward: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetLastBlockHeaderResponse {
    pub block_header: BlockHeaderResponse,
    pub status: RpcStatus,
}

// /getinfo

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInfoRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetInfoResponse {
    pub status: RpcStatus,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub difficulty: u64,
    #[serde(default)]
    pub tx_count: u64,
    #[serde(default)]
    pub tx_pool_size: u64,
    #[serde(default)]
    pub alt_blocks_count: u64,
    #[serde(default)]
    pub outgoing_connections_count: u64,
    #[serde(default)]
    pub incoming_connections_count: u64,
    #[serde(default)]
    pub white_peerlist_size: u64,
    #[serde(default)]
    pub grey_peerlist_size: u64,
}

impl GetInfoResponse {
    /// Incoming plus outgoing connections, saturating on out-of-range counters.
    pub fn peer_count(&self) -> u64 {
        self.incoming_connections_count
            .saturating_add(self.outgoing_connections_count)
    }
}

// /sendrawtransaction

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRawTxRequest {
    pub tx_as_hex: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRawTxResponse {
    pub status: RpcStatus,
}

// /getrandom_outs.bin

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRandomOutsRequest {
    pub amounts: Vec<u64>,
    pub outs_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutEntry {
    pub global_amount_index: u64,
    pub out_key: PublicKey,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutsForAmount {
    pub amount: u64,
    pub outs: Vec<OutEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetRandomOutsResponse {
    pub outs: Vec<OutsForAmount>,
    pub status: RpcStatus,
}

// /getblocks.bin

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksFastRequest {
    /// Known ids, newest first, ending with genesis
    pub block_ids: Vec<Hash>,
}

/// Serialized block plus its serialized transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBlock {
    pub block: Vec<u8>,
    pub txs: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBlocksFastResponse {
    pub blocks: Vec<RawBlock>,
    pub start_height: u64,
    pub current_height: u64,
    pub status: RpcStatus,
}

// /get_o_indexes.bin

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTxGlobalIndexesRequest {
    pub txid: Hash,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetTxGlobalIndexesResponse {
    pub o_indexes: Vec<u64>,
    pub status: RpcStatus,
}

// /queryblocks.bin

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBlocksRequest {
    pub block_ids: Vec<Hash>,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockFullInfo {
    pub block_id: Hash,
    pub block: Vec<u8>,
    pub txs: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryBlocksResponse {
    pub start_height: u64,
    pub current_height: u64,
    pub full_offset: u64,
    pub items: Vec<BlockFullInfo>,
    pub status: RpcStatus,
}

rpc_response!(
    GetLastBlockHeaderResponse,
    GetInfoResponse,
    SendRawTxResponse,
    GetRandomOutsResponse,
    GetBlocksFastResponse,
    GetTxGlobalIndexesResponse,
    QueryBlocksResponse,
);

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a P,
}

impl<'a, P: Serialize> JsonRpcRequest<'a, P> {
    pub fn new(method: &'a str, params: &'a P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 0,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    /// Typed result, or `None` when the envelope carries an error or no usable result.
    pub fn into_result<T: serde::de::DeserializeOwned>(self) -> Option<T> {
        if self.error.is_some() {
            return None;
        }
        self.result.and_then(|value| serde_json::from_value(value).ok())
    }
}
