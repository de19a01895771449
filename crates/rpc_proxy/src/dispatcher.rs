// Copyright (C) 2015-2025 The Neo Project.
//
// dispatcher.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Command dispatch against the daemon.
//!
//! Three call shapes share one error translation:
//! a transport fault becomes [`NodeError::NetworkError`], otherwise the embedded
//! [`RpcStatus`] decides between success, [`NodeError::NodeBusy`] and
//! [`NodeError::InternalNodeError`].

use crate::error::{NodeError, NodeResult, TransportError};
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, RpcResponse, RpcStatus, JSON_RPC_PATH};
use crate::transport::{ContentType, Transport, TransportRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Maps a daemon status onto the proxy error space.
pub fn interpret_response_status(status: &RpcStatus) -> NodeResult<()> {
    match status {
        RpcStatus::Ok => Ok(()),
        RpcStatus::Busy => Err(NodeError::NodeBusy),
        RpcStatus::Other(_) => Err(NodeError::InternalNodeError),
    }
}

fn checked<Res: RpcResponse>(response: Res) -> NodeResult<Res> {
    interpret_response_status(response.status()).map(|()| response)
}

/// Binary-encoded request/response against `path`.
pub async fn binary_command<Req, Res>(
    transport: &mut dyn Transport,
    path: &str,
    request: &Req,
) -> NodeResult<Res>
where
    Req: Serialize,
    Res: DeserializeOwned + RpcResponse,
{
    match invoke_binary_command(transport, path, request).await {
        Ok(response) => checked(response),
        Err(err) => {
            debug!(path, error = %err, "binary command failed");
            Err(NodeError::NetworkError)
        }
    }
}

/// JSON-encoded request/response against `path`.
pub async fn json_command<Req, Res>(
    transport: &mut dyn Transport,
    path: &str,
    request: &Req,
) -> NodeResult<Res>
where
    Req: Serialize,
    Res: DeserializeOwned + RpcResponse,
{
    match invoke_json_command(transport, path, request).await {
        Ok(response) => checked(response),
        Err(err) => {
            debug!(path, error = %err, "json command failed");
            Err(NodeError::NetworkError)
        }
    }
}

/// Named-method JSON-RPC call posted to `/json_rpc`.
///
/// The typed result is only extracted from a 200 reply whose envelope parses; anything
/// else the daemon sends back is an internal node error.
pub async fn json_rpc_command<Req, Res>(
    transport: &mut dyn Transport,
    method: &str,
    request: &Req,
) -> NodeResult<Res>
where
    Req: Serialize,
    Res: DeserializeOwned + RpcResponse,
{
    let body = match serde_json::to_vec(&JsonRpcRequest::new(method, request)) {
        Ok(body) => body,
        Err(err) => {
            debug!(method, error = %err, "failed to encode json-rpc request");
            return Err(NodeError::NetworkError);
        }
    };

    let reply = transport
        .request(TransportRequest {
            path: JSON_RPC_PATH.to_string(),
            content_type: ContentType::Json,
            body,
        })
        .await;

    let reply = match reply {
        Ok(reply) => reply,
        Err(err) => {
            debug!(method, error = %err, "json-rpc command failed");
            return Err(NodeError::NetworkError);
        }
    };

    if !reply.is_ok() {
        debug!(method, status = reply.status, "json-rpc call rejected");
        return Err(NodeError::InternalNodeError);
    }

    let envelope: JsonRpcResponse = serde_json::from_slice(&reply.body).map_err(|err| {
        debug!(method, error = %err, "malformed json-rpc envelope");
        NodeError::InternalNodeError
    })?;

    let response: Res = envelope.into_result().ok_or_else(|| {
        debug!(method, "json-rpc envelope carried no usable result");
        NodeError::InternalNodeError
    })?;

    checked(response)
}

async fn invoke_binary_command<Req, Res>(
    transport: &mut dyn Transport,
    path: &str,
    request: &Req,
) -> Result<Res, TransportError>
where
    Req: Serialize,
    Res: DeserializeOwned,
{
    let body = bincode::serialize(request).map_err(|e| TransportError::Encode(e.to_string()))?;
    let reply = transport
        .request(TransportRequest {
            path: path.to_string(),
            content_type: ContentType::Binary,
            body,
        })
        .await?;

    if !reply.is_ok() {
        return Err(TransportError::Status(reply.status));
    }

    Ok(bincode::deserialize(&reply.body)?)
}

async fn invoke_json_command<Req, Res>(
    transport: &mut dyn Transport,
    path: &str,
    request: &Req,
) -> Result<Res, TransportError>
where
    Req: Serialize,
    Res: DeserializeOwned,
{
    let body = serde_json::to_vec(request).map_err(|e| TransportError::Encode(e.to_string()))?;
    let reply = transport
        .request(TransportRequest {
            path: path.to_string(),
            content_type: ContentType::Json,
            body,
        })
        .await?;

    if !reply.is_ok() {
        return Err(TransportError::Status(reply.status));
    }

    Ok(serde_json::from_slice(&reply.body)?)
}
