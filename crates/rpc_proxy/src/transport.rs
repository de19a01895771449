// Copyright (C) 2015-2025 The Neo Project.
//
// transport.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use crate::config::{ConnectionTarget, ProxyConfig};
use crate::error::TransportError;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Encoding of a request body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Binary,
    Json,
}

impl ContentType {
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Binary => "application/octet-stream",
            ContentType::Json => "application/json",
        }
    }
}

/// One request against the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    pub path: String,
    pub content_type: ContentType,
    pub body: Vec<u8>,
}

/// Raw daemon reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub const STATUS_OK: u16 = 200;

    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: Self::STATUS_OK,
            body,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }
}

/// Request/response channel to the daemon.
///
/// A transport is created, used and dropped on the proxy's background thread only, so
/// implementations need to be `Send` but never `Sync`.
#[async_trait]
pub trait Transport: Send {
    async fn request(
        &mut self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError>;
}

/// Builds the transport for a given configuration. Invoked on the background thread at
/// every `init`.
pub type TransportFactory =
    Arc<dyn Fn(&ProxyConfig) -> Result<Box<dyn Transport>, TransportError> + Send + Sync>;

/// HTTP transport backed by `reqwest`
pub struct HttpTransport {
    base_address: String,
    http_client: Client,
}

impl HttpTransport {
    pub fn new(target: &ConnectionTarget, timeout: Duration) -> Result<Self, TransportError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_address: target.base_url(),
            http_client,
        })
    }

    /// Factory used by [`NodeRpcProxy::new`](crate::NodeRpcProxy::new).
    pub fn factory() -> TransportFactory {
        Arc::new(|config: &ProxyConfig| {
            let transport = HttpTransport::new(&config.target(), config.rpc_timeout())?;
            Ok(Box::new(transport) as Box<dyn Transport>)
        })
    }

    pub fn base_address(&self) -> &str {
        &self.base_address
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &mut self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = format!("{}{}", self.base_address, request.path);
        trace!(%url, bytes = request.body.len(), "posting daemon request");

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, request.content_type.mime())
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(TransportResponse { status, body })
    }
}
