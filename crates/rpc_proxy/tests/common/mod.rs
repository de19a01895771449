//! Shared test fixtures: an in-memory daemon and callback helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use cryptonote_rpc_proxy::protocol::{GetInfoResponse, GetLastBlockHeaderResponse};
use cryptonote_rpc_proxy::{
    Callback, NodeObserver, NodeResult, ProxyConfig, RpcStatus, Transport, TransportError,
    TransportFactory, TransportRequest, TransportResponse,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

pub const WAIT: Duration = Duration::from_secs(5);

pub const HASH_A: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";
pub const HASH_B: &str = "b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2b2";

/// Canned reply for one path.
#[derive(Clone)]
pub enum Route {
    Body(Vec<u8>),
    Fault,
    /// Signals `entered`, then blocks the worker until `release` fires.
    Hold {
        body: Vec<u8>,
        entered: Sender<()>,
        release: Arc<Mutex<Option<Receiver<()>>>>,
    },
}

/// In-memory daemon shared by every transport the factory hands out.
#[derive(Default)]
pub struct Daemon {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<TransportRequest>>,
    bindings: AtomicUsize,
    fail_binding: Mutex<bool>,
}

impl Daemon {
    /// Daemon at height 100 (hash A) with 3 peers.
    pub fn new() -> Arc<Self> {
        let daemon = Arc::new(Daemon::default());
        daemon.set_top_block(HASH_A, 100, 1_500_000_000);
        daemon.set_peers(1, 2);
        daemon
    }

    pub fn route(&self, path: &str, route: Route) {
        self.routes.lock().insert(path.to_string(), route);
    }

    pub fn json<T: Serialize>(&self, path: &str, body: &T) {
        self.route(path, Route::Body(serde_json::to_vec(body).expect("json")));
    }

    pub fn binary<T: Serialize>(&self, path: &str, body: &T) {
        self.route(path, Route::Body(bincode::serialize(body).expect("bincode")));
    }

    pub fn set_top_block(&self, hash: &str, height: u64, timestamp: u64) {
        let mut response = GetLastBlockHeaderResponse {
            status: RpcStatus::Ok,
            ..Default::default()
        };
        response.block_header.hash = hash.to_string();
        response.block_header.height = height;
        response.block_header.timestamp = timestamp;
        let envelope = serde_json::json!({ "jsonrpc": "2.0", "id": 0, "result": response });
        self.json("/json_rpc", &envelope);
    }

    pub fn set_peers(&self, incoming: u64, outgoing: u64) {
        self.json(
            "/getinfo",
            &GetInfoResponse {
                status: RpcStatus::Ok,
                incoming_connections_count: incoming,
                outgoing_connections_count: outgoing,
                ..Default::default()
            },
        );
    }

    pub fn fail_binding(&self) {
        *self.fail_binding.lock() = true;
    }

    pub fn bindings(&self) -> usize {
        self.bindings.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<TransportRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn factory(self: &Arc<Self>) -> TransportFactory {
        let daemon = Arc::clone(self);
        Arc::new(move |_config: &ProxyConfig| {
            daemon.bindings.fetch_add(1, Ordering::SeqCst);
            if *daemon.fail_binding.lock() {
                return Err(TransportError::Connection("refused".to_string()));
            }
            Ok(Box::new(ScriptedTransport {
                daemon: Arc::clone(&daemon),
            }) as Box<dyn Transport>)
        })
    }
}

struct ScriptedTransport {
    daemon: Arc<Daemon>,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &mut self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let route = self.daemon.routes.lock().get(&request.path).cloned();
        self.daemon.requests.lock().push(request.clone());

        match route {
            Some(Route::Body(body)) => Ok(TransportResponse::ok(body)),
            Some(Route::Hold {
                body,
                entered,
                release,
            }) => {
                let _ = entered.send(());
                let release = release.lock().take();
                if let Some(release) = release {
                    let _ = release.recv_timeout(WAIT);
                }
                Ok(TransportResponse::ok(body))
            }
            Some(Route::Fault) => Err(TransportError::Connection("connection reset".to_string())),
            None => Ok(TransportResponse {
                status: 404,
                body: Vec::new(),
            }),
        }
    }
}

/// Proxy config with a poll interval long enough that only the first poll runs.
pub fn quiet_config() -> ProxyConfig {
    ProxyConfig {
        poll_interval_ms: 60_000,
        ..ProxyConfig::new("127.0.0.1", 18081)
    }
}

/// Boxed callback forwarding its result into a channel.
pub fn callback<T: Send + 'static>() -> (Callback<T>, Receiver<NodeResult<T>>) {
    let (tx, rx) = mpsc::channel();
    let callback: Callback<T> = Box::new(move |result| {
        let _ = tx.send(result);
    });
    (callback, rx)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Peers(usize),
    KnownHeight(u64),
    LocalHeight(u64),
}

/// Observer forwarding every notification into a channel.
pub struct ChannelObserver {
    tx: Mutex<Sender<Event>>,
}

impl ChannelObserver {
    pub fn new() -> (Arc<dyn NodeObserver>, Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let observer: Arc<dyn NodeObserver> = Arc::new(ChannelObserver { tx: Mutex::new(tx) });
        (observer, rx)
    }

    fn send(&self, event: Event) {
        let _ = self.tx.lock().send(event);
    }
}

impl NodeObserver for ChannelObserver {
    fn peer_count_updated(&self, count: usize) {
        self.send(Event::Peers(count));
    }

    fn last_known_block_height_updated(&self, height: u64) {
        self.send(Event::KnownHeight(height));
    }

    fn local_blockchain_updated(&self, height: u64) {
        self.send(Event::LocalHeight(height));
    }
}
