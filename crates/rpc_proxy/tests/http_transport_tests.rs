//! HTTP transport and end-to-end proxy checks against a local mock daemon.

mod common;

use common::{callback, ChannelObserver, Event, WAIT};
use cryptonote_rpc_proxy::protocol::{GetTxGlobalIndexesResponse, RpcStatus};
use cryptonote_rpc_proxy::{
    ConnectionTarget, ContentType, Hash, HttpTransport, Node, NodeError, NodeRpcProxy,
    ProxyConfig, Transaction, Transport, TransportRequest,
};
use mockito::{Matcher, Server};
use std::net::TcpListener;
use std::time::Duration;

fn localhost_binding_permitted() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

fn target_of(server: &Server) -> ConnectionTarget {
    let address = server.host_with_port();
    let (host, port) = address.rsplit_once(':').expect("host:port");
    ConnectionTarget::new(host.to_string(), port.parse().expect("port"))
}

#[tokio::test]
async fn posts_json_body_with_content_type() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/sendrawtransaction")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Regex(r#""tx_as_hex"\s*:\s*"00ff""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"OK"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut transport =
        HttpTransport::new(&target_of(&server), Duration::from_secs(2)).expect("transport");
    assert_eq!(transport.base_address(), server.url());

    let response = transport
        .request(TransportRequest {
            path: "/sendrawtransaction".to_string(),
            content_type: ContentType::Json,
            body: br#"{"tx_as_hex":"00ff"}"#.to_vec(),
        })
        .await
        .expect("response");

    assert!(response.is_ok());
    assert_eq!(response.body, br#"{"status":"OK"}"#.to_vec());
    mock.assert_async().await;
}

#[tokio::test]
async fn passes_non_success_status_through() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/getblocks.bin")
        .match_header("content-type", "application/octet-stream")
        .with_status(503)
        .with_body("busy")
        .create_async()
        .await;

    let mut transport =
        HttpTransport::new(&target_of(&server), Duration::from_secs(2)).expect("transport");
    let response = transport
        .request(TransportRequest {
            path: "/getblocks.bin".to_string(),
            content_type: ContentType::Binary,
            body: vec![1, 2, 3],
        })
        .await
        .expect("response");

    assert_eq!(response.status, 503);
    assert!(!response.is_ok());
    assert_eq!(response.body, b"busy".to_vec());
}

#[tokio::test]
async fn unreachable_daemon_is_a_transport_error() {
    if !localhost_binding_permitted() {
        return;
    }
    // Bind and release a port so nothing is listening on it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let mut transport = HttpTransport::new(
        &ConnectionTarget::new("127.0.0.1", port),
        Duration::from_secs(2),
    )
    .expect("transport");

    let result = transport
        .request(TransportRequest {
            path: "/getinfo".to_string(),
            content_type: ContentType::Json,
            body: b"{}".to_vec(),
        })
        .await;
    assert!(result.is_err());
}

#[test]
fn proxy_talks_to_http_daemon() {
    if !localhost_binding_permitted() {
        return;
    }
    let mut server = Server::new();
    let hash = "c3".repeat(32);
    let _header = server
        .mock("POST", "/json_rpc")
        .match_body(Matcher::Regex(r#""method"\s*:\s*"getlastblockheader""#.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(
            r#"{{"jsonrpc":"2.0","id":0,"result":{{"status":"OK","block_header":{{"major_version":1,"minor_version":0,"timestamp":1700000000,"prev_hash":"","nonce":0,"orphan_status":false,"height":512,"depth":0,"hash":"{hash}","difficulty":1,"reward":0}}}}}}"#
        ))
        .create();
    let _info = server
        .mock("POST", "/getinfo")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status":"OK","incoming_connections_count":2,"outgoing_connections_count":6}"#)
        .create();
    let _relay = server
        .mock("POST", "/sendrawtransaction")
        .with_status(200)
        .with_body(r#"{"status":"BUSY"}"#)
        .create();
    let indexes = bincode::serialize(&GetTxGlobalIndexesResponse {
        o_indexes: vec![3, 1, 4],
        status: RpcStatus::Ok,
    })
    .expect("bincode");
    let _indexes = server
        .mock("POST", "/get_o_indexes.bin")
        .match_header("content-type", "application/octet-stream")
        .with_status(200)
        .with_body(indexes)
        .create();

    let target = target_of(&server);
    let config = ProxyConfig {
        poll_interval_ms: 60_000,
        ..ProxyConfig::new(target.host(), target.port())
    };
    let proxy = NodeRpcProxy::with_config(config);
    let (observer, events) = ChannelObserver::new();
    proxy.add_observer(&observer);

    let (init, init_rx) = callback();
    proxy.init(init);
    assert_eq!(init_rx.recv_timeout(WAIT).expect("init"), Ok(()));

    assert_eq!(events.recv_timeout(WAIT).expect("known"), Event::KnownHeight(512));
    assert_eq!(events.recv_timeout(WAIT).expect("local"), Event::LocalHeight(512));
    assert_eq!(events.recv_timeout(WAIT).expect("peers"), Event::Peers(8));
    assert_eq!(proxy.get_last_local_block_timestamp(), 1_700_000_000);
    assert_eq!(proxy.status().last_known_block_hash, hash.parse::<Hash>().unwrap());

    let (relay, relay_rx) = callback();
    proxy.relay_transaction(Transaction::from_blob(vec![9]), relay);
    assert_eq!(relay_rx.recv_timeout(WAIT).expect("relay"), Err(NodeError::NodeBusy));

    let (indices, indices_rx) = callback();
    proxy.get_transaction_outs_global_indices(Hash::NULL, indices);
    assert_eq!(indices_rx.recv_timeout(WAIT).expect("indices"), Ok(vec![3, 1, 4]));

    assert!(proxy.shutdown());
}
