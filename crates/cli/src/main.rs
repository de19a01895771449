// Copyright (C) 2015-2025 The Neo Project.
//
// main.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

mod args;

use anyhow::{anyhow, bail, Context, Result};
use args::{CliArgs, Command};
use clap::Parser;
use cryptonote_rpc_proxy::{
    Callback, Node, NodeObserver, NodeResult, NodeRpcProxy, ProxyConfig, Transaction,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Instant};
use tokio::{signal, task};
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Upper bound on waiting for any single callback.
const REPLY_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
enum Notification {
    Peers(usize),
    KnownHeight(u64),
    LocalHeight(u64),
}

/// Forwards observer notifications to the async side.
struct NotificationForwarder {
    tx: mpsc::UnboundedSender<Notification>,
}

impl NodeObserver for NotificationForwarder {
    fn peer_count_updated(&self, count: usize) {
        let _ = self.tx.send(Notification::Peers(count));
    }

    fn last_known_block_height_updated(&self, height: u64) {
        let _ = self.tx.send(Notification::KnownHeight(height));
    }

    fn local_blockchain_updated(&self, height: u64) {
        let _ = self.tx.send(Notification::LocalHeight(height));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = args.proxy_config()?;
    info!(daemon = %config.target(), "using daemon");

    let proxy = Arc::new(NodeRpcProxy::with_config(config.clone()));
    let outcome = match args.command {
        Command::Status { watch_secs } => status(&proxy, &config, watch_secs).await,
        Command::Relay { transaction } => relay(&proxy, &transaction).await,
    };

    // Joins the worker thread, so keep it off the runtime.
    let stopper = Arc::clone(&proxy);
    task::spawn_blocking(move || stopper.shutdown()).await?;
    outcome
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,cryptonote_rpc_proxy=info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn callback<T: Send + 'static>() -> (Callback<T>, oneshot::Receiver<NodeResult<T>>) {
    let (tx, rx) = oneshot::channel();
    let callback: Callback<T> = Box::new(move |result| {
        let _ = tx.send(result);
    });
    (callback, rx)
}

async fn reply<T>(rx: oneshot::Receiver<NodeResult<T>>, operation: &str) -> Result<T> {
    let result = timeout(REPLY_TIMEOUT, rx)
        .await
        .map_err(|_| anyhow!("{operation} timed out"))?
        .map_err(|_| anyhow!("{operation} callback was dropped"))?;
    result.with_context(|| format!("{operation} failed"))
}

async fn start(proxy: &NodeRpcProxy) -> Result<()> {
    let (init, rx) = callback();
    proxy.init(init);
    reply(rx, "init").await
}

async fn status(proxy: &NodeRpcProxy, config: &ProxyConfig, watch_secs: u64) -> Result<()> {
    let (tx, mut notifications) = mpsc::unbounded_channel();
    let observer: Arc<dyn NodeObserver> = Arc::new(NotificationForwarder { tx });
    proxy.add_observer(&observer);

    start(proxy).await?;

    // The first poll ends with the peer count; give it both round trips.
    let first_poll = Instant::now() + config.rpc_timeout() * 2;
    while let Ok(Some(notification)) =
        tokio::time::timeout_at(first_poll, notifications.recv()).await
    {
        debug!(?notification, "initial poll notification");
        if matches!(notification, Notification::Peers(_)) {
            break;
        }
    }

    let snapshot = proxy.status();
    println!("daemon:               {}", config.target());
    println!("local height:         {}", snapshot.node_height);
    println!("known height:         {}", snapshot.network_height);
    println!("top block:            {}", snapshot.last_known_block_hash);
    println!("top block timestamp:  {}", snapshot.last_local_block_timestamp);
    println!("peers:                {}", snapshot.peer_count);

    if watch_secs == 0 {
        return Ok(());
    }

    let deadline = Instant::now() + Duration::from_secs(watch_secs);
    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => break,
            _ = signal::ctrl_c() => break,
            notification = notifications.recv() => match notification {
                Some(Notification::Peers(count)) => println!("peers -> {count}"),
                Some(Notification::KnownHeight(height)) => println!("known height -> {height}"),
                Some(Notification::LocalHeight(height)) => println!("local height -> {height}"),
                None => break,
            },
        }
    }

    proxy.remove_observer(&observer);
    Ok(())
}

async fn relay(proxy: &NodeRpcProxy, transaction_hex: &str) -> Result<()> {
    let blob = hex::decode(transaction_hex.trim()).context("transaction is not valid hex")?;
    if blob.is_empty() {
        bail!("transaction blob is empty");
    }

    start(proxy).await?;

    let (relayed, rx) = callback();
    proxy.relay_transaction(Transaction::from_blob(blob), relayed);
    reply(rx, "relay_transaction").await?;

    println!("transaction relayed");
    Ok(())
}
