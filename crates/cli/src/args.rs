// Copyright (C) 2015-2025 The Neo Project.
//
// args.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cryptonote_rpc_proxy::ProxyConfig;
use std::path::PathBuf;

/// Command-line arguments for the node proxy client
#[derive(Parser, Debug, Clone)]
#[command(
    name = "rpc-proxy-cli",
    version = env!("CARGO_PKG_VERSION"),
    about = "Drives a CryptoNote daemon through the asynchronous node RPC proxy"
)]
pub struct CliArgs {
    /// TOML file with host, port, rpc_timeout_ms and poll_interval_ms.
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Overrides the daemon host.
    #[arg(long, env = "CRYPTONOTE_RPC_HOST", value_name = "HOST", global = true)]
    pub host: Option<String>,

    /// Overrides the daemon RPC port.
    #[arg(long, env = "CRYPTONOTE_RPC_PORT", value_name = "PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Prints the daemon status after the first poll.
    Status {
        /// Keeps printing observer notifications for this many seconds.
        #[arg(long = "watch-secs", value_name = "N", default_value_t = 0)]
        watch_secs: u64,
    },
    /// Relays a hex-encoded transaction blob.
    Relay {
        #[arg(value_name = "HEX")]
        transaction: String,
    },
}

impl CliArgs {
    /// Proxy configuration: file (or defaults), then command-line overrides.
    pub fn proxy_config(&self) -> Result<ProxyConfig> {
        let mut config = match &self.config {
            Some(path) => ProxyConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => ProxyConfig::default(),
        };

        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }

        config.validate().context("invalid proxy configuration")?;
        Ok(config)
    }
}
