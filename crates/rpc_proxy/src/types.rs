// Copyright (C) 2015-2025 The Neo Project.
//
// types.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! Value types exchanged between the proxy and its callers.

use crate::protocol::RawBlock;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

macro_rules! bytes32_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl FromStr for $name {
            type Err = hex::FromHexError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let mut bytes = [0u8; 32];
                hex::decode_to_slice(s.trim(), &mut bytes)?;
                Ok(Self(bytes))
            }
        }

        // Hex text in JSON payloads, raw bytes in the binary codec.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&self.to_string())
                } else {
                    self.0.serialize(serializer)
                }
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                if deserializer.is_human_readable() {
                    let text = String::deserialize(deserializer)?;
                    text.parse().map_err(D::Error::custom)
                } else {
                    <[u8; 32]>::deserialize(deserializer).map(Self)
                }
            }
        }
    };
}

bytes32_newtype!(
    /// 32-byte block or transaction identifier.
    Hash
);

bytes32_newtype!(
    /// 32-byte output public key.
    PublicKey
);

impl Hash {
    /// The all-zero hash, used as "nothing known yet".
    pub const NULL: Hash = Hash([0u8; 32]);

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }
}

/// A fully built transaction, held as its wire blob.
///
/// Construction and signing happen elsewhere; the proxy only relays the bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    blob: Vec<u8>,
}

impl Transaction {
    pub fn from_blob(blob: Vec<u8>) -> Self {
        Self { blob }
    }

    pub fn as_blob(&self) -> &[u8] {
        &self.blob
    }

    /// Hex form submitted to `/sendrawtransaction`.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.blob)
    }
}

/// Block returned by `query_blocks`: id, body and included transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockEntry {
    pub block_hash: Hash,
    pub block: Vec<u8>,
    pub txs: Vec<Vec<u8>>,
}

/// Result of `get_new_blocks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBlocks {
    pub blocks: Vec<RawBlock>,
    pub start_height: u64,
}

/// Result of `query_blocks`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueriedBlocks {
    pub blocks: Vec<BlockEntry>,
    pub start_height: u64,
}

/// Result of `get_pool_symmetric_difference`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolDifference {
    pub is_blockchain_actual: bool,
    pub new_txs: Vec<Transaction>,
    pub deleted_tx_ids: Vec<Hash>,
}
