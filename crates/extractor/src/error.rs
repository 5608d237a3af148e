// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use cosmos_protos::ProtosError;
use flat_files_writer::WriterError;
use thiserror::Error;

/// Error from a store collaborator; the storage engine behind it is not ours.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Errors from block extraction, over RPC or from local stores.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Every configured endpoint failed for one request.
    #[error("all endpoints failed for {op}: {errors}")]
    AllEndpointsFailed {
        /// The RPC operation that was attempted.
        op: &'static str,
        /// One failure per endpoint, in configuration order.
        errors: EndpointErrors,
    },

    /// The block store has no metadata for a height inside its range.
    #[error("no block meta at height {height}")]
    BlockMetaNotFound { height: u64 },

    /// The block store has no block for a height inside its range.
    #[error("no block at height {height}")]
    BlockNotFound { height: u64 },

    /// Converting one entity of a block failed.
    #[error("converting {entity}: {source}")]
    Conversion {
        entity: &'static str,
        source: ProtosError,
    },

    /// Converting one element of a repeated entity failed.
    #[error("converting {entity} {index}: {source}")]
    ConversionAt {
        entity: &'static str,
        index: usize,
        source: ProtosError,
    },

    /// The state store has no execution results for a height.
    #[error("no finalize block response at height {height}")]
    ExecutionResponsesNotFound { height: u64 },

    /// [std::io] error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// [serde_json] error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A message lacked a field the conversion cannot proceed without.
    #[error("missing field: {field}")]
    MissingField { field: &'static str },

    /// The fetcher was configured with no endpoints at all.
    #[error("at least one RPC endpoint is required")]
    NoEndpoints,

    /// [ProtosError] from the schema crate.
    #[error(transparent)]
    Protos(#[from] ProtosError),

    /// A store collaborator failed.
    #[error("storage {op} failed at height {height}: {source}")]
    Store {
        op: &'static str,
        height: u64,
        #[source]
        source: StoreError,
    },

    /// The tx index has no entry for a transaction of a stored block.
    #[error("no tx index entry at height {height} for tx {tx_hash}")]
    TxResultNotFound { height: u64, tx_hash: String },

    /// [WriterError] from the flat file writer.
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// A single RPC request error.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The requested height does not fit the wire representation.
    #[error("invalid height: {0}")]
    Height(#[from] tendermint::Error),

    /// Transport or server error from the node.
    #[error(transparent)]
    Rpc(#[from] tendermint_rpc::Error),
}

/// Per-endpoint failures collected over one exhausted failover pass.
#[derive(Debug)]
pub struct EndpointErrors(pub Vec<(String, RpcError)>);

impl fmt::Display for EndpointErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (endpoint, error)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{endpoint}: {error}")?;
        }
        Ok(())
    }
}
