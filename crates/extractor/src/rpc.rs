// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Thin JSON-RPC surface over a CometBFT node.
//!
//! [`CometRpc`] is the seam the fetcher works against; [`CometHttpClient`]
//! implements it with [`tendermint_rpc::HttpClient`] and lowers the domain
//! responses to the wire messages the converters take. Block-level events
//! are concatenated in phase order (begin, finalize, end) so nodes on
//! either side of the ABCI 2.0 switch produce one uniform list.

use async_trait::async_trait;
use tendermint::block::Height;
use tendermint_proto::v0_38::types as pb_types;
use tendermint_rpc::{Client, HttpClient};

use crate::{convert::ExecutionResults, error::RpcError};

/// One block as served by the node, hash included.
pub struct RpcBlock {
    /// Block hash, from the block id next to the block.
    pub hash: Vec<u8>,
    pub block: pb_types::Block,
}

/// The node requests the extraction pipeline needs.
#[async_trait]
pub trait CometRpc: Send + Sync {
    /// The endpoint this client talks to, for error reports.
    fn endpoint(&self) -> &str;

    /// Height of the newest block the node knows about.
    async fn latest_height(&self) -> Result<u64, RpcError>;

    /// The block at `height`.
    async fn block(&self, height: u64) -> Result<RpcBlock, RpcError>;

    /// The execution results of the block at `height`.
    async fn block_results(&self, height: u64) -> Result<ExecutionResults, RpcError>;
}

/// [`CometRpc`] over HTTP JSON-RPC.
pub struct CometHttpClient {
    endpoint: String,
    client: HttpClient,
}

impl CometHttpClient {
    pub fn new(endpoint: &str) -> Result<Self, RpcError> {
        Ok(Self {
            endpoint: endpoint.to_string(),
            client: HttpClient::new(endpoint)?,
        })
    }
}

#[async_trait]
impl CometRpc for CometHttpClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn latest_height(&self) -> Result<u64, RpcError> {
        let status = self.client.status().await?;
        Ok(status.sync_info.latest_block_height.value())
    }

    async fn block(&self, height: u64) -> Result<RpcBlock, RpcError> {
        let height = Height::try_from(height)?;
        let response = self.client.block(height).await?;

        Ok(RpcBlock {
            hash: response.block_id.hash.as_bytes().to_vec(),
            block: response.block.into(),
        })
    }

    async fn block_results(&self, height: u64) -> Result<ExecutionResults, RpcError> {
        let height = Height::try_from(height)?;
        let response = self.client.block_results(height).await?;

        let mut events = Vec::new();
        events.extend(
            response
                .begin_block_events
                .unwrap_or_default()
                .into_iter()
                .map(Into::into),
        );
        events.extend(response.finalize_block_events.into_iter().map(Into::into));
        events.extend(
            response
                .end_block_events
                .unwrap_or_default()
                .into_iter()
                .map(Into::into),
        );

        Ok(ExecutionResults {
            events,
            tx_results: response
                .txs_results
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            validator_updates: response
                .validator_updates
                .into_iter()
                .map(Into::into)
                .collect(),
            consensus_param_updates: response.consensus_param_updates.map(Into::into),
        })
    }
}
