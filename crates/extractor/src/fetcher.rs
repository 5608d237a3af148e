// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Live block ingestion over RPC.
//!
//! The fetcher serves exactly the height it is asked for: when the chain
//! has not produced it yet, the call blocks, polling the node's latest
//! height until it has. Transient request failures are retried without
//! limit; only dropping the future stops a fetch. Every network call walks
//! the configured endpoints in order and takes the first success.

use std::time::Duration;

use async_trait::async_trait;
use cosmos_protos::BstreamBlock;
use flat_files_writer::{BlockSource, SourceError};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::{
    convert::{build_block, BlockParts, ExecutionResults},
    error::{EndpointErrors, ExtractorError},
    rpc::{CometRpc, RpcBlock},
};

/// Fetches finalized blocks from one or more CometBFT RPC endpoints.
pub struct RpcBlockFetcher<C> {
    clients: Vec<C>,
    fetch_interval: Duration,
    latest_height_retry_interval: Duration,
    latest_height: u64,
}

impl<C: CometRpc> RpcBlockFetcher<C> {
    /// `fetch_interval` paces retries of failed block requests;
    /// `latest_height_retry_interval` paces the latest-height poll while
    /// waiting for the chain to catch up.
    pub fn new(
        clients: Vec<C>,
        fetch_interval: Duration,
        latest_height_retry_interval: Duration,
    ) -> Result<Self, ExtractorError> {
        if clients.is_empty() {
            return Err(ExtractorError::NoEndpoints);
        }
        Ok(Self {
            clients,
            fetch_interval,
            latest_height_retry_interval,
            latest_height: 0,
        })
    }

    /// This chain family finalizes every height; nothing is ever skipped.
    pub fn is_block_available(&self, _height: u64) -> bool {
        true
    }

    /// Fetches the block at `height`, waiting for it to be produced first.
    pub async fn fetch(&mut self, height: u64) -> Result<BstreamBlock, ExtractorError> {
        let mut delay = Duration::ZERO;
        while self.latest_height < height {
            sleep(delay).await;
            delay = self.latest_height_retry_interval;

            match self.latest_height_from_any().await {
                Ok(latest) => {
                    self.latest_height = latest;
                    if latest < height {
                        debug!(height, latest, "block not yet produced, waiting");
                    }
                }
                Err(e) => warn!(height, %e, "latest height poll failed, retrying"),
            }
        }

        let (block, results) = loop {
            match self.fetch_pair(height).await {
                Ok(pair) => break pair,
                Err(e) => {
                    warn!(height, %e, "block fetch failed, retrying");
                    sleep(self.fetch_interval).await;
                }
            }
        };

        // Conversion failures are fatal, not transient.
        let block = build_block(BlockParts {
            hash: block.hash,
            block: block.block,
            results,
        })?;
        Ok(block.into_envelope()?)
    }

    async fn fetch_pair(
        &self,
        height: u64,
    ) -> Result<(RpcBlock, ExecutionResults), ExtractorError> {
        let block = self.block_from_any(height).await?;
        let results = self.block_results_from_any(height).await?;
        Ok((block, results))
    }

    async fn latest_height_from_any(&self) -> Result<u64, ExtractorError> {
        let mut errors = Vec::new();
        for client in &self.clients {
            match client.latest_height().await {
                Ok(latest) => return Ok(latest),
                Err(e) => {
                    warn!(endpoint = client.endpoint(), %e, "status request failed");
                    errors.push((client.endpoint().to_string(), e));
                }
            }
        }
        Err(ExtractorError::AllEndpointsFailed {
            op: "status",
            errors: EndpointErrors(errors),
        })
    }

    async fn block_from_any(&self, height: u64) -> Result<RpcBlock, ExtractorError> {
        let mut errors = Vec::new();
        for client in &self.clients {
            match client.block(height).await {
                Ok(block) => return Ok(block),
                Err(e) => {
                    warn!(endpoint = client.endpoint(), height, %e, "block request failed");
                    errors.push((client.endpoint().to_string(), e));
                }
            }
        }
        Err(ExtractorError::AllEndpointsFailed {
            op: "block",
            errors: EndpointErrors(errors),
        })
    }

    async fn block_results_from_any(&self, height: u64) -> Result<ExecutionResults, ExtractorError> {
        let mut errors = Vec::new();
        for client in &self.clients {
            match client.block_results(height).await {
                Ok(results) => return Ok(results),
                Err(e) => {
                    warn!(endpoint = client.endpoint(), height, %e, "block results request failed");
                    errors.push((client.endpoint().to_string(), e));
                }
            }
        }
        Err(ExtractorError::AllEndpointsFailed {
            op: "block_results",
            errors: EndpointErrors(errors),
        })
    }
}

#[async_trait]
impl<C: CometRpc> BlockSource for RpcBlockFetcher<C> {
    /// A live chain has no fixed upper bound.
    fn block_range(&self) -> Option<(u64, u64)> {
        None
    }

    async fn envelope(&mut self, height: u64) -> Result<BstreamBlock, SourceError> {
        Ok(self.fetch(height).await?)
    }
}
