// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Block ingestion straight from a node's local stores.
//!
//! The store traits mirror what a CometBFT node persists: the block store
//! (blocks and their metadata), the state store (finalize-block responses)
//! and the tx index (per-transaction results keyed by tx hash). The loader
//! composes them into canonical blocks for the retained height range; any
//! inconsistency between the stores fails the height instead of emitting a
//! partial block.

use async_trait::async_trait;
use cosmos_protos::BstreamBlock;
use flat_files_writer::{BlockSource, SourceError};
use sha2::{Digest, Sha256};
use tendermint_proto::v0_38::{abci as pb_abci, types as pb_types};

use crate::{
    convert::{build_block, BlockParts, ExecutionResults},
    error::{ExtractorError, StoreError},
};

/// The node's block store.
pub trait BlockStore: Send + Sync {
    /// Height of the earliest retained block.
    fn base(&self) -> u64;

    /// Height of the newest stored block.
    fn height(&self) -> u64;

    fn load_block(&self, height: u64) -> Result<Option<pb_types::Block>, StoreError>;

    fn load_block_meta(&self, height: u64) -> Result<Option<pb_types::BlockMeta>, StoreError>;
}

/// The node's state store, holding per-height execution results.
pub trait StateStore: Send + Sync {
    fn load_finalize_block_response(
        &self,
        height: u64,
    ) -> Result<Option<pb_abci::ResponseFinalizeBlock>, StoreError>;
}

/// The node's tx index, keyed by SHA-256 of the raw transaction.
pub trait TxIndexStore: Send + Sync {
    fn get(&self, tx_hash: &[u8]) -> Result<Option<pb_abci::TxResult>, StoreError>;
}

/// Where transaction results are read from.
pub enum ResultsSource {
    /// The state store's stored finalize-block response.
    ExecResponses,
    /// Per-transaction lookups in the tx index. Block-level events and
    /// validator/consensus updates still come from the state store.
    TxIndex,
}

/// Loads canonical blocks from a node's stores over the retained range.
pub struct StorageBlockLoader<B, S, T> {
    blocks: B,
    state: S,
    tx_index: T,
    results_source: ResultsSource,
}

impl<B, S, T> StorageBlockLoader<B, S, T>
where
    B: BlockStore,
    S: StateStore,
    T: TxIndexStore,
{
    pub fn new(blocks: B, state: S, tx_index: T, results_source: ResultsSource) -> Self {
        Self {
            blocks,
            state,
            tx_index,
            results_source,
        }
    }

    /// Inclusive bounds of the retained heights.
    pub fn retained_range(&self) -> (u64, u64) {
        (self.blocks.base(), self.blocks.height())
    }

    /// Loads and normalizes the block at `height`.
    pub fn load_block(&self, height: u64) -> Result<cosmos_protos::cosmos::v2::Block, ExtractorError> {
        let meta = store_result("load_block_meta", height, self.blocks.load_block_meta(height))?
            .ok_or(ExtractorError::BlockMetaNotFound { height })?;
        let block = store_result("load_block", height, self.blocks.load_block(height))?
            .ok_or(ExtractorError::BlockNotFound { height })?;

        let hash = meta
            .block_id
            .map(|id| id.hash.to_vec())
            .unwrap_or_default();

        let response = store_result(
            "load_finalize_block_response",
            height,
            self.state.load_finalize_block_response(height),
        )?
        .ok_or(ExtractorError::ExecutionResponsesNotFound { height })?;

        let tx_results = match self.results_source {
            ResultsSource::ExecResponses => response.tx_results,
            ResultsSource::TxIndex => self.indexed_tx_results(height, &block)?,
        };

        build_block(BlockParts {
            hash,
            block,
            results: ExecutionResults {
                events: response.events,
                tx_results,
                validator_updates: response.validator_updates,
                consensus_param_updates: response.consensus_param_updates,
            },
        })
    }

    /// Collects the result of every transaction of `block` from the tx
    /// index. A missing entry fails the height; a silently absent result
    /// would break the txs/results alignment downstream.
    fn indexed_tx_results(
        &self,
        height: u64,
        block: &pb_types::Block,
    ) -> Result<Vec<pb_abci::ExecTxResult>, ExtractorError> {
        let Some(data) = &block.data else {
            return Ok(vec![]);
        };

        let mut tx_results = Vec::with_capacity(data.txs.len());
        for tx in &data.txs {
            let tx_hash = Sha256::digest(tx).to_vec();
            let stored = store_result("tx_index_get", height, self.tx_index.get(&tx_hash))?
                .ok_or_else(|| ExtractorError::TxResultNotFound {
                    height,
                    tx_hash: hex::encode(&tx_hash),
                })?;
            let result = stored.result.ok_or(ExtractorError::MissingField {
                field: "tx index result",
            })?;
            tx_results.push(result);
        }
        Ok(tx_results)
    }
}

fn store_result<V>(
    op: &'static str,
    height: u64,
    result: Result<V, StoreError>,
) -> Result<V, ExtractorError> {
    result.map_err(|source| ExtractorError::Store { op, height, source })
}

#[async_trait]
impl<B, S, T> BlockSource for StorageBlockLoader<B, S, T>
where
    B: BlockStore,
    S: StateStore,
    T: TxIndexStore,
{
    fn block_range(&self) -> Option<(u64, u64)> {
        Some(self.retained_range())
    }

    async fn envelope(&mut self, height: u64) -> Result<BstreamBlock, SourceError> {
        let block = self.load_block(height)?;
        Ok(block.into_envelope().map_err(ExtractorError::Protos)?)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use tendermint_proto::google::protobuf::Timestamp as PbTimestamp;

    use super::*;

    struct FakeBlockStore {
        base: u64,
        blocks: HashMap<u64, pb_types::Block>,
    }

    impl FakeBlockStore {
        fn with_heights(base: u64, heights: impl IntoIterator<Item = u64>) -> Self {
            let blocks = heights
                .into_iter()
                .map(|height| {
                    let block = pb_types::Block {
                        header: Some(pb_types::Header {
                            chain_id: "store-1".to_string(),
                            height: height as i64,
                            time: Some(PbTimestamp {
                                seconds: height as i64,
                                nanos: 0,
                            }),
                            ..Default::default()
                        }),
                        data: Some(pb_types::Data {
                            txs: vec![height.to_be_bytes().to_vec().into()],
                        }),
                        evidence: None,
                        last_commit: None,
                    };
                    (height, block)
                })
                .collect();
            Self { base, blocks }
        }
    }

    impl BlockStore for FakeBlockStore {
        fn base(&self) -> u64 {
            self.base
        }

        fn height(&self) -> u64 {
            *self.blocks.keys().max().unwrap_or(&self.base)
        }

        fn load_block(&self, height: u64) -> Result<Option<pb_types::Block>, StoreError> {
            Ok(self.blocks.get(&height).cloned())
        }

        fn load_block_meta(&self, height: u64) -> Result<Option<pb_types::BlockMeta>, StoreError> {
            Ok(self.blocks.get(&height).map(|_| pb_types::BlockMeta {
                block_id: Some(pb_types::BlockId {
                    hash: height.to_be_bytes().to_vec().into(),
                    part_set_header: None,
                }),
                ..Default::default()
            }))
        }
    }

    struct FakeStateStore {
        responses: HashMap<u64, pb_abci::ResponseFinalizeBlock>,
    }

    impl StateStore for FakeStateStore {
        fn load_finalize_block_response(
            &self,
            height: u64,
        ) -> Result<Option<pb_abci::ResponseFinalizeBlock>, StoreError> {
            Ok(self.responses.get(&height).cloned())
        }
    }

    struct FakeTxIndex {
        results: HashMap<Vec<u8>, pb_abci::TxResult>,
    }

    impl FakeTxIndex {
        fn empty() -> Self {
            Self {
                results: HashMap::new(),
            }
        }

        fn indexing(blocks: &FakeBlockStore) -> Self {
            let mut results = HashMap::new();
            for (height, block) in &blocks.blocks {
                for tx in &block.data.as_ref().unwrap().txs {
                    results.insert(
                        Sha256::digest(tx).to_vec(),
                        pb_abci::TxResult {
                            height: *height as i64,
                            index: 0,
                            tx: tx.clone().into(),
                            result: Some(pb_abci::ExecTxResult {
                                log: format!("indexed at {height}"),
                                ..Default::default()
                            }),
                        },
                    );
                }
            }
            Self { results }
        }
    }

    impl TxIndexStore for FakeTxIndex {
        fn get(&self, tx_hash: &[u8]) -> Result<Option<pb_abci::TxResult>, StoreError> {
            Ok(self.results.get(tx_hash).cloned())
        }
    }

    fn exec_response(height: u64) -> pb_abci::ResponseFinalizeBlock {
        pb_abci::ResponseFinalizeBlock {
            tx_results: vec![pb_abci::ExecTxResult {
                log: format!("stored at {height}"),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn retained_range_comes_from_the_block_store() {
        let blocks = FakeBlockStore::with_heights(500, 500..=520);
        let loader = StorageBlockLoader::new(
            blocks,
            FakeStateStore {
                responses: HashMap::new(),
            },
            FakeTxIndex::empty(),
            ResultsSource::ExecResponses,
        );

        assert_eq!(loader.retained_range(), (500, 520));
    }

    #[test]
    fn loads_a_block_with_stored_execution_results() {
        let blocks = FakeBlockStore::with_heights(1, 1..=3);
        let loader = StorageBlockLoader::new(
            blocks,
            FakeStateStore {
                responses: (1..=3).map(|h| (h, exec_response(h))).collect(),
            },
            FakeTxIndex::empty(),
            ResultsSource::ExecResponses,
        );

        let block = loader.load_block(2).unwrap();

        assert_eq!(block.height, 2);
        assert_eq!(block.hash, 2u64.to_be_bytes().to_vec());
        assert_eq!(block.txs.len(), 1);
        assert_eq!(block.tx_results[0].log, "stored at 2");
    }

    #[test]
    fn tx_index_mode_reads_results_per_transaction() {
        let blocks = FakeBlockStore::with_heights(1, 1..=3);
        let tx_index = FakeTxIndex::indexing(&blocks);
        let loader = StorageBlockLoader::new(
            blocks,
            FakeStateStore {
                responses: (1..=3).map(|h| (h, exec_response(h))).collect(),
            },
            tx_index,
            ResultsSource::TxIndex,
        );

        let block = loader.load_block(3).unwrap();
        assert_eq!(block.tx_results[0].log, "indexed at 3");
    }

    #[test]
    fn missing_tx_index_entry_fails_the_height() {
        let blocks = FakeBlockStore::with_heights(1, 1..=3);
        let loader = StorageBlockLoader::new(
            blocks,
            FakeStateStore {
                responses: (1..=3).map(|h| (h, exec_response(h))).collect(),
            },
            FakeTxIndex::empty(),
            ResultsSource::TxIndex,
        );

        let result = loader.load_block(2);
        assert!(matches!(
            result,
            Err(ExtractorError::TxResultNotFound { height: 2, .. })
        ));
    }

    #[test]
    fn missing_block_and_missing_results_are_distinct_errors() {
        let blocks = FakeBlockStore::with_heights(1, 1..=3);
        let loader = StorageBlockLoader::new(
            blocks,
            FakeStateStore {
                responses: HashMap::new(),
            },
            FakeTxIndex::empty(),
            ResultsSource::ExecResponses,
        );

        assert!(matches!(
            loader.load_block(9),
            Err(ExtractorError::BlockMetaNotFound { height: 9 })
        ));
        assert!(matches!(
            loader.load_block(2),
            Err(ExtractorError::ExecutionResponsesNotFound { height: 2 })
        ));
    }
}
