// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end checks of bundle writing: envelopes in, decodable dbin files
//! out, with chain linkage intact and no partial files on failure.

use std::sync::Arc;

use async_trait::async_trait;
use cosmos_protos::BstreamBlock;
use flat_files_writer::{
    filename, BlockSource, BundleWriter, DbinFile, MemStore, SourceError, WriterError,
};
use prost::Message;

/// Serves a synthetic chain where each block links to its predecessor.
struct FakeChain {
    first: u64,
    last: u64,
    /// Heights at which the source fails, simulating a storage hole.
    missing: Vec<u64>,
}

impl FakeChain {
    fn with_range(first: u64, last: u64) -> Self {
        Self {
            first,
            last,
            missing: vec![],
        }
    }

    fn hash(height: u64) -> Vec<u8> {
        let mut hash = vec![0xcc; 24];
        hash.extend_from_slice(&height.to_be_bytes());
        hash
    }
}

#[async_trait]
impl BlockSource for FakeChain {
    fn block_range(&self) -> Option<(u64, u64)> {
        Some((self.first, self.last))
    }

    async fn envelope(&mut self, height: u64) -> Result<BstreamBlock, SourceError> {
        if self.missing.contains(&height) {
            return Err(format!("no block at height {height}").into());
        }

        let parent_num = height.saturating_sub(1);
        Ok(BstreamBlock {
            number: height,
            id: hex::encode(Self::hash(height)),
            parent_id: if height == 0 {
                String::new()
            } else {
                hex::encode(Self::hash(parent_num))
            },
            timestamp: Some(prost_types::Timestamp {
                seconds: 1_700_000_000 + height as i64,
                nanos: 0,
            }),
            lib_num: parent_num,
            payload: Some(prost_types::Any {
                type_url: "type.googleapis.com/sf.cosmos.type.v2.Block".to_string(),
                value: height.to_be_bytes().to_vec(),
            }),
            parent_num,
        })
    }
}

fn writer() -> (BundleWriter<MemStore>, Arc<MemStore>) {
    let store = Arc::new(MemStore::new());
    (BundleWriter::new(Arc::clone(&store)), store)
}

fn decode_bundle(bytes: &[u8]) -> Vec<BstreamBlock> {
    let file = DbinFile::try_from_read(&mut &bytes[..]).unwrap();
    assert_eq!(file.header.content_type, "sf.cosmos.type.v2.Block");
    file.messages
        .iter()
        .map(|message| BstreamBlock::decode(message.as_slice()).unwrap())
        .collect()
}

#[tokio::test]
async fn bundles_hold_one_hundred_linked_envelopes() {
    let (writer, store) = writer();
    let mut source = FakeChain::with_range(100, 499);

    writer.write_bundles(&mut source, 100, 300).await.unwrap();

    assert_eq!(store.names(), vec![filename(100), filename(200)]);

    for (base, name) in [(100u64, filename(100)), (200, filename(200))] {
        let envelopes = decode_bundle(&store.get(&name).unwrap());
        assert_eq!(envelopes.len(), 100);

        for (offset, envelope) in envelopes.iter().enumerate() {
            let height = base + offset as u64;
            assert_eq!(envelope.number, height);
            assert_eq!(envelope.lib_num, height - 1);
            assert_eq!(envelope.parent_num, height - 1);
        }

        // Each envelope names its predecessor's hash.
        for pair in envelopes.windows(2) {
            assert_eq!(pair[1].parent_id, pair[0].id);
        }
    }
}

#[tokio::test]
async fn consecutive_bundles_link_across_the_file_boundary() {
    let (writer, store) = writer();
    let mut source = FakeChain::with_range(0, 999);

    writer.write_bundles(&mut source, 0, 200).await.unwrap();

    let first = decode_bundle(&store.get(&filename(0)).unwrap());
    let second = decode_bundle(&store.get(&filename(100)).unwrap());

    assert_eq!(second[0].parent_id, first[99].id);
    assert_eq!(second[0].parent_num, 99);
}

#[tokio::test]
async fn source_failure_persists_nothing_for_the_failed_bundle() {
    let (writer, store) = writer();
    let mut source = FakeChain {
        first: 0,
        last: 999,
        missing: vec![137],
    };

    let result = writer.write_bundles(&mut source, 0, 300).await;

    match result {
        Err(WriterError::Source { height: 137, .. }) => {}
        other => panic!("expected a source error at height 137, got {other:?}"),
    }

    // The first bundle finished before the failure; the failed one left no
    // trace and later bundles were never started.
    assert_eq!(store.names(), vec![filename(0)]);
}

#[tokio::test]
async fn one_block_files_carry_a_single_envelope() {
    let (writer, store) = writer();
    let mut source = FakeChain::with_range(0, 999);

    writer.write_one_blocks(&mut source, 7, 9).await.unwrap();

    assert_eq!(
        store.names(),
        vec![filename(7), filename(8), filename(9)]
    );

    let envelopes = decode_bundle(&store.get(&filename(8)).unwrap());
    assert_eq!(envelopes.len(), 1);
    assert_eq!(envelopes[0].number, 8);
}
