// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use prost::Message;

use super::Block;
use crate::{bstream, error::ProtosError};

impl Block {
    /// Type URL tagging the envelope payload.
    pub const TYPE_URL: &'static str = "type.googleapis.com/sf.cosmos.type.v2.Block";

    /// Hash of the parent block; empty for the first block of the chain.
    pub fn parent_hash(&self) -> &[u8] {
        self.header
            .as_ref()
            .and_then(|header| header.last_block_id.as_ref())
            .map(|id| id.hash.as_slice())
            .unwrap_or_default()
    }

    /// Wrap this block in an `sf.bstream.v1.Block` envelope.
    ///
    /// The lib num and parent num are both `height - 1`: this chain family
    /// has single-block finality, so the parent is always the last
    /// irreversible block. Both saturate to zero for the first block.
    pub fn into_envelope(self) -> Result<bstream::v1::Block, ProtosError> {
        let header = self.header.as_ref().ok_or(ProtosError::MissingHeader {
            height: self.height,
        })?;

        let parent_id = header
            .last_block_id
            .as_ref()
            .map(|id| hex::encode(&id.hash))
            .unwrap_or_default();

        let number = self.height as u64;
        let parent_num = number.saturating_sub(1);
        let id = hex::encode(&self.hash);
        let timestamp = self.time.clone();

        let payload = ::prost_types::Any {
            type_url: Self::TYPE_URL.to_string(),
            value: self.encode_to_vec(),
        };

        Ok(bstream::v1::Block {
            number,
            id,
            parent_id,
            timestamp,
            lib_num: parent_num,
            payload: Some(payload),
            parent_num,
        })
    }
}
