// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Cosmos block schemas for the streaming pipeline
//!
//! Rust implementations of the stable protobuf schemas emitted by the
//! extraction pipeline: the chain-agnostic `sf.bstream.v1.Block` envelope and
//! the `sf.cosmos.type.v2` block model, plus the generic schema-flip
//! converter used to re-map the evolving upstream CometBFT wire messages onto
//! these stable types.
//!
//! The message structs are vendored prost definitions (no protoc needed at
//! build time); field numbers mirror the upstream `tendermint-proto` messages
//! so that conversion works by wire re-encoding rather than by hand-written
//! field mapping.

mod bstream;
mod cosmos_v2;
mod error;
mod flip;

/// The `sf.cosmos.type.v2` block model.
pub mod cosmos {
    /// Version 2 of the schema.
    pub mod v2 {
        pub use crate::cosmos_v2::*;
    }
}

pub use bstream::v1::Block as BstreamBlock;
pub use error::ProtosError;
pub use flip::{array_proto_flip, flip_all, proto_flip};

/// The `sf.bstream.v1` envelope schema.
pub mod envelope {
    pub use crate::bstream::v1::Block;
}
