// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Vendored `sf.bstream.v1` envelope message.
//!
//! This is the transport wrapper every chain-specific payload travels in;
//! bundle files are sequences of these, one per height. Deprecated legacy
//! fields (payload kind/version/buffer, head num) are omitted — decoders
//! drop them as unknown fields.

/// The `sf.bstream.v1` package.
pub mod v1 {
    /// One block envelope: sequencing metadata plus an opaque payload.
    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Block {
        /// Height of the wrapped block.
        #[prost(uint64, tag = "1")]
        pub number: u64,
        /// Lowercase hex block hash.
        #[prost(string, tag = "2")]
        pub id: ::prost::alloc::string::String,
        /// Lowercase hex hash of the parent block; empty for the first block.
        #[prost(string, tag = "3")]
        pub parent_id: ::prost::alloc::string::String,
        /// Block time as recorded in its header.
        #[prost(message, optional, tag = "4")]
        pub timestamp: ::core::option::Option<::prost_types::Timestamp>,
        /// Last irreversible block at the time this block was produced.
        #[prost(uint64, tag = "5")]
        pub lib_num: u64,
        /// The serialized chain-specific block, tagged with its schema type.
        #[prost(message, optional, tag = "10")]
        pub payload: ::core::option::Option<::prost_types::Any>,
        /// Height of the parent block.
        #[prost(uint64, tag = "11")]
        pub parent_num: u64,
    }
}
