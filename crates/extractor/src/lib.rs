// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Block extractor
//!
//! Pulls finalized CometBFT blocks together with their execution results,
//! over JSON-RPC or straight from a node's local stores, and normalizes
//! them into the stable `sf.cosmos.type.v2` schema.
//!
//! The two ingestion paths share the converters in [`convert`] and both
//! implement [`flat_files_writer::BlockSource`], so the same bundle writer
//! drives either a live [`fetcher::RpcBlockFetcher`] or a bounded
//! [`loader::StorageBlockLoader`].

pub mod convert;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod poller;
pub mod rpc;

pub use error::{ExtractorError, RpcError, StoreError};
