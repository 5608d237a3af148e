// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Flat file writer
//!
//! Persist streams of block envelopes as `.dbin` flat files: either one
//! 100-block bundle per file or one block per file. Files are produced
//! through a bounded producer/consumer handoff so that at most one encoded
//! block is buffered in memory, and an error anywhere aborts the file
//! instead of leaving a truncated object behind.
//!
//! The dbin container format is StreamingFast's length-prefixed protobuf
//! packing; see [the dbin format documentation](https://github.com/streamingfast/dbin).

mod bundle;
mod dbin;
mod error;
mod store;

pub use bundle::{filename, BlockSource, BundleWriter, SourceError, BUNDLE_WIDTH};
pub use dbin::{DbinFile, DbinHeader, DbinWriter};
pub use error::WriterError;
pub use store::{FrameReceiver, FsStore, MemStore, ObjectStore};
