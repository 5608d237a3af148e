// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors for schema conversion and envelope construction.
#[derive(Error, Debug)]
pub enum ProtosError {
    /// Re-encoding the source message failed.
    #[error("encoding origin message: {0}")]
    Encode(#[from] prost::EncodeError),

    /// Decoding into the target message failed for a reason other than an
    /// unknown field (unknown fields are silently discarded).
    #[error("decoding into target message: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Batch conversion over two sequences of different lengths.
    #[error("origin and target arrays have different lengths: {origins} != {targets}")]
    LengthMismatch {
        /// Number of origin elements.
        origins: usize,
        /// Number of target elements.
        targets: usize,
    },

    /// Batch conversion failed at a specific element.
    #[error("converting element {index}: {source}")]
    Element {
        /// Index of the failing element.
        index: usize,
        /// Underlying conversion error.
        source: Box<ProtosError>,
    },

    /// Block is missing its header.
    #[error("block {height} has no header")]
    MissingHeader {
        /// Height of the offending block.
        height: i64,
    },
}
