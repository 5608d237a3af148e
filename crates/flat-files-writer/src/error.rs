// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::bundle::SourceError;

/// Errors for writing, reading and validating flat files.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Writing a file was abandoned because the producing side failed.
    #[error("writing {filename} aborted: block producer failed")]
    Aborted {
        /// Name of the abandoned object.
        filename: String,
    },

    /// Bundle boundary not aligned to the bundle width.
    #[error("{bound} block {value} is not on a {width}-block boundary")]
    BoundaryMisaligned {
        /// Which bound is misaligned, `"start"` or `"end"`.
        bound: &'static str,
        /// The offending height.
        value: u64,
        /// The required alignment.
        width: u64,
    },

    /// Content type string too long for the header length prefix.
    #[error("content type of {size} bytes exceeds the u16 header limit")]
    ContentTypeInvalid {
        /// Size of the offending content type.
        size: usize,
    },

    /// The frame consumer went away before the file was finished.
    #[error("frame consumer dropped before the file was finished")]
    ConsumerClosed,

    /// [prost] decode error while reading a flat file back.
    #[error("Protobuf decode error: {0}")]
    Decode(#[from] prost::DecodeError),

    /// Requested range ends after the last retained block.
    #[error("end block {end} is after the last block {last} of current snapshot")]
    EndAfterRetained {
        /// Requested end height.
        end: u64,
        /// Last retained height.
        last: u64,
    },

    /// A single message does not fit the u32 length prefix.
    #[error("message of {size} bytes exceeds the u32 frame limit")]
    FrameTooLarge {
        /// Size of the offending message.
        size: usize,
    },

    /// [std::io] error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned writer task failed.
    #[error("writer task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Magic bytes invalid.
    #[error("Magic bytes at start of file are invalid")]
    MagicBytesInvalid,

    /// Loading or converting one block failed.
    #[error("loading block {height}: {source}")]
    Source {
        /// The height that failed.
        height: u64,
        /// Underlying source error.
        #[source]
        source: SourceError,
    },

    /// Requested range starts before the first retained block.
    #[error("start block {start} is before the first block {first} of current snapshot")]
    StartBeforeRetained {
        /// Requested start height.
        start: u64,
        /// First retained height.
        first: u64,
    },

    /// [std::string::FromUtf8Error].
    #[error("{0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Unsupported flat file version.
    #[error("Unsupported flat file version")]
    VersionUnsupported,
}
