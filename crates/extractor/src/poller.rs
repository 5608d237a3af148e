// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Resumable one-block-per-file polling.
//!
//! The poller drives the RPC fetcher from a persisted height cursor: fetch
//! the next block, write it as a one-block file, advance the cursor. The
//! cursor file is rewritten atomically after each delivery, so a restart
//! resumes exactly after the last block that was fully written.

use std::{fs, path::PathBuf};

use flat_files_writer::{BundleWriter, ObjectStore};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{error::ExtractorError, fetcher::RpcBlockFetcher, rpc::CometRpc};

#[derive(Serialize, Deserialize)]
struct Cursor {
    last_height: u64,
}

/// The persisted poller cursor, a JSON file holding the last delivered
/// height.
pub struct CursorFile {
    path: PathBuf,
}

impl CursorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The last delivered height, or `None` when nothing was delivered yet.
    pub fn load(&self) -> Result<Option<u64>, ExtractorError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let cursor: Cursor = serde_json::from_slice(&bytes)?;
        Ok(Some(cursor.last_height))
    }

    /// Persists `last_height` via a temp file and rename.
    pub fn save(&self, last_height: u64) -> Result<(), ExtractorError> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(&Cursor { last_height })?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Streams one-block files from a live chain, resumably.
pub struct Poller<C, S> {
    fetcher: RpcBlockFetcher<C>,
    writer: BundleWriter<S>,
    cursor: CursorFile,
    first_height: u64,
}

impl<C: CometRpc, S: ObjectStore> Poller<C, S> {
    /// `first_height` is where polling starts when no cursor exists yet.
    pub fn new(
        fetcher: RpcBlockFetcher<C>,
        writer: BundleWriter<S>,
        cursor: CursorFile,
        first_height: u64,
    ) -> Self {
        Self {
            fetcher,
            writer,
            cursor,
            first_height,
        }
    }

    /// Delivers the next block and advances the cursor; returns its height.
    pub async fn step(&mut self) -> Result<u64, ExtractorError> {
        let height = match self.cursor.load()? {
            Some(last) => last + 1,
            None => self.first_height,
        };

        self.writer
            .write_one_blocks(&mut self.fetcher, height, height)
            .await?;
        self.cursor.save(height)?;

        info!(height, "delivered block");
        Ok(height)
    }

    /// Polls forever; returns only on error.
    pub async fn run(&mut self) -> Result<(), ExtractorError> {
        loop {
            self.step().await?;
        }
    }
}
