// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::Mutex,
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt, sync::mpsc};
use tracing::debug;

use crate::error::WriterError;

/// Receiving side of a file's frame stream. An `Err` frame aborts the file.
pub type FrameReceiver = mpsc::Receiver<Result<Vec<u8>, WriterError>>;

/// Destination for finished flat files.
///
/// An object either appears complete or not at all: implementations must not
/// leave a partial object behind when the frame stream carries an error.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Streams `frames` into an object named `name`.
    async fn write_object(&self, name: &str, frames: FrameReceiver) -> Result<(), WriterError>;
}

/// Stores objects as files under a root directory.
///
/// Frames are streamed into a `.tmp` sibling which is renamed into place once
/// the stream ends cleanly, so readers never observe a half-written file.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn write_object(
        &self,
        name: &str,
        mut frames: FrameReceiver,
    ) -> Result<(), WriterError> {
        fs::create_dir_all(&self.root).await?;

        let final_path = self.root.join(name);
        let tmp_path = self.root.join(format!("{name}.tmp"));

        let mut file = fs::File::create(&tmp_path).await?;

        while let Some(frame) = frames.recv().await {
            match frame {
                Ok(bytes) => file.write_all(&bytes).await?,
                Err(e) => {
                    drop(file);
                    fs::remove_file(&tmp_path).await?;
                    return Err(e);
                }
            }
        }

        file.flush().await?;
        drop(file);
        fs::rename(&tmp_path, &final_path).await?;

        debug!(name, "wrote object");
        Ok(())
    }
}

/// In-memory store, for tests and dry runs.
#[derive(Default)]
pub struct MemStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bytes of a finished object, if present.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).get(name).cloned()
    }

    /// Names of all finished objects, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ObjectStore for MemStore {
    async fn write_object(
        &self,
        name: &str,
        mut frames: FrameReceiver,
    ) -> Result<(), WriterError> {
        let mut bytes = Vec::new();

        while let Some(frame) = frames.recv().await {
            bytes.extend_from_slice(&frame?);
        }

        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_of(
        frames: Vec<Result<Vec<u8>, WriterError>>,
    ) -> FrameReceiver {
        let (tx, rx) = mpsc::channel(frames.len().max(1));
        for frame in frames {
            tx.try_send(frame).unwrap();
        }
        rx
    }

    #[tokio::test]
    async fn fs_store_persists_an_object_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let frames = channel_of(vec![Ok(b"abc".to_vec()), Ok(b"def".to_vec())]);
        store.write_object("0000000100", frames).await.unwrap();

        let bytes = std::fs::read(dir.path().join("0000000100")).unwrap();
        assert_eq!(bytes, b"abcdef");
        assert!(!dir.path().join("0000000100.tmp").exists());
    }

    #[tokio::test]
    async fn fs_store_discards_aborted_objects() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        let frames = channel_of(vec![
            Ok(b"abc".to_vec()),
            Err(WriterError::Aborted {
                filename: "0000000100".to_string(),
            }),
        ]);
        let result = store.write_object("0000000100", frames).await;

        assert!(matches!(result, Err(WriterError::Aborted { .. })));
        assert!(!dir.path().join("0000000100").exists());
        assert!(!dir.path().join("0000000100.tmp").exists());
    }

    #[tokio::test]
    async fn mem_store_collects_frames() {
        let store = MemStore::new();

        let frames = channel_of(vec![Ok(b"ab".to_vec()), Ok(b"cd".to_vec())]);
        store.write_object("x", frames).await.unwrap();

        assert_eq!(store.get("x"), Some(b"abcd".to_vec()));
        assert_eq!(store.names(), vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn mem_store_keeps_nothing_on_error() {
        let store = MemStore::new();

        let frames = channel_of(vec![
            Ok(b"ab".to_vec()),
            Err(WriterError::ConsumerClosed),
        ]);
        let result = store.write_object("x", frames).await;

        assert!(result.is_err());
        assert_eq!(store.get("x"), None);
    }
}
