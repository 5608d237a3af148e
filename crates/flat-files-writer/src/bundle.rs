// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{ops::RangeInclusive, sync::Arc};

use async_trait::async_trait;
use cosmos_protos::BstreamBlock;
use prost::Message;
use tokio::sync::mpsc;
use tracing::info;

use crate::{
    dbin::{header_frame, message_frame},
    error::WriterError,
    store::ObjectStore,
};

/// Number of blocks per bundle file.
pub const BUNDLE_WIDTH: u64 = 100;

/// Content type written into each file header.
const CONTENT_TYPE: &str = "sf.cosmos.type.v2.Block";

type Frame = Result<Vec<u8>, WriterError>;

/// Object name for the file starting at `height`: the height zero-padded to
/// ten digits, so lexicographic order is height order.
pub fn filename(height: u64) -> String {
    format!("{height:010}")
}

/// Error produced while loading or converting one block.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies block envelopes by height.
#[async_trait]
pub trait BlockSource: Send {
    /// Inclusive range of heights this source can serve, or `None` when the
    /// source follows a live chain and has no fixed bounds.
    fn block_range(&self) -> Option<(u64, u64)>;

    /// Produces the envelope for one height.
    async fn envelope(&mut self, height: u64) -> Result<BstreamBlock, SourceError>;
}

/// Writes block envelopes from a [`BlockSource`] into dbin files on an
/// [`ObjectStore`].
///
/// Each file is streamed through a bounded channel to a consumer task, so at
/// most one encoded block is in flight per file. The first error on either
/// side aborts the file; an aborted file is never persisted.
pub struct BundleWriter<S> {
    store: Arc<S>,
}

impl<S: ObjectStore> BundleWriter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Writes `BUNDLE_WIDTH`-block bundles covering `[start, end)`.
    ///
    /// Both bounds must sit on a bundle boundary and the whole range must lie
    /// within the source's retained range; all validation happens before the
    /// first byte of I/O.
    pub async fn write_bundles<B: BlockSource>(
        &self,
        source: &mut B,
        start: u64,
        end: u64,
    ) -> Result<(), WriterError> {
        if start % BUNDLE_WIDTH != 0 {
            return Err(WriterError::BoundaryMisaligned {
                bound: "start",
                value: start,
                width: BUNDLE_WIDTH,
            });
        }
        if end % BUNDLE_WIDTH != 0 {
            return Err(WriterError::BoundaryMisaligned {
                bound: "end",
                value: end,
                width: BUNDLE_WIDTH,
            });
        }
        if let Some((first, last)) = source.block_range() {
            if start < first {
                return Err(WriterError::StartBeforeRetained { start, first });
            }
            if end > 0 && end - 1 > last {
                return Err(WriterError::EndAfterRetained { end, last });
            }
        }

        let mut base = start;
        while base < end {
            let name = filename(base);
            self.write_file(&name, source, base..=base + BUNDLE_WIDTH - 1)
                .await?;
            info!(filename = %name, "wrote bundle");
            base += BUNDLE_WIDTH;
        }
        Ok(())
    }

    /// Writes one file per block for every height in `[start, end]`.
    pub async fn write_one_blocks<B: BlockSource>(
        &self,
        source: &mut B,
        start: u64,
        end: u64,
    ) -> Result<(), WriterError> {
        if let Some((first, last)) = source.block_range() {
            if start < first {
                return Err(WriterError::StartBeforeRetained { start, first });
            }
            if end > last {
                return Err(WriterError::EndAfterRetained { end, last });
            }
        }

        for height in start..=end {
            let name = filename(height);
            self.write_file(&name, source, height..=height).await?;
            info!(filename = %name, "wrote block file");
        }
        Ok(())
    }

    /// Streams the envelopes for `heights` into one object.
    ///
    /// The consumer runs as a spawned task while production stays on the
    /// caller's task; dropping the returned future cancels both sides and
    /// persists nothing.
    async fn write_file<B: BlockSource>(
        &self,
        name: &str,
        source: &mut B,
        heights: RangeInclusive<u64>,
    ) -> Result<(), WriterError> {
        let (tx, rx) = mpsc::channel::<Frame>(1);

        let store = Arc::clone(&self.store);
        let object = name.to_string();
        let consumer = tokio::spawn(async move { store.write_object(&object, rx).await });

        match Self::produce(&tx, source, heights).await {
            Ok(()) => {
                drop(tx);
                consumer.await?
            }
            Err(e) => {
                // Tell the consumer the file is dead so it can clean up,
                // then report whichever side failed first.
                let _ = tx
                    .send(Err(WriterError::Aborted {
                        filename: name.to_string(),
                    }))
                    .await;
                drop(tx);
                let consumed = consumer.await?;
                match e {
                    WriterError::ConsumerClosed => consumed,
                    e => Err(e),
                }
            }
        }
    }

    async fn produce<B: BlockSource>(
        tx: &mpsc::Sender<Frame>,
        source: &mut B,
        heights: RangeInclusive<u64>,
    ) -> Result<(), WriterError> {
        Self::send(tx, header_frame(CONTENT_TYPE)?).await?;

        for height in heights {
            let envelope = source
                .envelope(height)
                .await
                .map_err(|source| WriterError::Source { height, source })?;
            Self::send(tx, message_frame(&envelope.encode_to_vec())?).await?;
        }
        Ok(())
    }

    async fn send(tx: &mpsc::Sender<Frame>, frame: Vec<u8>) -> Result<(), WriterError> {
        tx.send(Ok(frame))
            .await
            .map_err(|_| WriterError::ConsumerClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    struct EmptySource {
        first: u64,
        last: u64,
    }

    #[async_trait]
    impl BlockSource for EmptySource {
        fn block_range(&self) -> Option<(u64, u64)> {
            Some((self.first, self.last))
        }

        async fn envelope(&mut self, _height: u64) -> Result<BstreamBlock, SourceError> {
            unreachable!("validation must reject the range before any load")
        }
    }

    fn writer() -> (BundleWriter<MemStore>, Arc<MemStore>) {
        let store = Arc::new(MemStore::new());
        (BundleWriter::new(Arc::clone(&store)), store)
    }

    #[test]
    fn filenames_are_zero_padded_heights() {
        assert_eq!(filename(0), "0000000000");
        assert_eq!(filename(100), "0000000100");
        assert_eq!(filename(4_987_300), "0004987300");
    }

    #[tokio::test]
    async fn rejects_misaligned_start() {
        let (writer, store) = writer();
        let mut source = EmptySource {
            first: 0,
            last: 1_000,
        };

        let result = writer.write_bundles(&mut source, 50, 200).await;

        assert!(matches!(
            result,
            Err(WriterError::BoundaryMisaligned {
                bound: "start",
                value: 50,
                ..
            })
        ));
        assert!(store.names().is_empty());
    }

    #[tokio::test]
    async fn rejects_misaligned_end() {
        let (writer, store) = writer();
        let mut source = EmptySource {
            first: 0,
            last: 1_000,
        };

        let result = writer.write_bundles(&mut source, 100, 250).await;

        assert!(matches!(
            result,
            Err(WriterError::BoundaryMisaligned {
                bound: "end",
                value: 250,
                ..
            })
        ));
        assert!(store.names().is_empty());
    }

    #[tokio::test]
    async fn rejects_range_outside_retained_blocks() {
        let (writer, store) = writer();
        let mut source = EmptySource {
            first: 500,
            last: 899,
        };

        let before = writer.write_bundles(&mut source, 400, 600).await;
        assert!(matches!(
            before,
            Err(WriterError::StartBeforeRetained { start: 400, first: 500 })
        ));

        let after = writer.write_bundles(&mut source, 500, 1_000).await;
        assert!(matches!(
            after,
            Err(WriterError::EndAfterRetained { end: 1_000, last: 899 })
        ));

        assert!(store.names().is_empty());
    }

    #[tokio::test]
    async fn empty_range_writes_nothing() {
        let (writer, store) = writer();
        let mut source = EmptySource {
            first: 0,
            last: 1_000,
        };

        writer.write_bundles(&mut source, 300, 300).await.unwrap();
        assert!(store.names().is_empty());
    }
}
