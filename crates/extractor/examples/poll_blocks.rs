// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Polls a CometBFT node and writes one-block dbin files to `./one-blocks`,
//! resuming from `./cursor.json` across restarts.
//!
//! ```shell
//! COMET_RPC=http://localhost:26657 cargo run -p extractor --example poll_blocks
//! ```

use std::{sync::Arc, time::Duration};

use block_extractor::{
    fetcher::RpcBlockFetcher,
    poller::{CursorFile, Poller},
    rpc::CometHttpClient,
};
use flat_files_writer::{BundleWriter, FsStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let endpoint =
        std::env::var("COMET_RPC").unwrap_or_else(|_| "http://localhost:26657".to_string());

    let fetcher = RpcBlockFetcher::new(
        vec![CometHttpClient::new(&endpoint)?],
        Duration::from_secs(1),
        Duration::from_secs(1),
    )?;
    let writer = BundleWriter::new(Arc::new(FsStore::new("one-blocks")));
    let cursor = CursorFile::new("cursor.json");

    let mut poller = Poller::new(fetcher, writer, cursor, 1);
    poller.run().await?;
    Ok(())
}
