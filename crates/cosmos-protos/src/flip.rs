// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Re-map one wire message onto a structurally compatible but independently
//! versioned message by round-tripping through the protobuf wire encoding.
//!
//! The upstream CometBFT schema evolves with every chain-software release
//! while the output schema must stay stable. Rather than maintaining
//! hand-written field mappings per upstream version, messages are re-encoded
//! and decoded into the target type; fields unknown to the target are
//! silently discarded by the decoder, so schema additions upstream are
//! tolerated for free.

use prost::Message;

use crate::error::ProtosError;

/// Flip `origin` into `target` by wire re-encoding.
///
/// A `None` origin is a no-op and leaves the target untouched. Fields of the
/// origin that the target schema does not know are discarded; an actual wire
/// incompatibility (for example a scalar re-declared as a message) is an
/// error.
pub fn proto_flip<S, T>(origin: Option<&S>, target: &mut T) -> Result<(), ProtosError>
where
    S: Message,
    T: Message,
{
    let Some(origin) = origin else {
        return Ok(());
    };

    let mut buf = Vec::with_capacity(origin.encoded_len());
    origin.encode(&mut buf)?;
    target.merge(buf.as_slice())?;

    Ok(())
}

/// Flip two equal-length sequences element-wise.
///
/// A length mismatch is a programmer error and fails before any element is
/// converted; the first failing element aborts the batch, reporting its
/// index.
pub fn array_proto_flip<S, T>(origins: &[S], targets: &mut [T]) -> Result<(), ProtosError>
where
    S: Message,
    T: Message,
{
    if origins.len() != targets.len() {
        return Err(ProtosError::LengthMismatch {
            origins: origins.len(),
            targets: targets.len(),
        });
    }

    for (index, (origin, target)) in origins.iter().zip(targets.iter_mut()).enumerate() {
        proto_flip(Some(origin), target).map_err(|source| ProtosError::Element {
            index,
            source: Box::new(source),
        })?;
    }

    Ok(())
}

/// Flip a sequence into a freshly allocated vector of zero-valued targets.
pub fn flip_all<S, T>(origins: &[S]) -> Result<Vec<T>, ProtosError>
where
    S: Message,
    T: Message + Default,
{
    let mut targets: Vec<T> = (0..origins.len()).map(|_| T::default()).collect();
    array_proto_flip(origins, &mut targets)?;
    Ok(targets)
}
