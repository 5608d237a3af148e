// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Entity converters from the upstream CometBFT wire messages into the
//! stable `sf.cosmos.type.v2` schema.
//!
//! The upstream messages evolve with the chain software; the output schema
//! does not. Conversion is by field number (see [`cosmos_protos::proto_flip`]),
//! so new upstream fields are dropped silently and only wire-type clashes
//! fail. Both ingestion paths, RPC and local storage, feed [`build_block`]
//! with the same inputs.

use cosmos_protos::{
    cosmos::v2::{
        Block, ConsensusParams, Event, Header, Misbehavior, MisbehaviorType, TxResults, Validator,
        ValidatorUpdate,
    },
    flip_all, proto_flip, ProtosError,
};
use tendermint_proto::{
    google::protobuf::Timestamp as PbTimestamp,
    v0_38::{abci as pb_abci, types as pb_types},
};
use tracing::warn;

use crate::error::ExtractorError;

/// Execution results of one block, as returned by the node.
///
/// `events` carries the block-level events outside any single transaction,
/// already concatenated in phase order by the caller.
#[derive(Default)]
pub struct ExecutionResults {
    pub events: Vec<pb_abci::Event>,
    pub tx_results: Vec<pb_abci::ExecTxResult>,
    pub validator_updates: Vec<pb_abci::ValidatorUpdate>,
    pub consensus_param_updates: Option<pb_types::ConsensusParams>,
}

/// Everything needed to build one canonical block.
pub struct BlockParts {
    /// Block hash, from the block id.
    pub hash: Vec<u8>,
    /// The block as stored or served by the node.
    pub block: pb_types::Block,
    /// Execution results for the same height.
    pub results: ExecutionResults,
}

/// Composes the converters into one canonical [`Block`].
///
/// Any sub-entity failure aborts the whole block, identifying the entity
/// and, for repeated entities, the failing index.
pub fn build_block(parts: BlockParts) -> Result<Block, ExtractorError> {
    let pb_types::Block {
        header,
        data,
        evidence,
        ..
    } = parts.block;

    let header = header.ok_or(ExtractorError::MissingField {
        field: "block header",
    })?;
    let time = header.time.as_ref().map(timestamp);
    let height = header.height;

    let txs: Vec<Vec<u8>> = data
        .map(|data| data.txs.iter().map(|tx| tx.to_vec()).collect())
        .unwrap_or_default();

    Ok(Block {
        hash: parts.hash,
        height,
        time,
        header: Some(convert_header(&header)?),
        misbehavior: misbehaviors_from_evidence(evidence.as_ref())?,
        events: convert_events(&parts.results.events)?,
        txs,
        tx_results: convert_tx_results(&parts.results.tx_results)?,
        validator_updates: convert_validator_updates(&parts.results.validator_updates)?,
        consensus_param_updates: Some(convert_consensus_param_updates(
            parts.results.consensus_param_updates.as_ref(),
        )?),
    })
}

/// Converts the block header.
pub fn convert_header(header: &pb_types::Header) -> Result<Header, ExtractorError> {
    let mut target = Header::default();
    proto_flip(Some(header), &mut target).map_err(flip_error("header"))?;
    Ok(target)
}

/// Converts a list of events, preserving order.
pub fn convert_events(events: &[pb_abci::Event]) -> Result<Vec<Event>, ExtractorError> {
    flip_all(events).map_err(flip_error("event"))
}

/// Converts one execution result per transaction, preserving order.
///
/// The result's log is repaired to valid UTF-8 with U+FFFD replacements, as
/// some applications emit raw bytes there.
pub fn convert_tx_results(
    results: &[pb_abci::ExecTxResult],
) -> Result<Vec<TxResults>, ExtractorError> {
    results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            let mut raw = RawTxResult::default();
            proto_flip(Some(result), &mut raw).map_err(|source| ExtractorError::ConversionAt {
                entity: "tx result",
                index,
                source,
            })?;
            Ok(raw.into_tx_results())
        })
        .collect()
}

/// Converts the validator set changes, preserving order.
pub fn convert_validator_updates(
    updates: &[pb_abci::ValidatorUpdate],
) -> Result<Vec<ValidatorUpdate>, ExtractorError> {
    flip_all(updates).map_err(flip_error("validator update"))
}

/// Converts the consensus parameter changes; an absent input becomes the
/// zero-valued message.
pub fn convert_consensus_param_updates(
    updates: Option<&pb_types::ConsensusParams>,
) -> Result<ConsensusParams, ExtractorError> {
    let mut target = ConsensusParams::default();
    proto_flip(updates, &mut target).map_err(flip_error("consensus param updates"))?;
    Ok(target)
}

/// Flattens the block's evidence into misbehavior records.
///
/// Duplicate-vote evidence becomes one record for the double signer;
/// light-client-attack evidence becomes one record per byzantine validator.
/// Input order is preserved.
pub fn misbehaviors_from_evidence(
    evidence: Option<&pb_types::EvidenceList>,
) -> Result<Vec<Misbehavior>, ExtractorError> {
    let Some(list) = evidence else {
        return Ok(vec![]);
    };

    let mut misbehavior = Vec::new();
    for item in &list.evidence {
        match &item.sum {
            Some(pb_types::evidence::Sum::DuplicateVoteEvidence(dve)) => {
                let vote = dve.vote_a.as_ref().ok_or(ExtractorError::MissingField {
                    field: "duplicate vote evidence vote_a",
                })?;
                misbehavior.push(Misbehavior {
                    r#type: MisbehaviorType::DuplicateVote as i32,
                    validator: Some(Validator {
                        address: vote.validator_address.to_vec(),
                        power: dve.validator_power,
                    }),
                    height: vote.height,
                    time: dve.timestamp.as_ref().map(timestamp),
                    total_voting_power: dve.total_voting_power,
                });
            }
            Some(pb_types::evidence::Sum::LightClientAttackEvidence(lcae)) => {
                for validator in &lcae.byzantine_validators {
                    misbehavior.push(Misbehavior {
                        r#type: MisbehaviorType::LightClientAttack as i32,
                        validator: Some(Validator {
                            address: validator.address.to_vec(),
                            power: validator.voting_power,
                        }),
                        height: lcae.common_height,
                        time: lcae.timestamp.as_ref().map(timestamp),
                        total_voting_power: lcae.total_voting_power,
                    });
                }
            }
            None => warn!("evidence item without a variant, skipping"),
        }
    }
    Ok(misbehavior)
}

/// Lenient mirror of the ABCI tx result.
///
/// The log field is read as raw bytes, tolerating results whose log is not
/// valid UTF-8; [`RawTxResult::into_tx_results`] repairs it.
#[derive(Clone, PartialEq, ::prost::Message)]
pub(crate) struct RawTxResult {
    #[prost(uint32, tag = "1")]
    pub code: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub log: Vec<u8>,
    #[prost(string, tag = "4")]
    pub info: String,
    #[prost(int64, tag = "5")]
    pub gas_wanted: i64,
    #[prost(int64, tag = "6")]
    pub gas_used: i64,
    #[prost(message, repeated, tag = "7")]
    pub events: Vec<Event>,
    #[prost(string, tag = "8")]
    pub codespace: String,
}

impl RawTxResult {
    pub(crate) fn into_tx_results(self) -> TxResults {
        TxResults {
            code: self.code,
            data: self.data,
            log: lossy_utf8(&self.log),
            info: self.info,
            gas_wanted: self.gas_wanted,
            gas_used: self.gas_used,
            events: self.events,
            codespace: self.codespace,
        }
    }
}

fn lossy_utf8(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn timestamp(time: &PbTimestamp) -> ::prost_types::Timestamp {
    ::prost_types::Timestamp {
        seconds: time.seconds,
        nanos: time.nanos,
    }
}

fn flip_error(entity: &'static str) -> impl Fn(ProtosError) -> ExtractorError {
    move |e| match e {
        ProtosError::Element { index, source } => ExtractorError::ConversionAt {
            entity,
            index,
            source: *source,
        },
        e => ExtractorError::Conversion { entity, source: e },
    }
}
