// Copyright 2025 Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Vendored `sf.cosmos.type.v2` messages.
//!
//! Field numbers deliberately mirror the CometBFT/ABCI wire messages they are
//! converted from (see [`crate::proto_flip`]); only the fields this schema
//! keeps are declared, everything else upstream is dropped on conversion.

mod block;

/// One finalized block together with its execution results.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Block {
    /// Block hash.
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    /// Block height.
    #[prost(int64, tag = "2")]
    pub height: i64,
    /// Block time from the header.
    #[prost(message, optional, tag = "3")]
    pub time: ::core::option::Option<::prost_types::Timestamp>,
    /// Block header.
    #[prost(message, optional, tag = "4")]
    pub header: ::core::option::Option<Header>,
    /// Validator faults evidenced in this block, flattened.
    #[prost(message, repeated, tag = "5")]
    pub misbehavior: ::prost::alloc::vec::Vec<Misbehavior>,
    /// Block-level events emitted outside any single transaction, in
    /// emission order.
    #[prost(message, repeated, tag = "6")]
    pub events: ::prost::alloc::vec::Vec<Event>,
    /// Raw transaction bytes, in block order.
    #[prost(bytes = "vec", repeated, tag = "7")]
    pub txs: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
    /// One result per transaction, same order as `txs`.
    #[prost(message, repeated, tag = "8")]
    pub tx_results: ::prost::alloc::vec::Vec<TxResults>,
    /// Validator set changes decided at this height.
    #[prost(message, repeated, tag = "9")]
    pub validator_updates: ::prost::alloc::vec::Vec<ValidatorUpdate>,
    /// Consensus parameter changes decided at this height; zero-valued when
    /// the block changed nothing.
    #[prost(message, optional, tag = "10")]
    pub consensus_param_updates: ::core::option::Option<ConsensusParams>,
}

/// Block header; opaque pass-through of the CometBFT header fields.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Header {
    #[prost(message, optional, tag = "1")]
    pub version: ::core::option::Option<Consensus>,
    #[prost(string, tag = "2")]
    pub chain_id: ::prost::alloc::string::String,
    #[prost(int64, tag = "3")]
    pub height: i64,
    #[prost(message, optional, tag = "4")]
    pub time: ::core::option::Option<::prost_types::Timestamp>,
    /// Reference to the parent block.
    #[prost(message, optional, tag = "5")]
    pub last_block_id: ::core::option::Option<BlockId>,
    #[prost(bytes = "vec", tag = "6")]
    pub last_commit_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "7")]
    pub data_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "8")]
    pub validators_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "9")]
    pub next_validators_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "10")]
    pub consensus_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "11")]
    pub app_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "12")]
    pub last_results_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "13")]
    pub evidence_hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "14")]
    pub proposer_address: ::prost::alloc::vec::Vec<u8>,
}

/// Block protocol version.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Consensus {
    #[prost(uint64, tag = "1")]
    pub block: u64,
    #[prost(uint64, tag = "2")]
    pub app: u64,
}

/// Hash reference to a block.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockId {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub part_set_header: ::core::option::Option<PartSetHeader>,
}

/// Part set metadata of a block.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PartSetHeader {
    #[prost(uint32, tag = "1")]
    pub total: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
}

/// A typed event with key/value attributes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Event {
    #[prost(string, tag = "1")]
    pub r#type: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub attributes: ::prost::alloc::vec::Vec<EventAttribute>,
}

/// One event attribute.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EventAttribute {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
    /// Whether the attribute was indexed by the node.
    #[prost(bool, tag = "3")]
    pub index: bool,
}

/// Execution result of a single transaction.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TxResults {
    /// Response code; zero means success.
    #[prost(uint32, tag = "1")]
    pub code: u32,
    /// Opaque result data returned by the application.
    #[prost(bytes = "vec", tag = "2")]
    pub data: ::prost::alloc::vec::Vec<u8>,
    /// Free-form log text; always valid UTF-8.
    #[prost(string, tag = "3")]
    pub log: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub info: ::prost::alloc::string::String,
    #[prost(int64, tag = "5")]
    pub gas_wanted: i64,
    #[prost(int64, tag = "6")]
    pub gas_used: i64,
    /// Events emitted while executing this transaction, in emission order.
    #[prost(message, repeated, tag = "7")]
    pub events: ::prost::alloc::vec::Vec<Event>,
    /// Namespace of the response code.
    #[prost(string, tag = "8")]
    pub codespace: ::prost::alloc::string::String,
}

/// A validator set change: addition, removal (power zero) or power change.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidatorUpdate {
    #[prost(message, optional, tag = "1")]
    pub pub_key: ::core::option::Option<PublicKey>,
    #[prost(int64, tag = "2")]
    pub power: i64,
}

/// A validator public key.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublicKey {
    #[prost(oneof = "public_key::Sum", tags = "1, 2")]
    pub sum: ::core::option::Option<public_key::Sum>,
}

/// Nested types for [`PublicKey`].
pub mod public_key {
    /// The key variants.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Sum {
        /// Ed25519 public key bytes.
        #[prost(bytes, tag = "1")]
        Ed25519(::prost::alloc::vec::Vec<u8>),
        /// Secp256k1 public key bytes.
        #[prost(bytes, tag = "2")]
        Secp256k1(::prost::alloc::vec::Vec<u8>),
    }
}

/// Consensus parameters in force, present only when changed.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusParams {
    #[prost(message, optional, tag = "1")]
    pub block: ::core::option::Option<BlockParams>,
    #[prost(message, optional, tag = "2")]
    pub evidence: ::core::option::Option<EvidenceParams>,
    #[prost(message, optional, tag = "3")]
    pub validator: ::core::option::Option<ValidatorParams>,
    #[prost(message, optional, tag = "4")]
    pub version: ::core::option::Option<VersionParams>,
}

/// Block size and gas limits.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct BlockParams {
    #[prost(int64, tag = "1")]
    pub max_bytes: i64,
    #[prost(int64, tag = "2")]
    pub max_gas: i64,
}

/// Evidence acceptance window.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EvidenceParams {
    #[prost(int64, tag = "1")]
    pub max_age_num_blocks: i64,
    #[prost(message, optional, tag = "2")]
    pub max_age_duration: ::core::option::Option<::prost_types::Duration>,
    #[prost(int64, tag = "3")]
    pub max_bytes: i64,
}

/// Accepted validator key types.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ValidatorParams {
    #[prost(string, repeated, tag = "1")]
    pub pub_key_types: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,
}

/// ABCI application version.
#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct VersionParams {
    #[prost(uint64, tag = "1")]
    pub app: u64,
}

/// Identity and power of a faulty validator.
///
/// Tag 2 is reserved upstream, hence the gap.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Validator {
    #[prost(bytes = "vec", tag = "1")]
    pub address: ::prost::alloc::vec::Vec<u8>,
    #[prost(int64, tag = "3")]
    pub power: i64,
}

/// One record of a validator fault.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Misbehavior {
    #[prost(enumeration = "MisbehaviorType", tag = "1")]
    pub r#type: i32,
    /// The offending validator.
    #[prost(message, optional, tag = "2")]
    pub validator: ::core::option::Option<Validator>,
    /// Height at which the fault occurred.
    #[prost(int64, tag = "3")]
    pub height: i64,
    #[prost(message, optional, tag = "4")]
    pub time: ::core::option::Option<::prost_types::Timestamp>,
    /// Total voting power of the validator set at that height.
    #[prost(int64, tag = "5")]
    pub total_voting_power: i64,
}

/// The kinds of validator fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MisbehaviorType {
    /// Unknown fault.
    Unknown = 0,
    /// The validator signed two different votes for the same round.
    DuplicateVote = 1,
    /// The validator took part in a light-client attack.
    LightClientAttack = 2,
}
