//! Signature hashing and recovery.
pub mod ecdsa;
pub mod eip712;
pub mod message_hash_utils;
