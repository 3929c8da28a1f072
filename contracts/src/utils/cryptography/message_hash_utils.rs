//! Signature message hash utilities for producing digests to be consumed by
//! `ECDSA` recovery or signing.
//!
//! The library provides methods for generating a hash of a message that
//! conforms to the [EIP-712] specification.
//!
//! [EIP-712]: https://eips.ethereum.org/EIPS/eip-712

use alloy_primitives::{keccak256, B256};

/// Prefix for ERC-191 version with `0x01`.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// Returns the keccak256 digest of an EIP-712 typed data (ERC-191 version
/// `0x01`).
///
/// The digest is calculated from a `domain_separator` and a `struct_hash`, by
/// prefixing them with [`TYPED_DATA_PREFIX`] and hashing the result. It
/// corresponds to the hash signed by the [eth_signTypedData] JSON-RPC method as
/// part of EIP-712.
///
/// # Arguments
///
/// * `domain_separator` - Hash of the signing domain.
/// * `struct_hash` - Hash of the typed message.
///
/// [eth_signTypedData]: https://eips.ethereum.org/EIPS/eip-712
#[must_use]
pub fn to_typed_data_hash(domain_separator: &B256, struct_hash: &B256) -> B256 {
    let mut preimage = [0u8; 66];
    preimage[..2].copy_from_slice(&TYPED_DATA_PREFIX);
    preimage[2..34].copy_from_slice(domain_separator.as_slice());
    preimage[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(preimage)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{b256, keccak256};

    use super::*;

    #[test]
    fn test_to_typed_data_hash() {
        // TYPE_HASH
        let domain_separator = b256!(
            "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
        );
        // bytes32("stylus");
        let struct_hash = b256!(
            "7379746c75730000000000000000000000000000000000000000000000000000"
        );
        let expected = b256!(
            "cefc47137f8165d8270433dd62e395f5672966b83a113a7bb7b2805730a2197e"
        );

        assert_eq!(
            expected,
            to_typed_data_hash(&domain_separator, &struct_hash),
        );
    }

    #[test]
    fn prefix_comes_before_separator_and_struct_hash() {
        let domain_separator = keccak256("domain");
        let struct_hash = keccak256("message");

        let mut preimage = Vec::from(TYPED_DATA_PREFIX);
        preimage.extend_from_slice(domain_separator.as_slice());
        preimage.extend_from_slice(struct_hash.as_slice());

        assert_eq!(
            keccak256(preimage),
            to_typed_data_hash(&domain_separator, &struct_hash)
        );
        assert_ne!(
            to_typed_data_hash(&struct_hash, &domain_separator),
            to_typed_data_hash(&domain_separator, &struct_hash)
        );
    }
}
