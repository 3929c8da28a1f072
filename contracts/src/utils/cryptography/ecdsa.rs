//! Elliptic Curve Digital Signature Algorithm (ECDSA) operations.
//!
//! These functions can be used to verify that a message was signed
//! by the holder of the private keys of a given address.
use alloc::vec::Vec;

use alloy_primitives::{address, uint, Address, B256, U256};
use alloy_sol_types::SolType;
use stylus_sdk::{
    call::MethodError,
    prelude::*,
    stylus_core::calls::context::Call,
};

/// Address of the `ecRecover` EVM precompile.
pub const ECRECOVER_ADDR: Address =
    address!("0000000000000000000000000000000000000001");

/// Upper range for `s` value from the signature.
pub const SIGNATURE_S_UPPER_BOUND: U256 = uint!(
    0x7FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF5D576E7357A4501DDFE92F46681B20A0_U256
);

pub use sol::*;
#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// The signature derives the [`Address::ZERO`].
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ECDSAInvalidSignature();

        /// The signature has an `S` value that is in the upper half order.
        ///
        /// * `s` - Invalid `S` value.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ECDSAInvalidSignatureS(bytes32 s);
    }

    sol! {
        /// Struct with callable data to the `ecRecover` precompile.
        #[allow(missing_docs)]
        struct EcRecoverData {
            /// EIP-191 Hash of the message.
            bytes32 hash;
            /// `v` value from the signature.
            uint8 v;
            /// `r` value from the signature.
            bytes32 r;
            /// `s` value from the signature.
            bytes32 s;
        }
    }
}

/// An error that occurred in the implementation of an `ECDSA` library.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The signature derives the [`Address::ZERO`].
    InvalidSignature(ECDSAInvalidSignature),
    /// The signature has an `S` value that is in the upper half order.
    InvalidSignatureS(ECDSAInvalidSignatureS),
}

impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// Returns the address that signed a hashed message (`hash`).
///
/// # Arguments
///
/// * `vm` - Host used to call the `ecRecover` precompile.
/// * `hash` - Hash of the message.
/// * `v` - `v` value from the signature.
/// * `r` - `r` value from the signature.
/// * `s` - `s` value from the signature.
///
/// # Errors
///
/// * [`Error::InvalidSignatureS`] - If the `s` value is grater than
///   [`SIGNATURE_S_UPPER_BOUND`].
/// * [`Error::InvalidSignature`] - If `v` is neither 27 nor 28, or no
///   address can be recovered from the signature.
///
/// # Panics
///
/// * If the `ecRecover` precompile call itself fails.
pub fn recover(
    vm: &dyn Host,
    hash: B256,
    v: u8,
    r: B256,
    s: B256,
) -> Result<Address, Error> {
    check_if_malleable(&s)?;
    // If the signature is valid (and not malleable), return the signer address.
    _recover(vm, hash, v, r, s)
}

/// Calls `ecRecover` EVM precompile.
///
/// The `ecRecover` EVM precompile allows for malleable (non-unique) signatures:
/// this function rejects them by requiring the `s` value to be in the lower
/// half order, and the `v` value to be either 27 or 28.
///
/// # Arguments
///
/// * `vm` - Host used to call the `ecRecover` precompile.
/// * `hash` - Hash of the message.
/// * `v` - `v` value from the signature.
/// * `r` - `r` value from the signature.
/// * `s` - `s` value from the signature.
///
/// # Errors
///
/// * [`Error::InvalidSignature`] - If `v` is neither 27 nor 28, the
///   precompile returns no address, or the recovered address is
///   [`Address::ZERO`].
fn _recover(
    vm: &dyn Host,
    hash: B256,
    v: u8,
    r: B256,
    s: B256,
) -> Result<Address, Error> {
    if v != 27 && v != 28 {
        return Err(ECDSAInvalidSignature {}.into());
    }

    let calldata = encode_calldata(hash, v, r, s);

    // Unrecoverable signatures yield empty or zeroed output, not a revert.
    let recovered = vm
        .static_call(&Call::new(), ECRECOVER_ADDR, &calldata)
        .expect("should call `ecRecover` precompile");
    if recovered.len() != 32 {
        return Err(ECDSAInvalidSignature {}.into());
    }

    let recovered = Address::from_slice(&recovered[12..]);

    if recovered.is_zero() {
        return Err(ECDSAInvalidSignature {}.into());
    }
    Ok(recovered)
}

/// Encodes call data for `ecRecover` EVM precompile.
///
/// # Arguments
///
/// * `hash` - Hash of the message.
/// * `v` - `v` value from the signature.
/// * `r` - `r` value from the signature.
/// * `s` - `s` value from the signature.
fn encode_calldata(hash: B256, v: u8, r: B256, s: B256) -> Vec<u8> {
    let calldata = EcRecoverData { hash, v, r, s };
    EcRecoverData::abi_encode(&calldata)
}

/// Validates the `s` value of a signature.
///
/// EIP-2 still allows signature malleability for `ecRecover` precompile.
///
/// Remove this possibility and make the signature unique.
///
/// Appendix F in the [Ethereum Yellow paper], defines the valid range for s in
/// (301): 0 < s < secp256k1n ÷ 2 + 1, and for v in (302): v ∈ {27, 28}.
///
/// Most signatures from current libraries generate a unique signature
/// with an s-value in the lower half order.
///
/// If your library generates malleable signatures,
/// such as s-values in the upper range, calculate a new s-value
/// with 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141 -
/// s1, and flip v from 27 to 28 or vice versa.
///
/// # Arguments
///
/// * `s` - `s` value from the signature.
///
/// # Errors
///
/// * [`Error::InvalidSignatureS`] - If the `s` value is greater than
///   [`SIGNATURE_S_UPPER_BOUND`].
///
/// [Ethereum Yellow paper]: https://ethereum.github.io/yellowpaper/paper.pdf
fn check_if_malleable(s: &B256) -> Result<(), Error> {
    let s_u256 = U256::from_be_slice(s.as_slice());
    if s_u256 > SIGNATURE_S_UPPER_BOUND {
        return Err(ECDSAInvalidSignatureS { s: *s }.into());
    }
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use alloy_primitives::{b256, keccak256, B256};
    use alloy_signer::SignerSync;
    use alloy_sol_types::SolError;
    use motsu::prelude::*;

    use super::*;

    const MSG_HASH: B256 = b256!(
        "a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2"
    );
    const V: u8 = 28;
    const R: B256 = b256!(
        "65e72b1cf8e189569963750e10ccb88fe89389daeeb8b735277d59cd6885ee82"
    );
    const S: B256 = b256!(
        "3eb5a6982b540f185703492dab77b863a88ce01f27e21ade8b2879c10fc9e653"
    );

    #[storage]
    struct Verifier;

    unsafe impl TopLevelStorage for Verifier {}

    #[public]
    impl Verifier {}

    impl Verifier {
        fn recover(
            &self,
            hash: B256,
            v: u8,
            r: B256,
            s: B256,
        ) -> Result<Address, Error> {
            recover(self.vm(), hash, v, r, s)
        }
    }

    fn sign(account: &Account, hash: &B256) -> (u8, B256, B256) {
        let signature = account
            .signer()
            .sign_hash_sync(hash)
            .expect("should sign hash");
        (
            27 + u8::from(signature.v()),
            signature.r().into(),
            signature.s().into(),
        )
    }

    #[test]
    fn prepares_calldata() {
        let expected = alloy_primitives::bytes!("a1de988600a42c4b4ab089b619297c17d53cffae5d5120d82d8a92d0bb3b78f2000000000000000000000000000000000000000000000000000000000000001c65e72b1cf8e189569963750e10ccb88fe89389daeeb8b735277d59cd6885ee823eb5a6982b540f185703492dab77b863a88ce01f27e21ade8b2879c10fc9e653");
        let calldata = encode_calldata(MSG_HASH, V, R, S);
        assert_eq!(expected, calldata);
    }

    #[test]
    fn rejects_invalid_s() {
        let invalid_s = SIGNATURE_S_UPPER_BOUND + U256::ONE;
        let invalid_s = B256::from_slice(&invalid_s.to_be_bytes_vec());
        let err = check_if_malleable(&invalid_s)
            .expect_err("should return ECDSAInvalidSignatureS");

        assert!(matches!(err,
                Error::InvalidSignatureS(ECDSAInvalidSignatureS {
                    s
                }) if s == invalid_s
        ));
    }

    #[test]
    fn validates_s() {
        let valid_s = SIGNATURE_S_UPPER_BOUND - U256::ONE;
        let valid_s = B256::from_slice(&valid_s.to_be_bytes_vec());
        let result = check_if_malleable(&valid_s);
        assert!(result.is_ok());
    }

    #[motsu::test]
    fn recovers_signer(contract: Contract<Verifier>, alice: Account) {
        let hash = keccak256("message");
        let (v, r, s) = sign(&alice, &hash);

        let signer = contract
            .sender(&alice)
            .recover(hash, v, r, s)
            .motsu_expect("should recover signer");

        assert_eq!(alice.address(), signer);
    }

    #[motsu::test]
    fn recovers_other_address_for_other_message(
        contract: Contract<Verifier>,
        alice: Account,
    ) {
        let (v, r, s) = sign(&alice, &keccak256("message"));

        let signer = contract
            .sender(&alice)
            .recover(keccak256("other message"), v, r, s)
            .motsu_expect("should recover some address");

        assert_ne!(alice.address(), signer);
    }

    #[motsu::test]
    fn recover_fails_when_s_is_malleable(
        contract: Contract<Verifier>,
        alice: Account,
    ) {
        let hash = keccak256("message");
        let (v, r, s) = sign(&alice, &hash);
        let secp256k1n = SIGNATURE_S_UPPER_BOUND * U256::from(2) + U256::ONE;
        let flipped_s = B256::from(secp256k1n - U256::from_be_bytes(s.0));
        let flipped_v = if v == 27 { 28 } else { 27 };

        let err = contract
            .sender(&alice)
            .recover(hash, flipped_v, r, flipped_s)
            .motsu_expect_err("should return ECDSAInvalidSignatureS");

        assert!(matches!(
            err,
            Error::InvalidSignatureS(ECDSAInvalidSignatureS { s })
                if s == flipped_s
        ));
    }

    #[motsu::test]
    fn _recover_fails_when_v_is_0_or_1(
        contract: Contract<Verifier>,
        alice: Address,
    ) {
        for v in [0, 1] {
            let err = contract
                .sender(alice)
                .recover(MSG_HASH, v, R, S)
                .motsu_expect_err("should return ECDSAInvalidSignature");

            assert!(matches!(
                err,
                Error::InvalidSignature(ECDSAInvalidSignature {})
            ));
        }
    }

    #[motsu::test]
    fn _recover_fails_when_v_is_out_of_range(
        contract: Contract<Verifier>,
        alice: Address,
    ) {
        let invalid_v = 30;

        let err = contract
            .sender(alice)
            .recover(MSG_HASH, invalid_v, R, S)
            .motsu_expect_err("should return ECDSAInvalidSignature");

        assert!(matches!(
            err,
            Error::InvalidSignature(ECDSAInvalidSignature {})
        ));
    }

    #[motsu::test]
    fn _recover_fails_when_point_is_not_on_curve(
        contract: Contract<Verifier>,
        alice: Address,
    ) {
        let err = contract
            .sender(alice)
            .recover(MSG_HASH, V, B256::ZERO, S)
            .motsu_expect_err("should return ECDSAInvalidSignature");

        assert!(matches!(
            err,
            Error::InvalidSignature(ECDSAInvalidSignature {})
        ));
    }

    #[test]
    fn error_encodes_selector() {
        let encoded: Vec<u8> =
            Error::InvalidSignature(ECDSAInvalidSignature {}).into();
        assert_eq!(ECDSAInvalidSignature::SELECTOR.as_slice(), encoded);
    }
}
