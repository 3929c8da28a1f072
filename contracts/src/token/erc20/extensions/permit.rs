//! Permit Contract.
//!
//! Extension of the ERC-20 standard allowing approvals to be made
//! via signatures, as defined in the [ERC].
//!
//! Adds the `permit` method, which can be used to change an account’s
//! ERC20 allowance (see [`crate::token::erc20::IErc20::allowance`])
//! by presenting a message signed by the account.
//! By not relying on [`crate::token::erc20::IErc20::approve`],
//! the token holder account doesn’t need to send a transaction,
//! and thus is not required to hold Ether at all.
//!
//! [ERC]: https://eips.ethereum.org/EIPS/eip-2612
use alloc::{string::String, vec, vec::Vec};

use alloy_primitives::{b256, keccak256, Address, B256, U256};
use alloy_sol_types::{sol, Panic, SolType};
use stylus_sdk::{call::MethodError, prelude::*};

use crate::{
    token::erc20::{self, Erc20},
    utils::{
        cryptography::{
            ecdsa,
            eip712::{Eip712, IEip712},
        },
        nonces::Nonces,
    },
};

/// keccak256("Permit(address owner,address spender,uint256 value,uint256
/// nonce,uint256 deadline)")
pub const PERMIT_TYPEHASH: B256 = b256!(
    "6e71edae12b1b97f4d1f60370fef10105fa2faae0126114a169c64845d6126c9"
);

pub(crate) type StructHashTuple = sol! {
    tuple(bytes32, address, address, uint256, uint256, uint256)
};

pub use sol::*;
#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Indicates an error related to the fact that
        /// permit deadline has expired.
        ///
        /// * `deadline` - Timestamp after which the signature is no longer
        ///   accepted.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC2612ExpiredSignature(uint256 deadline);

        /// Indicates an error related to the issue about mismatched signature.
        ///
        /// * `signer` - Address recovered from the signature.
        /// * `owner` - Address the permit was requested for.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ERC2612InvalidSigner(address signer, address owner);
    }
}

/// A Permit error.
///
/// Covers the errors of every contract `permit` calls into, so contracts
/// composing [`Erc20Permit`] can return it from all of their operations.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// Indicates an error related to the fact that
    /// permit deadline has expired.
    ExpiredSignature(ERC2612ExpiredSignature),
    /// Indicates an error related to the issue about mismatched signature.
    InvalidSigner(ERC2612InvalidSigner),
    /// Indicates an error related to the current balance of `sender`. Used in
    /// transfers.
    InsufficientBalance(erc20::ERC20InsufficientBalance),
    /// Indicates a failure with the token `sender`. Used in transfers.
    InvalidSender(erc20::ERC20InvalidSender),
    /// Indicates a failure with the token `receiver`. Used in transfers.
    InvalidReceiver(erc20::ERC20InvalidReceiver),
    /// Indicates a failure with the `spender`’s `allowance`. Used in
    /// transfers.
    InsufficientAllowance(erc20::ERC20InsufficientAllowance),
    /// The total supply would exceed [`U256::MAX`].
    ArithmeticOverflow(Panic),
    /// The signature derives the [`Address::ZERO`].
    InvalidSignature(ecdsa::ECDSAInvalidSignature),
    /// The signature has an `S` value that is in the upper half order.
    InvalidSignatureS(ecdsa::ECDSAInvalidSignatureS),
}

impl From<erc20::Error> for Error {
    fn from(value: erc20::Error) -> Self {
        match value {
            erc20::Error::InsufficientBalance(e) => {
                Error::InsufficientBalance(e)
            }
            erc20::Error::InvalidSender(e) => Error::InvalidSender(e),
            erc20::Error::InvalidReceiver(e) => Error::InvalidReceiver(e),
            erc20::Error::InsufficientAllowance(e) => {
                Error::InsufficientAllowance(e)
            }
            erc20::Error::ArithmeticOverflow(e) => Error::ArithmeticOverflow(e),
        }
    }
}

impl From<ecdsa::Error> for Error {
    fn from(value: ecdsa::Error) -> Self {
        match value {
            ecdsa::Error::InvalidSignature(e) => Error::InvalidSignature(e),
            ecdsa::Error::InvalidSignatureS(e) => Error::InvalidSignatureS(e),
        }
    }
}

impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of a Permit Contract.
#[storage]
pub struct Erc20Permit<T: IEip712> {
    /// Signing domain of the permits.
    pub(crate) eip712: Eip712<T>,
}

impl<T: IEip712> Erc20Permit<T> {
    /// Caches the domain separator of the permits. Should be called once,
    /// when the contract is deployed.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    pub fn initialize(&mut self) {
        self.eip712.initialize();
    }

    /// Returns the domain separator used in the encoding of the signature for
    /// [`Self::permit`], as defined by EIP712.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn domain_separator(&self) -> B256 {
        self.eip712.domain_separator_v4()
    }

    /// Returns the fields and values that describe the domain separator used
    /// by this contract for EIP-712 signature.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn eip712_domain(
        &self,
    ) -> ([u8; 1], String, String, U256, Address, [u8; 32], Vec<U256>) {
        self.eip712.eip712_domain()
    }

    /// Sets `value` as the allowance of `spender` over `owner`'s tokens,
    /// given `owner`'s signed approval.
    ///
    /// The nonce of `owner` is consumed before the signature is checked and
    /// stays consumed when the signature turns out to be invalid.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - Account that owns the tokens.
    /// * `spender` - Account that will spend the tokens.
    /// * `value` - The number of tokens being permitted to transfer by
    ///   `spender`.
    /// * `deadline` - Deadline for the permit action.
    /// * `v` - v value from the `owner`'s signature.
    /// * `r` - r value from the `owner`'s signature.
    /// * `s` - s value from the `owner`'s signature.
    /// * `erc20` - Write access to the token's ledger.
    /// * `nonces` - Write access to the owners' nonces.
    ///
    /// # Errors
    ///
    /// * [`Error::ExpiredSignature`] - If the `deadline` param is from the
    ///   past.
    /// * [`Error::InvalidSignatureS`] - If the `s` value is in the upper half
    ///   order.
    /// * [`Error::InvalidSignature`] - If no signer can be recovered from the
    ///   signature.
    /// * [`Error::InvalidSigner`] - If signer is not an `owner`.
    ///
    /// # Events
    ///
    /// * [`erc20::Approval`].
    ///
    /// # Requirements
    ///
    /// * `deadline` must be a timestamp not earlier than the current block.
    /// * `v`, `r` and `s` must be a valid secp256k1 signature from `owner`
    ///   over the EIP712-formatted function arguments.
    /// * the signature must use `owner`'s current nonce.
    #[allow(clippy::too_many_arguments)]
    pub fn permit(
        &mut self,
        owner: Address,
        spender: Address,
        value: U256,
        deadline: U256,
        v: u8,
        r: B256,
        s: B256,
        erc20: &mut Erc20,
        nonces: &mut Nonces,
    ) -> Result<(), Error> {
        if U256::from(self.vm().block_timestamp()) > deadline {
            return Err(ERC2612ExpiredSignature { deadline }.into());
        }

        let struct_hash = keccak256(StructHashTuple::abi_encode_params(&(
            PERMIT_TYPEHASH,
            owner,
            spender,
            value,
            nonces.use_nonce(owner),
            deadline,
        )));

        let hash = self.eip712.hash_typed_data_v4(struct_hash);

        let signer = ecdsa::recover(self.vm(), hash, v, r, s)?;

        if signer != owner {
            return Err(ERC2612InvalidSigner { signer, owner }.into());
        }

        erc20._approve(owner, spender, value, true);

        Ok(())
    }
}
