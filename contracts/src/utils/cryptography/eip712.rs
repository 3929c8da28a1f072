//! [EIP-712](https://eips.ethereum.org/EIPS/eip-712) is a standard for hashing
//! and signing typed structured data.
//!
//! The implementation of the domain separator was designed to be as efficient
//! as possible while still properly updating the chain id to protect against
//! replay attacks on an eventual fork of the chain.
//!
//! NOTE: This contract implements the version of the encoding known as "v4", as
//! implemented by the JSON RPC method [`eth_signTypedDataV4`] in `MetaMask`.
//!
//! [`eth_signTypedDataV4`]: https://docs.metamask.io/guide/signing-data.html
use alloc::{borrow::ToOwned, string::String, vec, vec::Vec};
use core::marker::PhantomData;

use alloy_primitives::{b256, keccak256, Address, B256, U256};
use alloy_sol_types::{sol, SolType};
use stylus_sdk::{
    prelude::*,
    storage::{StorageAddress, StorageB256, StorageU256},
};

use crate::utils::cryptography::message_hash_utils::to_typed_data_hash;

/// keccak256("EIP712Domain(string name,string version,uint256 chainId,address
/// verifyingContract)")
pub const TYPE_HASH: B256 = b256!(
    "8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f"
);

/// Field for the domain separator.
///
/// `0x0f` marks name, version, chain id and verifying contract as present, see
/// [ERC-5267](https://eips.ethereum.org/EIPS/eip-5267).
pub const FIELDS: [u8; 1] = [0x0f];

/// Salt for the domain separator.
pub const SALT: [u8; 32] = [0u8; 32];

/// Tuple for the domain separator.
pub type DomainSeparatorTuple = sol! {
    tuple(bytes32, bytes32, bytes32, uint256, address)
};

/// Identity of an EIP-712 signing domain.
///
/// Name and version are fixed when the implementing type is defined; their
/// hashes are computed at compile time.
pub trait IEip712 {
    /// Immutable name of EIP-712 instance.
    const NAME: &'static str;
    /// Hashed name of EIP-712 instance.
    const HASHED_NAME: [u8; 32] =
        keccak_const::Keccak256::new().update(Self::NAME.as_bytes()).finalize();

    /// Immutable version of EIP-712 instance.
    const VERSION: &'static str;
    /// Hashed version of EIP-712 instance.
    const HASHED_VERSION: [u8; 32] = keccak_const::Keccak256::new()
        .update(Self::VERSION.as_bytes())
        .finalize();
}

/// State of an [`Eip712`] domain: the last computed domain separator and the
/// environment facts it was computed under.
#[storage]
pub struct Eip712<T: IEip712> {
    /// Contract address the cached separator was computed for.
    pub(crate) cached_this: StorageAddress,
    /// Chain id the cached separator was computed for.
    pub(crate) cached_chain_id: StorageU256,
    /// Cached domain separator.
    pub(crate) cached_domain_separator: StorageB256,
    _domain: PhantomData<T>,
}

impl<T: IEip712> Eip712<T> {
    /// Caches the domain separator for the current contract address and
    /// chain id. Should be called once, when the contract is deployed.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    pub fn initialize(&mut self) {
        self.refresh_cache();
    }

    /// Recomputes the domain separator from the current environment and
    /// stores it together with the contract address and chain id it was
    /// computed for.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    pub fn refresh_cache(&mut self) {
        let (this, chain_id) = self.environment();
        let domain_separator = Self::encode_domain_separator(chain_id, this);

        self.cached_this.set(this);
        self.cached_chain_id.set(chain_id);
        self.cached_domain_separator.set(domain_separator);
    }

    /// Returns the domain separator for the current chain.
    ///
    /// The cached value is returned only while both the contract address and
    /// the chain id match the ones it was computed for, and a separator was
    /// actually cached. Otherwise the separator is computed from scratch; the
    /// cache is left untouched.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn domain_separator_v4(&self) -> B256 {
        let (this, chain_id) = self.environment();

        if self.cached_this.get() == this
            && self.cached_chain_id.get() == chain_id
        {
            // An empty cache reads as the zero address on chain zero.
            let cached = self.cached_domain_separator.get();
            if !cached.is_zero() {
                return cached;
            }
        }

        Self::encode_domain_separator(chain_id, this)
    }

    /// Computes the domain separator for the current contract address and
    /// chain id, ignoring the cache.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn build_domain_separator(&self) -> B256 {
        let (this, chain_id) = self.environment();
        Self::encode_domain_separator(chain_id, this)
    }

    /// Returns the current contract address and chain id.
    fn environment(&self) -> (Address, U256) {
        (self.vm().contract_address(), U256::from(self.vm().chain_id()))
    }

    fn encode_domain_separator(chain_id: U256, this: Address) -> B256 {
        let encoded = DomainSeparatorTuple::abi_encode(&(
            TYPE_HASH,
            B256::from(T::HASHED_NAME),
            B256::from(T::HASHED_VERSION),
            chain_id,
            this,
        ));

        keccak256(encoded)
    }

    /// Given an already [hashed struct], this function returns the hash of the
    /// fully encoded EIP-712 message for this domain.
    ///
    /// [hashed struct]: https://eips.ethereum.org/EIPS/eip-712#definition-of-hashstruct
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `struct_hash` - The hash of the struct.
    #[must_use]
    pub fn hash_typed_data_v4(&self, struct_hash: B256) -> B256 {
        let domain_separator = self.domain_separator_v4();
        to_typed_data_hash(&domain_separator, &struct_hash)
    }

    /// Returns the fields and values that describe the domain separator used
    /// by this contract for EIP-712 signature, as defined by [ERC-5267].
    ///
    /// [ERC-5267]: https://eips.ethereum.org/EIPS/eip-5267
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    #[must_use]
    pub fn eip712_domain(
        &self,
    ) -> ([u8; 1], String, String, U256, Address, [u8; 32], Vec<U256>) {
        (
            FIELDS,
            T::NAME.to_owned(),
            T::VERSION.to_owned(),
            U256::from(self.vm().chain_id()),
            self.vm().contract_address(),
            SALT,
            Vec::new(),
        )
    }
}
