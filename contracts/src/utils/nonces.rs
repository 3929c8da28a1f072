//! Implementation of nonce tracking for addresses.
//!
//! Nonces will only increment.
use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, U256};
pub use sol::*;
use stylus_sdk::{
    call::MethodError,
    prelude::*,
    storage::{StorageMap, StorageU256},
};

use crate::utils::math::storage::AddAssignChecked;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// The nonce used for an `account` is not the expected current nonce.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error InvalidAccountNonce(address account, uint256 current_nonce);
    }
}

/// A Nonces error.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The nonce used for an `account` is not the expected current nonce.
    InvalidAccountNonce(InvalidAccountNonce),
}

impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// State of a [`Nonces`] Contract.
#[storage]
pub struct Nonces {
    /// Mapping from address to its nonce.
    pub(crate) nonces: StorageMap<Address, StorageU256>,
}

/// Interface for [`Nonces`]
pub trait INonces {
    /// Returns the unused nonce for the given account.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `owner` - The address for which to return the nonce.
    #[must_use]
    fn nonces(&self, owner: Address) -> U256;
}

#[public]
#[implements(INonces)]
impl Nonces {}

#[public]
impl INonces for Nonces {
    fn nonces(&self, owner: Address) -> U256 {
        self.nonces.get(owner)
    }
}

impl Nonces {
    /// Consumes a nonce for the given `account`.
    ///
    /// The read and the increment go through a single storage handle, so the
    /// returned nonce is exactly the one replaced by `nonce + 1`.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - The address for which to consume the nonce.
    ///
    /// # Panics
    ///
    /// * If the nonce for the given `owner` exceeds [`U256::MAX`].
    pub fn use_nonce(&mut self, owner: Address) -> U256 {
        let mut nonce = self.nonces.setter(owner);
        let current_nonce = nonce.get();

        nonce.add_assign_checked(
            U256::ONE,
            "nonce should not exceed `U256::MAX`",
        );

        current_nonce
    }

    /// Same as `use_nonce` but checking that the `nonce` is the next valid for
    /// the owner.
    ///
    /// The nonce is consumed even when the check fails.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `owner` - The address for which to consume the nonce.
    /// * `nonce` - The nonce to consume.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidAccountNonce`] - Returns an error if the `nonce` is
    ///   not the next valid nonce for the owner.
    ///
    /// # Panics
    ///
    /// * If the nonce for the given `owner` exceeds [`U256::MAX`].
    pub fn use_checked_nonce(
        &mut self,
        owner: Address,
        nonce: U256,
    ) -> Result<(), Error> {
        let current_nonce = self.use_nonce(owner);

        if nonce != current_nonce {
            return Err(Error::InvalidAccountNonce(InvalidAccountNonce {
                account: owner,
                current_nonce,
            }));
        }

        Ok(())
    }
}
