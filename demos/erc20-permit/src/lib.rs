//! ERC-20 token with gasless approvals, composed from [`Erc20`], [`Nonces`]
//! and [`Erc20Permit`].
#![cfg_attr(not(test), no_main)]
extern crate alloc;

use alloc::{string::String, vec, vec::Vec};

use alloy_primitives::{Address, B256, U256};
use ledger_contracts::{
    token::erc20::{
        extensions::{permit, Erc20Permit, IErc20Burnable},
        Erc20, IErc20,
    },
    utils::{
        cryptography::eip712::IEip712,
        nonces::{INonces, Nonces},
    },
};
use stylus_sdk::prelude::*;

/// State of the example token.
#[entrypoint]
#[storage]
pub struct Erc20PermitExample {
    erc20: Erc20,
    nonces: Nonces,
    erc20_permit: Erc20Permit<Eip712>,
}

/// Signing domain of the example token.
#[storage]
pub struct Eip712;

impl IEip712 for Eip712 {
    const NAME: &'static str = "ERC-20 Permit Example";
    const VERSION: &'static str = "1";
}

#[public]
#[implements(IErc20<Error = permit::Error>, INonces)]
impl Erc20PermitExample {
    /// Caches the signing domain. Called once, at deployment.
    #[constructor]
    pub fn constructor(&mut self) {
        self.erc20_permit.initialize();
    }

    /// Creates `value` tokens and assigns them to `account`.
    ///
    /// # Errors
    ///
    /// * [`permit::Error::InvalidReceiver`] - If `account` is
    ///   [`Address::ZERO`].
    /// * [`permit::Error::ArithmeticOverflow`] - If the total supply would
    ///   exceed [`U256::MAX`].
    pub fn mint(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), permit::Error> {
        Ok(self.erc20._mint(account, value)?)
    }

    /// See [`IErc20Burnable::burn`].
    ///
    /// # Errors
    ///
    /// * [`permit::Error::InsufficientBalance`] - If the caller doesn't have
    ///   enough tokens.
    pub fn burn(&mut self, value: U256) -> Result<(), permit::Error> {
        Ok(self.erc20.burn(value)?)
    }

    /// See [`IErc20Burnable::burn_from`].
    ///
    /// # Errors
    ///
    /// * [`permit::Error::InsufficientAllowance`] - If the caller's allowance
    ///   is lower than `value`.
    /// * [`permit::Error::InsufficientBalance`] - If `account` doesn't have
    ///   enough tokens.
    pub fn burn_from(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), permit::Error> {
        Ok(self.erc20.burn_from(account, value)?)
    }

    /// Returns the domain separator `permit` signatures are checked against.
    #[must_use]
    #[selector(name = "DOMAIN_SEPARATOR")]
    pub fn domain_separator(&self) -> B256 {
        self.erc20_permit.domain_separator()
    }

    /// Returns the ERC-5267 description of the signing domain.
    #[must_use]
    pub fn eip712_domain(
        &self,
    ) -> ([u8; 1], String, String, U256, Address, [u8; 32], Vec<U256>) {
        self.erc20_permit.eip712_domain()
    }

    /// See [`Erc20Permit::permit`].
    ///
    /// # Errors
    ///
    /// * [`permit::Error::ExpiredSignature`] - If `deadline` has passed.
    /// * [`permit::Error::InvalidSignatureS`] - If `s` is in the upper half
    ///   order.
    /// * [`permit::Error::InvalidSignature`] - If no signer can be recovered.
    /// * [`permit::Error::InvalidSigner`] - If the signer is not `owner`.
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
    ) -> Result<(), permit::Error> {
        self.erc20_permit.permit(
            owner,
            spender,
            value,
            deadline,
            v,
            r,
            s,
            &mut self.erc20,
            &mut self.nonces,
        )
    }
}

#[public]
impl IErc20 for Erc20PermitExample {
    type Error = permit::Error;

    fn total_supply(&self) -> U256 {
        self.erc20.total_supply()
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.erc20.balance_of(account)
    }

    fn transfer(
        &mut self,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        Ok(self.erc20.transfer(to, value)?)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.erc20.allowance(owner, spender)
    }

    fn approve(
        &mut self,
        spender: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        Ok(self.erc20.approve(spender, value)?)
    }

    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        Ok(self.erc20.transfer_from(from, to, value)?)
    }
}

#[public]
impl INonces for Erc20PermitExample {
    fn nonces(&self, owner: Address) -> U256 {
        self.nonces.nonces(owner)
    }
}
