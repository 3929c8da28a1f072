/*!
# Ledger Contracts

A fungible-token ledger for [Arbitrum Stylus] following the [ERC-20]
standard, extended with [EIP-2612] permits: approvals granted by an off-chain
signature over an [EIP-712] typed message instead of a transaction sent by the
token holder.

## Usage

Compose the building blocks into your own `#[storage]` struct and expose them
through `#[public]`:

```ignore
use ledger_contracts::{
    token::erc20::{self, extensions::Erc20Permit, Erc20, IErc20},
    utils::{cryptography::eip712::IEip712, nonces::Nonces},
};
use stylus_sdk::prelude::*;

#[entrypoint]
#[storage]
struct MyToken {
    erc20: Erc20,
    nonces: Nonces,
    erc20_permit: Erc20Permit<Eip712>,
}

#[storage]
struct Eip712;

impl IEip712 for Eip712 {
    const NAME: &'static str = "My Token";
    const VERSION: &'static str = "1";
}

#[public]
#[implements(IErc20<Error = erc20::Error>)]
impl MyToken {}
```

[Arbitrum Stylus]: https://docs.arbitrum.io/stylus/stylus-gentle-introduction
[ERC-20]: https://eips.ethereum.org/EIPS/eip-20
[EIP-2612]: https://eips.ethereum.org/EIPS/eip-2612
[EIP-712]: https://eips.ethereum.org/EIPS/eip-712
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod token;
pub mod utils;
