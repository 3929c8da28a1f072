//! Common extensions to the ERC-20 standard.
pub mod burnable;
pub mod permit;

pub use burnable::IErc20Burnable;
pub use permit::Erc20Permit;
