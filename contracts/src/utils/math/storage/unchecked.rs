//! Module with "unchecked" math on storage values.
//!
//! Callers guarantee the result stays in range: ledger balances are bounded
//! by the total supply, which is itself checked on mint.
use alloy_primitives::Uint;
use alloy_sol_types::sol_data::{IntBitCount, SupportedInt};
use stylus_sdk::storage::StorageUint;

/// Adds value and assign the result to `self`, ignoring overflow.
pub(crate) trait AddAssignUnchecked<T> {
    /// Adds `rhs` and assign the result to `self`, ignoring overflow.
    fn add_assign_unchecked(&mut self, rhs: T);
}

impl<const B: usize, const L: usize> AddAssignUnchecked<Uint<B, L>>
    for StorageUint<B, L>
where
    IntBitCount<B>: SupportedInt,
{
    fn add_assign_unchecked(&mut self, rhs: Uint<B, L>) {
        let new_value = self.get() + rhs;
        self.set(new_value);
    }
}

/// Subtract value and assign the result to `self`, ignoring overflow.
pub(crate) trait SubAssignUnchecked<T> {
    /// Subtract `rhs` and assign the result to `self`, ignoring overflow.
    fn sub_assign_unchecked(&mut self, rhs: T);
}

impl<const B: usize, const L: usize> SubAssignUnchecked<Uint<B, L>>
    for StorageUint<B, L>
where
    IntBitCount<B>: SupportedInt,
{
    fn sub_assign_unchecked(&mut self, rhs: Uint<B, L>) {
        let new_value = self.get() - rhs;
        self.set(new_value);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use motsu::prelude::*;
    use stylus_sdk::{prelude::*, storage::StorageU256};

    use super::*;

    #[storage]
    struct Counter {
        value: StorageU256,
    }

    #[public]
    impl Counter {}

    unsafe impl TopLevelStorage for Counter {}

    #[motsu::test]
    fn adds_and_subtracts(contract: Contract<Counter>, alice: Address) {
        contract.sender(alice).value.add_assign_unchecked(U256::from(5));
        contract.sender(alice).value.sub_assign_unchecked(U256::from(2));
        assert_eq!(U256::from(3), contract.sender(alice).value.get());
    }

    #[motsu::test]
    fn unchecked_math_wraps(contract: Contract<Counter>, alice: Address) {
        contract.sender(alice).value.sub_assign_unchecked(U256::ONE);
        assert_eq!(U256::MAX, contract.sender(alice).value.get());
    }
}
