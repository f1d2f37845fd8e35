#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::vec::Vec;

use alloy_primitives::{Address, U256, U64};
use stylus_sdk::{msg, prelude::*};
use vesting_stylus::{
    access::ownable::{self, IOwnable, Ownable},
    token::erc20::{
        extensions::vestable::{self, Erc20Vestable, IErc20Vestable},
        IErc20,
    },
};

#[entrypoint]
#[storage]
struct VestedTokenDemo {
    token: Erc20Vestable,
    ownable: Ownable,
}

#[public]
#[implements(
    IErc20<Error = vestable::Error>,
    IErc20Vestable<Error = vestable::Error>,
    IOwnable<Error = ownable::Error>
)]
impl VestedTokenDemo {
    #[constructor]
    fn constructor(
        &mut self,
        initial_owner: Address,
        duration: U64,
    ) -> Result<(), Vec<u8>> {
        self.ownable.constructor(initial_owner).map_err(Vec::<u8>::from)?;
        self.token.constructor(duration).map_err(Vec::<u8>::from)?;
        Ok(())
    }

    /// Creates a `value` amount of tokens for `account`. Owner only.
    fn mint(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), Vec<u8>> {
        self.ownable.only_owner().map_err(Vec::<u8>::from)?;
        self.token._mint(account, value).map_err(Vec::<u8>::from)?;
        Ok(())
    }

    /// Destroys a `value` amount of the caller's spendable tokens.
    fn burn(&mut self, value: U256) -> Result<(), Vec<u8>> {
        self.token._burn(msg::sender(), value).map_err(Vec::<u8>::from)?;
        Ok(())
    }
}

#[public]
impl IErc20 for VestedTokenDemo {
    type Error = vestable::Error;

    fn total_supply(&self) -> U256 {
        self.token.total_supply()
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.token.balance_of(account)
    }

    fn transfer(
        &mut self,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        self.token.transfer(to, value)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.token.allowance(owner, spender)
    }

    fn approve(
        &mut self,
        spender: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        self.token.approve(spender, value)
    }

    fn transfer_from(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<bool, Self::Error> {
        self.token.transfer_from(from, to, value)
    }
}

#[public]
impl IErc20Vestable for VestedTokenDemo {
    type Error = vestable::Error;

    fn vesting_duration(&self) -> U64 {
        self.token.vesting_duration()
    }

    fn total_vesting_balance(&self) -> U256 {
        self.token.total_vesting_balance()
    }

    fn vesting_balance_of(&self, account: Address) -> U256 {
        self.token.vesting_balance_of(account)
    }

    fn spendable_balance_of(&self, account: Address) -> U256 {
        self.token.spendable_balance_of(account)
    }

    fn get_vesting_length(&self, account: Address) -> U256 {
        self.token.get_vesting_length(account)
    }

    fn get_user_vesting_schedule(
        &self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U64, U256, U256), Self::Error> {
        self.token.get_user_vesting_schedule(account, index)
    }

    fn vesting_status(&self, amount: U256, start: U64) -> (U256, U256) {
        self.token.vesting_status(amount, start)
    }

    fn vest(&mut self, amount: U256) -> Result<U256, Self::Error> {
        self.token.vest(amount)
    }

    fn withdraw(
        &mut self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U256), Self::Error> {
        self.token.withdraw(account, index)
    }
}

#[public]
impl IOwnable for VestedTokenDemo {
    type Error = ownable::Error;

    fn owner(&self) -> Address {
        self.ownable.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.ownable.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.ownable.renounce_ownership()
    }
}
