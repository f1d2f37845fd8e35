#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use alloc::vec::Vec;

use alloy_primitives::{Address, U256, U64};
use stylus_sdk::prelude::*;
use vesting_stylus::finance::vesting_wallet::{
    self, IVestingWallet, VestingWallet,
};

#[entrypoint]
#[storage]
struct VestingWalletDemo {
    wallet: VestingWallet,
}

#[public]
#[implements(IVestingWallet<Error = vesting_wallet::Error>)]
impl VestingWalletDemo {
    #[constructor]
    fn constructor(
        &mut self,
        initial_owner: Address,
        beneficiary: Address,
    ) -> Result<(), vesting_wallet::Error> {
        self.wallet.constructor(initial_owner, beneficiary)
    }

    #[receive]
    fn receive(&mut self) -> Result<(), Vec<u8>> {
        self.wallet.receive()
    }
}

#[public]
impl IVestingWallet for VestingWalletDemo {
    type Error = vesting_wallet::Error;

    fn owner(&self) -> Address {
        self.wallet.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        self.wallet.transfer_ownership(new_owner)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        self.wallet.renounce_ownership()
    }

    fn beneficiary(&self) -> Address {
        self.wallet.beneficiary()
    }

    fn initialize(
        &mut self,
        asset: Address,
        total_amount: U256,
        start: U64,
        cliff: U64,
        duration: U64,
        revocable: bool,
    ) -> Result<(), Self::Error> {
        self.wallet
            .initialize(asset, total_amount, start, cliff, duration, revocable)
    }

    fn get_vesting_schedule(
        &self,
        asset: Address,
    ) -> (U256, U64, U64, U64, U256, bool) {
        self.wallet.get_vesting_schedule(asset)
    }

    fn released(&self, asset: Address) -> U256 {
        self.wallet.released(asset)
    }

    fn releasable(&self, asset: Address) -> U256 {
        self.wallet.releasable(asset)
    }

    fn vested_amount(&self, asset: Address, timestamp: u64) -> U256 {
        self.wallet.vested_amount(asset, timestamp)
    }

    fn release(&mut self, asset: Address) -> Result<(), Self::Error> {
        self.wallet.release(asset)
    }

    fn revoke(&mut self, asset: Address) -> Result<(), Self::Error> {
        self.wallet.revoke(asset)
    }
}
