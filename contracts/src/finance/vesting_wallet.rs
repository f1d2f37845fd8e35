//! A vesting wallet handles the vesting of the native asset and ERC-20
//! tokens for a given beneficiary.
//!
//! The wallet holds a pool of value earmarked for exactly one beneficiary
//! and releases it according to one linear vesting schedule per asset.
//! Assets are keyed by address, with [`NATIVE_ASSET`] standing in for the
//! chain's native currency; each asset carries its own total amount,
//! timing, and released-amount counter.
//!
//! The owner administers the wallet: it configures each asset's schedule
//! exactly once and may revoke a schedule that was created revocable.
//! Revoking pays the vested remainder out to the beneficiary, returns the
//! unvested remainder to the owner, and freezes the schedule so nothing
//! further ever accrues.
//!
//! Schedules gate releases on two independent instants: nothing is
//! releasable before the cliff, even when the linear ramp from `start` has
//! already begun accruing.
use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, U256, U64};
pub use sol::*;
use stylus_sdk::{
    block,
    call::{call, Call, MethodError},
    evm,
    prelude::*,
    storage::{
        StorageAddress, StorageBool, StorageMap, StorageU256, StorageU64,
    },
};

use crate::{
    access::ownable::{
        self, Ownable, OwnableInvalidOwner, OwnableUnauthorizedAccount,
    },
    token::erc20::interface::Erc20Interface,
    utils::{math::storage::AddAssignUnchecked, vesting_schedule},
};

/// Asset key designating the chain's native currency.
pub const NATIVE_ASSET: Address = Address::ZERO;

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when the vesting schedule for `asset` is configured.
        ///
        /// * `asset` - Asset the schedule releases.
        /// * `total_amount` - Total amount the schedule will release.
        /// * `start` - Timestamp at which linear accrual begins.
        /// * `cliff` - Timestamp before which nothing is releasable.
        /// * `duration` - Length of the linear ramp.
        /// * `revocable` - Whether the owner may revoke the schedule.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event VestingInitialized(address indexed asset, uint256 total_amount, uint64 start, uint64 cliff, uint64 duration, bool revocable);

        /// Emitted when `amount` of `asset` has been released to the
        /// beneficiary.
        ///
        /// * `asset` - Asset that was released.
        /// * `amount` - Amount released.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Released(address indexed asset, uint256 amount);

        /// Emitted when the schedule for `asset` has been revoked.
        ///
        /// * `asset` - Asset whose schedule was revoked.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Revoked(address indexed asset);
    }

    sol! {
        /// The beneficiary is not a valid account. (eg. `Address::ZERO`)
        ///
        /// * `beneficiary` - Account that cannot receive payouts.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletInvalidBeneficiary(address beneficiary);

        /// Indicates an invalid schedule configuration: a schedule must
        /// release a non-zero amount over a non-zero duration.
        ///
        /// * `asset` - Asset the schedule was meant to release.
        /// * `total_amount` - Configured total amount.
        /// * `duration` - Configured ramp length.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletInvalidConfiguration(address asset, uint256 total_amount, uint64 duration);

        /// The schedule for `asset` has already been configured; schedules
        /// are configured exactly once.
        ///
        /// * `asset` - Asset whose schedule already exists.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletAlreadyInitialized(address asset);

        /// No schedule has been configured for `asset`.
        ///
        /// * `asset` - Asset without a schedule.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletScheduleNotInitialized(address asset);

        /// The schedule for `asset` was created non-revocable.
        ///
        /// * `asset` - Asset whose schedule cannot be revoked.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletNotRevocable(address asset);

        /// Nothing has vested for `asset` since the last release.
        ///
        /// * `asset` - Asset with nothing to release.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletInsufficientVested(address asset);

        /// Moving `asset` out of the wallet failed; the whole operation is
        /// aborted and no bookkeeping is kept.
        ///
        /// * `asset` - Asset whose transfer failed.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error VestingWalletTransferFailed(address asset);
    }
}

/// An error that occurred in the [`VestingWallet`] contract.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The beneficiary is not a valid account. (eg. `Address::ZERO`)
    InvalidBeneficiary(VestingWalletInvalidBeneficiary),
    /// Indicates an invalid schedule configuration: zero amount or zero
    /// duration.
    InvalidConfiguration(VestingWalletInvalidConfiguration),
    /// The schedule for the asset has already been configured.
    AlreadyInitialized(VestingWalletAlreadyInitialized),
    /// No schedule has been configured for the asset.
    ScheduleNotInitialized(VestingWalletScheduleNotInitialized),
    /// The schedule for the asset was created non-revocable.
    NotRevocable(VestingWalletNotRevocable),
    /// Nothing has vested for the asset since the last release.
    InsufficientVested(VestingWalletInsufficientVested),
    /// Moving the asset out of the wallet failed.
    TransferFailed(VestingWalletTransferFailed),
    /// The caller account is not authorized to perform an operation.
    UnauthorizedAccount(OwnableUnauthorizedAccount),
    /// The owner is not a valid owner account. (eg. `Address::ZERO`)
    InvalidOwner(OwnableInvalidOwner),
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl From<ownable::Error> for Error {
    fn from(value: ownable::Error) -> Self {
        match value {
            ownable::Error::UnauthorizedAccount(e) => {
                Error::UnauthorizedAccount(e)
            }
            ownable::Error::InvalidOwner(e) => Error::InvalidOwner(e),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// One linear vesting schedule of the wallet, keyed by asset.
#[storage]
pub struct VestingSchedule {
    /// Whether the schedule has been configured. Guards against silent
    /// re-initialization.
    initialized: StorageBool,
    /// Total amount the schedule will release. Immutable after
    /// initialization, except that revocation freezes it at the released
    /// amount.
    total_amount: StorageU256,
    /// Timestamp at which linear accrual begins.
    start: StorageU64,
    /// Timestamp before which nothing is releasable, independent of
    /// `start`.
    cliff: StorageU64,
    /// Length of the linear ramp.
    duration: StorageU64,
    /// Cumulative amount already released.
    released: StorageU256,
    /// Whether the owner may revoke the schedule. Fixed at initialization.
    revocable: StorageBool,
}

/// State of a [`VestingWallet`] contract.
#[storage]
pub struct VestingWallet {
    /// [`Ownable`] contract.
    // We leave the parent [`Ownable`] contract instance public, so that
    // inheritting contract have access to its internal functions.
    pub ownable: Ownable,
    /// Account every release pays out to.
    beneficiary: StorageAddress,
    /// One schedule per asset, lazily initialized.
    schedules: StorageMap<Address, VestingSchedule>,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self`
/// when calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for VestingWallet {}

/// Required interface of a [`VestingWallet`] compliant contract.
pub trait IVestingWallet {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Returns the address of the current owner.
    ///
    /// Re-export of [`Ownable::owner`].
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn owner(&self) -> Address;

    /// Transfers ownership of the contract to a new account (`new_owner`).
    /// Can only be called by the current owner.
    ///
    /// Re-export of [`Ownable::transfer_ownership`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_owner` - The next owner of this contract.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If called by any account other
    ///   than the owner.
    /// * [`Error::InvalidOwner`] - If `new_owner` is the `Address::ZERO`.
    ///
    /// # Events
    ///
    /// * [`ownable::OwnershipTransferred`].
    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error>;

    /// Leaves the contract without owner. It will not be possible to call
    /// owner-gated functions anymore. Can only be called by the current
    /// owner.
    ///
    /// Re-export of [`Ownable::renounce_ownership`].
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If not called by the owner.
    ///
    /// # Events
    ///
    /// * [`ownable::OwnershipTransferred`].
    fn renounce_ownership(&mut self) -> Result<(), Self::Error>;

    /// Returns the account every release pays out to.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn beneficiary(&self) -> Address;

    /// Configures the vesting schedule for `asset`. Callable at most once
    /// per asset, by the owner only.
    ///
    /// Use [`NATIVE_ASSET`] to configure the schedule of the native
    /// currency.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `asset` - Asset the schedule releases.
    /// * `total_amount` - Total amount the schedule will release.
    /// * `start` - Timestamp at which linear accrual begins.
    /// * `cliff` - Timestamp before which nothing is releasable.
    /// * `duration` - Length of the linear ramp.
    /// * `revocable` - Whether the owner may later revoke the schedule.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If called by any account other
    ///   than the owner.
    /// * [`Error::InvalidConfiguration`] - If `total_amount` or `duration`
    ///   is zero.
    /// * [`Error::AlreadyInitialized`] - If the schedule for `asset` was
    ///   already configured.
    ///
    /// # Events
    ///
    /// * [`VestingInitialized`].
    fn initialize(
        &mut self,
        asset: Address,
        total_amount: U256,
        start: U64,
        cliff: U64,
        duration: U64,
        revocable: bool,
    ) -> Result<(), Self::Error>;

    /// Returns the schedule configured for `asset` as the tuple
    /// `(total_amount, start, cliff, duration, released, revocable)`. All
    /// zeros when no schedule has been configured.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `asset` - Asset to query.
    fn get_vesting_schedule(
        &self,
        asset: Address,
    ) -> (U256, U64, U64, U64, U256, bool);

    /// Amount of `asset` already released.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `asset` - Asset to query.
    fn released(&self, asset: Address) -> U256;

    /// Amount of `asset` that can be released right now.
    ///
    /// Returns zero before the schedule's cliff, however far the linear
    /// ramp has progressed: the cliff and `start` are independent gates and
    /// both must have passed.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `asset` - Asset to query.
    fn releasable(&self, asset: Address) -> U256;

    /// Amount of `asset` vested at `timestamp` under the linear curve,
    /// without the cliff gate applied.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `asset` - Asset to query.
    /// * `timestamp` - Point in time for which to check the vested amount.
    ///
    /// # Panics
    ///
    /// * If scaled, total allocation (mid calculation) exceeds `U256::MAX`.
    fn vested_amount(&self, asset: Address, timestamp: u64) -> U256;

    /// Releases the vested amount of `asset` to the beneficiary.
    ///
    /// Callable by anyone; the payout destination is fixed.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `asset` - Asset to release.
    ///
    /// # Errors
    ///
    /// * [`Error::InsufficientVested`] - If nothing has vested since the
    ///   last release.
    /// * [`Error::TransferFailed`] - If moving the asset fails; the whole
    ///   operation is reverted.
    ///
    /// # Events
    ///
    /// * [`Released`].
    fn release(&mut self, asset: Address) -> Result<(), Self::Error>;

    /// Revokes the schedule for `asset`. Owner only.
    ///
    /// Pays the still-releasable remainder out to the beneficiary, refunds
    /// the unvested remainder to the owner, and freezes the schedule's
    /// total at exactly the amount released - nothing further will ever
    /// accrue. Calling again on a revoked schedule is a no-op.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `asset` - Asset whose schedule to revoke.
    ///
    /// # Errors
    ///
    /// * [`Error::UnauthorizedAccount`] - If called by any account other
    ///   than the owner.
    /// * [`Error::ScheduleNotInitialized`] - If no schedule was configured
    ///   for `asset`.
    /// * [`Error::NotRevocable`] - If the schedule was created
    ///   non-revocable.
    /// * [`Error::TransferFailed`] - If moving the asset fails; the whole
    ///   operation is reverted.
    ///
    /// # Events
    ///
    /// * [`Revoked`].
    /// * [`Released`] - When the vested remainder paid out is non-zero.
    fn revoke(&mut self, asset: Address) -> Result<(), Self::Error>;
}

#[public]
#[implements(IVestingWallet<Error = Error>)]
impl VestingWallet {
    /// Constructor.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `initial_owner` - The account administering the wallet.
    /// * `beneficiary` - The account every release pays out to.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidOwner`] - If `initial_owner` is `Address::ZERO`.
    /// * [`Error::InvalidBeneficiary`] - If `beneficiary` is
    ///   `Address::ZERO`.
    #[constructor]
    pub fn constructor(
        &mut self,
        initial_owner: Address,
        beneficiary: Address,
    ) -> Result<(), Error> {
        if beneficiary.is_zero() {
            return Err(Error::InvalidBeneficiary(
                VestingWalletInvalidBeneficiary {
                    beneficiary: Address::ZERO,
                },
            ));
        }
        self.ownable.constructor(initial_owner)?;
        self.beneficiary.set(beneficiary);
        Ok(())
    }

    /// Accepts native-asset funding.
    #[receive]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        Ok(())
    }
}

#[public]
impl IVestingWallet for VestingWallet {
    type Error = Error;

    fn owner(&self) -> Address {
        self.ownable.owner()
    }

    fn transfer_ownership(
        &mut self,
        new_owner: Address,
    ) -> Result<(), Self::Error> {
        Ok(self.ownable.transfer_ownership(new_owner)?)
    }

    fn renounce_ownership(&mut self) -> Result<(), Self::Error> {
        Ok(self.ownable.renounce_ownership()?)
    }

    fn beneficiary(&self) -> Address {
        self.beneficiary.get()
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
        self.ownable.only_owner()?;

        if total_amount.is_zero() || duration.is_zero() {
            return Err(Error::InvalidConfiguration(
                VestingWalletInvalidConfiguration {
                    asset,
                    total_amount,
                    duration: duration.to::<u64>(),
                },
            ));
        }

        let mut schedule = self.schedules.setter(asset);
        if schedule.initialized.get() {
            return Err(Error::AlreadyInitialized(
                VestingWalletAlreadyInitialized { asset },
            ));
        }

        schedule.initialized.set(true);
        schedule.total_amount.set(total_amount);
        schedule.start.set(start);
        schedule.cliff.set(cliff);
        schedule.duration.set(duration);
        schedule.revocable.set(revocable);

        evm::log(VestingInitialized {
            asset,
            total_amount,
            start: start.to::<u64>(),
            cliff: cliff.to::<u64>(),
            duration: duration.to::<u64>(),
            revocable,
        });

        Ok(())
    }

    fn get_vesting_schedule(
        &self,
        asset: Address,
    ) -> (U256, U64, U64, U64, U256, bool) {
        let schedule = self.schedules.getter(asset);
        (
            schedule.total_amount.get(),
            schedule.start.get(),
            schedule.cliff.get(),
            schedule.duration.get(),
            schedule.released.get(),
            schedule.revocable.get(),
        )
    }

    fn released(&self, asset: Address) -> U256 {
        self.schedules.getter(asset).released.get()
    }

    fn releasable(&self, asset: Address) -> U256 {
        self._releasable_at(asset, U64::from(block::timestamp()))
    }

    fn vested_amount(&self, asset: Address, timestamp: u64) -> U256 {
        let schedule = self.schedules.getter(asset);
        vesting_schedule::vested_amount(
            schedule.total_amount.get(),
            schedule.start.get(),
            schedule.duration.get(),
            U64::from(timestamp),
        )
    }

    fn release(&mut self, asset: Address) -> Result<(), Self::Error> {
        let timestamp = U64::from(block::timestamp());

        let amount = self._releasable_at(asset, timestamp);
        if amount.is_zero() {
            return Err(Error::InsufficientVested(
                VestingWalletInsufficientVested { asset },
            ));
        }

        // SAFETY: `released + amount` equals the vested amount, which is
        // bounded by the schedule's total.
        self.schedules.setter(asset).released.add_assign_unchecked(amount);

        let beneficiary = self.beneficiary.get();
        self._transfer_asset(asset, beneficiary, amount)?;

        evm::log(Released { asset, amount });

        Ok(())
    }

    fn revoke(&mut self, asset: Address) -> Result<(), Self::Error> {
        self.ownable.only_owner()?;

        let timestamp = U64::from(block::timestamp());

        if !self.schedules.getter(asset).initialized.get() {
            return Err(Error::ScheduleNotInitialized(
                VestingWalletScheduleNotInitialized { asset },
            ));
        }
        if !self.schedules.getter(asset).revocable.get() {
            return Err(Error::NotRevocable(VestingWalletNotRevocable {
                asset,
            }));
        }

        let payout = self._releasable_at(asset, timestamp);

        let refund = {
            let mut schedule = self.schedules.setter(asset);
            // SAFETY: `released + payout` equals the vested amount, which
            // is bounded by the schedule's total.
            let released = schedule.released.get() + payout;
            let refund = schedule.total_amount.get() - released;
            // Freeze the schedule at exactly what has vested so far.
            schedule.released.set(released);
            schedule.total_amount.set(released);
            refund
        };

        let beneficiary = self.beneficiary.get();
        let owner = self.ownable.owner();

        if !payout.is_zero() {
            self._transfer_asset(asset, beneficiary, payout)?;
            evm::log(Released { asset, amount: payout });
        }
        if !refund.is_zero() {
            self._transfer_asset(asset, owner, refund)?;
        }

        evm::log(Revoked { asset });

        Ok(())
    }
}

impl VestingWallet {
    /// Amount of `asset` releasable at `timestamp`: the vested amount minus
    /// what has already been released, gated to zero before the cliff.
    ///
    /// `timestamp` is the single timestamp reading of the surrounding call.
    fn _releasable_at(&self, asset: Address, timestamp: U64) -> U256 {
        let schedule = self.schedules.getter(asset);
        if !schedule.initialized.get() {
            return U256::ZERO;
        }
        if timestamp < schedule.cliff.get() {
            return U256::ZERO;
        }

        let vested = vesting_schedule::vested_amount(
            schedule.total_amount.get(),
            schedule.start.get(),
            schedule.duration.get(),
            timestamp,
        );

        // A revoked schedule freezes `total_amount` at the released amount,
        // which can leave `released` ahead of the curve.
        vested.saturating_sub(schedule.released.get())
    }

    /// Moves `amount` of `asset` out of the wallet to `to`.
    ///
    /// The transfer either fully succeeds or the whole surrounding
    /// operation reverts with [`Error::TransferFailed`].
    fn _transfer_asset(
        &mut self,
        asset: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Error> {
        if asset == NATIVE_ASSET {
            call(Call::new_in(self).value(amount), to, &[]).map_err(|_| {
                Error::TransferFailed(VestingWalletTransferFailed { asset })
            })?;
        } else {
            let succeeded = Erc20Interface::new(asset)
                .transfer(Call::new_in(self), to, amount)
                .map_err(|_| {
                    Error::TransferFailed(VestingWalletTransferFailed {
                        asset,
                    })
                })?;
            if !succeeded {
                return Err(Error::TransferFailed(
                    VestingWalletTransferFailed { asset },
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{uint, Address, U256, U64};
    use motsu::prelude::*;
    use stylus_sdk::block;

    use super::{
        Error, IVestingWallet, Released, Revoked, VestingInitialized,
        VestingWallet, NATIVE_ASSET,
    };
    use crate::token::erc20::{Erc20, IErc20};

    const TOTAL: U256 = uint!(1000_U256);
    const DURATION: u64 = 100;

    /// Initializes `asset` with accrual running since `age` seconds before
    /// the test VM's fixed block timestamp and no separate cliff.
    fn initialize_aged(
        contract: &Contract<VestingWallet>,
        owner: Address,
        asset: Address,
        age: u64,
        revocable: bool,
    ) {
        let start = block::timestamp() - age;
        contract
            .sender(owner)
            .initialize(
                asset,
                TOTAL,
                U64::from(start),
                U64::from(start),
                U64::from(DURATION),
                revocable,
            )
            .motsu_expect("schedule should initialize");
    }

    #[motsu::test]
    fn constructor_sets_roles(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        assert_eq!(alice, contract.sender(alice).owner());
        assert_eq!(bob, contract.sender(alice).beneficiary());
    }

    #[motsu::test]
    fn constructor_rejects_zero_beneficiary(
        contract: Contract<VestingWallet>,
        alice: Address,
    ) {
        let err = contract
            .sender(alice)
            .constructor(alice, Address::ZERO)
            .motsu_expect_err("zero beneficiary should be rejected");
        assert!(matches!(err, Error::InvalidBeneficiary(_)));
    }

    #[motsu::test]
    fn constructor_rejects_zero_owner(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
    ) {
        let err = contract
            .sender(alice)
            .constructor(Address::ZERO, bob)
            .motsu_expect_err("zero owner should be rejected");
        assert!(matches!(err, Error::InvalidOwner(_)));
    }

    #[motsu::test]
    fn initialize_stores_schedule(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let start = U64::from(1_000_u64);
        let cliff = U64::from(2_000_u64);
        let duration = U64::from(DURATION);
        contract
            .sender(alice)
            .initialize(token, TOTAL, start, cliff, duration, true)
            .motsu_unwrap();

        let (total, got_start, got_cliff, got_duration, released, revocable) =
            contract.sender(alice).get_vesting_schedule(token);
        assert_eq!(TOTAL, total);
        assert_eq!(start, got_start);
        assert_eq!(cliff, got_cliff);
        assert_eq!(duration, got_duration);
        assert_eq!(U256::ZERO, released);
        assert!(revocable);

        contract.assert_emitted(&VestingInitialized {
            asset: token,
            total_amount: TOTAL,
            start: 1_000,
            cliff: 2_000,
            duration: DURATION,
            revocable: true,
        });
    }

    #[motsu::test]
    fn initialize_rejects_non_owner(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let err = contract
            .sender(bob)
            .initialize(
                token,
                TOTAL,
                U64::ZERO,
                U64::ZERO,
                U64::from(DURATION),
                false,
            )
            .motsu_expect_err("only the owner may initialize");
        assert!(matches!(err, Error::UnauthorizedAccount(_)));
    }

    #[motsu::test]
    fn initialize_rejects_invalid_configuration(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let err = contract
            .sender(alice)
            .initialize(
                token,
                U256::ZERO,
                U64::ZERO,
                U64::ZERO,
                U64::from(DURATION),
                false,
            )
            .motsu_expect_err("zero amount should be rejected");
        assert!(matches!(err, Error::InvalidConfiguration(_)));

        let err = contract
            .sender(alice)
            .initialize(token, TOTAL, U64::ZERO, U64::ZERO, U64::ZERO, false)
            .motsu_expect_err("zero duration should be rejected");
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[motsu::test]
    fn initialize_is_one_shot_per_asset(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        initialize_aged(&contract, alice, token, 0, false);

        let err = contract
            .sender(alice)
            .initialize(
                token,
                TOTAL,
                U64::ZERO,
                U64::ZERO,
                U64::from(DURATION),
                false,
            )
            .motsu_expect_err("re-initialization should be rejected");
        assert!(matches!(err, Error::AlreadyInitialized(_)));

        // The native asset's schedule is independent of token schedules.
        initialize_aged(&contract, alice, NATIVE_ASSET, 0, false);
    }

    #[motsu::test]
    fn vested_amount_follows_linear_curve(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let start = 1_000_000_u64;
        contract
            .sender(alice)
            .initialize(
                token,
                TOTAL,
                U64::from(start),
                U64::from(start),
                U64::from(DURATION),
                false,
            )
            .motsu_unwrap();

        let vested =
            |at: u64| contract.sender(alice).vested_amount(token, at);
        assert_eq!(U256::ZERO, vested(start - 1));
        assert_eq!(uint!(330_U256), vested(start + 33));
        assert_eq!(uint!(500_U256), vested(start + 50));
        assert_eq!(TOTAL, vested(start + DURATION));
        assert_eq!(TOTAL, vested(start + 500));

        // Unknown assets have no allocation.
        assert_eq!(
            U256::ZERO,
            contract.sender(alice).vested_amount(NATIVE_ASSET, start + 50)
        );
    }

    #[motsu::test]
    fn releasable_is_gated_by_cliff(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        // Accrual began 50 seconds ago, but the cliff is still ahead.
        let now = block::timestamp();
        contract
            .sender(alice)
            .initialize(
                token,
                TOTAL,
                U64::from(now - 50),
                U64::from(now + 10),
                U64::from(DURATION),
                false,
            )
            .motsu_unwrap();

        assert_eq!(U256::ZERO, contract.sender(alice).releasable(token));
        // The curve itself is unaffected by the cliff.
        assert_eq!(
            uint!(500_U256),
            contract.sender(alice).vested_amount(token, now)
        );

        let err = contract
            .sender(alice)
            .release(token)
            .motsu_expect_err("nothing is releasable before the cliff");
        assert!(matches!(err, Error::InsufficientVested(_)));
    }

    #[motsu::test]
    fn releasable_tracks_curve_after_cliff(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        initialize_aged(&contract, alice, token, 33, false);

        assert_eq!(uint!(330_U256), contract.sender(alice).releasable(token));
    }

    #[motsu::test]
    fn release_pays_beneficiary(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        initialize_aged(&contract, alice, token, 50, false);

        contract
            .sender(alice)
            .release(token)
            .motsu_expect("release should pay the vested half");

        assert_eq!(
            uint!(500_U256),
            erc20.sender(alice).balance_of(bob)
        );
        assert_eq!(uint!(500_U256), contract.sender(alice).released(token));
        assert_eq!(U256::ZERO, contract.sender(alice).releasable(token));

        contract.assert_emitted(&Released {
            asset: token,
            amount: uint!(500_U256),
        });
    }

    #[motsu::test]
    fn release_pays_zero_twice_in_a_row(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        initialize_aged(&contract, alice, token, 50, false);

        contract.sender(alice).release(token).motsu_unwrap();

        // No time elapsed: the second release must pay exactly nothing.
        let err = contract
            .sender(alice)
            .release(token)
            .motsu_expect_err("nothing newly vested");
        assert!(matches!(err, Error::InsufficientVested(_)));
        assert_eq!(uint!(500_U256), erc20.sender(alice).balance_of(bob));
    }

    #[motsu::test]
    fn release_may_be_triggered_by_anyone(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
        charlie: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        initialize_aged(&contract, alice, token, DURATION, false);

        contract.sender(charlie).release(token).motsu_unwrap();

        // The payout went to the beneficiary, not the caller.
        assert_eq!(TOTAL, erc20.sender(alice).balance_of(bob));
        assert_eq!(U256::ZERO, erc20.sender(alice).balance_of(charlie));
    }

    #[motsu::test]
    fn release_errors_when_transfer_fails(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        // The wallet holds no tokens, so the payout transfer must fail and
        // abort the release.
        let token = erc20.address();
        initialize_aged(&contract, alice, token, 50, false);

        let err = contract
            .sender(alice)
            .release(token)
            .motsu_expect_err("transfer from an unfunded wallet");
        assert!(matches!(err, Error::TransferFailed(_)));
        assert_eq!(U256::ZERO, erc20.sender(alice).balance_of(bob));
    }

    #[motsu::test]
    fn release_errors_for_unknown_asset(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let err = contract
            .sender(alice)
            .release(token)
            .motsu_expect_err("no schedule, nothing vested");
        assert!(matches!(err, Error::InsufficientVested(_)));
    }

    #[motsu::test]
    fn revoke_splits_vested_and_refund(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        initialize_aged(&contract, alice, token, 50, true);

        contract.sender(alice).revoke(token).motsu_unwrap();

        // Half had vested: paid to the beneficiary. The rest went back to
        // the owner.
        assert_eq!(uint!(500_U256), erc20.sender(alice).balance_of(bob));
        assert_eq!(uint!(500_U256), erc20.sender(alice).balance_of(alice));

        // The schedule is frozen at what was released.
        let (total, _, _, _, released, _) =
            contract.sender(alice).get_vesting_schedule(token);
        assert_eq!(uint!(500_U256), total);
        assert_eq!(uint!(500_U256), released);
        assert_eq!(U256::ZERO, contract.sender(alice).releasable(token));

        contract.assert_emitted(&Released {
            asset: token,
            amount: uint!(500_U256),
        });
        contract.assert_emitted(&Revoked { asset: token });
    }

    #[motsu::test]
    fn revoke_before_cliff_refunds_everything(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        let now = block::timestamp();
        contract
            .sender(alice)
            .initialize(
                token,
                TOTAL,
                U64::from(now - 50),
                U64::from(now + 10),
                U64::from(DURATION),
                true,
            )
            .motsu_unwrap();

        contract.sender(alice).revoke(token).motsu_unwrap();

        assert_eq!(U256::ZERO, erc20.sender(alice).balance_of(bob));
        assert_eq!(TOTAL, erc20.sender(alice).balance_of(alice));
        assert_eq!(U256::ZERO, contract.sender(alice).releasable(token));
    }

    #[motsu::test]
    fn revoked_schedule_stays_frozen(
        contract: Contract<VestingWallet>,
        erc20: Contract<Erc20>,
        alice: Address,
        bob: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        erc20.sender(alice)._mint(contract.address(), TOTAL).motsu_unwrap();

        let token = erc20.address();
        initialize_aged(&contract, alice, token, 50, true);

        contract.sender(alice).revoke(token).motsu_unwrap();

        // A second revocation neither pays nor refunds anything.
        contract.sender(alice).revoke(token).motsu_unwrap();
        assert_eq!(uint!(500_U256), erc20.sender(alice).balance_of(bob));
        assert_eq!(uint!(500_U256), erc20.sender(alice).balance_of(alice));

        let err = contract
            .sender(alice)
            .release(token)
            .motsu_expect_err("nothing accrues after revocation");
        assert!(matches!(err, Error::InsufficientVested(_)));
    }

    #[motsu::test]
    fn revoke_rejects_non_revocable_schedule(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        initialize_aged(&contract, alice, token, 50, false);

        let err = contract
            .sender(alice)
            .revoke(token)
            .motsu_expect_err("schedule was created non-revocable");
        assert!(matches!(err, Error::NotRevocable(_)));
    }

    #[motsu::test]
    fn revoke_rejects_unknown_asset(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();

        let err = contract
            .sender(alice)
            .revoke(token)
            .motsu_expect_err("no schedule to revoke");
        assert!(matches!(err, Error::ScheduleNotInitialized(_)));
    }

    #[motsu::test]
    fn revoke_rejects_non_owner(
        contract: Contract<VestingWallet>,
        alice: Address,
        bob: Address,
        token: Address,
    ) {
        contract.sender(alice).constructor(alice, bob).motsu_unwrap();
        initialize_aged(&contract, alice, token, 50, true);

        let err = contract
            .sender(bob)
            .revoke(token)
            .motsu_expect_err("only the owner may revoke");
        assert!(matches!(err, Error::UnauthorizedAccount(_)));
    }
}
