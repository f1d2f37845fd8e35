//! Extension of the ERC-20 token standard that lets any holder lock part of
//! their own balance into one or more linear vesting schedules.
//!
//! Locked value never leaves the holder's balance; it is carved out of the
//! spendable portion, and the regular transfer paths reject any amount that
//! would dip into it. Each schedule unlocks linearly over a single,
//! engine-wide duration fixed at construction. Withdrawing moves the
//! unlocked part of a schedule back into the spendable portion, and a fully
//! exhausted schedule is removed from the account's sequence by swapping
//! the last schedule into its slot.
//!
//! NOTE: Schedule indices are positional and only stable until the next
//! removal for that account. After any withdrawal, callers should re-read
//! [`IErc20Vestable::get_vesting_length`] before addressing schedules by
//! index.
use alloc::{vec, vec::Vec};

use alloy_primitives::{Address, U256, U64};
pub use sol::*;
use stylus_sdk::{
    block,
    call::MethodError,
    evm, msg,
    prelude::*,
    storage::{StorageMap, StorageU256, StorageU64},
};

use crate::{
    token::erc20::{self, Erc20, IErc20},
    utils::{
        math::storage::{AddAssignUnchecked, SubAssignUnchecked},
        vesting_schedule,
    },
};

#[cfg_attr(coverage_nightly, coverage(off))]
mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when `account` locks `amount` of its balance into a new
        /// vesting schedule.
        ///
        /// * `account` - Account whose balance got locked.
        /// * `index` - Position of the new schedule in the account's
        ///   sequence.
        /// * `amount` - Amount locked into the schedule.
        /// * `start` - Timestamp at which linear unlocking begins.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Vested(address indexed account, uint256 index, uint256 amount, uint64 start);

        /// Emitted when the unlocked portion of a schedule is moved back
        /// into `account`'s spendable balance.
        ///
        /// * `account` - Account whose balance got unlocked.
        /// * `index` - Position of the withdrawn schedule.
        /// * `amount` - Newly unlocked amount.
        /// * `remaining` - Amount still locked under the schedule; zero when
        ///   the schedule got removed.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event VestingWithdrawn(address indexed account, uint256 index, uint256 amount, uint256 remaining);
    }

    sol! {
        /// Indicates an invalid schedule configuration: a schedule must lock
        /// a non-zero amount and unlock over a non-zero duration.
        ///
        /// * `amount` - Amount requested for the schedule.
        /// * `duration` - Engine-wide vesting duration.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error Erc20VestableInvalidConfiguration(uint256 amount, uint64 duration);

        /// Indicates that an operation would dip into the locked portion of
        /// `account`'s balance.
        ///
        /// * `account` - Account whose balance is being spent.
        /// * `spendable` - Portion of the balance not locked by schedules.
        /// * `needed` - Minimum spendable amount required.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error Erc20VestableInsufficientSpendableBalance(address account, uint256 spendable, uint256 needed);

        /// Indicates that `index` does not address a schedule of `account`.
        ///
        /// * `account` - Account whose schedules were addressed.
        /// * `index` - Out-of-range schedule index.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error Erc20VestableInvalidIndex(address account, uint256 index);
    }
}

/// An [`Erc20Vestable`] error.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// Indicates an invalid schedule configuration: zero amount or zero
    /// duration.
    InvalidConfiguration(Erc20VestableInvalidConfiguration),
    /// Indicates that an operation would dip into the locked portion of an
    /// account's balance.
    InsufficientSpendableBalance(Erc20VestableInsufficientSpendableBalance),
    /// Indicates that an index does not address an existing schedule.
    InvalidIndex(Erc20VestableInvalidIndex),
    /// Indicates an error related to the current balance of `sender`. Used
    /// in transfers.
    InsufficientBalance(erc20::ERC20InsufficientBalance),
    /// Indicates a failure with the token `sender`. Used in transfers.
    InvalidSender(erc20::ERC20InvalidSender),
    /// Indicates a failure with the token `receiver`. Used in transfers.
    InvalidReceiver(erc20::ERC20InvalidReceiver),
    /// Indicates a failure with the `spender`'s allowance. Used in
    /// transfers.
    InsufficientAllowance(erc20::ERC20InsufficientAllowance),
    /// Indicates a failure with the `spender` to be approved. Used in
    /// approvals.
    InvalidSpender(erc20::ERC20InvalidSpender),
    /// Indicates a failure with the `approver` of a token to be approved.
    /// Used in approvals.
    InvalidApprover(erc20::ERC20InvalidApprover),
}

#[cfg_attr(coverage_nightly, coverage(off))]
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
            erc20::Error::InvalidSpender(e) => Error::InvalidSpender(e),
            erc20::Error::InvalidApprover(e) => Error::InvalidApprover(e),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// One linear vesting schedule of an account.
#[storage]
#[derive(Erase)]
pub struct VestingSchedule {
    /// Amount locked into the schedule. Immutable once created.
    total_amount: StorageU256,
    /// Timestamp at which linear unlocking begins.
    start: StorageU64,
    /// Cumulative amount already moved back to the spendable balance.
    released: StorageU256,
}

/// Vesting bookkeeping of a single account: its schedules, indexed by
/// position, and the total amount they keep locked.
#[storage]
pub struct AccountVesting {
    /// Schedules by position. Indices `0..count` are populated.
    schedules: StorageMap<U256, VestingSchedule>,
    /// Number of live schedules.
    count: StorageU256,
    /// Sum of `total_amount - released` over the live schedules.
    locked: StorageU256,
}

/// State of an [`Erc20Vestable`] token.
#[storage]
pub struct Erc20Vestable {
    /// The ERC-20 ledger backing this token.
    pub erc20: Erc20,
    /// Per-account vesting bookkeeping.
    vestings: StorageMap<Address, AccountVesting>,
    /// Sum of every account's locked total.
    total_vesting_balance: StorageU256,
    /// Engine-wide vesting duration, fixed at construction.
    vesting_duration: StorageU64,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self`
/// when calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for Erc20Vestable {}

/// Vesting interface of an [`Erc20Vestable`] token.
pub trait IErc20Vestable {
    /// The error type associated to this trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Returns the engine-wide vesting duration.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn vesting_duration(&self) -> U64;

    /// Returns the sum of every account's locked total.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn total_vesting_balance(&self) -> U256;

    /// Returns the amount of `account`'s balance currently locked by its
    /// vesting schedules, i.e. the sum of `total_amount - released` over
    /// its schedules.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `account` - Account to query.
    fn vesting_balance_of(&self, account: Address) -> U256;

    /// Returns the portion of `account`'s balance not locked by vesting
    /// schedules. This is the amount the regular transfer paths accept.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `account` - Account to query.
    fn spendable_balance_of(&self, account: Address) -> U256;

    /// Returns the number of live schedules of `account`.
    ///
    /// Indices shift when a withdrawal removes a schedule, so this value
    /// should be re-read after any withdrawal before addressing schedules
    /// by index.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `account` - Account to query.
    fn get_vesting_length(&self, account: Address) -> U256;

    /// Returns the schedule of `account` at `index` as the tuple
    /// `(total_amount, start, unlocked, locked)`, where `unlocked` is the
    /// amount a withdrawal would move right now and `locked` the remainder
    /// still accruing.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `account` - Account to query.
    /// * `index` - Position of the schedule in the account's sequence.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidIndex`] - If `index` is not lower than the
    ///   account's schedule count.
    fn get_user_vesting_schedule(
        &self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U64, U256, U256), Self::Error>;

    /// Splits a hypothetical allocation of `amount` starting at `start`
    /// into its unlocked and locked portions as of the current block,
    /// using the engine-wide duration. Usable as a preview without
    /// reference to any stored schedule.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `amount` - Hypothetical allocation.
    /// * `start` - Hypothetical schedule start.
    fn vesting_status(&self, amount: U256, start: U64) -> (U256, U256);

    /// Locks `amount` of the caller's spendable balance into a new
    /// schedule starting now, and returns the new schedule's index.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `amount` - Amount to lock.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidConfiguration`] - If `amount` is zero.
    /// * [`Error::InsufficientSpendableBalance`] - If `amount` exceeds the
    ///   caller's spendable balance.
    ///
    /// # Events
    ///
    /// * [`Vested`].
    fn vest(&mut self, amount: U256) -> Result<U256, Self::Error>;

    /// Moves the unlocked portion of `account`'s schedule at `index` back
    /// into the spendable balance and returns `(unlocked, locked)`.
    ///
    /// Anyone may trigger a withdrawal for any account; value only ever
    /// moves within that account's own balance.
    ///
    /// When nothing has unlocked since the last withdrawal, this is a no-op
    /// success returning a zero `unlocked`. When the schedule becomes fully
    /// withdrawn, it is removed from the account's sequence and `locked` is
    /// zero; the removal swaps the last schedule into `index`, so indices
    /// are not stable across this call.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `account` - Account whose schedule to withdraw.
    /// * `index` - Position of the schedule in the account's sequence.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidIndex`] - If `index` is not lower than the
    ///   account's schedule count.
    ///
    /// # Events
    ///
    /// * [`VestingWithdrawn`] - Unless nothing has unlocked.
    fn withdraw(
        &mut self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U256), Self::Error>;
}

#[public]
#[implements(IErc20Vestable<Error = Error>, IErc20<Error = Error>)]
impl Erc20Vestable {
    /// Constructor.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `duration` - Engine-wide vesting duration for every schedule.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidConfiguration`] - If `duration` is zero.
    #[constructor]
    pub fn constructor(&mut self, duration: U64) -> Result<(), Error> {
        if duration.is_zero() {
            return Err(Error::InvalidConfiguration(
                Erc20VestableInvalidConfiguration {
                    amount: U256::ZERO,
                    duration: 0,
                },
            ));
        }
        self.vesting_duration.set(duration);
        Ok(())
    }
}

#[public]
impl IErc20Vestable for Erc20Vestable {
    type Error = Error;

    fn vesting_duration(&self) -> U64 {
        self.vesting_duration.get()
    }

    fn total_vesting_balance(&self) -> U256 {
        self.total_vesting_balance.get()
    }

    fn vesting_balance_of(&self, account: Address) -> U256 {
        self.vestings.getter(account).locked.get()
    }

    fn spendable_balance_of(&self, account: Address) -> U256 {
        let balance = self.erc20.balance_of(account);
        // SAFETY: schedules only ever lock value present in the balance,
        // and every path that decreases the balance is gated on the
        // spendable portion, so `locked <= balance`.
        balance - self.vesting_balance_of(account)
    }

    fn get_vesting_length(&self, account: Address) -> U256 {
        self.vestings.getter(account).count.get()
    }

    fn get_user_vesting_schedule(
        &self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U64, U256, U256), Self::Error> {
        let vesting = self.vestings.getter(account);
        if index >= vesting.count.get() {
            return Err(Error::InvalidIndex(Erc20VestableInvalidIndex {
                account,
                index,
            }));
        }

        let schedule = vesting.schedules.getter(index);
        let total_amount = schedule.total_amount.get();
        let start = schedule.start.get();
        let released = schedule.released.get();

        let vested = vesting_schedule::vested_amount(
            total_amount,
            start,
            self.vesting_duration.get(),
            U64::from(block::timestamp()),
        );

        // SAFETY: `released` never exceeds the vested amount, which never
        // exceeds `total_amount`.
        Ok((total_amount, start, vested - released, total_amount - vested))
    }

    fn vesting_status(&self, amount: U256, start: U64) -> (U256, U256) {
        vesting_schedule::vesting_status(
            amount,
            start,
            self.vesting_duration.get(),
            U64::from(block::timestamp()),
        )
    }

    fn vest(&mut self, amount: U256) -> Result<U256, Self::Error> {
        let account = msg::sender();
        let start = U64::from(block::timestamp());
        self._vest_at(account, amount, start)
    }

    fn withdraw(
        &mut self,
        account: Address,
        index: U256,
    ) -> Result<(U256, U256), Self::Error> {
        let timestamp = U64::from(block::timestamp());
        self._withdraw_at(account, index, timestamp)
    }
}

#[public]
impl IErc20 for Erc20Vestable {
    type Error = Error;

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
        let from = msg::sender();
        self._check_spendable(from, value)?;
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
        self._check_spendable(from, value)?;
        Ok(self.erc20.transfer_from(from, to, value)?)
    }
}

impl Erc20Vestable {
    /// Creates a `value` amount of tokens and assigns them to `account`.
    ///
    /// Freshly minted tokens are spendable; they do not touch any vesting
    /// bookkeeping. Exposing this to callers, and gating it, is up to the
    /// embedding contract.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `account` - Account to mint tokens to.
    /// * `value` - Amount of tokens to mint.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidReceiver`] - If the `account` address is
    ///   [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`erc20::Transfer`].
    pub fn _mint(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), Error> {
        Ok(self.erc20._mint(account, value)?)
    }

    /// Destroys a `value` amount of spendable tokens from `account`.
    ///
    /// The locked portion of the balance backs live schedules and cannot be
    /// burned.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `account` - Account to burn tokens from.
    /// * `value` - Amount of tokens to burn.
    ///
    /// # Errors
    ///
    /// * [`Error::InsufficientSpendableBalance`] - If `value` exceeds the
    ///   account's spendable balance.
    /// * [`Error::InvalidSender`] - If the `account` address is
    ///   [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`erc20::Transfer`].
    pub fn _burn(
        &mut self,
        account: Address,
        value: U256,
    ) -> Result<(), Error> {
        self._check_spendable(account, value)?;
        Ok(self.erc20._burn(account, value)?)
    }

    /// Rejects `value` amounts that would dip into the locked portion of
    /// `account`'s balance.
    fn _check_spendable(
        &self,
        account: Address,
        value: U256,
    ) -> Result<(), Error> {
        let spendable = self.spendable_balance_of(account);
        if value > spendable {
            return Err(Error::InsufficientSpendableBalance(
                Erc20VestableInsufficientSpendableBalance {
                    account,
                    spendable,
                    needed: value,
                },
            ));
        }
        Ok(())
    }

    /// Appends a schedule locking `amount` of `account`'s balance,
    /// beginning at `start`.
    ///
    /// `start` is the single timestamp reading of the mutating call.
    fn _vest_at(
        &mut self,
        account: Address,
        amount: U256,
        start: U64,
    ) -> Result<U256, Error> {
        if amount.is_zero() {
            return Err(Error::InvalidConfiguration(
                Erc20VestableInvalidConfiguration {
                    amount,
                    duration: self.vesting_duration.get().to::<u64>(),
                },
            ));
        }
        self._check_spendable(account, amount)?;

        let index = {
            let mut vesting = self.vestings.setter(account);
            let index = vesting.count.get();

            {
                let mut schedule = vesting.schedules.setter(index);
                schedule.total_amount.set(amount);
                schedule.start.set(start);
                schedule.released.set(U256::ZERO);
            }

            vesting.count.set(index + U256::from(1));
            // SAFETY: the locked total is bounded by the account's balance,
            // which `_check_spendable` just established covers `amount`.
            vesting.locked.add_assign_unchecked(amount);
            index
        };
        // SAFETY: bounded by the token's total supply.
        self.total_vesting_balance.add_assign_unchecked(amount);

        evm::log(Vested {
            account,
            index,
            amount,
            start: start.to::<u64>(),
        });

        Ok(index)
    }

    /// Withdraws the portion of `account`'s schedule at `index` unlocked as
    /// of `timestamp`.
    ///
    /// `timestamp` is the single timestamp reading of the mutating call.
    fn _withdraw_at(
        &mut self,
        account: Address,
        index: U256,
        timestamp: U64,
    ) -> Result<(U256, U256), Error> {
        let count = self.vestings.getter(account).count.get();
        if index >= count {
            return Err(Error::InvalidIndex(Erc20VestableInvalidIndex {
                account,
                index,
            }));
        }

        let (total_amount, start, released) = {
            let vesting = self.vestings.getter(account);
            let schedule = vesting.schedules.getter(index);
            (
                schedule.total_amount.get(),
                schedule.start.get(),
                schedule.released.get(),
            )
        };

        let vested = vesting_schedule::vested_amount(
            total_amount,
            start,
            self.vesting_duration.get(),
            timestamp,
        );
        // SAFETY: `released` never exceeds the vested amount.
        let unlocked = vested - released;

        if unlocked.is_zero() {
            // Nothing newly unlocked: a no-op success, not an error.
            return Ok((U256::ZERO, total_amount - released));
        }

        // SAFETY: `released + unlocked == vested <= total_amount`.
        let released = released + unlocked;

        let locked = if released == total_amount {
            self._remove_schedule(account, index, count);
            U256::ZERO
        } else {
            let mut vesting = self.vestings.setter(account);
            vesting.schedules.setter(index).released.set(released);
            total_amount - released
        };

        // SAFETY: `unlocked` is part of the account's locked total, which
        // in turn is part of `total_vesting_balance`.
        self.vestings.setter(account).locked.sub_assign_unchecked(unlocked);
        self.total_vesting_balance.sub_assign_unchecked(unlocked);

        evm::log(VestingWithdrawn {
            account,
            index,
            amount: unlocked,
            remaining: locked,
        });

        Ok((unlocked, locked))
    }

    /// Removes `account`'s schedule at `index` by moving the last schedule
    /// into its slot and dropping the tail (swap and pop). `count` is the
    /// account's current schedule count.
    fn _remove_schedule(&mut self, account: Address, index: U256, count: U256) {
        // SAFETY: callers have checked `index < count`, so `count > 0`.
        let last_index = count - U256::from(1);

        let mut vesting = self.vestings.setter(account);

        if index != last_index {
            let (total_amount, start, released) = {
                let last = vesting.schedules.getter(last_index);
                (
                    last.total_amount.get(),
                    last.start.get(),
                    last.released.get(),
                )
            };
            {
                let mut schedule = vesting.schedules.setter(index);
                schedule.total_amount.set(total_amount);
                schedule.start.set(start);
                schedule.released.set(released);
            }
        }

        vesting.schedules.delete(last_index);
        vesting.count.set(last_index);
    }
}
