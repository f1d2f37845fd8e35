//! Linear vesting-schedule math shared by the vesting contracts.
//!
//! The curve releases nothing before `start`, the full allocation from
//! `start + duration` onward, and accrues linearly in between. Integer
//! division truncates toward zero, so any rounding error stays on the
//! locked side of the split and can never cause an over-release.
use alloy_primitives::{U256, U64};

/// Returns how much of `total_allocation` has vested at `timestamp` under a
/// linear schedule starting at `start` and lasting `duration` time units.
///
/// A `duration` of zero degenerates into a timelock: the whole allocation
/// vests the instant `start` is reached.
///
/// # Arguments
///
/// * `total_allocation` - Total amount the schedule will eventually release.
/// * `start` - Timestamp at which linear accrual begins.
/// * `duration` - Length of the linear ramp.
/// * `timestamp` - Point in time for which to calculate the vested amount.
///
/// # Panics
///
/// * If scaled, total allocation (mid calculation) exceeds `U256::MAX`.
#[must_use]
pub fn vested_amount(
    total_allocation: U256,
    start: U64,
    duration: U64,
    timestamp: U64,
) -> U256 {
    let timestamp = U256::from(timestamp);
    let start = U256::from(start);
    let duration = U256::from(duration);

    // SAFETY: both `start` and `duration` are stored as u64, so their sum
    // cannot exceed `U256::MAX`.
    let end = start + duration;

    if timestamp < start {
        U256::ZERO
    } else if timestamp >= end {
        total_allocation
    } else {
        // SAFETY: `timestamp` is guaranteed to be greater than or equal to
        // `start` as checked by earlier bounds.
        let elapsed = timestamp - start;

        let scaled_allocation = total_allocation
            .checked_mul(elapsed)
            .expect("scaled allocation should not exceed `U256::MAX`");

        // SAFETY: `duration` is non-zero. If `duration` were zero, then
        // `end == start`, meaning that `timestamp >= end` and the function
        // would have returned earlier.
        scaled_allocation / duration
    }
}

/// Splits `total_allocation` into its unlocked and still-locked portions at
/// `timestamp`.
///
/// Stateless companion of [`vested_amount`], usable for previews without
/// reference to any stored schedule.
///
/// # Arguments
///
/// * `total_allocation` - Total amount the schedule will eventually release.
/// * `start` - Timestamp at which linear accrual begins.
/// * `duration` - Length of the linear ramp.
/// * `timestamp` - Point in time for which to calculate the split.
#[must_use]
pub fn vesting_status(
    total_allocation: U256,
    start: U64,
    duration: U64,
    timestamp: U64,
) -> (U256, U256) {
    let unlocked = vested_amount(total_allocation, start, duration, timestamp);

    // SAFETY: `vested_amount` is capped at `total_allocation`.
    (unlocked, total_allocation - unlocked)
}
