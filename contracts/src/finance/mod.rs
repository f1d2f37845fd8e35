//! Primitives for financial systems.
pub mod vesting_wallet;

pub use vesting_wallet::{IVestingWallet, VestingWallet};
