/*!
# Linear Vesting Contracts for Stylus

A library of linear vesting primitives written in Rust for
[Arbitrum Stylus](https://docs.arbitrum.io/stylus/stylus-gentle-introduction).
It ships one accounting core in two deployable shapes:

- [`finance::vesting_wallet::VestingWallet`] - a wallet that holds native
  currency and ERC-20 tokens earmarked for a single beneficiary, releasing
  each asset along its own linear schedule, with owner-controlled
  revocation.
- [`token::erc20::extensions::vestable::Erc20Vestable`] - an ERC-20 token
  whose holders can lock part of their own balance into any number of
  linear schedules, withdrawing the unlocked portion over time while the
  locked portion stays untransferable.

## Usage

Embed a contract from the library and delegate to it:

```ignore
use vesting_stylus::token::erc20::extensions::vestable::{
    Erc20Vestable, IErc20Vestable,
};

#[entrypoint]
#[storage]
struct MyToken {
    token: Erc20Vestable,
}
```
*/

#![allow(clippy::pub_underscore_fields, clippy::module_name_repetitions)]
#![cfg_attr(not(any(test, feature = "std")), no_std, no_main)]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod access;
pub mod finance;
pub mod token;
pub mod utils;
