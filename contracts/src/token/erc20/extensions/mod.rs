//! Common extensions to the ERC-20 standard.
pub mod vestable;

pub use vestable::{Erc20Vestable, IErc20Vestable};
