//! Shared types for the bundle limit order system.
//!
//! Every crate in the workspace speaks in these types: the immutable order
//! terms, quotes, signed transaction sets, bundles and relay statuses, plus
//! the integer amount math used to convert human quantities into token units.

pub mod amount;
pub mod bundle;
pub mod order;
pub mod quote;
pub mod transaction;
pub mod validation;

pub use alloy::primitives::{Address, Bytes, B256, U256};

pub use amount::*;
pub use bundle::*;
pub use order::*;
pub use quote::*;
pub use transaction::*;
pub use validation::*;
