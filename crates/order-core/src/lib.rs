//! Order supervision for the bundle limit order service.
//!
//! The [`OrderSupervisor`] owns one order for the life of the process. It
//! polls the quote source, and when the quote crosses the threshold it builds,
//! submits and tracks a bundle. It stops on completion, on expiry of the
//! [`RunBudget`] or on a shutdown signal.

mod budget;
mod error;
mod state;
mod supervisor;

pub use budget::RunBudget;
pub use error::OrderError;
pub use state::OrderState;
pub use supervisor::{NetworkParams, OrderSupervisor, RunOutcome, Termination};
