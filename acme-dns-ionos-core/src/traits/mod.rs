//! Abstraction trait definitions

mod propagation_waiter;
mod record_store;

pub use propagation_waiter::PropagationWaiter;
pub use record_store::{ChallengeRecordStore, InMemoryChallengeRecordStore};
