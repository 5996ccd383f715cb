//! Business logic service layer

mod challenge_service;
mod propagation;
mod zone_resolver;

pub use challenge_service::ChallengeRecordManager;
pub use propagation::{DEFAULT_PROPAGATION_SECONDS, MAX_PROPAGATION_SECONDS, SleepPropagationWaiter};
pub use zone_resolver::{CHALLENGE_LABEL, base_domain, challenge_record_name, resolve_zone};
