//! Type definition module

mod challenge;

pub use challenge::{ChallengeKey, CleanupFailure, CleanupReport, RecordOrigin, TrackedRecord};

// Re-export public types from the provider library
pub use acme_dns_ionos_provider::{
    CreateTxtRecordRequest, CredentialValidationError, IonosCredentials, TxtRecord, Zone,
};
