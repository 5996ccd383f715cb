//! Shared test helpers

#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use acme_dns_ionos_provider::{DnsProvider, IonosCredentials, IonosProvider, create_provider};
use wiremock::MockServer;

/// Skip a test when any of the given environment variables is missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("Skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Provider pointed at a mock server
pub fn mock_provider(server: &MockServer) -> IonosProvider {
    let credentials = IonosCredentials::new("pfx", "topsecret").with_endpoint(server.uri());
    IonosProvider::new(credentials).expect("mock provider")
}

/// Unique record name below `domain`
pub fn generate_test_record_name(domain: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("_acme-test-{nanos:08x}.{domain}")
}

/// Live test context: a provider built from the environment and the zone to use
pub struct TestContext {
    pub provider: Arc<dyn DnsProvider>,
    pub domain: String,
}

impl TestContext {
    pub fn ionos() -> Option<Self> {
        let credentials = IonosCredentials::from_env().ok()?;
        let domain = env::var("TEST_DOMAIN").ok()?;
        let provider = create_provider(credentials).ok()?;
        Some(Self { provider, domain })
    }

    /// ID of the zone named `TEST_DOMAIN`
    pub async fn find_zone_id(&self) -> Option<String> {
        let zones = self.provider.list_zones().await.ok()?;
        zones
            .into_iter()
            .find(|z| z.name == self.domain)
            .map(|z| z.id)
    }
}
