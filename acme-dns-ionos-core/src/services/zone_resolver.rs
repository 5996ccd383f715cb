//! Zone resolution
//!
//! Picks the zone owning a domain: the zone whose name equals the domain or is
//! a suffix of it at a label boundary. The longest such name wins, so
//! `a.sub.example.com` resolves to `sub.example.com` when both it and
//! `example.com` are hosted, and `example.com` never matches
//! `thisisanexample.com`.

use acme_dns_ionos_provider::normalize_domain_name;

use crate::error::{CoreError, CoreResult};
use crate::types::Zone;

/// Label prepended to the domain to form the challenge record name
pub const CHALLENGE_LABEL: &str = "_acme-challenge";

/// Domain with wildcard and challenge labels removed, normalized.
pub fn base_domain(domain: &str) -> String {
    let domain = normalize_domain_name(domain);
    let domain = domain.strip_prefix("*.").unwrap_or(&domain);
    domain
        .strip_prefix(CHALLENGE_LABEL)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(domain)
        .to_string()
}

/// `_acme-challenge.<domain>` for a (possibly wildcard) domain.
///
/// A domain already carrying the challenge label is not prefixed twice.
pub fn challenge_record_name(domain: &str) -> String {
    format!("{CHALLENGE_LABEL}.{}", base_domain(domain))
}

/// Whether `zone` is `domain` or one of its parents
fn is_label_suffix(domain: &str, zone: &str) -> bool {
    domain == zone
        || domain
            .strip_suffix(zone)
            .is_some_and(|head| head.ends_with('.'))
}

/// Select the zone owning `domain`.
///
/// # Errors
///
/// - [`CoreError::ZoneNotFound`] if no zone matches
/// - [`CoreError::AmbiguousZone`] if distinct zones share the winning name
pub fn resolve_zone(domain: &str, zones: &[Zone]) -> CoreResult<Zone> {
    let base = base_domain(domain);

    let mut best: Vec<&Zone> = Vec::new();
    let mut best_len = 0;
    for zone in zones {
        let name = normalize_domain_name(&zone.name);
        if name.is_empty() || !is_label_suffix(&base, &name) {
            continue;
        }
        if name.len() > best_len {
            best_len = name.len();
            best.clear();
        }
        if name.len() == best_len && !best.iter().any(|z| z.id == zone.id) {
            best.push(zone);
        }
    }

    match best.as_slice() {
        [] => Err(CoreError::ZoneNotFound { domain: base }),
        [zone] => {
            log::debug!("Resolved zone '{}' ({}) for '{base}'", zone.name, zone.id);
            Ok(Zone::new(zone.id.clone(), normalize_domain_name(&zone.name)))
        }
        many => Err(CoreError::AmbiguousZone {
            domain: base,
            zone_name: normalize_domain_name(&many[0].name),
            zone_ids: many.iter().map(|z| z.id.clone()).collect(),
        }),
    }
}
