use crate::core::error::FilterError;
use crate::models::Broker;
use validator::Validate;

/// Brokers that cannot legally onboard clients from a jurisdiction.
///
/// Keyed by upper-case ISO country code; values are broker ids.
pub const JURISDICTION_EXCLUSIONS: &[(&str, &[&str])] = &[
    ("US", &["etoro", "plus500", "xtb", "ic-markets", "pepperstone", "avatrade", "xm"]),
    ("CA", &["plus500", "xtb", "xm"]),
    ("BE", &["plus500", "xm"]),
    ("JP", &["ic-markets", "pepperstone", "xm"]),
];

/// Check whether a broker is barred from serving `country`.
///
/// This is the only preference that can veto a broker outright.
#[inline]
pub fn is_jurisdiction_excluded(broker: &Broker, country: &str) -> bool {
    let country = country.trim();
    if country.is_empty() {
        return false;
    }

    // Per-record restrictions supplied by the catalog
    if broker
        .restricted_countries
        .iter()
        .any(|c| c.trim().eq_ignore_ascii_case(country))
    {
        return true;
    }

    JURISDICTION_EXCLUSIONS
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(country))
        .map_or(false, |(_, ids)| {
            ids.iter().any(|id| id.eq_ignore_ascii_case(broker.id.trim()))
        })
}

/// Reject broker records the scoring rules cannot handle
pub fn check_broker(broker: &Broker) -> Result<(), FilterError> {
    if !broker.is_finite() {
        return Err(FilterError::InvalidBroker {
            id: broker.id.clone(),
            reason: "numeric field is not finite".to_string(),
        });
    }

    broker.validate().map_err(|errors| FilterError::InvalidBroker {
        id: broker.id.clone(),
        reason: errors.to_string(),
    })
}
