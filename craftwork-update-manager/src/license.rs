//! License gate: which tiers require a key, and whether the configured
//! key is valid for a tier.

/// License tiers that require a valid key to receive updates.
const PREMIUM_LICENSE_TYPES: [&str; 3] = ["standard", "plus", "builder"];

pub fn premium_license_types() -> &'static [&'static str] {
    &PREMIUM_LICENSE_TYPES
}

/// Whether a license tier is paid, i.e. updates are gated on a key.
pub fn is_premium(license_type: &str) -> bool {
    PREMIUM_LICENSE_TYPES.contains(&license_type.to_lowercase().as_str())
}

/// Key validation seam. In the full platform this asks the license server
/// and may block on the network, so callers consult it once per request
/// cycle and cache the answer in the produced payload.
pub trait LicenseValidator {
    fn is_valid(&self, key: Option<&str>, license_type: &str) -> bool;
}

/// Stand-alone build: no validation backend is available, so every key is
/// treated as invalid. The full platform swaps in a validator that really
/// checks the key.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandaloneValidator;

impl LicenseValidator for StandaloneValidator {
    fn is_valid(&self, _key: Option<&str>, _license_type: &str) -> bool {
        false
    }
}
