//! Platform version parsing and capability gates.
//!
//! Version-gated endpoints declare a minimum platform version here. The
//! version is resolved once per session ([`Capabilities::resolve`]) instead
//! of being re-fetched inside every gated operation.

use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, Result};
use crate::instance::Instance;
use crate::system;

/// A platform version (`major.minor.patch`, numeric, component-wise).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlatformVersion(semver::Version);

impl PlatformVersion {
    /// Inclusive comparison against a minimum version.
    pub fn at_least(&self, minimum: &PlatformVersion) -> bool {
        self.0 >= minimum.0
    }
}

impl FromStr for PlatformVersion {
    type Err = ClientError;

    /// Parse a version string such as `7.49.3`. Missing components are
    /// treated as zero; a build qualifier after `-` is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let numeric = s.trim().split('-').next().unwrap_or_default();
        let mut parts = numeric.split('.');
        let mut component = |name: &str| -> Result<u64> {
            match parts.next() {
                None => Ok(0),
                Some(p) => p
                    .parse::<u64>()
                    .map_err(|_| ClientError::Response(format!("bad {name} in version {s:?}"))),
            }
        };
        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch")?;
        Ok(Self(semver::Version::new(major, minor, patch)))
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0.major, self.0.minor, self.0.patch)
    }
}

/// Version-gated platform features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// `GET /access/api/v2/users`
    UserListing,
    /// `GET|POST /access/api/v1/tokens`
    ScopedTokens,
    /// `GET|PUT /access/api/v1/tokens/default_expiry`
    DefaultTokenExpiry,
}

impl Capability {
    /// Minimum platform version exposing this capability.
    pub fn minimum(self) -> PlatformVersion {
        let raw = match self {
            Capability::UserListing => "7.49.3",
            Capability::ScopedTokens => "7.21.1",
            Capability::DefaultTokenExpiry => "7.62.0",
        };
        raw.parse().expect("static minimum version")
    }
}

/// Capability set of one instance, derived from its version.
#[derive(Debug, Clone)]
pub struct Capabilities {
    version: PlatformVersion,
}

impl Capabilities {
    /// Fetch the platform version once and derive the capability set.
    pub async fn resolve(instance: &Instance) -> Result<Self> {
        let info = system::get_version(instance).await?;
        let version = info.version.parse()?;
        tracing::debug!(%version, "Resolved platform version");
        Ok(Self { version })
    }

    /// Build a capability set from an already-known version.
    pub fn from_version(version: PlatformVersion) -> Self {
        Self { version }
    }

    pub fn version(&self) -> &PlatformVersion {
        &self.version
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.version.at_least(&capability.minimum())
    }

    /// Fail fast with a typed error when the capability is missing.
    pub fn require(&self, capability: Capability) -> Result<()> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(ClientError::VersionUnsupported {
                required: capability.minimum().to_string(),
                current: self.version.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> PlatformVersion {
        s.parse().unwrap()
    }

    #[test]
    fn minimum_is_inclusive() {
        assert!(v("7.49.3").at_least(&v("7.49.3")));
    }

    #[test]
    fn older_patch_fails() {
        assert!(!v("7.21.0").at_least(&v("7.21.1")));
    }

    #[test]
    fn newer_major_passes() {
        assert!(v("8.0.0").at_least(&v("7.62.0")));
    }

    #[test]
    fn missing_components_default_to_zero() {
        assert_eq!(v("7.21"), v("7.21.0"));
    }

    #[test]
    fn build_qualifier_is_ignored() {
        assert_eq!(v("7.77.3-m001"), v("7.77.3"));
    }

    #[test]
    fn garbage_version_is_rejected() {
        assert!("seven.two.one".parse::<PlatformVersion>().is_err());
    }

    #[test]
    fn capability_gates() {
        let caps = Capabilities::from_version(v("7.50.0"));
        assert!(caps.supports(Capability::UserListing));
        assert!(caps.supports(Capability::ScopedTokens));
        assert!(!caps.supports(Capability::DefaultTokenExpiry));
        assert!(caps.require(Capability::UserListing).is_ok());
        assert!(matches!(
            caps.require(Capability::DefaultTokenExpiry),
            Err(ClientError::VersionUnsupported { .. })
        ));
    }
}
