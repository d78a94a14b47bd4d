//! Owner identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque landlord identity handed over by the identity provider.
///
/// Never blank: use [`OwnerId::parse`] at the boundary and treat `None`
/// as "identity not known yet".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identities_are_rejected() {
        assert!(OwnerId::parse("").is_none());
        assert!(OwnerId::parse("   ").is_none());
    }

    #[test]
    fn identity_is_kept_verbatim() {
        let id = OwnerId::parse("uid-42").unwrap();
        assert_eq!(id.as_str(), "uid-42");
        assert_eq!(id.to_string(), "uid-42");
    }
}
