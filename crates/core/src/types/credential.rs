//! Tagged credential value.
//!
//! A credential field on a write path is either the plaintext the client
//! just sent or a hash loaded from storage. Keeping the tag in the type
//! means the persistence layer can demand a hash and the hashing step can
//! never be applied twice to the same value.

use core::fmt;

use serde::{Deserialize, Deserializer};

/// A user credential, tagged by whether it has been hashed yet.
///
/// Deserialization always produces [`Credential::Plaintext`]; the only ways
/// to obtain a [`Credential::Hashed`] are [`Credential::from_hash`] (loading
/// a stored value) and [`Credential::into_hashed`] (applying the hash
/// function exactly once).
///
/// There is deliberately no `Serialize` implementation: credentials never
/// appear in responses.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// A plaintext value from a client request. Never persisted.
    Plaintext(String),
    /// A hash in PHC string format, safe to persist.
    Hashed(String),
}

impl Credential {
    /// Wrap a plaintext value from a request.
    #[must_use]
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self::Plaintext(value.into())
    }

    /// Wrap a hash loaded from storage.
    #[must_use]
    pub fn from_hash(value: impl Into<String>) -> Self {
        Self::Hashed(value.into())
    }

    /// Whether this credential is already hashed.
    #[must_use]
    pub const fn is_hashed(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }

    /// Ensure the credential is hashed, applying `hash` at most once.
    ///
    /// An already-hashed credential passes through untouched, so calling
    /// this on every write path is safe.
    ///
    /// # Errors
    ///
    /// Propagates the error from `hash`.
    pub fn into_hashed<E>(self, hash: impl FnOnce(&str) -> Result<String, E>) -> Result<Self, E> {
        match self {
            Self::Plaintext(value) => Ok(Self::Hashed(hash(&value)?)),
            hashed @ Self::Hashed(_) => Ok(hashed),
        }
    }

    /// The stored form of the credential.
    ///
    /// Returns `None` for plaintext: a plaintext credential has no stored
    /// form and must go through [`Credential::into_hashed`] first.
    #[must_use]
    pub fn as_hash(&self) -> Option<&str> {
        match self {
            Self::Plaintext(_) => None,
            Self::Hashed(value) => Some(value),
        }
    }

    /// The plaintext, if this credential has not been hashed.
    #[must_use]
    pub fn expose_plaintext(&self) -> Option<&str> {
        match self {
            Self::Plaintext(value) => Some(value),
            Self::Hashed(_) => None,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(_) => f.write_str("Credential::Plaintext([REDACTED])"),
            Self::Hashed(_) => f.write_str("Credential::Hashed([REDACTED])"),
        }
    }
}

impl<'de> Deserialize<'de> for Credential {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Anything coming over the wire is plaintext by definition.
        let value = String::deserialize(deserializer)?;
        Ok(Self::Plaintext(value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fake_hash(s: &str) -> Result<String, std::convert::Infallible> {
        Ok(format!("$hash${s}"))
    }

    #[test]
    fn test_plaintext_is_hashed_once() {
        let credential = Credential::plaintext("pikachu123");
        let hashed = credential.into_hashed(fake_hash).unwrap();
        assert_eq!(hashed.as_hash(), Some("$hash$pikachu123"));
    }

    #[test]
    fn test_hashed_passes_through_unchanged() {
        let stored = Credential::from_hash("$hash$pikachu123");
        // A second trip through the write path must not re-hash.
        let after = stored.clone().into_hashed(fake_hash).unwrap();
        assert_eq!(after, stored);
    }

    #[test]
    fn test_plaintext_has_no_stored_form() {
        assert_eq!(Credential::plaintext("secret").as_hash(), None);
    }

    #[test]
    fn test_deserialize_tags_plaintext() {
        let credential: Credential = serde_json::from_str("\"dracaufeu\"").unwrap();
        assert!(!credential.is_hashed());
        assert_eq!(credential.expose_plaintext(), Some("dracaufeu"));
    }

    #[test]
    fn test_debug_redacts_value() {
        let debug = format!("{:?}", Credential::plaintext("super-secret"));
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
