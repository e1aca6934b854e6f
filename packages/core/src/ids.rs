// ABOUTME: Typed entity identifiers used across all Cadence packages
// ABOUTME: Validating 24-character lowercase hex ids replacing ad-hoc string checks

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Length of a canonical entity identifier
pub const ENTITY_ID_LEN: usize = 24;

/// Error returned when a candidate string is not a well-formed identifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid entity id: {0:?}")]
pub struct InvalidEntityId(pub String);

/// Identifier for any persisted entity (user, team, project, sprint, task).
///
/// The canonical form is 24 lowercase hexadecimal characters. Construction
/// goes through [`EntityId::parse`], so a held `EntityId` is always
/// well-formed; raw strings from the outside world are rejected at the
/// boundary instead of being shape-checked at each call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Validate a candidate string and return the canonical identifier.
    ///
    /// Leading/trailing whitespace is ignored and uppercase hex digits are
    /// normalized to lowercase. Everything else — empty input, the literal
    /// strings `"undefined"` and `"null"` that broken clients send, wrong
    /// lengths, non-hex characters — is rejected.
    pub fn parse(raw: &str) -> Result<Self, InvalidEntityId> {
        let candidate = raw.trim();
        if candidate.len() != ENTITY_ID_LEN
            || !candidate.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(InvalidEntityId(raw.to_string()));
        }
        Ok(EntityId(candidate.to_ascii_lowercase()))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        use rand::Rng;
        let bytes: [u8; ENTITY_ID_LEN / 2] = rand::thread_rng().gen();
        EntityId(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityId::parse(s)
    }
}

impl TryFrom<&str> for EntityId {
    type Error = InvalidEntityId;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        EntityId::parse(value)
    }
}

impl TryFrom<String> for EntityId {
    type Error = InvalidEntityId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        EntityId::parse(&value)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Deserialization validates, so ids arriving in request bodies are already
// canonical by the time handlers see them.
impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        EntityId::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_canonical() {
        let id1 = EntityId::generate();
        let id2 = EntityId::generate();

        assert_eq!(id1.as_str().len(), ENTITY_ID_LEN);
        assert_eq!(id2.as_str().len(), ENTITY_ID_LEN);
        assert_ne!(id1, id2);

        // Should only contain lowercase hex characters
        assert!(id1
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_parse_valid() {
        let id = EntityId::parse("507f1f77bcf86cd799439011").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_normalizes_case_and_whitespace() {
        let id = EntityId::parse("  507F1F77BCF86CD799439011 ").unwrap();
        assert_eq!(id.as_str(), "507f1f77bcf86cd799439011");
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for raw in ["", "undefined", "null", "xyz", "507f1f77bcf86cd79943901", "507f1f77bcf86cd7994390111", "507f1f77bcf86cd79943901g"] {
            assert!(
                EntityId::parse(raw).is_err(),
                "{:?} should not parse as an entity id",
                raw
            );
        }
    }

    #[test]
    fn test_deserialize_rejects_malformed_input() {
        let ok: Result<EntityId, _> = serde_json::from_str("\"507f1f77bcf86cd799439011\"");
        assert!(ok.is_ok());

        let bad: Result<EntityId, _> = serde_json::from_str("\"undefined\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serialize_is_plain_string() {
        let id = EntityId::parse("507f1f77bcf86cd799439011").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"507f1f77bcf86cd799439011\"");
    }
}
