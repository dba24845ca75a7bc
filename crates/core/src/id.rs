//! Document identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Opaque identifier of a stored document.
///
/// The store assigns it on insert and owns its native representation; the
/// domain and HTTP layers only carry it around as text. Conversion to the
/// native key type happens inside the store, so a syntactically odd value is
/// still a valid `DocumentId` here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(DomainError::MissingField("id"));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<DocumentId> for String {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(DomainError::MissingField("id"));
        }
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_id_is_rejected() {
        assert_eq!("".parse::<DocumentId>(), Err(DomainError::MissingField("id")));
        assert!(DocumentId::try_from(String::new()).is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id: DocumentId = "0190a1b2-0000-7000-8000-000000000001".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0190a1b2-0000-7000-8000-000000000001\"");
    }

    proptest! {
        /// Any non-empty text is carried through unchanged.
        #[test]
        fn non_empty_text_round_trips_through_display(s in ".{1,64}") {
            let id: DocumentId = s.parse().unwrap();
            prop_assert_eq!(id.to_string(), s);
        }
    }
}
