//! Collection names.
//!
//! A collection maps onto a table, and its name is spliced into SQL text, so
//! it is restricted to a plain lowercase identifier.

use core::str::FromStr;

use thiserror::Error;

const MAX_LEN: usize = 63;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid collection name '{0}': expected [a-z_][a-z0-9_]* up to 63 chars")]
pub struct InvalidCollectionName(pub String);

/// Validated name of a document collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidCollectionName> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_head = chars
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
        let valid_tail = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

        if valid_head && valid_tail && name.len() <= MAX_LEN {
            Ok(Self(name))
        } else {
            Err(InvalidCollectionName(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CollectionName {
    fn default() -> Self {
        Self("products".to_string())
    }
}

impl FromStr for CollectionName {
    type Err = InvalidCollectionName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl core::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(CollectionName::new("products").is_ok());
        assert!(CollectionName::new("_inventory_2").is_ok());
        assert_eq!(CollectionName::default().as_str(), "products");
    }

    #[test]
    fn rejects_anything_that_needs_quoting() {
        for bad in ["", "Products", "2products", "products; drop table x", "pro-ducts"] {
            assert!(CollectionName::new(bad).is_err(), "{bad} should be rejected");
        }
        assert!(CollectionName::new("a".repeat(64)).is_err());
    }
}
