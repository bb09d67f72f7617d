//! Status enums for extended products.

use serde::{Deserialize, Serialize};

/// Whether a product can currently be bought.
///
/// A product is `Unavailable` when every variant is out of stock (including
/// the degenerate case of a product without variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    #[default]
    Unavailable,
}

impl Availability {
    /// Derive availability from per-variant stock levels.
    #[must_use]
    pub fn from_stock<I>(quantities: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        if quantities.into_iter().any(|q| q > 0) {
            Self::Available
        } else {
            Self::Unavailable
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Where a generic metadata entry came from in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Loaded from the stored metadata.
    #[default]
    Existing,
    /// Added by the user during this edit session.
    Added,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_availability_from_stock() {
        assert_eq!(Availability::from_stock([0, 0, 3]), Availability::Available);
        assert_eq!(Availability::from_stock([0, -1]), Availability::Unavailable);
        assert_eq!(Availability::from_stock([]), Availability::Unavailable);
    }

    #[test]
    fn test_availability_display() {
        assert_eq!(Availability::Available.to_string(), "available");
        assert_eq!(Availability::Unavailable.to_string(), "unavailable");
    }
}
