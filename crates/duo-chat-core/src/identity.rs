//! The two fixed chat identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of exactly two fixed roles, selected by the password presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Identity {
    User1,
    User2,
}

impl Identity {
    /// Both identities, in the order passwords are checked.
    pub const ALL: [Self; 2] = [Self::User1, Self::User2];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User1 => "User1",
            Self::User2 => "User2",
        }
    }

    /// Human-readable label, e.g. "User 1".
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::User1 => "User 1",
            Self::User2 => "User 2",
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_name() {
        assert_eq!(serde_json::to_string(&Identity::User1).unwrap(), "\"User1\"");
        let parsed: Identity = serde_json::from_str("\"User2\"").unwrap();
        assert_eq!(parsed, Identity::User2);
    }

    #[test]
    fn test_unknown_identity_rejected() {
        assert!(serde_json::from_str::<Identity>("\"User3\"").is_err());
    }
}
