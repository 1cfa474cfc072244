//! Object-level permission actions
//!
//! Forums and topics are gated per object: a viewer needs an explicit grant
//! (directly or through a group) to see, edit, or destroy one.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Action a permission grant allows on a forum or topic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermAction {
    View,
    Edit,
    Destroy,
}

impl PermAction {
    /// All known actions
    pub const ALL: [PermAction; 3] = [Self::View, Self::Edit, Self::Destroy];

    /// Database representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Destroy => "destroy",
        }
    }

    /// Parse the database representation
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "destroy" => Some(Self::Destroy),
            _ => None,
        }
    }
}

impl fmt::Display for PermAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_roundtrip() {
        for action in PermAction::ALL {
            assert_eq!(PermAction::from_str_opt(action.as_str()), Some(action));
        }
        assert_eq!(PermAction::from_str_opt("moderate"), None);
    }
}
