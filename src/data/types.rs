use std::fmt;

use chrono::{DateTime, Utc};

/// Lifecycle of a change as stored by the Choreography contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeState {
    Ready,
    Approved,
    Rejected,
    /// A value this client does not know about; kept verbatim.
    Unknown(u8),
}

impl ChangeState {
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => ChangeState::Ready,
            1 => ChangeState::Approved,
            2 => ChangeState::Rejected,
            other => ChangeState::Unknown(other),
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            ChangeState::Ready => 0,
            ChangeState::Approved => 1,
            ChangeState::Rejected => 2,
            ChangeState::Unknown(v) => v,
        }
    }

    pub fn label(self) -> String {
        match self {
            ChangeState::Ready => "READY".to_string(),
            ChangeState::Approved => "APPROVED".to_string(),
            ChangeState::Rejected => "REJECTED".to_string(),
            ChangeState::Unknown(v) => format!("UNKNOWN({v})"),
        }
    }
}

/// A person taking part in the review, resolved from a public key and a name hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

impl User {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    /// Placeholder shown until identity resolution completes.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.display_name.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageHistoryEntry {
    pub user: User,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Write operations the interaction widget can submit to the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractAction {
    Approve,
    Reject,
}

impl fmt::Display for ContractAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractAction::Approve => write!(f, "approve"),
            ContractAction::Reject => write!(f, "reject"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_state_known_values() {
        assert_eq!(ChangeState::from_u8(0), ChangeState::Ready);
        assert_eq!(ChangeState::from_u8(1), ChangeState::Approved);
        assert_eq!(ChangeState::from_u8(2), ChangeState::Rejected);
    }

    #[test]
    fn test_change_state_unknown_is_preserved() {
        let state = ChangeState::from_u8(7);
        assert_eq!(state, ChangeState::Unknown(7));
        assert_eq!(state.as_u8(), 7);
        assert_eq!(state.label(), "UNKNOWN(7)");
    }

    #[test]
    fn test_change_state_numeric_value() {
        for v in 0..=3u8 {
            assert_eq!(ChangeState::from_u8(v).as_u8(), v);
        }
    }

    #[test]
    fn test_empty_user() {
        let user = User::empty();
        assert!(user.is_empty());
        assert!(!User::new("0xabc", "friedow").is_empty());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(ContractAction::Approve.to_string(), "approve");
        assert_eq!(ContractAction::Reject.to_string(), "reject");
    }
}
