//! Authenticated user identity.

use serde::{Deserialize, Serialize};

/// The signed-in user, as returned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl Identity {
    /// First letter of the display name, upper-cased, for avatar badges.
    ///
    /// Falls back to `U` when the name is blank.
    #[must_use]
    pub fn initial(&self) -> char {
        self.display_name
            .trim()
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_falls_back_for_blank_names() {
        let mut who = Identity {
            user_id: "u1".into(),
            email: "ana@example.com".into(),
            display_name: "ana".into(),
            phone: None,
        };
        assert_eq!(who.initial(), 'A');
        who.display_name = "  ".into();
        assert_eq!(who.initial(), 'U');
    }
}
