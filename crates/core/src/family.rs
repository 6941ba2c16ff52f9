//! Family groups and their membership.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

/// A registered user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
}

/// A family group: one owner, a member set, and the tree that hangs off it.
///
/// Deleting a family cascades server-side to its nodes, edges, and
/// memories; the client only has to drop its local copies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Family {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub owner: User,
    #[serde(default)]
    pub members: Vec<User>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

impl Family {
    /// Whether the given user owns this family.
    pub fn is_owner(&self, user_id: &str) -> bool {
        self.owner.id == user_id
    }

    /// Whether the given user belongs to this family (the owner counts
    /// as a member even if the backend omits them from `members`).
    pub fn is_member(&self, user_id: &str) -> bool {
        self.is_owner(user_id) || self.members.iter().any(|m| m.id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family() -> Family {
        let owner = User {
            id: "u1".to_string(),
            username: "owner".to_string(),
            email: "owner@example.com".to_string(),
            first_name: "Olga".to_string(),
        };
        let member = User {
            id: "u2".to_string(),
            username: "member".to_string(),
            email: "member@example.com".to_string(),
            first_name: "Max".to_string(),
        };
        Family {
            id: "f1".to_string(),
            name: "Ivanov".to_string(),
            description: None,
            photo_url: None,
            owner,
            members: vec![member],
            created_at: None,
        }
    }

    #[test]
    fn owner_is_always_a_member() {
        let f = family();
        assert!(f.is_owner("u1"));
        assert!(f.is_member("u1"));
    }

    #[test]
    fn listed_member_is_a_member_but_not_owner() {
        let f = family();
        assert!(!f.is_owner("u2"));
        assert!(f.is_member("u2"));
    }

    #[test]
    fn stranger_is_neither() {
        let f = family();
        assert!(!f.is_member("u3"));
    }
}
