//! User record entity and related types

use serde::{Deserialize, Serialize};

/// A registered username/ID pair bound to the IP that created it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Lowercased username
    username: String,
    /// Numeric ID, unique across all records
    id: String,
    /// Requester IP at creation time
    ip: String,
}

impl UserRecord {
    /// Create a record, folding the username to lowercase
    pub fn new(
        username: impl AsRef<str>,
        id: impl Into<String>,
        ip: impl Into<String>,
    ) -> Self {
        Self {
            username: canonical_username(username.as_ref()),
            id: id.into(),
            ip: ip.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }

    /// The `(id, ip)` projection returned by username lookups
    pub fn binding(&self) -> IdBinding {
        IdBinding {
            id: self.id.clone(),
            ip: self.ip.clone(),
        }
    }
}

/// An ID together with the IP that registered it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdBinding {
    pub id: String,
    pub ip: String,
}

/// Result of an insert attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The store's unique constraint on `id` rejected the row
    DuplicateId,
}

/// Case-folding applied to usernames on both write and read
pub fn canonical_username(username: &str) -> String {
    username.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lowercases_username() {
        let record = UserRecord::new("Alice-Smith", "123", "1.2.3.4");

        assert_eq!(record.username(), "alice-smith");
        assert_eq!(record.id(), "123");
        assert_eq!(record.ip(), "1.2.3.4");
    }

    #[test]
    fn test_binding_projection() {
        let record = UserRecord::new("bob", "42", "::1");

        assert_eq!(
            record.binding(),
            IdBinding {
                id: "42".to_string(),
                ip: "::1".to_string()
            }
        );
    }
}
