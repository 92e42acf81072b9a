use serde::{Deserialize, Serialize};

use crate::error::{IdeaflowError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Submitter,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Submitter => write!(f, "submitter"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = IdeaflowError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "submitter" => Ok(Role::Submitter),
            "admin" => Ok(Role::Admin),
            _ => Err(IdeaflowError::InvalidRole(s.to_string())),
        }
    }
}

/// The authenticated identity performing an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    pub fn submitter(id: impl Into<String>) -> Self {
        Self::new(id, Role::Submitter)
    }

    pub fn admin(id: impl Into<String>) -> Self {
        Self::new(id, Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Both roles may submit and browse their own ideas
    pub fn can_access_submitter_area(&self) -> bool {
        matches!(self.role, Role::Submitter | Role::Admin)
    }

    pub fn can_access_admin_area(&self) -> bool {
        self.is_admin()
    }

    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.can_access_admin_area() {
            Ok(())
        } else {
            Err(IdeaflowError::Forbidden(format!(
                "{} requires the admin role ({} is a {})",
                action, self.id, self.role
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guards() {
        let admin = Actor::admin("root");
        let submitter = Actor::submitter("alice");

        assert!(admin.can_access_admin_area());
        assert!(admin.can_access_submitter_area());
        assert!(!submitter.can_access_admin_area());
        assert!(submitter.can_access_submitter_area());
    }

    #[test]
    fn test_require_admin_rejects_submitter() {
        let err = Actor::submitter("alice").require_admin("Recording a decision").unwrap_err();
        assert!(matches!(err, IdeaflowError::Forbidden(_)));
        assert!(err.to_string().contains("admin role"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("submitter".parse::<Role>().unwrap(), Role::Submitter);
        assert!("guest".parse::<Role>().is_err());
    }
}
