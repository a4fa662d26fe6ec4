//! Account role discriminators and the role → landing-route table.
//!
//! The integer values must match the `role` column seed values in the
//! accounts migration. Role 4 is admin everywhere; no other value grants
//! admin access.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The four account roles, tagged with their database discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student = 1,
    Supervisor = 2,
    Lecturer = 3,
    Admin = 4,
}

impl Role {
    /// All roles, in discriminator order.
    pub const ALL: [Role; 4] = [Role::Student, Role::Supervisor, Role::Lecturer, Role::Admin];

    /// The database discriminator value for this role.
    pub fn discriminator(self) -> i16 {
        self as i16
    }

    /// Human-readable role name, as shown in role-mismatch messages.
    pub fn name(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Supervisor => "supervisor",
            Role::Lecturer => "lecturer",
            Role::Admin => "admin",
        }
    }

    /// The single authoritative role → landing-route mapping.
    ///
    /// Every login/redirect path consumes this table; it is never inlined
    /// at a call site.
    pub fn landing_route(self) -> &'static str {
        match self {
            Role::Student => "/student/dashboard",
            Role::Supervisor => "/supervisor/dashboard",
            Role::Lecturer => "/lecturer/dashboard",
            Role::Admin => "/admin/dashboard",
        }
    }

    /// Whether this role may self-register. Lecturer and admin accounts are
    /// created through the admin console only.
    pub fn is_public(self) -> bool {
        matches!(self, Role::Student | Role::Supervisor)
    }

    /// Parse a role name as sent by the login form's role selector.
    pub fn from_name(name: &str) -> Option<Role> {
        match name {
            "student" => Some(Role::Student),
            "supervisor" => Some(Role::Supervisor),
            "lecturer" => Some(Role::Lecturer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = CoreError;

    /// An unmapped discriminator is a fatal authorization failure, never a
    /// default role.
    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::Student),
            2 => Ok(Role::Supervisor),
            3 => Ok(Role::Lecturer),
            4 => Ok(Role::Admin),
            other => Err(CoreError::Forbidden(format!(
                "Unknown role discriminator: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::try_from(role.discriminator()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_discriminator_is_forbidden() {
        for bad in [0i16, 5, -1, 99] {
            let err = Role::try_from(bad).unwrap_err();
            assert!(matches!(err, CoreError::Forbidden(_)));
        }
    }

    #[test]
    fn admin_is_role_four() {
        assert_eq!(Role::Admin.discriminator(), 4);
        assert_eq!(Role::try_from(4).unwrap(), Role::Admin);
        // Role 1 is a student, never an admin.
        assert_eq!(Role::try_from(1).unwrap(), Role::Student);
    }

    #[test]
    fn landing_routes_are_distinct() {
        let mut routes: Vec<_> = Role::ALL.iter().map(|r| r.landing_route()).collect();
        routes.sort();
        routes.dedup();
        assert_eq!(routes.len(), 4);
    }

    #[test]
    fn only_student_and_supervisor_self_register() {
        assert!(Role::Student.is_public());
        assert!(Role::Supervisor.is_public());
        assert!(!Role::Lecturer.is_public());
        assert!(!Role::Admin.is_public());
    }
}
