//! Editorial role vocabulary.
//!
//! Roles live on profile documents in the external directory; a freshly
//! created account has an empty role until an administrator assigns one.

/// The only role with user-management capability.
pub const ROLE_HEAD_DIRECTOR: &str = "Head Director";

pub const ROLE_SENIOR_EDITOR: &str = "Senior Editor";
pub const ROLE_EDITOR: &str = "Editor";
pub const ROLE_INTERN: &str = "Intern";

/// All assignable role values.
pub const VALID_ROLES: &[&str] = &[
    ROLE_HEAD_DIRECTOR,
    ROLE_SENIOR_EDITOR,
    ROLE_EDITOR,
    ROLE_INTERN,
];

/// Validate that a role string is one of the assignable values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether the given role may access user management.
pub fn can_manage_users(role: &str) -> bool {
    role == ROLE_HEAD_DIRECTOR
}
