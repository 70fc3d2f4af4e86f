//! Session user record and the role gate.
//!
//! The session holds two values, an opaque bearer token and a user record.
//! They are stored separately so that a token paired with a missing or
//! unreadable user record can be told apart from a missing token; both end
//! at the login page.
//!
//! The gate is a convenience for navigation, not a security boundary. The
//! backend checks the token on every call.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// User record stored in the session next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub role: Role,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SessionUser {
    /// Name shown in the navigation bar.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Guest")
    }
}

/// Outcome of checking a session against a section's required role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The session may see the section.
    Granted,
    /// No usable session: go to the login view.
    Login,
    /// Signed in with another role: go to that role's section.
    WrongSection(Role),
}

impl Access {
    /// Where to send the visitor, if anywhere.
    #[must_use]
    pub const fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::Granted => None,
            Self::Login => Some("/auth"),
            Self::WrongSection(role) => Some(role.home_path()),
        }
    }
}

/// Decide whether a session may enter a section requiring `required`.
///
/// A blank token counts as absent. A missing user record (including one that
/// could not be deserialized, which callers pass as `None`) counts as signed
/// out.
#[must_use]
pub fn check_access(token: Option<&str>, user: Option<&SessionUser>, required: Role) -> Access {
    let has_token = token.is_some_and(|t| !t.trim().is_empty());
    match (has_token, user) {
        (false, _) | (true, None) => Access::Login,
        (true, Some(user)) if user.role == required => Access::Granted,
        (true, Some(user)) => Access::WrongSection(user.role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> SessionUser {
        SessionUser {
            id: UserId::new(1),
            role,
            name: Some("Rahim".to_string()),
            email: None,
        }
    }

    #[test]
    fn test_no_token_goes_to_login() {
        let admin = user(Role::Admin);
        assert_eq!(check_access(None, Some(&admin), Role::Admin), Access::Login);
        assert_eq!(check_access(Some("  "), Some(&admin), Role::Admin), Access::Login);
    }

    #[test]
    fn test_token_without_user_goes_to_login() {
        assert_eq!(check_access(Some("tok"), None, Role::User), Access::Login);
    }

    #[test]
    fn test_matching_role_is_granted() {
        let customer = user(Role::User);
        assert_eq!(
            check_access(Some("tok"), Some(&customer), Role::User),
            Access::Granted
        );
    }

    #[test]
    fn test_admin_on_customer_section_goes_to_admin() {
        let admin = user(Role::Admin);
        let access = check_access(Some("tok"), Some(&admin), Role::User);
        assert_eq!(access, Access::WrongSection(Role::Admin));
        assert_eq!(access.redirect_path(), Some("/admin/menu"));
    }

    #[test]
    fn test_customer_on_admin_section_goes_to_customer() {
        let customer = user(Role::User);
        let access = check_access(Some("tok"), Some(&customer), Role::Admin);
        assert_eq!(access.redirect_path(), Some("/customer/menu"));
    }

    #[test]
    fn test_malformed_user_record_does_not_deserialize() {
        assert!(serde_json::from_str::<SessionUser>(r#"{"id":"x","role":"admin"}"#).is_err());
        assert!(serde_json::from_str::<SessionUser>(r#"{"id":1,"role":"chef"}"#).is_err());
    }

    #[test]
    fn test_display_name_falls_back() {
        let mut record = user(Role::User);
        assert_eq!(record.display_name(), "Rahim");
        record.name = None;
        record.email = Some("r@foodio.test".to_string());
        assert_eq!(record.display_name(), "r@foodio.test");
    }
}
