//! Order status and account role enums.

use serde::{Deserialize, Serialize};

/// Kitchen status of an order.
///
/// Serialized in upper case, the form the backend stores and expects in
/// status updates. Any status may be set to any other; the back office does
/// not enforce a transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Completed,
}

impl OrderStatus {
    /// Every status, in kitchen order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Preparing, Self::Ready, Self::Completed];

    /// Wire value, e.g. `PREPARING`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Completed => "COMPLETED",
        }
    }

    /// Human label, e.g. `Preparing`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    /// Case-insensitive: `"ready"`, `"Ready"` and `"READY"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Account role carried in the session's user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office staff.
    Admin,
    /// Ordering customer.
    User,
}

impl Role {
    /// Landing page of the role's section.
    #[must_use]
    pub const fn home_path(&self) -> &'static str {
        match self {
            Self::Admin => "/admin/menu",
            Self::User => "/customer/menu",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

// The backend is inconsistent about casing ("ADMIN", "admin"), so roles are
// parsed leniently rather than with `rename_all`.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
