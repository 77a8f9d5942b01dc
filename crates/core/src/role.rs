use serde::{Deserialize, Serialize};

/// Role granted to a user account.
///
/// Roles form a total order (`Guest < User < Admin`): a route that requires
/// `User` is satisfied by `User` or `Admin`. The serialized form matches the
/// API's PascalCase role strings (`"Admin"`, `"User"`).
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    Guest,
    User,
    Admin,
}

impl Role {
    /// Whether a holder of this role may access something that requires
    /// `required`.
    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "Guest",
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
