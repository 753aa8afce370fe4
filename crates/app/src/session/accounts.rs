//! Demo accounts.

use camp_registry::users::Role;

use crate::auth::Credentials;

/// Default password of the seeded accounts.
pub const DEMO_PASSWORD: &str = "12345678";

/// Default ministry account.
pub const MINISTRY_EMAIL: &str = "admin@edu.lipetsk.ru";

/// Default camp representative account.
pub const CAMP_EMAIL: &str = "camp@lipetsk.ru";

/// Fixed credential pair per role, chosen at login by the requested role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccounts {
    /// Ministry reviewer
    pub ministry: Credentials,

    /// Camp representative
    pub camp: Credentials,
}

impl DemoAccounts {
    /// Credentials for `role`.
    #[must_use]
    pub fn for_role(&self, role: Role) -> &Credentials {
        match role {
            Role::Ministry => &self.ministry,
            Role::Camp => &self.camp,
        }
    }
}

impl Default for DemoAccounts {
    fn default() -> Self {
        Self {
            ministry: Credentials::new(MINISTRY_EMAIL, DEMO_PASSWORD),
            camp: Credentials::new(CAMP_EMAIL, DEMO_PASSWORD),
        }
    }
}
