use crate::schema::UserRecord;
use std::collections::HashSet;

/// Role value that marks a user as eligible for the top-salesperson
/// ranking.
pub const SALESMAN_ROLE: &str = "salesman";

/// Allowlist of salesperson names built from the tenant's user roster.
///
/// Matching is case-insensitive on trimmed names. The allowlist is a
/// property of the roster, not of any transaction: a sale attributed to a
/// name with no matching salesman user is simply left out of the
/// salesperson ranking.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    salesmen: HashSet<String>,
}

impl Roster {
    pub fn from_users(users: &[UserRecord]) -> Self {
        let salesmen = users
            .iter()
            .filter(|user| user.role.trim().eq_ignore_ascii_case(SALESMAN_ROLE))
            .map(|user| canonical(&user.name))
            .filter(|name| !name.is_empty())
            .collect();

        Self { salesmen }
    }

    /// An empty roster: every salesperson row is filtered out.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_salesman(&self, name: &str) -> bool {
        self.salesmen.contains(&canonical(name))
    }

    pub fn len(&self) -> usize {
        self.salesmen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salesmen.is_empty()
    }
}

fn canonical(name: &str) -> String {
    name.trim().to_lowercase()
}
