//! Shared in-memory fakes for service unit tests.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::GroupDirectory;

/// In-memory identity store: user id → group names.
pub(crate) struct FakeDirectory {
    users: HashMap<Uuid, Vec<String>>,
}

impl FakeDirectory {
    pub(crate) fn with_users(users: &[(Uuid, &[&str])]) -> Self {
        Self {
            users: users
                .iter()
                .map(|(id, groups)| (*id, groups.iter().map(|g| g.to_string()).collect()))
                .collect(),
        }
    }
}

impl GroupDirectory for FakeDirectory {
    fn groups_of(&self, user_id: Uuid) -> Result<Option<Vec<String>>, DomainError> {
        Ok(self.users.get(&user_id).cloned())
    }
}
