use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::GroupDirectory;
use crate::schema::{user_groups, users};

/// Group-membership lookups against the identity tables. Queries run fresh
/// per call; memberships are never cached here.
pub struct DieselGroupDirectory {
    pool: DbPool,
}

impl DieselGroupDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl GroupDirectory for DieselGroupDirectory {
    fn groups_of(&self, user_id: Uuid) -> Result<Option<Vec<String>>, DomainError> {
        let mut conn = self.pool.get()?;

        let known: Option<Uuid> = users::table
            .find(user_id)
            .select(users::id)
            .first(&mut conn)
            .optional()?;
        if known.is_none() {
            return Ok(None);
        }

        let groups = user_groups::table
            .filter(user_groups::user_id.eq(user_id))
            .select(user_groups::group_name)
            .load::<String>(&mut conn)?;
        Ok(Some(groups))
    }
}
