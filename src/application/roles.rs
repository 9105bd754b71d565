use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::GroupDirectory;
use crate::domain::role::{Principal, Role};

/// Resolve the acting principal to its exclusive role and user id.
///
/// Unauthenticated principals are denied outright; every operation in this
/// service requires an identity. An authenticated id the identity store does
/// not know is a not-found error.
pub fn resolve<G: GroupDirectory>(
    directory: &G,
    principal: &Principal,
) -> Result<(Role, Uuid), DomainError> {
    let Some(user_id) = principal.user_id else {
        return Err(DomainError::Authorization(
            "authentication required".to_string(),
        ));
    };
    let Some(groups) = directory.groups_of(user_id)? else {
        return Err(DomainError::NotFound);
    };
    Ok((Role::resolve(true, &groups), user_id))
}

/// Resolve and require the Customer role, returning the owner id.
pub fn require_customer<G: GroupDirectory>(
    directory: &G,
    principal: &Principal,
) -> Result<Uuid, DomainError> {
    let (role, user_id) = resolve(directory, principal)?;
    if role != Role::Customer {
        return Err(DomainError::Authorization(
            "only customers may perform this operation".to_string(),
        ));
    }
    Ok(user_id)
}
