use uuid::Uuid;

/// Group names as recorded in the external identity store.
pub const MANAGER_GROUP: &str = "Manager";
pub const DELIVERY_CREW_GROUP: &str = "Delivery crew";

/// The acting user as presented by the transport layer. `user_id` is `None`
/// for unauthenticated requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Option<Uuid>,
}

impl Principal {
    pub fn authenticated(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

/// The single exclusive authorization category of a principal.
///
/// Exactly one of Manager/DeliveryCrew/Customer applies to an authenticated
/// principal; unauthenticated principals are Anonymous and denied everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Anonymous,
    Customer,
    Manager,
    DeliveryCrew,
}

impl Role {
    /// Derive the role from current group memberships. Pure; evaluated fresh
    /// per request since memberships can change between requests.
    ///
    /// Precedence: Manager membership wins, then Delivery crew; a principal
    /// in neither group is a Customer.
    pub fn resolve(authenticated: bool, groups: &[String]) -> Role {
        if !authenticated {
            return Role::Anonymous;
        }
        if groups.iter().any(|g| g == MANAGER_GROUP) {
            Role::Manager
        } else if groups.iter().any(|g| g == DELIVERY_CREW_GROUP) {
            Role::DeliveryCrew
        } else {
            Role::Customer
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unauthenticated_is_anonymous() {
        assert_eq!(Role::resolve(false, &[]), Role::Anonymous);
        // Membership facts are irrelevant without an identity.
        assert_eq!(
            Role::resolve(false, &groups(&[MANAGER_GROUP])),
            Role::Anonymous
        );
    }

    #[test]
    fn no_groups_is_customer() {
        assert_eq!(Role::resolve(true, &[]), Role::Customer);
    }

    #[test]
    fn manager_group_wins() {
        assert_eq!(
            Role::resolve(true, &groups(&[MANAGER_GROUP])),
            Role::Manager
        );
    }

    #[test]
    fn delivery_crew_group_resolves() {
        assert_eq!(
            Role::resolve(true, &groups(&[DELIVERY_CREW_GROUP])),
            Role::DeliveryCrew
        );
    }

    #[test]
    fn manager_takes_precedence_over_delivery_crew() {
        assert_eq!(
            Role::resolve(true, &groups(&[DELIVERY_CREW_GROUP, MANAGER_GROUP])),
            Role::Manager
        );
    }

    #[test]
    fn unrelated_groups_are_ignored() {
        assert_eq!(
            Role::resolve(true, &groups(&["Kitchen", "Accounting"])),
            Role::Customer
        );
    }
}
