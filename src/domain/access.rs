//! Order access rules: list-visibility scoping, the per-role allowed-field
//! sets for order mutation, and the status transition rule.
//!
//! Everything here is pure; the services feed in a resolved [`Role`] and the
//! raw request body and act on the returned decision.

use serde_json::{Map, Value};
use uuid::Uuid;

use super::errors::DomainError;
use super::order::OrderScope;
use super::role::Role;

/// A mutation a role is allowed to perform on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderMutation {
    /// Delivery crew marking the order as delivered (the only legal status
    /// transition: pending → delivered).
    MarkDelivered,
    /// Manager assigning (or, with `None`, unassigning) the delivery crew.
    AssignCrew(Option<Uuid>),
    /// A manager request naming no fields; nothing to change.
    Noop,
}

/// Which orders the given role may list.
pub fn list_scope(role: Role, user_id: Uuid) -> Result<OrderScope, DomainError> {
    match role {
        Role::Manager => Ok(OrderScope::All),
        Role::DeliveryCrew => Ok(OrderScope::AssignedTo(user_id)),
        Role::Customer => Ok(OrderScope::OwnedBy(user_id)),
        Role::Anonymous => Err(DomainError::Authorization(
            "authentication required".to_string(),
        )),
    }
}

/// Validate a mutation request body against the acting role's allowed field
/// set and value rules.
///
/// The field-set check is exact: if the submitted keys are not a subset of
/// the role's allowed set, the whole request is rejected. Allowed fields are
/// never silently applied while disallowed ones are dropped.
pub fn authorize_mutation(
    role: Role,
    body: &Map<String, Value>,
) -> Result<OrderMutation, DomainError> {
    match role {
        Role::DeliveryCrew => {
            if body.keys().any(|k| k != "status") {
                return Err(DomainError::Validation(
                    "delivery crew may only modify the order status".to_string(),
                ));
            }
            match body.get("status") {
                Some(Value::Bool(true)) => Ok(OrderMutation::MarkDelivered),
                Some(_) => Err(DomainError::Validation(
                    "delivery crew may only mark the order as delivered (status=true)"
                        .to_string(),
                )),
                None => Err(DomainError::Validation(
                    "the 'status' field is required".to_string(),
                )),
            }
        }
        Role::Manager => {
            if body.keys().any(|k| k != "delivery_crew") {
                return Err(DomainError::Validation(
                    "manager may only modify the delivery crew assignment".to_string(),
                ));
            }
            match body.get("delivery_crew") {
                Some(Value::Null) => Ok(OrderMutation::AssignCrew(None)),
                Some(Value::String(s)) => {
                    let crew_id = Uuid::parse_str(s).map_err(|_| {
                        DomainError::Validation(
                            "'delivery_crew' must be a user id".to_string(),
                        )
                    })?;
                    Ok(OrderMutation::AssignCrew(Some(crew_id)))
                }
                Some(_) => Err(DomainError::Validation(
                    "'delivery_crew' must be a user id".to_string(),
                )),
                None => Ok(OrderMutation::Noop),
            }
        }
        Role::Customer | Role::Anonymous => Err(DomainError::Validation(
            "not authorized to modify this order".to_string(),
        )),
    }
}
