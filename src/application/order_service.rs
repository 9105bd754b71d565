use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::access::{self, OrderMutation};
use crate::domain::errors::DomainError;
use crate::domain::order::OrderView;
use crate::domain::ports::{GroupDirectory, OrderRepository};
use crate::domain::role::{Principal, Role};

use super::roles;

/// Order operations behind the role-based access rules: conversion of the
/// caller's cart into an order, role-scoped listing, the customer-only
/// single-order read, and the field-restricted manager/crew mutations.
pub struct OrderService<R, G> {
    orders: R,
    directory: G,
}

impl<R: OrderRepository, G: GroupDirectory> OrderService<R, G> {
    pub fn new(orders: R, directory: G) -> Self {
        Self { orders, directory }
    }

    /// Convert the caller's cart into a new order (customers only).
    pub fn create_order(&self, principal: &Principal) -> Result<OrderView, DomainError> {
        let owner = roles::require_customer(&self.directory, principal)?;
        self.orders.convert_cart(owner)
    }

    pub fn list_orders(&self, principal: &Principal) -> Result<Vec<OrderView>, DomainError> {
        let (role, user_id) = roles::resolve(&self.directory, principal)?;
        let scope = access::list_scope(role, user_id)?;
        self.orders.list(scope)
    }

    /// Single-order read. Gated to the Customer role: manager and delivery
    /// crew reach individual orders only through the mutation path.
    pub fn get_order(&self, principal: &Principal, id: Uuid) -> Result<OrderView, DomainError> {
        roles::require_customer(&self.directory, principal)?;
        self.orders.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    /// Apply a mutation request body to an order under the per-role
    /// allowed-field rules (managers and delivery crew only).
    pub fn update_order(
        &self,
        principal: &Principal,
        id: Uuid,
        body: &Map<String, Value>,
    ) -> Result<OrderView, DomainError> {
        let (role, _) = roles::resolve(&self.directory, principal)?;
        if !matches!(role, Role::Manager | Role::DeliveryCrew) {
            return Err(DomainError::Authorization(
                "only managers and delivery crew may modify orders".to_string(),
            ));
        }
        match access::authorize_mutation(role, body)? {
            OrderMutation::MarkDelivered => self.orders.mark_delivered(id),
            OrderMutation::AssignCrew(crew) => {
                if let Some(crew_id) = crew {
                    if self.directory.groups_of(crew_id)?.is_none() {
                        return Err(DomainError::NotFound);
                    }
                }
                self.orders.assign_delivery_crew(id, crew)
            }
            OrderMutation::Noop => self.orders.find_by_id(id)?.ok_or(DomainError::NotFound),
        }
    }

    pub fn delete_order(&self, principal: &Principal, id: Uuid) -> Result<(), DomainError> {
        let (role, _) = roles::resolve(&self.directory, principal)?;
        if !matches!(role, Role::Manager | Role::DeliveryCrew) {
            return Err(DomainError::Authorization(
                "only managers and delivery crew may delete orders".to_string(),
            ));
        }
        self.orders.delete(id)
    }
}
