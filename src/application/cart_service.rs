use uuid::Uuid;

use crate::domain::cart::CartItemView;
use crate::domain::errors::DomainError;
use crate::domain::ports::{CartRepository, GroupDirectory};
use crate::domain::role::Principal;

use super::roles;

/// Customer-facing cart operations. Both operations are gated to the
/// Customer role; managers and delivery crew have no cart.
pub struct CartService<C, G> {
    carts: C,
    directory: G,
}

impl<C: CartRepository, G: GroupDirectory> CartService<C, G> {
    pub fn new(carts: C, directory: G) -> Self {
        Self { carts, directory }
    }

    pub fn list_items(&self, principal: &Principal) -> Result<Vec<CartItemView>, DomainError> {
        let owner = roles::require_customer(&self.directory, principal)?;
        self.carts.list_items(owner)
    }

    pub fn add_item(
        &self,
        principal: &Principal,
        menuitem_id: Uuid,
        quantity: i32,
    ) -> Result<CartItemView, DomainError> {
        let owner = roles::require_customer(&self.directory, principal)?;
        if quantity <= 0 {
            return Err(DomainError::Validation(
                "quantity must be a positive integer".to_string(),
            ));
        }
        self.carts.add_item(owner, menuitem_id, quantity)
    }
}
