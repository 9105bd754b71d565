use uuid::Uuid;

use super::cart::CartItemView;
use super::errors::DomainError;
use super::order::{OrderScope, OrderView};

/// Read access to the external identity store's group-membership facts.
///
/// Looked up fresh on every request; memberships may change between requests
/// so implementations must not cache across calls.
pub trait GroupDirectory: Send + Sync + 'static {
    /// Group names of an existing user, or `None` when the user id is
    /// unknown to the identity store.
    fn groups_of(&self, user_id: Uuid) -> Result<Option<Vec<String>>, DomainError>;
}

/// Per-user mutable cart line items with snapshot pricing.
pub trait CartRepository: Send + Sync + 'static {
    fn list_items(&self, owner: Uuid) -> Result<Vec<CartItemView>, DomainError>;

    /// Insert one cart item, snapshotting the menu item's current price.
    /// Fails with a validation error when the menu item is unknown.
    fn add_item(
        &self,
        owner: Uuid,
        menuitem_id: Uuid,
        quantity: i32,
    ) -> Result<CartItemView, DomainError>;
}

/// Persisted orders and their immutable item snapshots.
pub trait OrderRepository: Send + Sync + 'static {
    /// Atomically convert the owner's cart into a new order: create the
    /// order, snapshot every cart item into an order item, fix the total,
    /// and clear the cart, all inside one transaction. Conversions for the
    /// same owner are serialized; concurrent duplicates are rejected.
    fn convert_cart(&self, owner: Uuid) -> Result<OrderView, DomainError>;

    fn list(&self, scope: OrderScope) -> Result<Vec<OrderView>, DomainError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;

    /// Transition the order's status to delivered.
    fn mark_delivered(&self, id: Uuid) -> Result<OrderView, DomainError>;

    /// Assign or (with `None`) unassign the order's delivery crew.
    fn assign_delivery_crew(
        &self,
        id: Uuid,
        crew: Option<Uuid>,
    ) -> Result<OrderView, DomainError>;

    fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
