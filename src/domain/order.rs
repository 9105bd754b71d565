use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Frozen line-item snapshot copied verbatim from a cart item at conversion.
/// Never updated or deleted individually after creation.
#[derive(Debug, Clone)]
pub struct OrderItemView {
    pub id: Uuid,
    pub menuitem_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub price: BigDecimal,
}

/// An order as read back from storage. Only `status` and `delivery_crew_id`
/// mutate after creation; `total` is fixed at conversion time.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub delivery_crew_id: Option<Uuid>,
    /// false = pending, true = delivered.
    pub status: bool,
    pub total: BigDecimal,
    pub created_date: DateTime<Utc>,
    pub items: Vec<OrderItemView>,
}

/// Which orders a principal may see when listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    /// Managers see every order.
    All,
    /// Delivery crew see orders assigned to them.
    AssignedTo(Uuid),
    /// Customers see their own orders.
    OwnedBy(Uuid),
}
