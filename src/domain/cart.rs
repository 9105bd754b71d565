use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One mutable cart line item. `unit_price` snapshots the menu price at
/// insertion time and is never recomputed; `price = unit_price × quantity`.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: Uuid,
    pub menuitem_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
}
