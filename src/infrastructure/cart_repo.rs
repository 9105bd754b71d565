use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::CartItemView;
use crate::domain::errors::DomainError;
use crate::domain::ports::CartRepository;
use crate::schema::{cart_items, menu_items};

use super::models::{CartItemRow, NewCartItemRow};

pub struct DieselCartRepository {
    pool: DbPool,
}

impl DieselCartRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(row: CartItemRow) -> CartItemView {
    CartItemView {
        id: row.id,
        menuitem_id: row.menuitem_id,
        quantity: row.quantity,
        unit_price: row.unit_price,
        price: row.price,
        created_at: row.created_at,
    }
}

impl CartRepository for DieselCartRepository {
    fn list_items(&self, owner: Uuid) -> Result<Vec<CartItemView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows = cart_items::table
            .filter(cart_items::user_id.eq(owner))
            .order(cart_items::created_at.asc())
            .select(CartItemRow::as_select())
            .load(&mut conn)?;

        Ok(rows.into_iter().map(to_view).collect())
    }

    fn add_item(
        &self,
        owner: Uuid,
        menuitem_id: Uuid,
        quantity: i32,
    ) -> Result<CartItemView, DomainError> {
        let mut conn = self.pool.get()?;

        // Snapshot the menu item's current price; later catalog price
        // changes must not affect this row.
        let unit_price: Option<BigDecimal> = menu_items::table
            .find(menuitem_id)
            .select(menu_items::price)
            .first(&mut conn)
            .optional()?;
        let Some(unit_price) = unit_price else {
            return Err(DomainError::Validation("unknown menu item".to_string()));
        };

        let price = unit_price.clone() * BigDecimal::from(quantity);
        let row: CartItemRow = diesel::insert_into(cart_items::table)
            .values(&NewCartItemRow {
                id: Uuid::new_v4(),
                user_id: owner,
                menuitem_id,
                quantity,
                unit_price,
                price,
            })
            .returning(CartItemRow::as_returning())
            .get_result(&mut conn)?;

        Ok(to_view(row))
    }
}
