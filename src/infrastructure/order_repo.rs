use std::collections::HashMap;

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderItemView, OrderScope, OrderView};
use crate::domain::ports::OrderRepository;
use crate::schema::{cart_items, order_items, orders};

use super::models::{CartItemRow, NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_view(order: OrderRow, items: Vec<OrderItemRow>) -> OrderView {
    OrderView {
        id: order.id,
        user_id: order.user_id,
        delivery_crew_id: order.delivery_crew_id,
        status: order.status,
        total: order.total,
        created_date: order.created_date,
        items: items
            .into_iter()
            .map(|i| OrderItemView {
                id: i.id,
                menuitem_id: i.menuitem_id,
                quantity: i.quantity,
                unit_price: i.unit_price,
                price: i.price,
            })
            .collect(),
    }
}

fn load_order(conn: &mut PgConnection, id: Uuid) -> Result<Option<OrderView>, DomainError> {
    let order = orders::table
        .find(id)
        .select(OrderRow::as_select())
        .first(conn)
        .optional()?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = order_items::table
        .filter(order_items::order_id.eq(order.id))
        .order(order_items::id.asc())
        .select(OrderItemRow::as_select())
        .load(conn)?;

    Ok(Some(to_view(order, items)))
}

impl OrderRepository for DieselOrderRepository {
    fn convert_cart(&self, owner: Uuid) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        // Cheap pre-check: an empty cart fails before any transaction is
        // opened, so a doomed request consumes no transactional resources.
        let cart_size: i64 = cart_items::table
            .filter(cart_items::user_id.eq(owner))
            .count()
            .get_result(&mut conn)?;
        if cart_size == 0 {
            return Err(DomainError::Validation("cart is empty".to_string()));
        }

        conn.transaction::<_, DomainError, _>(|conn| {
            // Lock this owner's cart rows for the whole conversion. Two
            // concurrent conversions for the same owner serialize here;
            // conversions for different owners touch disjoint rows and do
            // not contend.
            let cart: Vec<CartItemRow> = cart_items::table
                .filter(cart_items::user_id.eq(owner))
                .select(CartItemRow::as_select())
                .for_update()
                .load(conn)?;

            // The pre-check saw items, so an empty locked read means a
            // concurrent conversion already consumed this cart.
            if cart.is_empty() {
                return Err(DomainError::Conflict(
                    "cart was already converted by a concurrent request".to_string(),
                ));
            }

            let order_id = Uuid::new_v4();
            diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    id: order_id,
                    user_id: owner,
                    status: false,
                    total: BigDecimal::from(0),
                })
                .execute(conn)?;

            // Snapshot every cart row verbatim into an order item.
            let new_items: Vec<NewOrderItemRow> = cart
                .iter()
                .map(|c| NewOrderItemRow {
                    id: Uuid::new_v4(),
                    order_id,
                    menuitem_id: c.menuitem_id,
                    quantity: c.quantity,
                    unit_price: c.unit_price.clone(),
                    price: c.price.clone(),
                })
                .collect();
            diesel::insert_into(order_items::table)
                .values(&new_items)
                .execute(conn)?;

            let total = cart
                .iter()
                .fold(BigDecimal::from(0), |acc, c| acc + &c.price);
            diesel::update(orders::table.find(order_id))
                .set(orders::total.eq(&total))
                .execute(conn)?;

            diesel::delete(cart_items::table.filter(cart_items::user_id.eq(owner)))
                .execute(conn)?;

            load_order(conn, order_id)?.ok_or(DomainError::NotFound)
        })
    }

    fn list(&self, scope: OrderScope) -> Result<Vec<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;

        let mut query = orders::table.select(OrderRow::as_select()).into_boxed();
        match scope {
            OrderScope::All => {}
            OrderScope::AssignedTo(crew) => {
                query = query.filter(orders::delivery_crew_id.eq(crew));
            }
            OrderScope::OwnedBy(owner) => {
                query = query.filter(orders::user_id.eq(owner));
            }
        }
        let rows: Vec<OrderRow> = query.order(orders::created_date.desc()).load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|o| o.id).collect();
        let item_rows: Vec<OrderItemRow> = order_items::table
            .filter(order_items::order_id.eq_any(&ids))
            .order(order_items::id.asc())
            .select(OrderItemRow::as_select())
            .load(&mut conn)?;

        let mut by_order: HashMap<Uuid, Vec<OrderItemRow>> = HashMap::new();
        for item in item_rows {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|o| {
                let items = by_order.remove(&o.id).unwrap_or_default();
                to_view(o, items)
            })
            .collect())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let mut conn = self.pool.get()?;
        load_order(&mut conn, id)
    }

    fn mark_delivered(&self, id: Uuid) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        // Guarded update: zero affected rows means the order vanished under
        // a concurrent delete.
        let updated = diesel::update(orders::table.find(id))
            .set(orders::status.eq(true))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound);
        }

        load_order(&mut conn, id)?.ok_or(DomainError::NotFound)
    }

    fn assign_delivery_crew(
        &self,
        id: Uuid,
        crew: Option<Uuid>,
    ) -> Result<OrderView, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.find(id))
            .set(orders::delivery_crew_id.eq(crew))
            .execute(&mut conn)?;
        if updated == 0 {
            return Err(DomainError::NotFound);
        }

        load_order(&mut conn, id)?.ok_or(DomainError::NotFound)
    }

    fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        if deleted == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use diesel::prelude::*;
    use uuid::Uuid;

    use super::DieselOrderRepository;
    use crate::domain::errors::DomainError;
    use crate::domain::order::OrderScope;
    use crate::domain::ports::{CartRepository, OrderRepository};
    use crate::infrastructure::cart_repo::DieselCartRepository;
    use crate::infrastructure::test_db::{insert_menu_item, insert_user, setup_db};

    #[tokio::test]
    async fn convert_snapshots_items_and_fixes_the_total() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let salad = insert_menu_item(&pool, "Greek salad", "7.00");
        let pasta = insert_menu_item(&pool, "Pasta", "11.25");

        carts.add_item(owner, salad, 2).expect("add failed");
        carts.add_item(owner, pasta, 1).expect("add failed");

        let order = repo.convert_cart(owner).expect("convert failed");

        assert_eq!(order.user_id, owner);
        assert!(!order.status);
        assert_eq!(order.delivery_crew_id, None);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.total, BigDecimal::from_str("25.25").unwrap());
        for item in &order.items {
            assert_eq!(
                item.price,
                item.unit_price.clone() * BigDecimal::from(item.quantity)
            );
        }
    }

    #[tokio::test]
    async fn convert_clears_the_cart() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let menuitem = insert_menu_item(&pool, "Bruschetta", "4.50");

        carts.add_item(owner, menuitem, 1).expect("add failed");
        repo.convert_cart(owner).expect("convert failed");

        assert!(carts.list_items(owner).unwrap().is_empty());
    }

    #[tokio::test]
    async fn convert_rejects_an_empty_cart() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);

        let err = repo.convert_cart(owner).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(repo.list(OrderScope::OwnedBy(owner)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn convert_does_not_touch_other_owners_carts() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let alice = insert_user(&pool, "alice", &[]);
        let bob = insert_user(&pool, "bob", &[]);
        let menuitem = insert_menu_item(&pool, "Greek salad", "7.00");

        carts.add_item(alice, menuitem, 1).expect("add failed");
        carts.add_item(bob, menuitem, 2).expect("add failed");

        repo.convert_cart(alice).expect("convert failed");

        let bobs = carts.list_items(bob).unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].quantity, 2);
    }

    #[tokio::test]
    async fn concurrent_conversions_create_exactly_one_order() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let menuitem = insert_menu_item(&pool, "Pasta", "11.25");
        carts.add_item(owner, menuitem, 1).expect("add failed");

        let a = {
            let pool = pool.clone();
            std::thread::spawn(move || DieselOrderRepository::new(pool).convert_cart(owner))
        };
        let b = {
            let pool = pool.clone();
            std::thread::spawn(move || DieselOrderRepository::new(pool).convert_cart(owner))
        };
        let results = [a.join().unwrap(), b.join().unwrap()];

        let successes = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1, "exactly one conversion must win");
        let loser = results
            .iter()
            .find(|r| r.is_err())
            .unwrap()
            .as_ref()
            .unwrap_err();
        assert!(
            matches!(loser, DomainError::Conflict(_) | DomainError::Validation(_)),
            "loser should see a conflict or an empty cart, got: {loser:?}"
        );

        let repo = DieselOrderRepository::new(pool);
        assert_eq!(repo.list(OrderScope::OwnedBy(owner)).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failure_mid_conversion_rolls_everything_back() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let menuitem = insert_menu_item(&pool, "Pasta", "11.25");
        carts.add_item(owner, menuitem, 2).expect("add failed");

        // Inject a fault between the order-items insert and the total
        // update: a check constraint the real total (22.50) violates.
        {
            let mut conn = pool.get().expect("Failed to get connection");
            diesel::sql_query(
                "ALTER TABLE orders ADD CONSTRAINT orders_total_guard CHECK (total <= 15)",
            )
            .execute(&mut conn)
            .expect("alter failed");
        }

        let err = repo.convert_cart(owner).unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));

        // All-or-nothing: no order, no order items, cart untouched.
        assert!(repo.list(OrderScope::OwnedBy(owner)).unwrap().is_empty());
        {
            let mut conn = pool.get().expect("Failed to get connection");
            let orphans: i64 = crate::schema::order_items::table
                .count()
                .get_result(&mut conn)
                .expect("count failed");
            assert_eq!(orphans, 0);
        }
        let cart = carts.list_items(owner).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].quantity, 2);
    }

    #[tokio::test]
    async fn list_scopes_by_owner_and_assignment() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let alice = insert_user(&pool, "alice", &[]);
        let bob = insert_user(&pool, "bob", &[]);
        let crew = insert_user(&pool, "carol", &[]);
        let menuitem = insert_menu_item(&pool, "Greek salad", "7.00");

        carts.add_item(alice, menuitem, 1).expect("add failed");
        let alices = repo.convert_cart(alice).expect("convert failed");
        carts.add_item(bob, menuitem, 1).expect("add failed");
        let bobs = repo.convert_cart(bob).expect("convert failed");

        repo.assign_delivery_crew(bobs.id, Some(crew))
            .expect("assign failed");

        assert_eq!(repo.list(OrderScope::All).unwrap().len(), 2);

        let assigned = repo.list(OrderScope::AssignedTo(crew)).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].id, bobs.id);

        let owned = repo.list(OrderScope::OwnedBy(alice)).unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].id, alices.id);
        assert_eq!(owned[0].items.len(), 1);
    }

    #[tokio::test]
    async fn mark_delivered_transitions_status() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let menuitem = insert_menu_item(&pool, "Pasta", "11.25");

        carts.add_item(owner, menuitem, 1).expect("add failed");
        let order = repo.convert_cart(owner).expect("convert failed");
        assert!(!order.status);

        let delivered = repo.mark_delivered(order.id).expect("update failed");
        assert!(delivered.status);
        // The total is untouched by status mutation.
        assert_eq!(delivered.total, order.total);
    }

    #[tokio::test]
    async fn updates_on_missing_orders_are_not_found() {
        let (_container, pool) = setup_db().await;
        let repo = DieselOrderRepository::new(pool.clone());
        let crew = insert_user(&pool, "carol", &[]);

        let err = repo.mark_delivered(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        let err = repo
            .assign_delivery_crew(Uuid::new_v4(), Some(crew))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        let err = repo.delete(Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_the_order_and_its_items() {
        let (_container, pool) = setup_db().await;
        let carts = DieselCartRepository::new(pool.clone());
        let repo = DieselOrderRepository::new(pool.clone());
        let owner = insert_user(&pool, "alice", &[]);
        let menuitem = insert_menu_item(&pool, "Bruschetta", "4.50");

        carts.add_item(owner, menuitem, 1).expect("add failed");
        let order = repo.convert_cart(owner).expect("convert failed");

        repo.delete(order.id).expect("delete failed");
        assert!(repo.find_by_id(order.id).unwrap().is_none());
    }
}
