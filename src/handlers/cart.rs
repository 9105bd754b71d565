use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::cart::CartItemView;
use crate::domain::role::Principal;
use crate::errors::AppError;
use crate::infrastructure::cart_service;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub menuitem: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub menuitem: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub price: String,
}

impl From<CartItemView> for CartItemResponse {
    fn from(item: CartItemView) -> Self {
        Self {
            id: item.id,
            menuitem: item.menuitem_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            price: item.price.to_string(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /cart/menu-items
///
/// Lists the caller's cart items. Customers only; the cart is owner-scoped
/// so a customer never sees another customer's items.
#[utoipa::path(
    get,
    path = "/cart/menu-items",
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "The caller's cart items", body = [CartItemResponse]),
        (status = 403, description = "Not a customer, or unauthenticated"),
    ),
    tag = "cart"
)]
pub async fn list_cart_items(
    pool: web::Data<DbPool>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();

    let items = web::block(move || cart_service(pool).list_items(&principal))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<CartItemResponse> = items.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /cart/menu-items
///
/// Adds one item to the caller's cart. The unit price snapshots the menu
/// item's current price and never changes afterwards.
#[utoipa::path(
    post,
    path = "/cart/menu-items",
    request_body = AddCartItemRequest,
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 201, description = "Cart item created", body = CartItemResponse),
        (status = 400, description = "Non-positive quantity or unknown menu item"),
        (status = 403, description = "Not a customer, or unauthenticated"),
    ),
    tag = "cart"
)]
pub async fn add_cart_item(
    pool: web::Data<DbPool>,
    principal: Principal,
    body: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();
    let body = body.into_inner();

    let item = web::block(move || {
        cart_service(pool).add_item(&principal, body.menuitem, body.quantity)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(CartItemResponse::from(item)))
}
