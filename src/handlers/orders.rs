use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::order::{OrderItemView, OrderView};
use crate::domain::role::Principal;
use crate::errors::AppError;
use crate::infrastructure::order_service;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Documented shape of the mutation body. Enforcement is stricter than this
/// schema: each role's allowed field set is checked exactly against the raw
/// request, so unknown fields fail the whole request instead of being
/// silently dropped.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    /// Delivery crew only; must be `true`.
    pub status: Option<bool>,
    /// Manager only; a user id, or null to unassign.
    pub delivery_crew: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub menuitem: Uuid,
    pub quantity: i32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub delivery_crew: Option<Uuid>,
    /// false = pending, true = delivered.
    pub status: bool,
    pub total: String,
    pub date: String,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderItemView> for OrderItemResponse {
    fn from(item: OrderItemView) -> Self {
        Self {
            id: item.id,
            menuitem: item.menuitem_id,
            quantity: item.quantity,
            unit_price: item.unit_price.to_string(),
            price: item.price.to_string(),
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        Self {
            id: order.id,
            user: order.user_id,
            delivery_crew: order.delivery_crew_id,
            status: order.status,
            total: order.total.to_string(),
            date: order.created_date.to_rfc3339(),
            items: order.items.into_iter().map(Into::into).collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /orders
///
/// Role-scoped order list: managers see every order, delivery crew the
/// orders assigned to them, customers their own.
#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Orders visible to the caller", body = [OrderResponse]),
        (status = 403, description = "Unauthenticated"),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();

    let orders = web::block(move || order_service(pool).list_orders(&principal))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /orders
///
/// Converts the caller's cart into a new order. The conversion is atomic:
/// the order, its item snapshots, the fixed total, and the cart deletion
/// all commit together or not at all.
#[utoipa::path(
    post,
    path = "/orders",
    params(
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 201, description = "Order created from the cart", body = OrderResponse),
        (status = 400, description = "Cart is empty"),
        (status = 403, description = "Not a customer, or unauthenticated"),
        (status = 409, description = "A concurrent conversion already consumed the cart"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    pool: web::Data<DbPool>,
    principal: Principal,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();

    let order = web::block(move || order_service(pool).create_order(&principal))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/{id}
///
/// Single-order read, customers only. Managers and delivery crew reach an
/// individual order through the mutation path instead.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "The order", body = OrderResponse),
        (status = 403, description = "Not a customer, or unauthenticated"),
        (status = 404, description = "Unknown order"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    pool: web::Data<DbPool>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();
    let order_id = path.into_inner();

    let order = web::block(move || order_service(pool).get_order(&principal, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// PUT/PATCH /orders/{id}
///
/// Field-restricted mutation: delivery crew may only set `status` to true
/// (pending → delivered); managers may only assign or unassign
/// `delivery_crew`. A request naming any field outside the caller's allowed
/// set fails as a whole.
#[utoipa::path(
    patch,
    path = "/orders/{id}",
    request_body = UpdateOrderRequest,
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 200, description = "Updated order", body = OrderResponse),
        (status = 400, description = "Disallowed field or status value"),
        (status = 403, description = "Not a manager or delivery crew"),
        (status = 404, description = "Unknown order or assignee"),
    ),
    tag = "orders"
)]
pub async fn update_order(
    pool: web::Data<DbPool>,
    principal: Principal,
    path: web::Path<Uuid>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();
    let order_id = path.into_inner();
    let Value::Object(fields) = body.into_inner() else {
        return Err(AppError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    };

    let order =
        web::block(move || order_service(pool).update_order(&principal, order_id, &fields))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

/// DELETE /orders/{id}
///
/// Managers and delivery crew only.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order id"),
        ("x-user-id" = Option<Uuid>, Header, description = "Authenticated user id"),
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 403, description = "Not a manager or delivery crew"),
        (status = 404, description = "Unknown order"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    pool: web::Data<DbPool>,
    principal: Principal,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let pool = pool.get_ref().clone();
    let order_id = path.into_inner();

    web::block(move || order_service(pool).delete_order(&principal, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
