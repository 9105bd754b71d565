pub mod cart_repo;
pub mod directory;
pub mod models;
pub mod order_repo;

#[cfg(test)]
pub(crate) mod test_db;

use crate::application::cart_service::CartService;
use crate::application::order_service::OrderService;
use crate::db::DbPool;
use crate::domain::errors::DomainError;

pub use cart_repo::DieselCartRepository;
pub use directory::DieselGroupDirectory;
pub use order_repo::DieselOrderRepository;

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

// ── Service wiring ────────────────────────────────────────────────────────────

pub fn cart_service(pool: DbPool) -> CartService<DieselCartRepository, DieselGroupDirectory> {
    CartService::new(
        DieselCartRepository::new(pool.clone()),
        DieselGroupDirectory::new(pool),
    )
}

pub fn order_service(pool: DbPool) -> OrderService<DieselOrderRepository, DieselGroupDirectory> {
    OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        DieselGroupDirectory::new(pool),
    )
}
