pub mod cart_service;
pub mod order_service;
pub mod roles;

#[cfg(test)]
pub(crate) mod testing;
