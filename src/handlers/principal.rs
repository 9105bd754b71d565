//! Principal extraction from the transport layer.
//!
//! Session authentication lives in front of this service; the gateway
//! forwards the authenticated user id in the `x-user-id` header. A missing
//! or malformed header yields an anonymous principal, which every operation
//! subsequently denies.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::role::Principal;

pub const USER_ID_HEADER: &str = "x-user-id";

impl FromRequest for Principal {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok());
        ready(Ok(Principal { user_id }))
    }
}
