//! Session identity of a logged-in user.

use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::domain::types::{TypeConstraintError, UserId};
use crate::domain::user::User;

/// Claims stored as JSON in the identity cookie and recovered on every
/// request. Handlers that allow anonymous viewers extract
/// `Option<AuthenticatedUser>` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub name: String,
    pub email: String,
}

impl AuthenticatedUser {
    /// The typed identifier of the acting user.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        UserId::new(self.id)
    }
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            username: user.username.to_string(),
            name: user.full_name(),
            email: user.email.to_string(),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let result = match Identity::from_request(req, payload).into_inner() {
            Ok(identity) => identity
                .id()
                .map_err(|_| ErrorUnauthorized("session expired"))
                .and_then(|claims| {
                    serde_json::from_str::<AuthenticatedUser>(&claims)
                        .map_err(|_| ErrorUnauthorized("invalid session"))
                }),
            Err(_) => Err(ErrorUnauthorized("authentication required")),
        };
        ready(result)
    }
}
