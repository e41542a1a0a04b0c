use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::entities::user::SessionUser;

/// Extractor for the session resolved by `SessionMiddleware`. Anonymous
/// requests yield `Session(None)`; handlers receive the user as an explicit
/// argument instead of reaching into ambient state.
/// Usage: add `session: Session` as a parameter to your handler function.
#[derive(Debug, Clone)]
pub struct Session(pub Option<SessionUser>);

impl Session {
    pub fn user(&self) -> Option<&SessionUser> {
        self.0.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(Session(req.extensions().get::<SessionUser>().cloned())))
    }
}
