use async_trait::async_trait;

use crate::{entities::user::SessionUser, errors::AppError};

/// Gateway to the external auth provider. Sessions are issued elsewhere;
/// this side only resolves a token into the user it belongs to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn get_session(&self, token: &str) -> Result<Option<SessionUser>, AppError>;
}
