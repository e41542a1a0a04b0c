use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    entities::user::SessionUser,
    errors::AppError,
    repositories::session::SessionProvider,
};

/// `SessionProvider` backed by the external auth provider's session
/// endpoint. An expired or unknown token is an anonymous session, not an
/// error.
#[derive(Clone)]
pub struct HttpSessionClient {
    client: reqwest::Client,
    session_url: String,
}

#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    user: Option<SessionUser>,
}

impl HttpSessionClient {
    pub fn new(client: reqwest::Client, session_url: &str) -> Self {
        HttpSessionClient {
            client,
            session_url: session_url.to_string(),
        }
    }
}

#[async_trait]
impl SessionProvider for HttpSessionClient {
    async fn get_session(&self, token: &str) -> Result<Option<SessionUser>, AppError> {
        let response = self
            .client
            .get(&self.session_url)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let envelope: SessionEnvelope = response.json().await?;
                Ok(envelope.user)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status => Err(AppError::ServiceError(format!(
                "Auth provider returned {}",
                status
            ))),
        }
    }
}
