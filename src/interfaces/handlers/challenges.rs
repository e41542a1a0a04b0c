use actix_web::{get, http::header, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, AppState};

#[get("/desafios")]
#[instrument(skip(state))]
pub async fn list_challenges(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let challenges = state.challenges.list_challenges().await?;
    Ok(HttpResponse::Ok().json(challenges))
}

/// Challenge detail. An unknown (or malformed) id is terminal navigation
/// back to the listing, not an error page.
#[get("/desafios/{id}")]
#[instrument(skip(state))]
pub async fn get_challenge(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    match state.challenges.get_challenge(&id).await? {
        Some(view) => Ok(HttpResponse::Ok().json(view)),
        None => Ok(HttpResponse::SeeOther()
            .insert_header((header::LOCATION, "/desafios"))
            .finish()),
    }
}
