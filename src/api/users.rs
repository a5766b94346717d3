use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ledger_error_response, metrics},
    middleware::auth::Claims,
    models::UserProfile,
    services::UserDirectory,
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserProfile,
}

#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Caller's profile", body = MeResponse),
        (status = 404, description = "No profile for the token subject")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: web::ReqData<Claims>,
    directory: web::Data<dyn UserDirectory>,
) -> HttpResponse {
    metrics::increment_request_count();

    log::info!("👤 GET /users/me - user {}", user.sub);

    match directory.get_user(&user.sub).await {
        Ok(profile) => HttpResponse::Ok().json(MeResponse { success: true, user: profile }),
        Err(e) => {
            log::warn!("❌ Profile lookup failed for {}: {}", user.sub, e);
            ledger_error_response(&e)
        }
    }
}
