use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{
    api::{ledger_error_response, metrics},
    middleware::auth::Claims,
    models::{LedgerEntry, MatchingData},
    services::MatchLedger,
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LikeResponse {
    pub success: bool,
    /// The liked user had already liked the caller
    pub matched: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SeenResponse {
    pub success: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MatchResponse {
    pub success: bool,
    pub matched: bool,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SeenUsersResponse {
    pub success: bool,
    pub seen_users: Vec<LedgerEntry>,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MatchTablesResponse {
    pub success: bool,
    pub data: MatchingData,
}

/// POST /api/v1/matching/likes/{target_id} - Like a profile (likedUsers + likedMeUsers)
#[utoipa::path(
    post,
    path = "/api/v1/matching/likes/{target_id}",
    tag = "Matching",
    params(("target_id" = String, Path, description = "User being liked")),
    responses(
        (status = 200, description = "Like recorded", body = LikeResponse),
        (status = 400, description = "Invalid user id"),
        (status = 404, description = "Profile not found"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn like_user(
    user: web::ReqData<Claims>,
    ledger: web::Data<MatchLedger>,
    target_id: web::Path<String>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;

    log::info!("💚 POST /matching/likes/{} - user {}", target_id, user_id);

    match ledger.like_user(user_id, &target_id).await {
        Ok(matched) => {
            metrics::increment_like_count();
            if matched {
                metrics::increment_match_count();
            }
            HttpResponse::Ok().json(LikeResponse { success: true, matched })
        }
        Err(e) => {
            log::error!("❌ Error recording like {} -> {}: {}", user_id, target_id, e);
            ledger_error_response(&e)
        }
    }
}

/// POST /api/v1/matching/seen/{target_id} - Mark a profile as seen
#[utoipa::path(
    post,
    path = "/api/v1/matching/seen/{target_id}",
    tag = "Matching",
    params(("target_id" = String, Path, description = "User that was shown")),
    responses(
        (status = 200, description = "Seen event recorded", body = SeenResponse),
        (status = 404, description = "Profile not found"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn mark_seen(
    user: web::ReqData<Claims>,
    ledger: web::Data<MatchLedger>,
    target_id: web::Path<String>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;

    log::info!("👀 POST /matching/seen/{} - user {}", target_id, user_id);

    match ledger.record_seen(user_id, &target_id).await {
        Ok(()) => {
            metrics::increment_seen_count();
            HttpResponse::Ok().json(SeenResponse { success: true })
        }
        Err(e) => {
            log::error!("❌ Error recording seen {} -> {}: {}", user_id, target_id, e);
            ledger_error_response(&e)
        }
    }
}

/// GET /api/v1/matching/matches/{other_id} - Check for a match between the caller and another user
#[utoipa::path(
    get,
    path = "/api/v1/matching/matches/{other_id}",
    tag = "Matching",
    params(("other_id" = String, Path, description = "Other user of the pair")),
    responses(
        (status = 200, description = "Match status", body = MatchResponse),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn check_match(
    user: web::ReqData<Claims>,
    ledger: web::Data<MatchLedger>,
    other_id: web::Path<String>,
) -> HttpResponse {
    metrics::increment_request_count();
    let user_id = &user.sub;

    match ledger.is_mutual_match(user_id, &other_id).await {
        Ok(matched) => {
            log::info!("🔎 GET /matching/matches/{} - user {}: {}", other_id, user_id, matched);
            HttpResponse::Ok().json(MatchResponse { success: true, matched })
        }
        Err(e) => {
            log::error!("❌ Error checking match {} <-> {}: {}", user_id, other_id, e);
            ledger_error_response(&e)
        }
    }
}

/// GET /api/v1/matching/seen - Profiles already shown to the caller
#[utoipa::path(
    get,
    path = "/api/v1/matching/seen",
    tag = "Matching",
    responses(
        (status = 200, description = "Seen users, oldest first", body = SeenUsersResponse),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_seen_users(
    user: web::ReqData<Claims>,
    ledger: web::Data<MatchLedger>,
) -> HttpResponse {
    metrics::increment_request_count();

    match ledger.seen_users(&user.sub).await {
        Ok(seen_users) => {
            let count = seen_users.len();
            log::info!("📋 GET /matching/seen - user {}: {} entries", user.sub, count);
            HttpResponse::Ok().json(SeenUsersResponse { success: true, seen_users, count })
        }
        Err(e) => {
            log::error!("❌ Error listing seen users for {}: {}", user.sub, e);
            ledger_error_response(&e)
        }
    }
}

/// GET /api/v1/matching/tables - The caller's full matchingData document
#[utoipa::path(
    get,
    path = "/api/v1/matching/tables",
    tag = "Matching",
    responses(
        (status = 200, description = "Caller's ledger document", body = MatchTablesResponse),
        (status = 404, description = "No ledger document yet"),
        (status = 503, description = "Store unavailable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_match_tables(
    user: web::ReqData<Claims>,
    ledger: web::Data<MatchLedger>,
) -> HttpResponse {
    metrics::increment_request_count();

    match ledger.match_tables(&user.sub).await {
        Ok(data) => HttpResponse::Ok().json(MatchTablesResponse { success: true, data }),
        Err(e) => {
            log::warn!("⚠️ No match tables for {}: {}", user.sub, e);
            ledger_error_response(&e)
        }
    }
}
