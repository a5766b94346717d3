use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Matching Service API",
        version = "1.0.0",
        description = "Likes, seen profiles and mutual-match detection for the dating app.\n\n**Authentication:** all `/api/v1` endpoints require a JWT Bearer token; the token subject is the acting user.\n\n**Features:**\n- Record likes (both the liker's and the liked user's copy)\n- Record seen profiles\n- Mutual-match checks\n- Health monitoring and metrics"
    ),
    paths(
        // Matching
        crate::api::matching::like_user,
        crate::api::matching::mark_seen,
        crate::api::matching::check_match,
        crate::api::matching::get_seen_users,
        crate::api::matching::get_match_tables,

        // Users
        crate::api::users::get_me,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::LedgerEntry,
            crate::models::MatchingData,
            crate::models::UserProfile,
            crate::api::matching::LikeResponse,
            crate::api::matching::SeenResponse,
            crate::api::matching::MatchResponse,
            crate::api::matching::SeenUsersResponse,
            crate::api::matching::MatchTablesResponse,
            crate::api::users::MeResponse,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Matching", description = "Like/seen bookkeeping and mutual-match detection."),
        (name = "Users", description = "Profile of the authenticated caller."),
        (name = "Health", description = "Health check and counters for monitoring service status."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token issued by the account service"))
                        .build()
                ),
            );
        }
    }
}
