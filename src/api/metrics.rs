use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);
static LIKE_COUNT: AtomicU64 = AtomicU64::new(0);
static SEEN_COUNT: AtomicU64 = AtomicU64::new(0);
static MATCH_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_like_count() {
    LIKE_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_seen_count() {
    SEEN_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_match_count() {
    MATCH_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub ledger_likes_total: u64,
    pub ledger_seen_total: u64,
    pub ledger_matches_total: u64,
}

impl MetricsResponse {
    fn snapshot() -> Self {
        Self {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            ledger_likes_total: LIKE_COUNT.load(Ordering::Relaxed),
            ledger_seen_total: SEEN_COUNT.load(Ordering::Relaxed),
            ledger_matches_total: MATCH_COUNT.load(Ordering::Relaxed),
        }
    }

    fn to_prometheus(&self) -> String {
        let counters = [
            ("http_requests_total", "Total number of ledger API requests", self.http_requests_total),
            ("http_errors_total", "Total number of failed ledger API requests", self.http_errors_total),
            ("ledger_likes_total", "Likes recorded", self.ledger_likes_total),
            ("ledger_seen_total", "Seen events recorded", self.ledger_seen_total),
            ("ledger_matches_total", "Mutual matches reported", self.ledger_matches_total),
        ];

        counters
            .iter()
            .map(|(name, help, value)| {
                format!("# HELP {name} {help}\n# TYPE {name} counter\n{name} {value}\n")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Prometheus counters", body = String)
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}
