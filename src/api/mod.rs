use actix_web::HttpResponse;

use crate::utils::error::LedgerError;

pub mod health;
pub mod matching;
pub mod metrics;
pub mod swagger;
pub mod users;

/// Maps a ledger failure to `{success: false, error}` with a status code.
/// Nothing is swallowed: the caller decides how to treat a failed like.
pub fn ledger_error_response(e: &LedgerError) -> HttpResponse {
    metrics::increment_error_count();

    let mut response = match e {
        LedgerError::InvalidRequest(_) => HttpResponse::BadRequest(),
        LedgerError::ProfileLookupFailure(_) | LedgerError::RecordNotFound(_) => HttpResponse::NotFound(),
        LedgerError::Conflict(_) => HttpResponse::Conflict(),
        LedgerError::StoreUnavailable(_) => HttpResponse::ServiceUnavailable(),
    };

    response.json(serde_json::json!({
        "success": false,
        "error": e.to_string()
    }))
}
