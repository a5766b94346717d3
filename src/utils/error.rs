use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// Read or write against the document store failed (network/auth/quota)
    StoreUnavailable(String),
    /// Profile lookup failed while building a ledger entry; nothing was written
    ProfileLookupFailure(String),
    RecordNotFound(String),
    /// A concurrent create won the race for the same userId
    Conflict(String),
    InvalidRequest(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            LedgerError::ProfileLookupFailure(msg) => write!(f, "Profile lookup failed: {}", msg),
            LedgerError::RecordNotFound(msg) => write!(f, "Not found: {}", msg),
            LedgerError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            LedgerError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<mongodb::error::Error> for LedgerError {
    fn from(e: mongodb::error::Error) -> Self {
        LedgerError::StoreUnavailable(e.to_string())
    }
}
