//! Response envelopes shared by every handler.
//!
//! Success bodies are `{ "data": ... }`; failures are
//! `{ "error": ..., "code": ... }` with a real status code (see
//! [`crate::error::AppError`]). Handlers build these types instead of
//! ad-hoc JSON so the wire shape stays uniform.

use serde::Serialize;

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Failure envelope. `code` is a stable machine-readable discriminator;
/// `error` is the human-readable message.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Row-count payload for the batch assignment mutations.
#[derive(Debug, Serialize)]
pub struct UpdatedCount {
    pub updated: u64,
}
