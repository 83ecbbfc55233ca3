//! HTTP layer for Telephonist.
//!
//! Three routes on an axum router: `POST /` for a turn, `DELETE /` to hang
//! up, `GET /ping` for liveness.

pub mod error;
pub mod handlers;
pub mod router;
