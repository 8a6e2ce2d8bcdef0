//! HTTP API: routing, identity extraction and decision-to-status mapping.
//!
//! Authorization lives entirely in `formlane-authz`; this crate only
//! assembles request contexts, runs the guard and maps denials onto
//! status codes.

pub mod app;
pub mod context;
pub mod errors;
pub mod guard;
pub mod middleware;
pub mod routes;
