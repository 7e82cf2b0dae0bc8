//! Pickup relay HTTP API.
//!
//! Endpoints:
//! - POST /notifyVolunteer — Send a push notification to a device token
//! - GET  /health — Liveness check

pub mod routes;
pub mod state;
