/// HTTP persistence gateway
///
/// This module handles:
/// - Binding the listener and graceful shutdown (app.rs)
/// - The save endpoint, its preflight and static file serving (routes.rs)

pub mod app;
pub mod routes;
