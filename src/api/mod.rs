/// API routes and handlers
pub mod auth;
pub mod dashboard;
pub mod middleware;
pub mod tickets;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(auth::routes())
        .merge(dashboard::routes())
        .merge(tickets::routes())
}
