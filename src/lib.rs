// Statistical Analyst AI - document-aware statistics chat service

pub mod agents;
pub mod config;
pub mod extract;
pub mod intake;
pub mod llm;
pub mod lock_guard;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;
pub mod types;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
