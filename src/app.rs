use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/catalog", get(handlers::catalog))
        .route("/complete_task", post(handlers::complete_task))
        .route("/complete_study", post(handlers::complete_study))
        .route("/stop_study", post(handlers::stop_study))
        .route("/update_most_used_app", post(handlers::update_most_used_app))
        .route("/change_avatar", post(handlers::change_avatar))
        .with_state(state)
}
