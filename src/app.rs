use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/section/:name", get(handlers::show_section))
        .route("/appointments", post(handlers::save_appointment))
        .route("/appointments/filter", get(handlers::filter_appointments))
        .route("/appointments/refresh", post(handlers::refresh_appointments))
        .route("/appointments/:id/edit", get(handlers::edit_appointment))
        .route("/appointments/:id/delete", post(handlers::delete_appointment))
        .route("/results", post(handlers::save_result))
        .route("/results/filter", get(handlers::filter_results))
        .route("/results/search", get(handlers::search_results))
        .route("/results/pending", get(handlers::pending_results))
        .route("/results/recent", get(handlers::recent_results))
        .route("/results/refresh", post(handlers::refresh_results))
        .route("/results/:id/edit", get(handlers::edit_result))
        .route("/results/:id/delete", post(handlers::delete_result))
        .route("/results/:id/status", post(handlers::change_result_status))
        .with_state(state)
}
