use crate::handlers;
use crate::services::upload::MAX_FILE_SIZE;
use axum::{extract::DefaultBodyLimit, routing, Router};

/// Room for the text fields and multipart framing around the image.
const SUBMIT_BODY_LIMIT: usize = MAX_FILE_SIZE + 64 * 1024;

pub fn create_routes() -> Router {
    Router::new()
        .merge(page_routes())
        .nest("/api/v1", api_routes())
}

/// HTML surface: gallery, vote form and submission form.
fn page_routes() -> Router {
    Router::new()
        .route(
            "/",
            routing::get(handlers::gallery::show_gallery).post(handlers::gallery::toggle_vote),
        )
        .route(
            "/submit",
            routing::get(handlers::submit::show_submit_form)
                .post(handlers::submit::submit_portfolio)
                .layer(DefaultBodyLimit::max(SUBMIT_BODY_LIMIT)),
        )
}

fn api_routes() -> Router {
    Router::new()
        .route(
            "/portfolios",
            routing::get(handlers::portfolio::list_portfolios),
        )
        .route(
            "/portfolios/{id}/vote",
            routing::post(handlers::vote::vote_portfolio),
        )
}
