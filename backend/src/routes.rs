use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/articles", get(handlers::list_articles).post(handlers::create_article))
        .route(
            "/articles/:slug",
            get(handlers::get_article)
                .put(handlers::update_article)
                .delete(handlers::delete_article),
        )
        .route("/categories", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/categories/:slug",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route("/pages", get(handlers::list_pages).post(handlers::create_page))
        .route(
            "/pages/:slug",
            get(handlers::get_page).put(handlers::update_page).delete(handlers::delete_page),
        )
        .route("/users/:uid", get(handlers::get_user).post(handlers::save_user))
        .route("/users/:uid/favorites", patch(handlers::patch_favorites))
        .route("/users/:uid/suggestions", post(handlers::add_suggestion))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
