//! 路由模块

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{api, handlers};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::console))
        .route("/login", post(handlers::login))
        .route("/databases/select", post(handlers::select_database))
        .route("/databases/create", post(handlers::create_database))
        .route("/query", post(handlers::execute_query))
        .route("/query/show-databases", post(handlers::show_databases))
        .route("/query/show-tables", post(handlers::show_tables))
        .route("/api/health", get(api::health_check))
        .route("/api/session", get(api::get_session))
        .route("/api/query", post(api::execute_query))
}
