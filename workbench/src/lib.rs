//! 浏览器端 MySQL 管理控制台
//!
//! 提供以下功能：
//! - 使用账号密码连接数据库服务器
//! - 浏览、创建数据库
//! - 在选定数据库上执行 SQL 并以表格展示结果

pub mod api;
pub mod catalog;
pub mod connection_manager;
pub mod driver;
pub mod executor;
pub mod handlers;
pub mod mysql;
pub mod presenter;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;

use axum::{middleware, routing::get, Json, Router};
use common::middleware::request_id::request_id_middleware;
use state::AppState;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "SQL 工作台 API",
        version = "0.1.0",
        description = "浏览器端 MySQL 管理控制台"
    ),
    paths(
        api::health_check,
        api::get_session,
        api::execute_query,
    ),
    components(schemas(
        common::models::QueryRequest,
        common::models::TabularValue,
        common::models::Message,
        common::models::Severity,
        common::models::Catalog,
        session::SessionSnapshot,
        api::HealthResponse,
    )),
    tags(
        (name = "query", description = "查询执行端点"),
        (name = "session", description = "会话状态端点"),
        (name = "health", description = "健康检查端点")
    )
)]
pub struct ApiDoc;

/// Builds the full application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
