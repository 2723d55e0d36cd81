//! JSON API over the same session as the console page.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppError;
use common::middleware::RequestId;
use common::models::QueryRequest;
use common::response::ApiResponse;

use crate::session::SessionSnapshot;
use crate::state::AppState;

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 获取当前会话状态
#[utoipa::path(
    get,
    path = "/api/session",
    tag = "session",
    responses(
        (status = 200, description = "会话快照", body = ApiResponse<SessionSnapshot>)
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> Json<ApiResponse<SessionSnapshot>> {
    let session = state.session.lock().await;
    Json(
        ApiResponse::ok_with_service(session.snapshot(), state.config.service_name.clone())
            .with_request_id(&request_id),
    )
}

/// 在当前数据库上执行 SQL
///
/// The statement goes through the same path as the console's "Execute
/// Query" button; the returned snapshot carries the resulting message and
/// result set.
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "query",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "已执行，结果见会话快照", body = ApiResponse<SessionSnapshot>),
        (status = 400, description = "行数限制无效"),
        (status = 409, description = "尚未连接数据库")
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<ApiResponse<SessionSnapshot>>, AppError> {
    let limit = req.row_limit()?;
    let mut session = state.session.lock().await;
    if session.current_database().is_none() {
        return Err(AppError::NotConnected(
            "Please connect to a database to execute queries.".into(),
        ));
    }

    session.execute_query(&req.sql, limit).await;
    Ok(Json(
        ApiResponse::ok_with_service(session.snapshot(), state.config.service_name.clone())
            .with_request_id(&request_id),
    ))
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
