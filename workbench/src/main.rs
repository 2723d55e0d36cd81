//! SQL 工作台服务入口

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use common::config::{AppConfig, LogFormat};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workbench::mysql::MySqlDriver;
use workbench::state::AppState;

const SERVICE_NAME: &str = "workbench";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（含 .env）
    let config = AppConfig::load_with_service(SERVICE_NAME).context("加载配置失败")?;

    // 初始化日志追踪
    init_tracing(config.log_format);

    // 创建应用状态
    let driver = Arc::new(MySqlDriver::new(Duration::from_secs(config.connect_timeout_secs)));
    let state = AppState::new(config.clone(), driver);

    // 创建路由
    let app = workbench::create_router(state);

    // 启动服务
    let addr = config.bind_addr();
    info!(service = SERVICE_NAME, address = %addr, "启动服务");

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务运行失败")?;

    info!(service = SERVICE_NAME, "服务已停止");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "无法监听退出信号");
        std::future::pending::<()>().await;
    }
}
