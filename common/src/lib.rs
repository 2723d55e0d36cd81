//! SQL 工作台公共模块
//!
//! 提供配置加载、错误类型、统一响应格式、请求 ID 中间件以及共享数据模型。

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
