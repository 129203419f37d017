//! 核心错误处理模块

use thiserror::Error;

/// 与目录服务通信时的失败原因
#[derive(Debug, Error)]
pub enum ApiError {
    /// 服务返回了非 2xx 状态码
    #[error("server responded with {0}")]
    Status(u16),
    /// 网络层失败（连接、超时等）
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    /// 响应体不是合法的产品数据
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// 列表响应形状无法识别（仅在严格模式下返回）
    #[error("unrecognized list response shape")]
    UnrecognizedShape,
}

impl ApiError {
    /// 若失败来自 HTTP 状态码，返回该状态码
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status(code) => Some(*code),
            ApiError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// 面向用户的失败原因；状态码失败写作 `<动作> failed: <状态码>`
    pub fn cause(&self, action: &str) -> String {
        match self {
            ApiError::Status(code) => format!("{} failed: {}", action, code),
            other => other.to_string(),
        }
    }
}

/// 组件操作错误
///
/// 所有错误都在操作边界被捕获，并通过 `Display` 转换为界面上唯一的状态消息。
#[derive(Debug, Error)]
pub enum CrudError {
    /// 本地校验失败，未发出任何请求
    #[error("{0}")]
    Validation(String),
    #[error("Could not load products: {}", .0.cause("Fetch"))]
    Fetch(ApiError),
    #[error("Save failed: {}", .0.cause("Save"))]
    Submit(ApiError),
    #[error("Delete failed: {}", .0.cause("Delete"))]
    Delete(ApiError),
}

impl CrudError {
    pub fn name_required() -> Self {
        CrudError::Validation("Name is required".to_string())
    }

    /// 底层 HTTP 状态码（校验错误没有状态码）
    pub fn status(&self) -> Option<u16> {
        match self {
            CrudError::Validation(_) => None,
            CrudError::Fetch(e) | CrudError::Submit(e) | CrudError::Delete(e) => e.status(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrudError>;
