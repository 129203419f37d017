//! # 产品目录 CRUD 客户端
//!
//! 对远端产品目录 REST 服务执行增删改查，并把服务端响应归约到本地视图状态：
//! - `app::product` 视图状态容器、列表响应识别、CRUD 组件与文本渲染
//! - `core` 配置、错误类型、服务接口
//! - `infrastructure` reqwest 客户端与日志初始化

pub mod app;
pub mod core;
pub mod infrastructure;

pub use app::product::{
    normalize, Draft, DraftField, FormMode, ListShape, Product, ProductCrud, ProductId,
    ProductPayload, ViewState, DELETE_PROMPT,
};
pub use crate::core::config::{load_config, Config, ConfigError, ConfigSource};
pub use crate::core::error::{ApiError, CrudError, Result};
pub use crate::core::service::{CatalogApi, Confirm};
pub use crate::infrastructure::http_client::HttpCatalogClient;
