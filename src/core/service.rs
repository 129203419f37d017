//! 核心服务层模块

use serde_json::Value;
use std::future::Future;

use crate::app::product::model::{ProductId, ProductPayload};
use crate::core::error::ApiError;

/// 产品目录服务的远端接口
///
/// 列表接口返回原始 JSON，由调用方识别形状；其余操作只关心成功与否。
/// 组件在单个任务上顺序驱动，因此返回的 future 不要求 `Send`。
pub trait CatalogApi {
    /// `GET {endpoint}`
    fn list(&self) -> impl Future<Output = Result<Value, ApiError>>;
    /// `POST {endpoint}`
    fn create(&self, payload: &ProductPayload) -> impl Future<Output = Result<(), ApiError>>;
    /// `PUT {endpoint}/{id}`
    fn update(
        &self,
        id: &ProductId,
        payload: &ProductPayload,
    ) -> impl Future<Output = Result<(), ApiError>>;
    /// `DELETE {endpoint}/{id}`
    fn delete(&self, id: &ProductId) -> impl Future<Output = Result<(), ApiError>>;
}

/// 删除前的交互确认
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}
