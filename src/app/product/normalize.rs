//! 列表响应形状识别
//!
//! 目录服务的列表接口可能返回四种形状之一，统一展开为产品序列：
//!
//! | 形状 | 示例 |
//! |---|---|
//! | `Flat` | `[{..}, {..}]` |
//! | `Nested` | `[[{..}, {..}]]` |
//! | `DataField` | `{"data": [{..}]}` |
//! | `ProductsField` | `{"products": [{..}]}` |
//!
//! 其他形状为 `Unrecognized`，默认展开为空序列。

use serde_json::Value;

use super::model::Product;
use crate::core::error::ApiError;

/// 已识别的列表响应形状
#[derive(Debug, Clone, PartialEq)]
pub enum ListShape {
    Flat(Vec<Value>),
    Nested(Vec<Value>),
    DataField(Vec<Value>),
    ProductsField(Vec<Value>),
    Unrecognized,
}

impl ListShape {
    /// 识别响应形状；`data` 优先于 `products`
    pub fn detect(body: Value) -> Self {
        match body {
            Value::Array(mut items) => {
                if matches!(items.first(), Some(Value::Array(_))) {
                    match items.swap_remove(0) {
                        Value::Array(inner) => ListShape::Nested(inner),
                        _ => ListShape::Unrecognized,
                    }
                } else {
                    ListShape::Flat(items)
                }
            }
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove("data") {
                    ListShape::DataField(items)
                } else if let Some(Value::Array(items)) = map.remove("products") {
                    ListShape::ProductsField(items)
                } else {
                    ListShape::Unrecognized
                }
            }
            _ => ListShape::Unrecognized,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListShape::Flat(_) => "flat",
            ListShape::Nested(_) => "nested",
            ListShape::DataField(_) => "data",
            ListShape::ProductsField(_) => "products",
            ListShape::Unrecognized => "unrecognized",
        }
    }

    /// 展开为原始元素；`Unrecognized` 为 `None`
    pub fn into_items(self) -> Option<Vec<Value>> {
        match self {
            ListShape::Flat(items)
            | ListShape::Nested(items)
            | ListShape::DataField(items)
            | ListShape::ProductsField(items) => Some(items),
            ListShape::Unrecognized => None,
        }
    }
}

/// 将列表响应体展开为产品序列
///
/// 非严格模式下无法识别的形状得到空序列；严格模式下返回
/// [`ApiError::UnrecognizedShape`]。元素无法解码为产品时返回 [`ApiError::Decode`]。
pub fn normalize(body: Value, strict: bool) -> Result<Vec<Product>, ApiError> {
    let shape = ListShape::detect(body);
    tracing::debug!(shape = shape.name(), "列表响应形状");

    match shape.into_items() {
        Some(items) => Ok(serde_json::from_value(Value::Array(items))?),
        None if strict => Err(ApiError::UnrecognizedShape),
        None => {
            tracing::warn!("无法识别的列表响应形状，按空列表处理");
            Ok(Vec::new())
        }
    }
}
