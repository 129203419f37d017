//! 目录服务 HTTP 客户端

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::app::product::model::{ProductId, ProductPayload};
use crate::core::config::ApiConfig;
use crate::core::error::ApiError;
use crate::core::service::CatalogApi;

/// 基于 reqwest 的 [`CatalogApi`] 实现
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    endpoint: String,
}

impl HttpCatalogClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(api: &ApiConfig) -> Result<Self, ApiError> {
        Self::new(api.endpoint(), api.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_url(&self, id: &ProductId) -> String {
        format!("{}/{}", self.endpoint, id)
    }

    /// 发送请求，非 2xx 状态转换为 [`ApiError::Status`]
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!("请求发送失败: {}", e);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            warn!("目录服务返回 {}: {}", status, response.url());
            return Err(ApiError::Status(status.as_u16()));
        }

        Ok(response)
    }
}

impl CatalogApi for HttpCatalogClient {
    async fn list(&self) -> Result<Value, ApiError> {
        debug!("GET {}", self.endpoint);
        let response = self.send(self.client.get(&self.endpoint)).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn create(&self, payload: &ProductPayload) -> Result<(), ApiError> {
        debug!("POST {}", self.endpoint);
        self.send(self.client.post(&self.endpoint).json(payload))
            .await?;
        Ok(())
    }

    async fn update(&self, id: &ProductId, payload: &ProductPayload) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!("PUT {}", url);
        self.send(self.client.put(&url).json(payload)).await?;
        Ok(())
    }

    async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = HttpCatalogClient::new("http://localhost:8080/api/products/", None).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/api/products");
        assert_eq!(
            client.item_url(&ProductId::Number(42)),
            "http://localhost:8080/api/products/42"
        );
        assert_eq!(
            client.item_url(&ProductId::Text("sku-7".to_string())),
            "http://localhost:8080/api/products/sku-7"
        );
    }
}
