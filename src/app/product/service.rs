//! 产品 CRUD 组件
//!
//! 把用户操作映射为 HTTP 请求，并把响应归约进 [`ViewState`]。
//! 每个网络操作都会：置忙并清除旧错误 → 请求 → 更新状态 → 取消忙碌标记。
//! 错误在操作边界被转换为状态消息，不会向外传播。

use tracing::{debug, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

use super::model::{DraftField, Product, ProductId, ProductPayload};
use super::normalize::normalize;
use super::state::{Action, ViewState};
use crate::core::error::CrudError;
use crate::core::service::{CatalogApi, Confirm};

/// 删除确认提示
pub const DELETE_PROMPT: &str = "Delete this product?";

/// 产品 CRUD 组件
///
/// 所有操作都需要 `&mut self`，同一组件上的请求天然按顺序执行，
/// 不会出现旧的列表响应覆盖新响应的情况。
pub struct ProductCrud<A> {
    api: A,
    state: ViewState,
    strict_list_shape: bool,
}

fn operation_span(op: &'static str) -> Span {
    info_span!("product_op", op, op_id = %Uuid::new_v4())
}

impl<A: CatalogApi> ProductCrud<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::new(),
            strict_list_shape: false,
        }
    }

    /// 无法识别的列表响应是否视为加载失败
    pub fn with_strict_list_shape(mut self, strict: bool) -> Self {
        self.strict_list_shape = strict;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// 按标识的文本形式查找当前列表中的记录
    pub fn find(&self, id: &str) -> Option<&Product> {
        self.state
            .products
            .iter()
            .find(|p| p.id.as_ref().is_some_and(|pid| pid.to_string() == id))
    }

    /// 把用户输入的标识解析为当前列表中记录的实际标识
    pub fn resolve_id(&self, id: &str) -> Option<ProductId> {
        self.find(id).and_then(|p| p.id.clone())
    }

    /// 重新加载产品列表
    pub async fn fetch_all(&mut self) {
        async {
            self.state.apply(Action::RequestStarted);
            self.reload().await;
            self.state.apply(Action::RequestFinished);
        }
        .instrument(operation_span("fetch_all"))
        .await
    }

    /// 提交草稿：编辑模式且有标识时 PUT，否则 POST；成功后重新加载列表
    pub async fn submit(&mut self) {
        async {
            let payload = match self.state.draft.to_payload() {
                Ok(payload) => payload,
                Err(err) => {
                    debug!("草稿校验失败: {}", err);
                    self.state.apply(Action::Failed(err.to_string()));
                    return;
                }
            };

            self.state.apply(Action::RequestStarted);
            match self.save(&payload).await {
                Ok(()) => {
                    self.reload().await;
                    self.state.apply(Action::Submitted);
                }
                Err(err) => self.fail(err),
            }
            self.state.apply(Action::RequestFinished);
        }
        .instrument(operation_span("submit"))
        .await
    }

    /// 将记录载入草稿并进入编辑模式
    pub fn edit(&mut self, product: Product) {
        debug!(id = ?product.id, "编辑产品");
        self.state.apply(Action::Edit(product));
    }

    /// 放弃草稿并退出编辑模式
    pub fn cancel(&mut self) {
        self.state.apply(Action::Cancel);
    }

    /// 直接显示一条本地错误消息
    pub fn report_error(&mut self, message: impl Into<String>) {
        self.state.apply(Action::Failed(message.into()));
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        self.state.apply(Action::FieldChanged(field, value.into()));
    }

    /// 确认后删除记录；拒绝确认时不发出任何请求
    pub async fn delete_record(&mut self, id: &ProductId, confirm: &mut impl Confirm) {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(%id, "取消删除");
            return;
        }

        async {
            self.state.apply(Action::RequestStarted);
            match self.api.delete(id).await {
                Ok(()) => {
                    info!(%id, "产品已删除");
                    self.state.apply(Action::ClearError);
                    self.reload().await;
                }
                Err(err) => self.fail(CrudError::Delete(err)),
            }
            self.state.apply(Action::RequestFinished);
        }
        .instrument(operation_span("delete"))
        .await
    }

    async fn save(&self, payload: &ProductPayload) -> Result<(), CrudError> {
        let target = if self.state.is_editing() {
            self.state.draft.known_id()
        } else {
            None
        };

        match target {
            Some(id) => {
                self.api
                    .update(id, payload)
                    .await
                    .map_err(CrudError::Submit)?;
                info!(%id, "产品已更新");
            }
            None => {
                self.api.create(payload).await.map_err(CrudError::Submit)?;
                info!(name = %payload.name, "产品已创建");
            }
        }
        Ok(())
    }

    /// 加载列表，失败时记录错误并保留旧列表
    async fn reload(&mut self) {
        let result: Result<Vec<Product>, CrudError> = async {
            let body = self.api.list().await.map_err(CrudError::Fetch)?;
            normalize(body, self.strict_list_shape).map_err(CrudError::Fetch)
        }
        .await;

        match result {
            Ok(products) => {
                info!(count = products.len(), "产品列表已加载");
                self.state.apply(Action::ListLoaded(products));
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: CrudError) {
        warn!("{}", err);
        self.state.apply(Action::Failed(err.to_string()));
    }
}
