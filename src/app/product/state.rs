//! 视图状态容器
//!
//! 所有状态变化都通过 [`ViewState::apply`] 完成，转换函数不做任何 I/O。

use super::model::{Draft, DraftField, FormMode, Product};

/// 组件的全部视图状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// 最近一次成功获取的产品列表
    pub products: Vec<Product>,
    pub draft: Draft,
    pub mode: FormMode,
    /// 是否有请求在进行中（仅用于展示）
    pub busy: bool,
    /// 最近一次错误消息，空字符串表示无错误
    pub error: String,
}

/// 状态转换动作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// 网络操作开始：置忙并清除错误
    RequestStarted,
    /// 网络操作结束（无论成败）
    RequestFinished,
    ListLoaded(Vec<Product>),
    /// 操作失败，携带展示给用户的消息
    Failed(String),
    ClearError,
    FieldChanged(DraftField, String),
    Edit(Product),
    Cancel,
    /// 提交成功：草稿复位并退出编辑模式
    Submitted,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.mode == FormMode::Editing
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::RequestStarted => {
                self.busy = true;
                self.error.clear();
            }
            Action::RequestFinished => self.busy = false,
            Action::ListLoaded(products) => {
                self.products = products;
                self.error.clear();
            }
            Action::Failed(message) => self.error = message,
            Action::ClearError => self.error.clear(),
            Action::FieldChanged(field, value) => self.draft.set(field, value),
            Action::Edit(product) => {
                self.draft = Draft::from_product(&product);
                self.mode = FormMode::Editing;
                self.error.clear();
            }
            Action::Cancel => {
                self.reset_form();
                self.error.clear();
            }
            Action::Submitted => self.reset_form(),
        }
    }

    /// 按顺序应用多个动作后的新状态
    pub fn reduce(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        for action in actions {
            self.apply(action);
        }
        self
    }

    fn reset_form(&mut self) {
        self.draft = Draft::default();
        self.mode = FormMode::Creating;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::ProductId;

    fn pen() -> Product {
        Product {
            id: Some(ProductId::Number(1)),
            name: Some("Pen".to_string()),
            price: Some(1.5),
            quantity: Some(10),
            description: None,
        }
    }

    #[test]
    fn test_request_lifecycle() {
        let state = ViewState {
            error: "old".to_string(),
            ..ViewState::new()
        };

        let state = state.reduce([Action::RequestStarted]);
        assert!(state.busy);
        assert!(!state.has_error());

        let state = state.reduce([Action::Failed("boom".to_string()), Action::RequestFinished]);
        assert!(!state.busy);
        assert_eq!(state.error, "boom");
    }

    #[test]
    fn test_list_replaced_wholesale() {
        let state = ViewState::new().reduce([
            Action::ListLoaded(vec![pen(), pen()]),
            Action::ListLoaded(vec![pen()]),
        ]);
        assert_eq!(state.products.len(), 1);
    }

    #[test]
    fn test_failure_keeps_list() {
        let state = ViewState::new().reduce([
            Action::ListLoaded(vec![pen()]),
            Action::RequestStarted,
            Action::Failed("Could not load products".to_string()),
        ]);
        assert_eq!(state.products, vec![pen()]);
    }

    #[test]
    fn test_edit_then_cancel() {
        let state = ViewState::new().reduce([Action::Failed("x".to_string()), Action::Edit(pen())]);
        assert!(state.is_editing());
        assert_eq!(state.draft.name, "Pen");
        assert_eq!(state.draft.price, "1.5");
        assert!(!state.has_error());

        let state = state.reduce([Action::Failed("y".to_string()), Action::Cancel]);
        assert_eq!(state.mode, FormMode::Creating);
        assert_eq!(state.draft, Draft::default());
        assert!(!state.has_error());
    }

    #[test]
    fn test_submitted_resets_form() {
        let state = ViewState::new().reduce([
            Action::Edit(pen()),
            Action::FieldChanged(DraftField::Name, "Marker".to_string()),
        ]);
        assert_eq!(state.draft.name, "Marker");

        let state = state.reduce([Action::Submitted]);
        assert!(!state.is_editing());
        assert_eq!(state.draft, Draft::default());
    }
}
