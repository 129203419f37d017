//! 产品 CRUD：模型、列表形状识别、状态容器、组件与渲染

pub mod handler;
pub mod model;
pub mod normalize;
pub mod service;
pub mod state;
pub mod view;

pub use model::{Draft, DraftField, FormMode, Product, ProductId, ProductPayload};
pub use normalize::{normalize, ListShape};
pub use service::{ProductCrud, DELETE_PROMPT};
pub use state::{Action, ViewState};
