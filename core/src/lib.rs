//! escoba-core: 表单模型、请求分发、节奏回放与会话控制

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod form;
pub mod replay;
pub mod simulation;
pub mod state;
