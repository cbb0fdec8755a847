//! 配置管理
//!
//! 分层加载：`config.toml` → `config.{APP_ENV}.toml` → `EDUHUB_*` 环境变量 → 常用环境变量覆盖。
//! 配置在 `main` 中加载一次，之后以引用或 `Arc` 传给需要它的组件，没有全局实例。

mod r#impl;
mod structs;

pub use structs::*;
