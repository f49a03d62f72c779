//! 共享库
//!
//! 包含通知埋点相关 crate 共用的配置加载、错误处理、领域模型、可观测性初始化以及测试工具。

pub mod config;
pub mod error;
pub mod events;
pub mod observability;
pub mod test_utils;
