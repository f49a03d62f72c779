//! 统一可观测性模块
//!
//! 提供 logging 与埋点指标描述的统一初始化。
//! 宿主进程通过单一入口点配置可观测性，确保日志格式与指标命名一致。

pub mod metrics;
pub mod tracing;

use ::tracing::info;
use anyhow::Result;

pub use crate::config::ObservabilityConfig;

/// 可观测性资源守卫
///
/// 当 Guard 被 drop 时记录关闭日志，持有期间日志订阅器保持生效。
pub struct ObservabilityGuard {
    service_name: String,
}

impl Drop for ObservabilityGuard {
    fn drop(&mut self) {
        info!(service = %self.service_name, "Shutting down observability...");
    }
}

/// 统一初始化可观测性
///
/// 初始化顺序：
/// 1. Tracing（日志）
/// 2. 埋点指标描述
///
/// # Example
///
/// ```ignore
/// use echo_shared::config::AppConfig;
/// use echo_shared::observability;
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("echo-event-logging")?;
///     let _guard = observability::init(&config.service_name, &config.observability)?;
///
///     // 应用逻辑...
///
///     Ok(())
/// }
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<ObservabilityGuard> {
    tracing::init(config)?;
    metrics::register_event_metrics();

    info!(
        service = %service_name,
        log_level = %config.log_level,
        json_logs = config.json_logs,
        "Observability initialized"
    );

    Ok(ObservabilityGuard {
        service_name: service_name.to_string(),
    })
}
