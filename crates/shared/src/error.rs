//! 统一错误处理模块
//!
//! 定义共享层的错误类型，使用 thiserror 提供良好的错误信息。
//! 埋点发送路径本身不产生错误，这里只覆盖配置加载等启动阶段的失败。

use thiserror::Error;

/// 共享层错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("无效的配置项: {field} - {message}")]
    InvalidConfig { field: String, message: String },

    #[error("可观测性初始化失败: {0}")]
    Observability(String),
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, SharedError>;

impl SharedError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::Observability(_) => "OBSERVABILITY_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = SharedError::InvalidConfig {
            field: "event_logging.version".to_string(),
            message: "不能为空".to_string(),
        };
        assert_eq!(err.code(), "INVALID_CONFIG");
        assert_eq!(
            err.to_string(),
            "无效的配置项: event_logging.version - 不能为空"
        );
    }

    #[test]
    fn test_config_error_conversion() {
        let err: SharedError = config::ConfigError::NotFound("event_logging".to_string()).into();
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.to_string().starts_with("配置加载失败"));
    }
}
