//! 埋点传输层错误类型
//!
//! 发送路径对调用方不可见：传输实现遇到这些错误时自行记录日志并丢弃事件。

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventLoggingError {
    #[error("埋点事件序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("埋点事件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

impl EventLoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}
