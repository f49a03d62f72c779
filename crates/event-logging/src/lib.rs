//! 通知埋点
//!
//! 将通知投递、邮件发送和偏好修改组装为结构化埋点事件，交给传输层发往事件收集服务。
//! 每个 schema 由配置开关控制，未启用时调用为静默空操作。

pub mod clock;
pub mod config;
pub mod emitter;
pub mod error;
pub mod payload;
pub mod preferences;
pub mod schema;
pub mod transport;

pub use emitter::EventEmitter;
pub use error::EventLoggingError;
pub use payload::EventPayload;
pub use schema::Schema;
pub use transport::EventTransport;
