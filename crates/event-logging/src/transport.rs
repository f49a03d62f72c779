//! 埋点传输层
//!
//! 通过 `EventTransport` trait 抽象事件发往收集服务的方式。对埋点模块而言发送是
//! fire-and-forget：trait 不返回结果，序列化或写入失败由各实现自行记录并丢弃，
//! 埋点模块本身不重试。

use std::io::Write;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::EventLoggingError;
use crate::payload::EventPayload;

/// 传输层 trait，所有埋点最终经由此处离开进程
#[cfg_attr(test, mockall::automock)]
pub trait EventTransport: Send + Sync {
    /// 发送一条事件
    fn send(&self, schema: &str, revision: u64, payload: &EventPayload);
}

// ---------------------------------------------------------------------------
// 日志传输
// ---------------------------------------------------------------------------

/// 以结构化日志输出事件
///
/// 适合开发环境或由日志采集管道转发到收集服务的部署方式
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransport;

impl EventTransport for TracingTransport {
    fn send(&self, schema: &str, revision: u64, payload: &EventPayload) {
        match payload.to_json() {
            Ok(event) => {
                info!(schema, revision, event = %event, "埋点事件已发送");
            }
            Err(e) => {
                error!(schema, revision, error = %e, "埋点事件序列化失败，事件已丢弃");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// JSON Lines 传输
// ---------------------------------------------------------------------------

/// 写入收集服务的事件信封
#[derive(Debug, Serialize)]
pub struct EventEnvelope<'a> {
    /// 每条事件唯一，供收集端去重
    pub uuid: Uuid,
    pub schema: &'a str,
    pub revision: u64,
    pub dt: DateTime<Utc>,
    pub event: &'a EventPayload,
}

impl<'a> EventEnvelope<'a> {
    pub fn new(schema: &'a str, revision: u64, event: &'a EventPayload) -> Self {
        Self {
            uuid: Uuid::now_v7(),
            schema,
            revision,
            dt: Utc::now(),
            event,
        }
    }

    /// 编码为一行 JSON（以换行结尾）
    pub fn encode(&self) -> Result<Vec<u8>, EventLoggingError> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

/// 将事件信封按行写入任意 `Write`（文件、管道、socket）
pub struct JsonLinesTransport<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_event(
        &self,
        schema: &str,
        revision: u64,
        payload: &EventPayload,
    ) -> Result<(), EventLoggingError> {
        let line = EventEnvelope::new(schema, revision, payload).encode()?;

        let mut writer = self.writer.lock();
        writer.write_all(&line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> EventTransport for JsonLinesTransport<W> {
    fn send(&self, schema: &str, revision: u64, payload: &EventPayload) {
        if let Err(e) = self.write_event(schema, revision, payload) {
            error!(
                schema,
                revision,
                error = %e,
                code = e.code(),
                "写入埋点事件失败，事件已丢弃"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// 内存记录传输
// ---------------------------------------------------------------------------

/// 一条被记录的发送调用
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub schema: String,
    pub revision: u64,
    pub payload: EventPayload,
}

/// 将发送调用按顺序记录在内存中
///
/// 用于测试和 dry-run，不与任何外部服务交互
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录事件的快照
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl EventTransport for RecordingTransport {
    fn send(&self, schema: &str, revision: u64, payload: &EventPayload) {
        self.events.lock().push(RecordedEvent {
            schema: schema.to_string(),
            revision,
            payload: payload.clone(),
        });
    }
}

// ---------------------------------------------------------------------------
// 测试
// ---------------------------------------------------------------------------
