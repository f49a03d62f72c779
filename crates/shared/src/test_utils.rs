//! 测试工具模块
//!
//! 提供单元测试与集成测试所需的配置构造器和测试数据生成器，
//! 用于简化测试代码编写，提高测试的可重复性。

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use parking_lot::Mutex;

use serde_json::{Map, Value, json};

use crate::config::{AppConfig, EventLoggingConfig, NotificationTypeConfig, SchemaSettings};
use crate::events::{Agent, NotificationEvent, PreferenceChange, User};

/// 测试配置中使用的版本号
pub const TEST_VERSION: &str = "test-1.0";

/// 测试用的 schema 名称与修订号
pub const TEST_SCHEMAS: [(&str, u64); 3] = [
    ("NotificationDelivered", 5423520),
    ("MailDelivery", 5467650),
    ("PreferenceUpdate", 5488876),
];

// ==================== 测试配置辅助 ====================

/// 所有 schema 均启用的埋点配置
pub fn enabled_event_logging_config() -> EventLoggingConfig {
    event_logging_config_with(|_| true)
}

/// 所有 schema 均禁用的埋点配置
pub fn disabled_event_logging_config() -> EventLoggingConfig {
    event_logging_config_with(|_| false)
}

/// 按 schema 名称决定开关的埋点配置
pub fn event_logging_config_with(enabled: impl Fn(&str) -> bool) -> EventLoggingConfig {
    let schemas = TEST_SCHEMAS
        .iter()
        .map(|(name, revision)| {
            (
                name.to_string(),
                SchemaSettings {
                    enabled: enabled(name),
                    revision: *revision,
                },
            )
        })
        .collect();

    EventLoggingConfig {
        version: TEST_VERSION.to_string(),
        schemas,
    }
}

/// 测试用的通知类型分组表
pub fn test_notification_types() -> HashMap<String, NotificationTypeConfig> {
    [
        ("edit-user-talk", Some("interactive")),
        ("reverted", Some("negative")),
        ("welcome", Some("positive")),
        // 声明了类型但没有分组
        ("page-linked", None),
    ]
    .into_iter()
    .map(|(name, group)| {
        (
            name.to_string(),
            NotificationTypeConfig {
                group: group.map(str::to_string),
            },
        )
    })
    .collect()
}

/// 所有 schema 均启用的完整应用配置
pub fn test_app_config() -> AppConfig {
    AppConfig {
        service_name: "echo-event-logging-test".to_string(),
        environment: "test".to_string(),
        event_logging: enabled_event_logging_config(),
        notifications: test_notification_types(),
        ..Default::default()
    }
}

// ==================== 指标记录器 ====================

/// 只统计 counter 的指标记录器
///
/// 配合 `metrics::with_local_recorder` 在单个测试内捕获指标，gauge 与 histogram 被忽略。
#[derive(Debug, Default)]
pub struct CountingRecorder {
    counters: Mutex<HashMap<String, Arc<AtomicU64>>>,
}

impl CountingRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取带 schema 标签的 counter，未注册时为 0
    pub fn counter(&self, name: &str, schema: &str) -> u64 {
        self.counters
            .lock()
            .get(&format!("{name}{{schema={schema}}}"))
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    fn key_string(key: &Key) -> String {
        let labels: Vec<String> = key
            .labels()
            .map(|label| format!("{}={}", label.key(), label.value()))
            .collect();
        format!("{}{{{}}}", key.name(), labels.join(","))
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_gauge(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn describe_histogram(&self, _key: KeyName, _unit: Option<Unit>, _description: SharedString) {}

    fn register_counter(&self, key: &Key, _metadata: &Metadata<'_>) -> Counter {
        let counter = self
            .counters
            .lock()
            .entry(Self::key_string(key))
            .or_default()
            .clone();
        Counter::from_arc(counter)
    }

    fn register_gauge(&self, _key: &Key, _metadata: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _key: &Key, _metadata: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}

// ==================== 测试数据生成器 ====================

/// 测试数据生成器
///
/// 生成符合通知子系统结构的测试实体
pub struct TestDataGenerator;

impl TestDataGenerator {
    /// 注册用户
    pub fn user(id: u64, edit_count: u64) -> User {
        User::new(id, edit_count)
    }

    /// 带个人偏好的注册用户
    pub fn user_with_options(id: u64, options: &[(&str, Value)]) -> User {
        User {
            options: options
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            ..User::new(id, 0)
        }
    }

    /// 由注册用户触发的通知
    pub fn event(id: u64, event_type: &str, agent_id: u64) -> NotificationEvent {
        NotificationEvent {
            id,
            event_type: event_type.to_string(),
            category: event_type.to_string(),
            agent: Some(Agent::registered(agent_id, format!("User{agent_id}"))),
            extra: Map::new(),
        }
    }

    /// 由匿名用户触发的通知
    pub fn anonymous_event(id: u64, event_type: &str, ip: &str) -> NotificationEvent {
        NotificationEvent {
            agent: Some(Agent::anonymous(ip)),
            ..Self::event(id, event_type, 0)
        }
    }

    /// 系统通知，可携带行为者
    pub fn system_event(id: u64, agent: Option<Agent>) -> NotificationEvent {
        NotificationEvent {
            id,
            event_type: "welcome".to_string(),
            category: crate::events::SYSTEM_CATEGORY.to_string(),
            agent,
            extra: Map::new(),
        }
    }

    /// 没有行为者的通知
    pub fn agentless_event(id: u64, event_type: &str) -> NotificationEvent {
        NotificationEvent {
            agent: None,
            ..Self::event(id, event_type, 0)
        }
    }

    /// 带 source 附加属性的通知（Thanks 扩展）
    pub fn event_with_source(id: u64, event_type: &str, source: Value) -> NotificationEvent {
        let mut event = Self::event(id, event_type, 1);
        event.extra.insert("source".to_string(), source);
        event
    }

    /// 一批偏好修改
    pub fn preference_changes(pairs: &[(&str, Value)]) -> Vec<PreferenceChange> {
        pairs
            .iter()
            .map(|(name, value)| PreferenceChange::new(*name, value.clone()))
            .collect()
    }

    /// 测试用的默认偏好表
    pub fn default_preferences() -> HashMap<String, Value> {
        HashMap::from([
            ("echo-email-frequency".to_string(), json!(0)),
            ("echo-email-format".to_string(), json!("html")),
            ("echo-notify-show-link".to_string(), json!(true)),
        ])
    }
}
