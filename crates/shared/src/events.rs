//! 通知领域模型
//!
//! 埋点模块只读取这些上游实体，不创建也不修改它们。
//! 字段保持与通知子系统一致，埋点负载的组装逻辑在 `echo-event-logging` 中。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 系统类通知的分类键
pub const SYSTEM_CATEGORY: &str = "system";

// ---------------------------------------------------------------------------
// Agent — 触发通知的行为者
// ---------------------------------------------------------------------------

/// 触发通知的行为者
///
/// 匿名行为者没有数字 ID，只有名称（通常是 IP 地址）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Agent {
    Registered { id: u64, name: String },
    Anonymous { name: String },
}

impl Agent {
    pub fn registered(id: u64, name: impl Into<String>) -> Self {
        Self::Registered {
            id,
            name: name.into(),
        }
    }

    pub fn anonymous(name: impl Into<String>) -> Self {
        Self::Anonymous { name: name.into() }
    }

    pub fn is_anon(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Registered { name, .. } | Self::Anonymous { name } => name,
        }
    }

    /// 匿名行为者返回 0
    pub fn id(&self) -> u64 {
        match self {
            Self::Registered { id, .. } => *id,
            Self::Anonymous { .. } => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationEvent — 通知事件
// ---------------------------------------------------------------------------

/// 通知事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub id: u64,
    /// 通知类型键，如 "edit-user-talk"
    #[serde(rename = "type")]
    pub event_type: String,
    pub category: String,
    pub agent: Option<Agent>,
    /// 附加属性，Thanks 等扩展会写入 "source"
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl NotificationEvent {
    pub fn is_system(&self) -> bool {
        self.category == SYSTEM_CATEGORY
    }

    pub fn source(&self) -> Option<&Value> {
        self.extra.get("source")
    }
}

// ---------------------------------------------------------------------------
// User — 被通知的用户
// ---------------------------------------------------------------------------

/// 被通知的用户
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub edit_count: u64,
    pub anonymous: bool,
    /// 用户自己设置的偏好值
    #[serde(default)]
    pub options: HashMap<String, Value>,
}

impl User {
    pub fn new(id: u64, edit_count: u64) -> Self {
        Self {
            id,
            edit_count,
            ..Default::default()
        }
    }

    pub fn is_anon(&self) -> bool {
        self.anonymous
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }
}

// ---------------------------------------------------------------------------
// PreferenceChange — 一次偏好修改
// ---------------------------------------------------------------------------

/// 单个偏好项的修改，一次保存操作提交一批有序的修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceChange {
    pub name: String,
    pub value: Value,
}

impl PreferenceChange {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<String>, V: Into<Value>> From<(N, V)> for PreferenceChange {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

// ---------------------------------------------------------------------------
// 单元测试
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_accessors() {
        let registered = Agent::registered(42, "Alice");
        assert!(!registered.is_anon());
        assert_eq!(registered.id(), 42);
        assert_eq!(registered.name(), "Alice");

        let anon = Agent::anonymous("203.0.113.5");
        assert!(anon.is_anon());
        assert_eq!(anon.id(), 0);
        assert_eq!(anon.name(), "203.0.113.5");
    }

    #[test]
    fn test_notification_event_deserialize() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "id": 99,
            "type": "edit-user-talk",
            "category": "edit-user-talk",
            "agent": { "kind": "registered", "id": 3, "name": "Bob" },
            "extra": { "source": "thanks" }
        }))
        .unwrap();

        assert_eq!(event.event_type, "edit-user-talk");
        assert!(!event.is_system());
        assert_eq!(event.agent, Some(Agent::registered(3, "Bob")));
        assert_eq!(event.source(), Some(&json!("thanks")));
    }

    #[test]
    fn test_notification_event_without_extra() {
        let event: NotificationEvent = serde_json::from_value(json!({
            "id": 1,
            "type": "welcome",
            "category": "system",
            "agent": null
        }))
        .unwrap();

        assert!(event.is_system());
        assert!(event.extra.is_empty());
        assert!(event.source().is_none());
    }

    #[test]
    fn test_preference_change_from_tuple() {
        let change: PreferenceChange = ("echo-email-frequency", 1).into();
        assert_eq!(change.name, "echo-email-frequency");
        assert_eq!(change.value, json!(1));
    }
}
