//! 埋点负载
//!
//! 每个 schema 对应一个固定结构的负载，字段类型在构造时显式转换，
//! 序列化后的字段名与事件收集服务中注册的 schema 保持一致（camelCase）。

use serde::Serialize;
use serde_json::Value;

use echo_shared::events::{Agent, NotificationEvent, User};

use crate::error::EventLoggingError;

/// 无法确定发送者时使用的占位值
pub const UNKNOWN_SENDER: &str = "-1";

/// 邮件投递模式的默认值
pub const DEFAULT_EMAIL_DELIVERY_MODE: &str = "single";

// ---------------------------------------------------------------------------
// 类型转换
// ---------------------------------------------------------------------------

/// 将任意 JSON 值转换为字符串
///
/// - 字符串原样返回
/// - 数值使用十进制表示
/// - 布尔值 true 为 "1"，false 为空串
/// - null 为空串
/// - 数组与对象使用紧凑 JSON 文本
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// DeliveryMethod
// ---------------------------------------------------------------------------

/// 通知投递渠道
///
/// 只接受两个取值，调用方传入的其它字符串一律归为 `Web`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Web,
    Email,
}

impl DeliveryMethod {
    /// 仅精确匹配 "email" 时为 `Email`
    pub fn from_input(method: &str) -> Self {
        if method == "email" {
            Self::Email
        } else {
            Self::Web
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Email => "email",
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationDelivered
// ---------------------------------------------------------------------------

/// 通知投递事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDeliveredPayload {
    pub version: String,
    pub event_id: u64,
    pub notification_type: String,
    pub notification_group: String,
    pub sender: String,
    pub recipient_user_id: u64,
    pub recipient_edit_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_source: Option<String>,
    pub delivery_method: DeliveryMethod,
}

impl NotificationDeliveredPayload {
    pub fn new(
        version: &str,
        user: &User,
        event: &NotificationEvent,
        group: &str,
        delivery_method: &str,
    ) -> Self {
        Self {
            version: version.to_string(),
            event_id: event.id,
            notification_type: event.event_type.clone(),
            notification_group: group.to_string(),
            sender: resolve_sender(event),
            recipient_user_id: user.id,
            recipient_edit_count: user.edit_count,
            event_source: event.source().map(coerce_to_string),
            delivery_method: DeliveryMethod::from_input(delivery_method),
        }
    }
}

/// 确定通知的发送者
///
/// 系统通知和没有行为者的通知使用 [`UNKNOWN_SENDER`]；
/// 匿名行为者使用其名称，注册用户使用其数字 ID。
pub fn resolve_sender(event: &NotificationEvent) -> String {
    if event.is_system() {
        return UNKNOWN_SENDER.to_string();
    }

    match &event.agent {
        Some(Agent::Anonymous { name }) => name.clone(),
        Some(Agent::Registered { id, .. }) => id.to_string(),
        None => UNKNOWN_SENDER.to_string(),
    }
}

// ---------------------------------------------------------------------------
// MailDelivery
// ---------------------------------------------------------------------------

/// 通知邮件发送事件
///
/// `email_delivery_mode` 原样透传，不做取值校验。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MailDeliveryPayload {
    pub version: String,
    pub recipient_user_id: u64,
    pub email_delivery_mode: String,
}

impl MailDeliveryPayload {
    pub fn new(version: &str, user: &User, email_delivery_mode: &str) -> Self {
        Self {
            version: version.to_string(),
            recipient_user_id: user.id,
            email_delivery_mode: email_delivery_mode.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PreferenceUpdate
// ---------------------------------------------------------------------------

/// 单项偏好修改事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceUpdatePayload {
    pub version: String,
    pub user_id: u64,
    pub save_timestamp: String,
    pub property: String,
    pub value: String,
    pub is_default: bool,
}

impl PreferenceUpdatePayload {
    pub fn new(
        version: &str,
        user: &User,
        save_timestamp: String,
        property: &str,
        value: &Value,
        default: Option<&Value>,
    ) -> Self {
        let value = coerce_to_string(value);
        // 没有注册默认值时不可能是默认值
        let is_default = default.is_some_and(|d| coerce_to_string(d) == value);

        Self {
            version: version.to_string(),
            user_id: user.id,
            save_timestamp,
            property: property.to_string(),
            value,
            is_default,
        }
    }
}

// ---------------------------------------------------------------------------
// EventPayload
// ---------------------------------------------------------------------------

/// 交给传输层的负载，序列化时不带外层标签
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventPayload {
    NotificationDelivered(NotificationDeliveredPayload),
    MailDelivery(MailDeliveryPayload),
    PreferenceUpdate(PreferenceUpdatePayload),
}

impl EventPayload {
    /// 序列化为 JSON 对象
    pub fn to_json(&self) -> Result<Value, EventLoggingError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<NotificationDeliveredPayload> for EventPayload {
    fn from(payload: NotificationDeliveredPayload) -> Self {
        Self::NotificationDelivered(payload)
    }
}

impl From<MailDeliveryPayload> for EventPayload {
    fn from(payload: MailDeliveryPayload) -> Self {
        Self::MailDelivery(payload)
    }
}

impl From<PreferenceUpdatePayload> for EventPayload {
    fn from(payload: PreferenceUpdatePayload) -> Self {
        Self::PreferenceUpdate(payload)
    }
}
