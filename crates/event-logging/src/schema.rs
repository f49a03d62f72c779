//! 埋点 schema 定义

use std::fmt;

/// 事件收集服务中注册的埋点 schema
///
/// 每个 schema 有一个当前名称和一个历史名称，配置中两者均可使用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schema {
    /// 通知投递到用户（站内或邮件）
    NotificationDelivered,
    /// 通知邮件发送
    MailDelivery,
    /// 用户修改通知偏好
    PreferenceUpdate,
}

impl Schema {
    pub const ALL: [Schema; 3] = [
        Schema::NotificationDelivered,
        Schema::MailDelivery,
        Schema::PreferenceUpdate,
    ];

    /// 发往收集服务时使用的名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotificationDelivered => "NotificationDelivered",
            Self::MailDelivery => "MailDelivery",
            Self::PreferenceUpdate => "PreferenceUpdate",
        }
    }

    pub fn legacy_name(&self) -> &'static str {
        match self {
            Self::NotificationDelivered => "Echo",
            Self::MailDelivery => "EchoMail",
            Self::PreferenceUpdate => "EchoPrefUpdate",
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
