//! 埋点发送器
//!
//! 每个 schema 一个入口：先检查 schema 是否启用，再组装负载，
//! 最后经由 [`EventEmitter::emit`] 交给传输层。未启用的 schema 静默跳过。
//! 发送器只持有只读配置和 `Arc` 包装的协作者，可在多个请求间共享。

use std::sync::Arc;

use echo_shared::config::AppConfig;
use echo_shared::events::{NotificationEvent, PreferenceChange, User};
use echo_shared::observability::metrics::{record_emitted, record_skipped};
use tracing::debug;

use crate::clock::{Clock, SystemClock, compact_timestamp};
use crate::config::{NotificationTypeGroups, SchemaConfig};
use crate::payload::{
    DEFAULT_EMAIL_DELIVERY_MODE, EventPayload, MailDeliveryPayload, NotificationDeliveredPayload,
    PreferenceUpdatePayload,
};
use crate::preferences::{DefaultPreferences, NoDefaults};
use crate::schema::Schema;
use crate::transport::EventTransport;

/// 通知埋点发送器，按 schema 开关组装负载并交给传输层
pub struct EventEmitter {
    schemas: SchemaConfig,
    groups: NotificationTypeGroups,
    transport: Arc<dyn EventTransport>,
    clock: Arc<dyn Clock>,
    defaults: Arc<dyn DefaultPreferences>,
}

impl EventEmitter {
    /// 使用系统时钟、且没有注册默认偏好值的发送器
    pub fn new(
        schemas: SchemaConfig,
        groups: NotificationTypeGroups,
        transport: Arc<dyn EventTransport>,
    ) -> Self {
        Self {
            schemas,
            groups,
            transport,
            clock: Arc::new(SystemClock),
            defaults: Arc::new(NoDefaults),
        }
    }

    pub fn from_app_config(config: &AppConfig, transport: Arc<dyn EventTransport>) -> Self {
        let (schemas, groups) = crate::config::from_app_config(config);
        Self::new(schemas, groups, transport)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_default_preferences(mut self, defaults: Arc<dyn DefaultPreferences>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn schemas(&self) -> &SchemaConfig {
        &self.schemas
    }

    /// 记录一次通知投递
    ///
    /// `delivery_method` 只有精确等于 "email" 时记为 email，其余一律记为 web。
    pub fn emit_notification_delivered(
        &self,
        user: &User,
        event: &NotificationEvent,
        delivery_method: &str,
    ) {
        if !self.is_enabled(Schema::NotificationDelivered) {
            return;
        }

        let group = self.groups.group_for(&event.event_type);
        let payload = NotificationDeliveredPayload::new(
            self.schemas.version(),
            user,
            event,
            group,
            delivery_method,
        );

        self.emit(Schema::NotificationDelivered, payload.into());
    }

    /// 记录一次通知邮件发送，投递模式原样透传
    pub fn emit_mail_delivery(&self, user: &User, email_delivery_mode: &str) {
        if !self.is_enabled(Schema::MailDelivery) {
            return;
        }

        let payload = MailDeliveryPayload::new(self.schemas.version(), user, email_delivery_mode);
        self.emit(Schema::MailDelivery, payload.into());
    }

    /// 以默认投递模式 "single" 记录邮件发送
    pub fn emit_mail_delivery_default(&self, user: &User) {
        self.emit_mail_delivery(user, DEFAULT_EMAIL_DELIVERY_MODE);
    }

    /// 记录一次偏好保存
    ///
    /// 每个偏好项单独发送一条事件，顺序与输入一致；每条事件各自读取一次时钟。
    pub fn emit_preference_update(&self, user: &User, changes: &[PreferenceChange]) {
        if !self.is_enabled(Schema::PreferenceUpdate) {
            return;
        }

        for change in changes {
            let default = self.defaults.default_option(&change.name);
            let payload = PreferenceUpdatePayload::new(
                self.schemas.version(),
                user,
                compact_timestamp(&self.clock.now()),
                &change.name,
                &change.value,
                default.as_ref(),
            );

            self.emit(Schema::PreferenceUpdate, payload.into());
        }
    }

    /// 按 schema 的配置修订号将负载交给传输层
    ///
    /// 所有入口都经由此处发送。schema 未配置时不发送。
    pub fn emit(&self, schema: Schema, payload: EventPayload) {
        let Some(revision) = self.schemas.revision(schema) else {
            debug!(schema = schema.name(), "schema 未配置修订号，跳过发送");
            record_skipped(schema.name());
            return;
        };

        debug!(schema = schema.name(), revision, "发送埋点事件");
        self.transport.send(schema.name(), revision, &payload);
        record_emitted(schema.name());
    }

    fn is_enabled(&self, schema: Schema) -> bool {
        let enabled = self.schemas.is_enabled(schema);
        if !enabled {
            debug!(schema = schema.name(), "schema 未启用，跳过埋点");
            record_skipped(schema.name());
        }
        enabled
    }
}
