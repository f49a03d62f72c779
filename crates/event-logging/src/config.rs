//! 埋点只读配置
//!
//! `SchemaConfig` 与 `NotificationTypeGroups` 在构造 `EventEmitter` 时注入，
//! 进程生命周期内不再修改。

use std::collections::HashMap;

use echo_shared::config::{AppConfig, EventLoggingConfig, NotificationTypeConfig, SchemaSettings};

use crate::schema::Schema;

/// 未配置分组的通知类型使用的分组
pub const NEUTRAL_GROUP: &str = "neutral";

// ---------------------------------------------------------------------------
// SchemaConfig
// ---------------------------------------------------------------------------

/// schema 开关、修订号与全局版本号
///
/// 查找规则：先按当前名称，再按历史名称，均不区分大小写。
/// 两者都没有配置时视为禁用（fail closed），不会退回任何默认修订号。
#[derive(Debug, Clone)]
pub struct SchemaConfig {
    version: String,
    /// 键统一为小写
    schemas: HashMap<String, SchemaSettings>,
}

impl SchemaConfig {
    pub fn new(
        version: impl Into<String>,
        schemas: impl IntoIterator<Item = (String, SchemaSettings)>,
    ) -> Self {
        // 大小写不同的重复键按原始键排序后依次写入，结果与输入顺序无关
        let mut entries: Vec<_> = schemas.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        Self {
            version: version.into(),
            schemas: entries
                .into_iter()
                .map(|(name, settings)| (name.to_ascii_lowercase(), settings))
                .collect(),
        }
    }

    pub fn from_config(config: &EventLoggingConfig) -> Self {
        Self::new(
            config.version.clone(),
            config
                .schemas
                .iter()
                .map(|(name, settings)| (name.clone(), settings.clone())),
        )
    }

    /// 全局版本号
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn settings(&self, schema: Schema) -> Option<&SchemaSettings> {
        self.schemas
            .get(&schema.name().to_ascii_lowercase())
            .or_else(|| self.schemas.get(&schema.legacy_name().to_ascii_lowercase()))
    }

    /// 未配置的 schema 返回 false
    pub fn is_enabled(&self, schema: Schema) -> bool {
        self.settings(schema).is_some_and(|s| s.enabled)
    }

    pub fn revision(&self, schema: Schema) -> Option<u64> {
        self.settings(schema).map(|s| s.revision)
    }
}

// ---------------------------------------------------------------------------
// NotificationTypeGroups
// ---------------------------------------------------------------------------

/// 通知类型 -> 分组
#[derive(Debug, Clone, Default)]
pub struct NotificationTypeGroups {
    groups: HashMap<String, String>,
}

impl NotificationTypeGroups {
    pub fn new(groups: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            groups: groups.into_iter().collect(),
        }
    }

    /// 只收录声明了分组的通知类型
    pub fn from_config(types: &HashMap<String, NotificationTypeConfig>) -> Self {
        Self::new(types.iter().filter_map(|(name, config)| {
            config
                .group
                .as_ref()
                .map(|group| (name.clone(), group.clone()))
        }))
    }

    /// 查询通知类型的分组，未配置时返回 [`NEUTRAL_GROUP`]
    pub fn group_for(&self, notification_type: &str) -> &str {
        self.groups
            .get(notification_type)
            .map(String::as_str)
            .unwrap_or(NEUTRAL_GROUP)
    }
}

/// 从应用配置构造两份只读配置
pub fn from_app_config(config: &AppConfig) -> (SchemaConfig, NotificationTypeGroups) {
    (
        SchemaConfig::from_config(&config.event_logging),
        NotificationTypeGroups::from_config(&config.notifications),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use echo_shared::test_utils::{
        disabled_event_logging_config, enabled_event_logging_config, test_notification_types,
    };

    fn settings(enabled: bool, revision: u64) -> SchemaSettings {
        SchemaSettings { enabled, revision }
    }

    #[test]
    fn test_missing_schema_fails_closed() {
        let config = SchemaConfig::new("1.0", Vec::new());
        for schema in Schema::ALL {
            assert!(!config.is_enabled(schema));
            assert_eq!(config.revision(schema), None);
        }
    }

    #[test]
    fn test_from_config() {
        let config = SchemaConfig::from_config(&enabled_event_logging_config());
        assert_eq!(config.version(), "test-1.0");
        assert!(config.is_enabled(Schema::NotificationDelivered));
        assert_eq!(config.revision(Schema::MailDelivery), Some(5467650));

        let config = SchemaConfig::from_config(&disabled_event_logging_config());
        assert!(!config.is_enabled(Schema::PreferenceUpdate));
        // 禁用的 schema 仍可查询修订号
        assert_eq!(config.revision(Schema::PreferenceUpdate), Some(5488876));
    }

    #[test]
    fn test_legacy_name_fallback() {
        let config = SchemaConfig::new("1.0", vec![("Echo".to_string(), settings(true, 7))]);
        assert!(config.is_enabled(Schema::NotificationDelivered));
        assert_eq!(config.revision(Schema::NotificationDelivered), Some(7));
    }

    #[test]
    fn test_canonical_name_wins_over_legacy() {
        let config = SchemaConfig::new(
            "1.0",
            vec![
                ("EchoMail".to_string(), settings(true, 1)),
                ("MailDelivery".to_string(), settings(false, 2)),
            ],
        );
        assert!(!config.is_enabled(Schema::MailDelivery));
        assert_eq!(config.revision(Schema::MailDelivery), Some(2));
    }

    #[test]
    fn test_case_variant_duplicates_resolve_deterministically() {
        for _ in 0..20 {
            let config = SchemaConfig::new(
                "1.0",
                HashMap::from([
                    ("NotificationDelivered".to_string(), settings(false, 5)),
                    ("notificationdelivered".to_string(), settings(true, 5)),
                ]),
            );
            assert!(config.is_enabled(Schema::NotificationDelivered));
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let config =
            SchemaConfig::new("1.0", vec![("preferenceupdate".to_string(), settings(true, 3))]);
        assert!(config.is_enabled(Schema::PreferenceUpdate));
    }

    #[test]
    fn test_group_lookup() {
        let groups = NotificationTypeGroups::from_config(&test_notification_types());
        assert_eq!(groups.group_for("edit-user-talk"), "interactive");
        assert_eq!(groups.group_for("reverted"), "negative");
        // 声明了类型但没有分组
        assert_eq!(groups.group_for("page-linked"), NEUTRAL_GROUP);
        assert_eq!(groups.group_for("no-such-type"), NEUTRAL_GROUP);
    }
}
