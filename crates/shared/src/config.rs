//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。
//! 配置在进程启动时加载一次，此后只读。

use config::{Config, Environment, File};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::error::{Result, SharedError};

/// 单个埋点 schema 的开关与修订号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSettings {
    pub enabled: bool,
    pub revision: u64,
}

/// 配置源中的原始 schema 条目，字段可能分散在多个同名（大小写不同）的键下
#[derive(Debug, Default, Deserialize)]
struct RawSchemaSettings {
    enabled: Option<bool>,
    revision: Option<u64>,
}

/// 埋点配置
///
/// `schemas` 以 schema 名称为键。未出现在表中的 schema 视为禁用。
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EventLoggingConfig {
    /// 全局版本号，写入每条事件的 `version` 字段
    pub version: String,
    #[serde(deserialize_with = "deserialize_schemas")]
    pub schemas: HashMap<String, SchemaSettings>,
}

/// 合并只有大小写不同的 schema 条目
///
/// config crate 会把环境变量的键转为小写，而文件中的键保留原样，
/// 同一个 schema 因此可能出现在两个键下。合并规则：
/// - 同组内先应用保留大小写的键（按字典序），再应用全小写的键，后者逐字段覆盖前者
/// - 合并后的键取第一个保留大小写的键
/// - 合并后仍没有 revision 的条目视为未配置并丢弃
fn deserialize_schemas<'de, D>(deserializer: D) -> std::result::Result<HashMap<String, SchemaSettings>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, RawSchemaSettings>::deserialize(deserializer)?;
    Ok(merge_schema_entries(raw))
}

fn merge_schema_entries(raw: HashMap<String, RawSchemaSettings>) -> HashMap<String, SchemaSettings> {
    let mut groups: HashMap<String, Vec<(String, RawSchemaSettings)>> = HashMap::new();
    for (name, settings) in raw {
        groups
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push((name, settings));
    }

    let mut merged = HashMap::new();
    for (lower, mut entries) in groups {
        // 全小写的键排在最后，其余按字典序
        entries.sort_by(|(a, _), (b, _)| {
            (a == &lower).cmp(&(b == &lower)).then_with(|| a.cmp(b))
        });

        let name = entries[0].0.clone();
        let mut enabled = None;
        let mut revision = None;
        for (_, settings) in entries {
            enabled = settings.enabled.or(enabled);
            revision = settings.revision.or(revision);
        }

        match revision {
            Some(revision) => {
                merged.insert(
                    name,
                    SchemaSettings {
                        enabled: enabled.unwrap_or(false),
                        revision,
                    },
                );
            }
            None => {
                warn!(schema = %name, "schema 未配置 revision，视为未配置");
            }
        }
    }
    merged
}

impl Default for EventLoggingConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            schemas: HashMap::new(),
        }
    }
}

/// 通知类型配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationTypeConfig {
    /// 通知分组（positive / negative / interactive / neutral 等）
    pub group: Option<String>,
}

/// 可观测性配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub log_level: String,
    /// 是否输出 JSON 格式日志，否则为人类可读格式
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub event_logging: EventLoggingConfig,
    /// 通知类型 -> 类型配置
    pub notifications: HashMap<String, NotificationTypeConfig>,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 环境由 `ECHO_ENV` 决定（默认 development），配置目录由 `CONFIG_DIR` 决定（默认 config）。
    pub fn load(service_name: &str) -> Result<Self> {
        let env = std::env::var("ECHO_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        Self::load_from(Path::new(&config_dir), &env, service_name)
    }

    /// 从指定目录加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. {dir}/default.toml（默认配置）
    /// 2. {dir}/{environment}.toml（环境特定配置）
    /// 3. {dir}/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（ECHO_ 前缀，层级用 `__` 分隔，如 ECHO_EVENT_LOGGING__VERSION -> event_logging.version）
    pub fn load_from(config_dir: &Path, env: &str, service_name: &str) -> Result<Self> {
        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", env))).required(false))
            .add_source(
                File::from(config_dir.join(format!("{}.toml", service_name))).required(false),
            )
            .add_source(
                Environment::with_prefix("ECHO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// 校验加载结果
    pub fn validate(&self) -> Result<()> {
        if self.event_logging.version.trim().is_empty() {
            return Err(SharedError::InvalidConfig {
                field: "event_logging.version".to_string(),
                message: "版本号不能为空".to_string(),
            });
        }
        Ok(())
    }

}
