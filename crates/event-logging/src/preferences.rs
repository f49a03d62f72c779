//! 默认偏好值查询

use std::collections::HashMap;

use serde_json::Value;

/// 按偏好名称查询站点注册的默认值
pub trait DefaultPreferences: Send + Sync {
    fn default_option(&self, name: &str) -> Option<Value>;
}

impl DefaultPreferences for HashMap<String, Value> {
    fn default_option(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// 没有任何注册默认值
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDefaults;

impl DefaultPreferences for NoDefaults {
    fn default_option(&self, _name: &str) -> Option<Value> {
        None
    }
}
