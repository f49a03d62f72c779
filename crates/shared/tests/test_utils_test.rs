//! test_utils 模块的集成测试
//!
//! 验证测试工具模块的功能正确性

use echo_shared::events::{Agent, SYSTEM_CATEGORY};
use echo_shared::test_utils::*;
use serde_json::json;

// ==================== 测试配置测试 ====================

#[test]
fn test_disabled_config() {
    let config = disabled_event_logging_config();
    assert_eq!(config.version, TEST_VERSION);
    assert!(config.schemas.values().all(|s| !s.enabled));
}

#[test]
fn test_selective_config() {
    let config = event_logging_config_with(|name| name == "MailDelivery");
    assert!(config.schemas["MailDelivery"].enabled);
    assert!(!config.schemas["NotificationDelivered"].enabled);
    assert!(!config.schemas["PreferenceUpdate"].enabled);
}

#[test]
fn test_app_config_passes_validation() {
    let config = test_app_config();
    assert!(config.validate().is_ok());
    assert_eq!(
        config.notifications["edit-user-talk"].group.as_deref(),
        Some("interactive")
    );
    assert!(config.notifications["page-linked"].group.is_none());
}

// ==================== 测试数据生成器测试 ====================

#[test]
fn test_event_generation() {
    let event = TestDataGenerator::event(99, "edit-user-talk", 3);
    assert_eq!(event.id, 99);
    assert_eq!(event.event_type, "edit-user-talk");
    assert_eq!(event.agent, Some(Agent::registered(3, "User3")));
    assert!(event.extra.is_empty());
}

#[test]
fn test_anonymous_event_generation() {
    let event = TestDataGenerator::anonymous_event(1, "edit-user-talk", "203.0.113.5");
    let agent = event.agent.expect("应有行为者");
    assert!(agent.is_anon());
    assert_eq!(agent.name(), "203.0.113.5");
}

#[test]
fn test_system_event_generation() {
    let event = TestDataGenerator::system_event(5, None);
    assert_eq!(event.category, SYSTEM_CATEGORY);
    assert!(event.is_system());
}

#[test]
fn test_event_with_source_generation() {
    let event = TestDataGenerator::event_with_source(7, "edit-thank", json!("thanks"));
    assert_eq!(event.source(), Some(&json!("thanks")));
}

#[test]
fn test_preference_changes_keep_order() {
    let changes = TestDataGenerator::preference_changes(&[
        ("b", json!(1)),
        ("a", json!(2)),
        ("c", json!(3)),
    ]);
    let names: Vec<_> = changes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a", "c"]);
}

#[test]
fn test_user_with_options() {
    let user = TestDataGenerator::user_with_options(7, &[("echo-email-format", json!("plain-text"))]);
    assert_eq!(user.id, 7);
    assert_eq!(user.option("echo-email-format"), Some(&json!("plain-text")));
    assert!(!user.is_anon());
}
