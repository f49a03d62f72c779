//! 环境变量覆盖配置的集成测试
//!
//! 独立成一个测试二进制，避免修改进程环境变量时影响其它测试。

use std::fs;

use echo_shared::config::AppConfig;

#[test]
fn test_env_overrides_file_values() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        r#"
[event_logging]
version = "1.4"

[observability]
log_level = "info"
json_logs = false
"#,
    )
    .unwrap();

    // SAFETY: 本测试二进制只有这一个测试，不会有并发读写环境变量
    unsafe {
        std::env::set_var("ECHO_EVENT_LOGGING__VERSION", "2.1-beta");
        std::env::set_var("ECHO_OBSERVABILITY__JSON_LOGS", "true");
    }

    let config = AppConfig::load_from(dir.path(), "test", "echo-event-logging");

    unsafe {
        std::env::remove_var("ECHO_EVENT_LOGGING__VERSION");
        std::env::remove_var("ECHO_OBSERVABILITY__JSON_LOGS");
    }

    let config = config.unwrap();
    assert_eq!(config.event_logging.version, "2.1-beta");
    assert!(config.observability.json_logs);
    assert_eq!(config.observability.log_level, "info");
}
