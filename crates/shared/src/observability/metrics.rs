//! 埋点指标
//!
//! 基于 metrics crate 记录埋点的发送与跳过次数。
//! 本模块不安装 exporter，宿主进程决定指标导出方式；未安装 recorder 时记录为空操作。

/// 已发送事件计数，标签 schema
pub const EVENTS_EMITTED_TOTAL: &str = "echo_events_emitted_total";

/// 因 schema 未启用而跳过的调用计数，标签 schema
pub const EVENTS_SKIPPED_TOTAL: &str = "echo_events_skipped_total";

/// 注册埋点指标描述
///
/// 这些描述会出现在导出端的 HELP 注释中。
pub fn register_event_metrics() {
    metrics::describe_counter!(
        EVENTS_EMITTED_TOTAL,
        "Total number of analytics events handed to the transport"
    );
    metrics::describe_counter!(
        EVENTS_SKIPPED_TOTAL,
        "Total number of emit calls skipped because the schema is disabled"
    );
}

/// 记录一次发送
pub fn record_emitted(schema: &'static str) {
    metrics::counter!(EVENTS_EMITTED_TOTAL, "schema" => schema).increment(1);
}

/// 记录一次跳过
pub fn record_skipped(schema: &'static str) {
    metrics::counter!(EVENTS_SKIPPED_TOTAL, "schema" => schema).increment(1);
}
