//! 时钟抽象
//!
//! 偏好修改事件需要保存时间戳，通过 `Clock` 注入以便测试固定时间。

use std::sync::atomic::{AtomicI32, Ordering};

use chrono::{DateTime, Duration, Utc};

/// 时钟 trait
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// 系统时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 始终返回同一时刻的时钟
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// 每次读取前进固定步长的时钟
///
/// 第 n 次读取（从 0 开始）返回 `start + step * n`。
#[derive(Debug)]
pub struct SequenceClock {
    start: DateTime<Utc>,
    step: Duration,
    ticks: AtomicI32,
}

impl SequenceClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            start,
            step,
            ticks: AtomicI32::new(0),
        }
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + self.step * tick
    }
}

/// 14 位 UTC 时间戳，格式 `YYYYMMDDHHMMSS`
pub fn compact_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S").to_string()
}
