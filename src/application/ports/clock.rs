//! Clock Port - 时间来源

use chrono::NaiveDateTime;

/// 当前本地时间来源，测试中可替换为固定时钟
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
