//! 单次运行的会话记录

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// 单次运行：开始时创建，完成、失败或取消时销毁
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSession {
    pub run_id: String,
    pub is_running: bool,
    pub started_at: DateTime<Utc>,
    /// 已回放的事件数（下一个待回放事件的下标）
    pub cursor: usize,
}

impl RunSession {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            is_running: true,
            started_at: Utc::now(),
            cursor: 0,
        }
    }

    /// 推进游标；游标只会前进
    pub fn advance_to(&mut self, cursor: usize) {
        self.cursor = self.cursor.max(cursor);
    }

    /// 运行持续时间（毫秒）
    pub fn duration_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::new()
    }
}
