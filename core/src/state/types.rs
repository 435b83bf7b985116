//! 会话状态类型定义

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::replay::RenderedLine;
use crate::simulation::FinalScores;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// 空闲，可以开始新的运行
    Idle,
    /// 请求已发出，等待模拟服务返回
    Requesting,
    /// 正在按节奏回放事件日志
    Replaying,
    /// 请求失败（短暂状态，随后回到 Idle）
    Failed,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::Idle => "idle",
            SessionPhase::Requesting => "requesting",
            SessionPhase::Replaying => "replaying",
            SessionPhase::Failed => "failed",
        }
    }
}

/// 玩家占位（按 final_scores 的条目生成）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSlot {
    /// 1-based 序号
    pub slot: usize,
    /// `final_scores` 中的玩家名
    pub name: String,
}

impl PlayerSlot {
    pub fn label(&self) -> String {
        format!("AI Player {}", self.slot)
    }
}

/// 界面状态：日志、牌桌、玩家列表、最终得分、计时与开始按钮
#[derive(Debug, Clone, PartialEq)]
pub struct Panels {
    pub log: Vec<RenderedLine>,
    pub table: Vec<String>,
    pub players: Vec<PlayerSlot>,
    pub final_scores: Option<FinalScores>,
    /// 请求阶段的已用秒数；None 表示不显示
    pub elapsed_secs: Option<u64>,
    pub start_enabled: bool,
}

impl Default for Panels {
    fn default() -> Self {
        Self {
            log: Vec::new(),
            table: Vec::new(),
            players: Vec::new(),
            final_scores: None,
            elapsed_secs: None,
            start_enabled: true,
        }
    }
}

impl Panels {
    /// 清空上一次运行留下的内容
    pub fn clear_run(&mut self) {
        self.log.clear();
        self.table.clear();
        self.players.clear();
        self.final_scores = None;
        self.elapsed_secs = None;
    }
}

/// 状态事件
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// 阶段变更
    PhaseChanged {
        run_id: String,
        from: SessionPhase,
        to: SessionPhase,
        timestamp: DateTime<Utc>,
    },
    /// 计时刷新
    Elapsed { run_id: String, secs: u64 },
    /// 玩家占位已生成
    PlayersAnnounced {
        run_id: String,
        players: Vec<PlayerSlot>,
    },
    /// 日志新增一行
    Line {
        run_id: String,
        /// 对应事件在日志中的位置；错误行为 None
        index: Option<usize>,
        line: RenderedLine,
    },
    /// 牌桌被整体替换
    TableChanged { run_id: String, cards: Vec<String> },
    /// 回放完成
    Completed {
        run_id: String,
        scores: FinalScores,
        duration_ms: u64,
    },
    /// 运行失败
    Failed { run_id: String, error: String },
    /// 运行被取消
    Cancelled { run_id: String },
}

impl SessionEvent {
    pub fn run_id(&self) -> &str {
        match self {
            Self::PhaseChanged { run_id, .. }
            | Self::Elapsed { run_id, .. }
            | Self::PlayersAnnounced { run_id, .. }
            | Self::Line { run_id, .. }
            | Self::TableChanged { run_id, .. }
            | Self::Completed { run_id, .. }
            | Self::Failed { run_id, .. }
            | Self::Cancelled { run_id } => run_id,
        }
    }

    /// 运行是否已经结束（完成、失败或取消）
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::Cancelled { .. }
        )
    }
}
