//! 阶段转换规则和验证

use super::types::SessionPhase;
use thiserror::Error;

/// 阶段转换错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },
}

/// 阶段转换
pub struct PhaseTransition;

impl PhaseTransition {
    /// 验证阶段转换是否合法
    pub fn validate(from: SessionPhase, to: SessionPhase) -> Result<(), TransitionError> {
        let is_valid = match (from, to) {
            // 开始运行
            (SessionPhase::Idle, SessionPhase::Requesting) => true,

            // 请求成功，进入回放
            (SessionPhase::Requesting, SessionPhase::Replaying) => true,

            // 请求失败
            (SessionPhase::Requesting, SessionPhase::Failed) => true,

            // 失败后恢复
            (SessionPhase::Failed, SessionPhase::Idle) => true,

            // 回放完成，或请求/回放被取消
            (SessionPhase::Replaying, SessionPhase::Idle)
            | (SessionPhase::Requesting, SessionPhase::Idle) => true,

            // 其他转换都不合法
            _ => false,
        };

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    /// 该阶段是否禁止开始新的运行
    pub fn is_busy(phase: SessionPhase) -> bool {
        !matches!(phase, SessionPhase::Idle)
    }

    /// 获取阶段的可读描述
    pub fn phase_description(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Idle => "Ready",
            SessionPhase::Requesting => "Waiting for simulation",
            SessionPhase::Replaying => "Replaying game",
            SessionPhase::Failed => "Failed",
        }
    }
}
