//! # 会话状态模块
//!
//! 负责单次模拟运行的生命周期：提交请求、处理结果、按节奏回放事件日志。
//!
//! ## 设计原则
//!
//! 1. **显式状态机**：Idle → Requesting → Replaying → Idle，失败经 Failed 回到 Idle
//! 2. **单一运行**：非 Idle 时的 start 为空操作
//! 3. **事件驱动**：状态变更通过广播通道通知界面
//! 4. **显式取消**：离开所属阶段时停止计时器与回放，旧任务不会改写新运行的状态

pub mod controller;
pub mod session;
pub mod transitions;
pub mod types;

pub use controller::{RunHandle, RunOutcome, SessionController};
pub use session::RunSession;
pub use transitions::{PhaseTransition, TransitionError};
pub use types::{Panels, PlayerSlot, SessionEvent, SessionPhase};
