//! 会话控制器

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::session::RunSession;
use super::transitions::PhaseTransition;
use super::types::{Panels, PlayerSlot, SessionEvent, SessionPhase};
use crate::backend::SimulationBackend;
use crate::config::ReplayConfig;
use crate::dispatch::Dispatcher;
use crate::error::DispatchError;
use crate::replay::{CancelToken, RenderedLine, ReplayObserver, ReplayOutcome, ReplayStep, Replayer};
use crate::simulation::{FinalScores, RunConfiguration, SimulationResult};

/// 运行结果
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed { events: usize },
    Failed(DispatchError),
    Cancelled,
    /// The run task panicked; carries the join error text.
    Crashed(String),
}

/// 运行句柄：可等待运行任务结束
#[derive(Debug)]
pub struct RunHandle {
    pub run_id: String,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// 等待运行结束
    pub async fn wait(self) -> RunOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    target: "escoba.session",
                    stage = "session.task.join_failed",
                    run_id = %self.run_id,
                    error = %e
                );
                RunOutcome::Crashed(e.to_string())
            }
        }
    }
}

/// 会话控制器
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<ControllerInner>,
}

struct ControllerInner {
    dispatcher: Dispatcher,
    replayer: Replayer,
    /// 计时器刷新间隔
    tick_interval: Duration,
    state: RwLock<ControllerState>,
    /// 事件广播通道
    event_tx: broadcast::Sender<SessionEvent>,
}

struct ControllerState {
    phase: SessionPhase,
    session: Option<RunSession>,
    panels: Panels,
    cancel: Option<CancelToken>,
    ticker: Option<JoinHandle<()>>,
}

impl ControllerState {
    /// 当前运行是否仍属于 `run_id`
    fn owns(&self, run_id: &str) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.run_id == run_id)
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    /// 结束当前运行并重新启用开始按钮
    fn finish_run(&mut self) -> Option<RunSession> {
        self.stop_ticker();
        self.cancel = None;
        self.panels.start_enabled = true;
        self.session.take().map(|mut session| {
            session.is_running = false;
            session
        })
    }
}

impl SessionController {
    /// 创建新的会话控制器
    pub fn new(dispatcher: Dispatcher, replayer: Replayer, tick_interval: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(1000);

        let inner = ControllerInner {
            dispatcher,
            replayer,
            tick_interval,
            state: RwLock::new(ControllerState {
                phase: SessionPhase::Idle,
                session: None,
                panels: Panels::default(),
                cancel: None,
                ticker: None,
            }),
            event_tx,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// 按回放配置创建
    pub fn from_config(backend: Arc<dyn SimulationBackend>, cfg: &ReplayConfig) -> Self {
        Self::new(
            Dispatcher::new(backend),
            Replayer::from_config(cfg),
            Duration::from_millis(cfg.tick_interval_ms.max(1)),
        )
    }

    /// 订阅状态事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    /// 当前阶段
    pub async fn phase(&self) -> SessionPhase {
        self.inner.state.read().await.phase
    }

    /// 界面状态快照
    pub async fn panels(&self) -> Panels {
        self.inner.state.read().await.panels.clone()
    }

    /// 当前运行（空闲时为 None）
    pub async fn session(&self) -> Option<RunSession> {
        self.inner.state.read().await.session.clone()
    }

    /// 开始一次运行；非 Idle 时为空操作并返回 None
    pub async fn start(&self, config: RunConfiguration) -> Option<RunHandle> {
        let (run_id, cancel) = {
            let mut state = self.inner.state.write().await;
            if PhaseTransition::is_busy(state.phase) {
                tracing::debug!(
                    target: "escoba.session",
                    stage = "session.start.ignored",
                    phase = state.phase.as_str()
                );
                return None;
            }

            let session = RunSession::new();
            let run_id = session.run_id.clone();
            let cancel = CancelToken::new();

            state.panels.clear_run();
            state.panels.start_enabled = false;
            state.panels.elapsed_secs = Some(0);
            state.session = Some(session);
            state.cancel = Some(cancel.clone());
            if !self
                .inner
                .transition(&mut state, &run_id, SessionPhase::Requesting)
            {
                state.finish_run();
                return None;
            }
            self.inner.emit(SessionEvent::Elapsed {
                run_id: run_id.clone(),
                secs: 0,
            });
            state.ticker = Some(tokio::spawn(run_ticker(
                self.inner.clone(),
                run_id.clone(),
            )));

            (run_id, cancel)
        };

        tracing::info!(
            target: "escoba.session",
            stage = "session.start",
            run_id = %run_id,
            players = config.num_players
        );

        let task = tokio::spawn(supervise(
            self.inner.clone(),
            run_id.clone(),
            config,
            cancel,
        ));
        Some(RunHandle { run_id, task })
    }

    /// 放弃当前请求或回放，回到 Idle；没有运行时返回 false
    pub async fn cancel(&self) -> bool {
        let mut state = self.inner.state.write().await;
        let run_id = match state.session.as_ref() {
            Some(session) => session.run_id.clone(),
            None => return false,
        };
        if let Some(token) = state.cancel.as_ref() {
            token.cancel();
        }
        self.inner.transition(&mut state, &run_id, SessionPhase::Idle);
        state.finish_run();

        tracing::info!(
            target: "escoba.session",
            stage = "session.cancel",
            run_id = %run_id
        );
        self.inner.emit(SessionEvent::Cancelled { run_id });
        true
    }
}

impl ControllerInner {
    /// 发送状态事件；没有订阅者时忽略
    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    /// 转换阶段并广播；非法转换只记录警告
    fn transition(&self, state: &mut ControllerState, run_id: &str, to: SessionPhase) -> bool {
        let from = state.phase;
        if let Err(e) = PhaseTransition::validate(from, to) {
            tracing::warn!(
                target: "escoba.session",
                stage = "session.transition.invalid",
                run_id = %run_id,
                error = %e
            );
            return false;
        }
        state.phase = to;
        tracing::debug!(
            target: "escoba.session",
            stage = "session.transition",
            run_id = %run_id,
            from = from.as_str(),
            to = to.as_str()
        );
        self.emit(SessionEvent::PhaseChanged {
            run_id: run_id.to_string(),
            from,
            to,
            timestamp: Utc::now(),
        });
        true
    }

    /// Requesting --failure--> Failed --> Idle
    async fn fail(&self, run_id: &str, err: &DispatchError) -> bool {
        let mut state = self.state.write().await;
        if !state.owns(run_id) {
            return false;
        }
        state.stop_ticker();
        self.transition(&mut state, run_id, SessionPhase::Failed);

        let line = RenderedLine::failure(err);
        state.panels.log.push(line.clone());
        self.emit(SessionEvent::Line {
            run_id: run_id.to_string(),
            index: None,
            line,
        });
        self.emit(SessionEvent::Failed {
            run_id: run_id.to_string(),
            error: err.to_string(),
        });

        self.transition(&mut state, run_id, SessionPhase::Idle);
        state.finish_run();
        true
    }

    /// 运行任务崩溃：回到 Idle 并重新启用开始按钮
    async fn crashed(&self, run_id: &str, message: &str) {
        let mut state = self.state.write().await;
        if !state.owns(run_id) {
            return;
        }
        self.transition(&mut state, run_id, SessionPhase::Idle);
        state.finish_run();
        self.emit(SessionEvent::Failed {
            run_id: run_id.to_string(),
            error: message.to_string(),
        });
    }

    /// Requesting --success--> Replaying：生成玩家占位
    async fn begin_replay(&self, run_id: &str, scores: &FinalScores) -> bool {
        let mut state = self.state.write().await;
        if !state.owns(run_id) {
            return false;
        }
        state.stop_ticker();
        if !self.transition(&mut state, run_id, SessionPhase::Replaying) {
            return false;
        }

        let players: Vec<PlayerSlot> = scores
            .players()
            .enumerate()
            .map(|(i, name)| PlayerSlot {
                slot: i + 1,
                name: name.to_string(),
            })
            .collect();
        state.panels.players = players.clone();
        self.emit(SessionEvent::PlayersAnnounced {
            run_id: run_id.to_string(),
            players,
        });
        true
    }
}

/// Runs `drive` in its own task so a panic still releases the session.
async fn supervise(
    inner: Arc<ControllerInner>,
    run_id: String,
    config: RunConfiguration,
    cancel: CancelToken,
) -> RunOutcome {
    let task = tokio::spawn(drive(inner.clone(), run_id.clone(), config, cancel));
    match task.await {
        Ok(outcome) => outcome,
        Err(e) if e.is_panic() => {
            let message = format!("run task panicked: {e}");
            tracing::error!(
                target: "escoba.session",
                stage = "session.task.panicked",
                run_id = %run_id,
                error = %e
            );
            inner.crashed(&run_id, &message).await;
            RunOutcome::Crashed(message)
        }
        Err(_) => RunOutcome::Cancelled,
    }
}

async fn drive(
    inner: Arc<ControllerInner>,
    run_id: String,
    config: RunConfiguration,
    cancel: CancelToken,
) -> RunOutcome {
    let submitted = tokio::select! {
        biased;
        _ = cancel.cancelled() => return RunOutcome::Cancelled,
        res = inner.dispatcher.submit(&config) => res,
    };

    let result: SimulationResult = match submitted {
        Ok(result) => result,
        Err(err) => {
            tracing::warn!(
                target: "escoba.session",
                stage = "session.request.failed",
                run_id = %run_id,
                error = %err
            );
            if inner.fail(&run_id, &err).await {
                return RunOutcome::Failed(err);
            }
            return RunOutcome::Cancelled;
        }
    };

    if !inner.begin_replay(&run_id, &result.final_scores).await {
        return RunOutcome::Cancelled;
    }

    let mut observer = PanelObserver {
        inner: inner.clone(),
        run_id: run_id.clone(),
    };
    match inner
        .replayer
        .play(&result.game_log, &result.final_scores, &mut observer, &cancel)
        .await
    {
        ReplayOutcome::Completed { events } => RunOutcome::Completed { events },
        ReplayOutcome::Cancelled { .. } => RunOutcome::Cancelled,
    }
}

/// 请求阶段的计时器
async fn run_ticker(inner: Arc<ControllerInner>, run_id: String) {
    let started = Instant::now();
    let mut interval = tokio::time::interval(inner.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // 第一次 tick 立即完成
    interval.tick().await;

    loop {
        interval.tick().await;
        let secs = started.elapsed().as_secs();
        let mut state = inner.state.write().await;
        if !state.owns(&run_id) || state.phase != SessionPhase::Requesting {
            return;
        }
        if state.panels.elapsed_secs == Some(secs) {
            continue;
        }
        state.panels.elapsed_secs = Some(secs);
        inner.emit(SessionEvent::Elapsed {
            run_id: run_id.clone(),
            secs,
        });
    }
}

/// 把回放步骤写入界面状态
struct PanelObserver {
    inner: Arc<ControllerInner>,
    run_id: String,
}

#[async_trait]
impl ReplayObserver for PanelObserver {
    async fn on_event(&mut self, step: ReplayStep) {
        let mut state = self.inner.state.write().await;
        if !state.owns(&self.run_id) {
            return;
        }
        if let Some(session) = state.session.as_mut() {
            session.advance_to(step.index + 1);
        }

        state.panels.log.push(step.line.clone());
        self.inner.emit(SessionEvent::Line {
            run_id: self.run_id.clone(),
            index: Some(step.index),
            line: step.line,
        });

        if step.table_changed {
            state.panels.table = step.table.clone();
            self.inner.emit(SessionEvent::TableChanged {
                run_id: self.run_id.clone(),
                cards: step.table,
            });
        }
    }

    async fn on_complete(&mut self, scores: &FinalScores) {
        let mut state = self.inner.state.write().await;
        if !state.owns(&self.run_id) {
            return;
        }
        state.panels.final_scores = Some(scores.clone());
        self.inner
            .transition(&mut state, &self.run_id, SessionPhase::Idle);
        let duration_ms = state
            .finish_run()
            .map(|session| session.duration_ms())
            .unwrap_or_default();

        tracing::info!(
            target: "escoba.session",
            stage = "session.complete",
            run_id = %self.run_id,
            duration_ms = duration_ms
        );
        self.inner.emit(SessionEvent::Completed {
            run_id: self.run_id.clone(),
            scores: scores.clone(),
            duration_ms,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::simulation::{LogEvent, SimulateRequest};
    use serde_json::json;

    struct FixedBackend(Result<SimulationResult, TransportError>);

    #[async_trait]
    impl SimulationBackend for FixedBackend {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn simulate(
            &self,
            _request: &SimulateRequest<'_>,
        ) -> Result<SimulationResult, TransportError> {
            self.0.clone()
        }
    }

    fn controller(result: Result<SimulationResult, TransportError>) -> SessionController {
        SessionController::new(
            Dispatcher::new(Arc::new(FixedBackend(result))),
            Replayer::new(Duration::from_millis(1500)),
            Duration::from_secs(1),
        )
    }

    struct PanickingBackend;

    #[async_trait]
    impl SimulationBackend for PanickingBackend {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn simulate(
            &self,
            _request: &SimulateRequest<'_>,
        ) -> Result<SimulationResult, TransportError> {
            panic!("backend exploded")
        }
    }

    fn one_event_result() -> SimulationResult {
        SimulationResult {
            game_log: vec![LogEvent::classify(json!({"event": "start"}))],
            final_scores: FinalScores::from_pairs([("P1", 1)]),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_by_default() {
        let ctl = controller(Ok(one_event_result()));
        assert_eq!(ctl.phase().await, SessionPhase::Idle);
        assert!(ctl.panels().await.start_enabled);
        assert!(ctl.session().await.is_none());
        assert!(!ctl.cancel().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_returns_to_idle() {
        let ctl = controller(Ok(one_event_result()));
        let handle = ctl
            .start(RunConfiguration::new("", vec!["m".to_string()]))
            .await
            .unwrap();
        assert_eq!(handle.wait().await, RunOutcome::Completed { events: 1 });

        let panels = ctl.panels().await;
        assert_eq!(ctl.phase().await, SessionPhase::Idle);
        assert!(panels.start_enabled);
        assert_eq!(panels.log.len(), 1);
        assert_eq!(panels.players.len(), 1);
        assert_eq!(panels.players[0].label(), "AI Player 1");
        assert!(ctl.session().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_phase_events_are_broadcast_in_order() {
        let ctl = controller(Ok(one_event_result()));
        let mut rx = ctl.subscribe();
        let handle = ctl
            .start(RunConfiguration::new("", vec!["m".to_string()]))
            .await
            .unwrap();
        handle.wait().await;

        let mut phases = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::PhaseChanged { from, to, .. } = event {
                phases.push((from, to));
            }
        }
        assert_eq!(
            phases,
            vec![
                (SessionPhase::Idle, SessionPhase::Requesting),
                (SessionPhase::Requesting, SessionPhase::Replaying),
                (SessionPhase::Replaying, SessionPhase::Idle),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_passes_through_failed() {
        let ctl = controller(Err(TransportError::new(Some(500), "INTERNAL SERVER ERROR")));
        let mut rx = ctl.subscribe();
        let handle = ctl
            .start(RunConfiguration::new("", vec!["m".to_string()]))
            .await
            .unwrap();
        assert!(matches!(handle.wait().await, RunOutcome::Failed(_)));

        let mut saw_failed = false;
        while let Ok(event) = rx.try_recv() {
            if let SessionEvent::PhaseChanged { to, .. } = event {
                saw_failed |= to == SessionPhase::Failed;
            }
        }
        assert!(saw_failed);
        assert_eq!(ctl.phase().await, SessionPhase::Idle);
        assert_eq!(
            ctl.panels().await.log[0].text,
            "Simulation failed: HTTP 500: INTERNAL SERVER ERROR"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicked_run_is_reported_as_crash() {
        let ctl = SessionController::new(
            Dispatcher::new(Arc::new(PanickingBackend)),
            Replayer::new(Duration::from_millis(1500)),
            Duration::from_secs(1),
        );
        let mut rx = ctl.subscribe();
        let handle = ctl
            .start(RunConfiguration::new("", vec!["m".to_string()]))
            .await
            .unwrap();

        match handle.wait().await {
            RunOutcome::Crashed(message) => assert!(message.contains("panicked")),
            other => panic!("expected crash, got {other:?}"),
        }
        assert_eq!(ctl.phase().await, SessionPhase::Idle);
        assert!(ctl.panels().await.start_enabled);
        assert!(ctl.session().await.is_none());

        let mut saw_failed = false;
        let mut saw_cancelled = false;
        while let Ok(event) = rx.try_recv() {
            saw_failed |= matches!(event, SessionEvent::Failed { .. });
            saw_cancelled |= matches!(event, SessionEvent::Cancelled { .. });
        }
        assert!(saw_failed);
        assert!(!saw_cancelled);
    }
}
