use std::time::Duration;

use super::cancel::CancelToken;
use super::observer::{ReplayObserver, ReplayStep};
use super::render::{render_event, TableState};
use crate::config::ReplayConfig;
use crate::simulation::{FinalScores, LogEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayOutcome {
    Completed { events: usize },
    Cancelled { rendered: usize },
}

/// Re-presents a fully received log one event at a time, as if it were live.
#[derive(Debug, Clone)]
pub struct Replayer {
    interval: Duration,
}

impl Replayer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn from_config(cfg: &ReplayConfig) -> Self {
        Self::new(Duration::from_millis(cfg.interval_ms))
    }

    /// Render `log` strictly in order, waiting `interval` between events.
    ///
    /// The wait is the only suspension point; `cancel` is checked before every
    /// event and raced against every wait, so a cancelled replay never touches
    /// the observer again.
    pub async fn play<O>(
        &self,
        log: &[LogEvent],
        scores: &FinalScores,
        observer: &mut O,
        cancel: &CancelToken,
    ) -> ReplayOutcome
    where
        O: ReplayObserver + ?Sized,
    {
        let total = log.len();
        let mut table = TableState::default();
        let mut cursor = 0;

        while cursor < total {
            if cancel.is_cancelled() {
                return cancelled(cursor);
            }

            let event = &log[cursor];
            let line = render_event(event);
            let table_changed = table.apply(event);
            tracing::trace!(
                target: "escoba.replay",
                stage = "replay.step",
                index = cursor,
                kind = event.kind()
            );
            observer
                .on_event(ReplayStep {
                    index: cursor,
                    total,
                    line,
                    table: table.cards().to_vec(),
                    table_changed,
                })
                .await;
            cursor += 1;

            if cursor < total {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return cancelled(cursor),
                    _ = tokio::time::sleep(self.interval) => {}
                }
            }
        }

        if cancel.is_cancelled() {
            return cancelled(cursor);
        }
        observer.on_complete(scores).await;
        tracing::debug!(
            target: "escoba.replay",
            stage = "replay.complete",
            events = total
        );
        ReplayOutcome::Completed { events: total }
    }
}

fn cancelled(rendered: usize) -> ReplayOutcome {
    tracing::debug!(
        target: "escoba.replay",
        stage = "replay.cancelled",
        rendered = rendered
    );
    ReplayOutcome::Cancelled { rendered }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::{LineKind, RecordingObserver};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::time::Instant;

    fn log(values: Vec<serde_json::Value>) -> Vec<LogEvent> {
        values.into_iter().map(LogEvent::classify).collect()
    }

    fn sample_log() -> Vec<LogEvent> {
        log(vec![
            json!({"event": "immediate_capture", "player": "P1", "cards": ["7H", "7C"]}),
            json!({"player": "P2", "action": "play", "played_card": "3D", "table_after": ["3D"]}),
        ])
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_two_events_then_completion() {
        let scores = FinalScores::from_pairs([("P1", 2), ("P2", 0)]);
        let mut observer = RecordingObserver::default();
        let outcome = Replayer::new(Duration::from_millis(1500))
            .play(&sample_log(), &scores, &mut observer, &CancelToken::new())
            .await;

        assert_eq!(outcome, ReplayOutcome::Completed { events: 2 });
        let lines: Vec<_> = observer.steps.iter().map(|s| s.line.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "Event: immediate_capture by P1 | Cards: 7H, 7C",
                "P2: play (Played: 3D)"
            ]
        );
        assert!(observer.steps[0].table.is_empty());
        assert_eq!(observer.steps[1].table, vec!["3D".to_string()]);
        assert_eq!(observer.completions, vec![scores.clone()]);
        assert_eq!(observer.completions[0].format_inline(), "P1: 2, P2: 0");
    }

    #[tokio::test(start_paused = true)]
    async fn k_events_in_order_then_one_completion() {
        let k = 7;
        let events = log((0..k)
            .map(|i| json!({"player": format!("P{i}"), "action": "play"}))
            .collect());
        let mut observer = RecordingObserver::default();
        Replayer::new(Duration::from_millis(10))
            .play(&events, &FinalScores::default(), &mut observer, &CancelToken::new())
            .await;

        assert_eq!(observer.steps.len(), k);
        for (i, step) in observer.steps.iter().enumerate() {
            assert_eq!(step.index, i);
            assert_eq!(step.total, k);
            assert_eq!(step.line.text, format!("P{i}: play"));
        }
        assert_eq!(observer.completions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_log_completes_immediately() {
        let mut observer = RecordingObserver::default();
        let started = Instant::now();
        let outcome = Replayer::new(Duration::from_secs(5))
            .play(&[], &FinalScores::default(), &mut observer, &CancelToken::new())
            .await;

        assert_eq!(outcome, ReplayOutcome::Completed { events: 0 });
        assert!(observer.steps.is_empty());
        assert_eq!(observer.completions.len(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    struct TimedObserver {
        seen: Vec<Instant>,
        completed_at: Option<Instant>,
    }

    #[async_trait]
    impl ReplayObserver for TimedObserver {
        async fn on_event(&mut self, _step: ReplayStep) {
            self.seen.push(Instant::now());
        }

        async fn on_complete(&mut self, _scores: &FinalScores) {
            self.completed_at = Some(Instant::now());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn events_are_spaced_by_interval() {
        let interval = Duration::from_millis(1500);
        let events = log(vec![json!({"event": "a"}), json!({"event": "b"}), json!({"event": "c"})]);
        let mut observer = TimedObserver {
            seen: Vec::new(),
            completed_at: None,
        };
        let started = Instant::now();
        Replayer::new(interval)
            .play(&events, &FinalScores::default(), &mut observer, &CancelToken::new())
            .await;

        assert_eq!(observer.seen[0] - started, Duration::ZERO);
        assert_eq!(observer.seen[1] - observer.seen[0], interval);
        assert_eq!(observer.seen[2] - observer.seen[1], interval);
        assert_eq!(observer.completed_at, Some(observer.seen[2]));
    }

    #[tokio::test(start_paused = true)]
    async fn embedded_error_does_not_stop_replay() {
        let events = log(vec![
            json!({"player": "P1", "action": "play", "error": "bad json from model"}),
            json!({"player": "P2", "action": "play"}),
        ]);
        let mut observer = RecordingObserver::default();
        Replayer::new(Duration::from_millis(1))
            .play(&events, &FinalScores::default(), &mut observer, &CancelToken::new())
            .await;

        assert_eq!(observer.steps[0].line.kind, LineKind::ActionError);
        assert_eq!(observer.steps[0].line.text, "P1: play [Error: bad json from model]");
        assert_eq!(observer.steps[1].line.text, "P2: play");
        assert_eq!(observer.completions.len(), 1);
    }

    struct CancelAfter {
        token: CancelToken,
        after: usize,
        inner: RecordingObserver,
    }

    #[async_trait]
    impl ReplayObserver for CancelAfter {
        async fn on_event(&mut self, step: ReplayStep) {
            self.inner.on_event(step).await;
            if self.inner.steps.len() == self.after {
                self.token.cancel();
            }
        }

        async fn on_complete(&mut self, scores: &FinalScores) {
            self.inner.on_complete(scores).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_discards_pending_steps() {
        let token = CancelToken::new();
        let events = log((0..5).map(|i| json!({"event": i.to_string()})).collect());
        let mut observer = CancelAfter {
            token: token.clone(),
            after: 2,
            inner: RecordingObserver::default(),
        };
        let outcome = Replayer::new(Duration::from_secs(1))
            .play(&events, &FinalScores::default(), &mut observer, &token)
            .await;

        assert_eq!(outcome, ReplayOutcome::Cancelled { rendered: 2 });
        assert_eq!(observer.inner.steps.len(), 2);
        assert!(observer.inner.completions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_during_last_event_skips_completion() {
        let token = CancelToken::new();
        let mut observer = CancelAfter {
            token: token.clone(),
            after: 2,
            inner: RecordingObserver::default(),
        };
        let outcome = Replayer::new(Duration::from_secs(1))
            .play(&sample_log(), &FinalScores::default(), &mut observer, &token)
            .await;

        assert_eq!(outcome, ReplayOutcome::Cancelled { rendered: 2 });
        assert!(observer.inner.completions.is_empty());
    }
}
