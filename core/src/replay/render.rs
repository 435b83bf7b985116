use crate::simulation::{ActionEvent, LogEvent, NarrativeEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Narrative,
    Action,
    /// An action that carried an embedded error. Still narrated, never fatal.
    ActionError,
    Unknown,
    /// Session-level failure (request rejected, transport error).
    Failure,
}

/// A line of the log panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub kind: LineKind,
    pub text: String,
}

impl RenderedLine {
    pub fn new(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn failure(message: impl std::fmt::Display) -> Self {
        Self::new(LineKind::Failure, format!("Simulation failed: {message}"))
    }
}

pub fn render_event(event: &LogEvent) -> RenderedLine {
    match event {
        LogEvent::Narrative(n) => RenderedLine::new(LineKind::Narrative, render_narrative(n)),
        LogEvent::Action(a) => {
            let kind = if a.error.is_some() {
                LineKind::ActionError
            } else {
                LineKind::Action
            };
            RenderedLine::new(kind, render_action(a))
        }
        LogEvent::Unknown(raw) => RenderedLine::new(LineKind::Unknown, raw.to_string()),
    }
}

fn render_narrative(n: &NarrativeEvent) -> String {
    let mut out = format!("Event: {}", n.event);
    if let Some(player) = &n.player {
        out.push_str(" by ");
        out.push_str(player);
    }
    if let Some(cards) = &n.cards {
        out.push_str(" | Cards: ");
        out.push_str(&cards.join(", "));
    }
    if let Some(collected) = &n.collected {
        out.push_str(" | Collected: ");
        out.push_str(&collected.join(", "));
    }
    if let Some(scores) = &n.scores {
        out.push_str(" | Scores: ");
        out.push_str(&scores.format_inline());
    }
    out
}

fn render_action(a: &ActionEvent) -> String {
    let mut out = format!("{}: {}", a.player, a.action);
    if let Some(card) = &a.played_card {
        out.push_str(&format!(" (Played: {card})"));
    }
    if a.escoba == Some(true) {
        out.push_str(" [Escoba!]");
    }
    if let Some(err) = &a.error {
        out.push_str(&format!(" [Error: {err}]"));
    }
    out
}

/// Cards currently face up on the table, as last reported by the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableState {
    cards: Vec<String>,
}

impl TableState {
    pub fn cards(&self) -> &[String] {
        &self.cards
    }

    /// `table_after` replaces the whole table. Returns whether anything was applied.
    pub fn apply(&mut self, event: &LogEvent) -> bool {
        match event {
            LogEvent::Action(ActionEvent {
                table_after: Some(cards),
                ..
            }) => {
                self.cards = cards.clone();
                true
            }
            _ => false,
        }
    }
}
