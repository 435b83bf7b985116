use serde::Deserialize;
use serde_json::{Map, Value};

use super::scores::FinalScores;

/// One entry of a run's `game_log`.
///
/// The service does not tag its events; the variant is decided by which fields
/// are present, see [`LogEvent::classify`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum LogEvent {
    /// Structural/meta events: deals, round finalization, final scores.
    Narrative(NarrativeEvent),
    /// A single player's turn.
    Action(ActionEvent),
    /// Neither shape; kept verbatim.
    Unknown(Value),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrativeEvent {
    pub event: String,
    pub player: Option<String>,
    pub cards: Option<Vec<String>>,
    pub collected: Option<Vec<String>>,
    pub scores: Option<FinalScores>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionEvent {
    pub player: String,
    pub action: String,
    pub played_card: Option<String>,
    pub error: Option<String>,
    pub table_after: Option<Vec<String>>,
    pub escoba: Option<bool>,
}

impl LogEvent {
    /// Priority is `event` first, then `player` + `action`, then unknown.
    pub fn classify(value: Value) -> Self {
        let Value::Object(obj) = value else {
            return LogEvent::Unknown(value);
        };

        if let Some(event) = present(&obj, "event") {
            return LogEvent::Narrative(NarrativeEvent {
                event: text_of(event),
                player: present(&obj, "player").map(text_of),
                cards: present(&obj, "cards").map(cards_of),
                collected: present(&obj, "collected").map(cards_of),
                scores: present(&obj, "scores").map(scores_of),
            });
        }

        if let (Some(player), Some(action)) = (present(&obj, "player"), present(&obj, "action")) {
            return LogEvent::Action(ActionEvent {
                player: text_of(player),
                action: text_of(action),
                played_card: present(&obj, "played_card").map(text_of),
                error: present(&obj, "error").map(text_of),
                table_after: present(&obj, "table_after").map(cards_of),
                escoba: present(&obj, "escoba").and_then(Value::as_bool),
            });
        }

        LogEvent::Unknown(Value::Object(obj))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            LogEvent::Narrative(_) => "narrative",
            LogEvent::Action(_) => "action",
            LogEvent::Unknown(_) => "unknown",
        }
    }
}

impl From<Value> for LogEvent {
    fn from(value: Value) -> Self {
        LogEvent::classify(value)
    }
}

/// Null and empty-string fields count as absent.
fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key)
        .filter(|v| !v.is_null() && !matches!(v, Value::String(s) if s.is_empty()))
}

fn text_of(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cards_of(v: &Value) -> Vec<String> {
    match v {
        Value::Array(items) => items.iter().map(text_of).collect(),
        other => vec![text_of(other)],
    }
}

fn scores_of(v: &Value) -> FinalScores {
    match v {
        Value::Object(map) => FinalScores::from(map.clone()),
        other => FinalScores::from_pairs([("?", other.clone())]),
    }
}
