use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Player name to score, in the order the service reported them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalScores {
    entries: Vec<ScoreEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub player: String,
    pub score: Value,
}

impl ScoreEntry {
    pub fn display_score(&self) -> String {
        match &self.score {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn numeric(&self) -> Option<f64> {
        self.score.as_f64()
    }
}

impl FinalScores {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(player, score)| ScoreEntry {
                    player: player.into(),
                    score: score.into(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.entries.iter()
    }

    pub fn players(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.player.as_str())
    }

    /// Players holding the highest numeric score. Ties are all returned, in entry order.
    pub fn leaders(&self) -> Vec<&str> {
        let best = self
            .entries
            .iter()
            .filter_map(ScoreEntry::numeric)
            .fold(None, |acc: Option<f64>, s| Some(acc.map_or(s, |a| a.max(s))));
        let Some(best) = best else {
            return Vec::new();
        };
        self.entries
            .iter()
            .filter(|e| e.numeric() == Some(best))
            .map(|e| e.player.as_str())
            .collect()
    }

    /// `P1: 2, P2: 0`
    pub fn format_inline(&self) -> String {
        self.entries
            .iter()
            .map(|e| format!("{}: {}", e.player, e.display_score()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<Map<String, Value>> for FinalScores {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_pairs(map)
    }
}

impl<'de> Deserialize<'de> for FinalScores {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}

impl Serialize for FinalScores {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let map: Map<String, Value> = self
            .entries
            .iter()
            .map(|e| (e.player.clone(), e.score.clone()))
            .collect();
        map.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_response_order() {
        let scores: FinalScores =
            serde_json::from_str(r#"{"zeta": 1, "alpha": 4, "mid": 2}"#).unwrap();
        let players: Vec<_> = scores.players().collect();
        assert_eq!(players, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn format_inline_uses_plain_numbers() {
        let scores = FinalScores::from_pairs([("P1", 2), ("P2", 0)]);
        assert_eq!(scores.format_inline(), "P1: 2, P2: 0");

        let scores = FinalScores::from_pairs([("P1", Value::from(1.5)), ("P2", Value::from("n/a"))]);
        assert_eq!(scores.format_inline(), "P1: 1.5, P2: n/a");
    }

    #[test]
    fn leaders_include_ties() {
        let scores = FinalScores::from_pairs([("a", 3), ("b", 5), ("c", 5)]);
        assert_eq!(scores.leaders(), vec!["b", "c"]);
        assert!(FinalScores::default().leaders().is_empty());
    }

    #[test]
    fn serialize_round_trips_order() {
        let scores = FinalScores::from_pairs([("b", 1), ("a", 2)]);
        assert_eq!(serde_json::to_string(&scores).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
