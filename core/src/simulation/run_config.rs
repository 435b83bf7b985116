use serde::Serialize;

use crate::error::ValidationError;

/// One run's worth of settings, as assembled by the configuration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfiguration {
    pub api_key: String,
    pub num_players: usize,
    /// Model per player, index 0 is player 1.
    pub models: Vec<String>,
}

impl RunConfiguration {
    pub fn new(api_key: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            api_key: api_key.into(),
            num_players: models.len(),
            models,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.num_players == 0 {
            return Err(ValidationError::NoPlayers);
        }
        if self.models.len() != self.num_players {
            return Err(ValidationError::ModelCountMismatch {
                expected: self.num_players,
                actual: self.models.len(),
            });
        }
        if let Some(idx) = self.models.iter().position(|m| m.trim().is_empty()) {
            return Err(ValidationError::EmptyModel { player: idx + 1 });
        }
        Ok(())
    }

    pub fn to_request(&self) -> SimulateRequest<'_> {
        SimulateRequest {
            api_key: &self.api_key,
            num_players: self.num_players,
            models: &self.models,
        }
    }
}

/// JSON body of `POST /simulate`.
#[derive(Debug, Clone, Serialize)]
pub struct SimulateRequest<'a> {
    pub api_key: &'a str,
    pub num_players: usize,
    pub models: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn valid_configuration_passes() {
        let cfg = RunConfiguration::new("key", models(&["a/b", "c/d"]));
        assert_eq!(cfg.num_players, 2);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_players_rejected() {
        let cfg = RunConfiguration::new("key", vec![]);
        assert_eq!(cfg.validate(), Err(ValidationError::NoPlayers));
    }

    #[test]
    fn model_count_must_match() {
        let cfg = RunConfiguration {
            api_key: String::new(),
            num_players: 3,
            models: models(&["a", "b"]),
        };
        assert_eq!(
            cfg.validate(),
            Err(ValidationError::ModelCountMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn blank_model_rejected_with_player_index() {
        let cfg = RunConfiguration::new("", models(&["a", "  "]));
        assert_eq!(cfg.validate(), Err(ValidationError::EmptyModel { player: 2 }));
    }

    #[test]
    fn request_body_shape() {
        let cfg = RunConfiguration::new("sk-1", models(&["openai/gpt-4o"]));
        let body = serde_json::to_value(cfg.to_request()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "api_key": "sk-1",
                "num_players": 1,
                "models": ["openai/gpt-4o"],
            })
        );
    }
}
