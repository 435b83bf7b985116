use super::row::{ModelChoice, PlayerRow};
use crate::config::DEFAULT_MODEL;
use crate::simulation::RunConfiguration;

/// Headless model of the per-player model selection form.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    default_model: String,
    rows: Vec<PlayerRow>,
}

impl FormBuilder {
    /// A blank `default_model` falls back to [`DEFAULT_MODEL`].
    pub fn new(default_model: impl Into<String>) -> Self {
        let default_model = default_model.into().trim().to_string();
        Self {
            default_model: if default_model.is_empty() {
                DEFAULT_MODEL.to_string()
            } else {
                default_model
            },
            rows: Vec::new(),
        }
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Rebuild every row from scratch. Prior selections are discarded.
    pub fn render(&mut self, player_count: usize, catalog: &[String]) {
        self.rows = (1..=player_count)
            .map(|i| PlayerRow::new(i, catalog))
            .collect();
        tracing::debug!(
            target: "escoba.form",
            stage = "form.render",
            players = player_count,
            catalog = catalog.len()
        );
    }

    pub fn rows(&self) -> &[PlayerRow] {
        &self.rows
    }

    pub fn player_count(&self) -> usize {
        self.rows.len()
    }

    /// Row for the 1-based player `index`.
    pub fn row(&self, index: usize) -> Option<&PlayerRow> {
        index.checked_sub(1).and_then(|i| self.rows.get(i))
    }

    fn row_mut(&mut self, index: usize) -> Option<&mut PlayerRow> {
        index.checked_sub(1).and_then(move |i| self.rows.get_mut(i))
    }

    /// Set a row's selector. Returns false for unknown rows or values.
    pub fn select(&mut self, index: usize, value: &str) -> bool {
        self.row_mut(index).map(|r| r.select(value)).unwrap_or(false)
    }

    pub fn cycle(&mut self, index: usize, step: isize) {
        if let Some(row) = self.row_mut(index) {
            row.cycle(step);
        }
    }

    pub fn set_override(&mut self, index: usize, text: impl Into<String>) {
        if let Some(row) = self.row_mut(index) {
            *row.override_mut() = text.into();
        }
    }

    pub fn push_override_char(&mut self, index: usize, ch: char) {
        if let Some(row) = self.row_mut(index) {
            row.override_mut().push(ch);
        }
    }

    pub fn pop_override_char(&mut self, index: usize) {
        if let Some(row) = self.row_mut(index) {
            row.override_mut().pop();
        }
    }

    /// Effective model per player. Indices without a row count as a blank
    /// custom override, so the result always has `player_count` non-empty ids.
    pub fn collect_models(&self, player_count: usize) -> Vec<String> {
        (1..=player_count)
            .map(|i| {
                self.row(i)
                    .map(PlayerRow::choice)
                    .unwrap_or_else(|| ModelChoice::Custom(String::new()))
                    .resolve(&self.default_model)
            })
            .collect()
    }

    pub fn build_configuration(
        &self,
        api_key: impl Into<String>,
        player_count: usize,
    ) -> RunConfiguration {
        RunConfiguration::new(api_key, self.collect_models(player_count))
    }
}
