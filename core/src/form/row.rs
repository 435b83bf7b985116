/// Selector value that switches a row to its free-text override.
pub const CUSTOM_OPTION: &str = "custom";

/// What a player row currently resolves from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChoice {
    Catalog(String),
    Custom(String),
}

impl ModelChoice {
    /// Effective model id. A blank custom override falls back to `default_model`.
    pub fn resolve(&self, default_model: &str) -> String {
        match self {
            ModelChoice::Catalog(id) => id.clone(),
            ModelChoice::Custom(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    default_model.to_string()
                } else {
                    trimmed.to_string()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowState {
    CatalogSelected,
    CustomSelected,
}

/// One "Model for AI Player i" control: a selector plus a hidden override box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    index: usize,
    options: Vec<String>,
    selected: usize,
    override_text: String,
}

impl PlayerRow {
    pub(crate) fn new(index: usize, catalog: &[String]) -> Self {
        let mut options: Vec<String> = catalog
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty() && *m != CUSTOM_OPTION)
            .map(str::to_string)
            .collect();
        options.push(CUSTOM_OPTION.to_string());
        Self {
            index,
            options,
            selected: 0,
            override_text: String::new(),
        }
    }

    /// 1-based player index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> String {
        format!("Model for AI Player {}", self.index)
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected_value(&self) -> &str {
        &self.options[self.selected]
    }

    pub fn override_text(&self) -> &str {
        &self.override_text
    }

    pub fn state(&self) -> RowState {
        if self.selected_value() == CUSTOM_OPTION {
            RowState::CustomSelected
        } else {
            RowState::CatalogSelected
        }
    }

    pub fn override_visible(&self) -> bool {
        self.state() == RowState::CustomSelected
    }

    pub fn choice(&self) -> ModelChoice {
        match self.state() {
            RowState::CustomSelected => ModelChoice::Custom(self.override_text.clone()),
            RowState::CatalogSelected => ModelChoice::Catalog(self.selected_value().to_string()),
        }
    }

    pub(crate) fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o == value) {
            Some(pos) => {
                self.selected = pos;
                true
            }
            None => false,
        }
    }

    pub(crate) fn cycle(&mut self, step: isize) {
        let len = self.options.len() as isize;
        self.selected = (self.selected as isize + step).rem_euclid(len) as usize;
    }

    pub(crate) fn override_mut(&mut self) -> &mut String {
        &mut self.override_text
    }
}
