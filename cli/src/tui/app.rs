use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use escoba_core::api::{
    FormBuilder, FormConfig, Panels, RunConfiguration, SessionEvent, SessionPhase, TuiConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Players,
    /// 1-based player row.
    Row(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Start,
    Exit,
}

pub struct TuiApp {
    pub config: TuiConfig,
    form_cfg: FormConfig,
    pub form: FormBuilder,
    catalog: Vec<String>,
    api_key: String,
    pub players: usize,
    pub focus: Focus,
    /// Typing goes into the focused row's custom override.
    pub editing: bool,
    pub panels: Panels,
    pub phase: SessionPhase,
    pub run_id: Option<String>,
    pub status: Option<String>,
}

impl TuiApp {
    pub fn new(
        config: TuiConfig,
        form_cfg: FormConfig,
        form: FormBuilder,
        catalog: Vec<String>,
        api_key: String,
    ) -> Self {
        let players = form.player_count();
        Self {
            config,
            form_cfg,
            form,
            catalog,
            api_key,
            players,
            focus: Focus::Players,
            editing: false,
            panels: Panels::default(),
            phase: SessionPhase::Idle,
            run_id: None,
            status: None,
        }
    }

    pub fn build_configuration(&self) -> RunConfiguration {
        self.form
            .build_configuration(self.api_key.clone(), self.players)
    }

    /// Changing the count rebuilds every row from scratch.
    pub fn set_players(&mut self, requested: usize) {
        let players = self.form_cfg.clamp_players(requested);
        if players == self.players {
            return;
        }
        self.players = players;
        self.form.render(players, &self.catalog);
        self.editing = false;
        if let Focus::Row(i) = self.focus {
            self.focus = Focus::Row(i.min(players));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return AppAction::Exit;
        }
        if self.editing {
            self.handle_edit_key(key);
            return AppAction::None;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return AppAction::Exit,
            KeyCode::Enter if self.panels.start_enabled => return AppAction::Start,
            KeyCode::Up | KeyCode::Char('k') => self.focus_prev(),
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => self.focus_next(),
            KeyCode::Char('+') => self.set_players(self.players + 1),
            KeyCode::Char('-') => self.set_players(self.players.saturating_sub(1)),
            KeyCode::Left | KeyCode::Char('h') => self.step(-1),
            KeyCode::Right | KeyCode::Char('l') => self.step(1),
            KeyCode::Char('e') => {
                if let Focus::Row(i) = self.focus {
                    self.editing = self.form.row(i).is_some_and(|r| r.override_visible());
                }
            }
            _ => {}
        }
        AppAction::None
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        let Focus::Row(i) = self.focus else {
            self.editing = false;
            return;
        };
        match key.code {
            KeyCode::Enter | KeyCode::Esc => self.editing = false,
            KeyCode::Backspace => self.form.pop_override_char(i),
            KeyCode::Char(ch) => self.form.push_override_char(i, ch),
            _ => {}
        }
    }

    fn step(&mut self, delta: isize) {
        match self.focus {
            Focus::Players if delta < 0 => self.set_players(self.players.saturating_sub(1)),
            Focus::Players => self.set_players(self.players + 1),
            Focus::Row(i) => self.form.cycle(i, delta),
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Players if self.players > 0 => Focus::Row(1),
            Focus::Row(i) if i < self.players => Focus::Row(i + 1),
            _ => Focus::Players,
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Players => Focus::Row(self.players.max(1)),
            Focus::Row(i) if i > 1 => Focus::Row(i - 1),
            Focus::Row(_) => Focus::Players,
        };
    }

    pub fn on_session_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::PhaseChanged {
                run_id,
                to: SessionPhase::Requesting,
                ..
            } => {
                self.run_id = Some(run_id.clone());
                self.status = None;
            }
            SessionEvent::Completed { duration_ms, .. } => {
                self.status = Some(format!("Completed in {:.1}s", *duration_ms as f64 / 1000.0));
            }
            SessionEvent::Failed { .. } => self.status = Some("Failed".to_string()),
            SessionEvent::Cancelled { .. } => self.status = Some("Cancelled".to_string()),
            _ => {}
        }
    }

    pub fn sync(&mut self, panels: Panels, phase: SessionPhase) {
        self.panels = panels;
        self.phase = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use escoba_core::api::CUSTOM_OPTION;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app(players: usize) -> TuiApp {
        let catalog = vec!["openai/gpt-4o-mini".to_string()];
        let mut form = FormBuilder::new("openai/gpt-4o");
        form.render(players, &catalog);
        TuiApp::new(
            TuiConfig::default(),
            FormConfig::default(),
            form,
            catalog,
            "sk".to_string(),
        )
    }

    #[test]
    fn plus_and_minus_rebuild_rows_within_bounds() {
        let mut app = app(2);
        app.handle_key(key(KeyCode::Char('+')));
        assert_eq!(app.players, 3);
        assert_eq!(app.form.rows().len(), 3);

        for _ in 0..5 {
            app.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(app.players, 1);
        assert_eq!(app.form.rows().len(), 1);
    }

    #[test]
    fn cycling_to_custom_and_typing_an_override() {
        let mut app = app(1);
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focus, Focus::Row(1));

        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.form.row(1).unwrap().selected_value(), CUSTOM_OPTION);

        app.handle_key(key(KeyCode::Char('e')));
        assert!(app.editing);
        for ch in "my/modelx".chars() {
            app.handle_key(key(KeyCode::Char(ch)));
        }
        app.handle_key(key(KeyCode::Backspace));
        // 'q' is text while editing, not quit.
        assert_eq!(app.handle_key(key(KeyCode::Char('q'))), AppAction::None);
        app.handle_key(key(KeyCode::Backspace));
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.editing);

        assert_eq!(app.build_configuration().models, vec!["my/model"]);
    }

    #[test]
    fn edit_is_ignored_on_catalog_rows() {
        let mut app = app(1);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char('e')));
        assert!(!app.editing);
    }

    #[test]
    fn enter_starts_only_when_enabled() {
        let mut app = app(2);
        assert_eq!(app.handle_key(key(KeyCode::Enter)), AppAction::Start);

        app.panels.start_enabled = false;
        assert_eq!(app.handle_key(key(KeyCode::Enter)), AppAction::None);
    }

    #[test]
    fn esc_and_ctrl_c_exit() {
        let mut app = app(2);
        assert_eq!(app.handle_key(key(KeyCode::Esc)), AppAction::Exit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            AppAction::Exit
        );
    }

    #[test]
    fn focus_wraps_around() {
        let mut app = app(2);
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.focus, Focus::Row(2));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.focus, Focus::Players);
    }
}
