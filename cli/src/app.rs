//! CLI 应用装配层：合并命令行覆盖、构建 backend/controller，并在 Standard/TUI flow 之间分发。
use escoba_core::api::{
    AppConfig, CatalogCache, CliError, FormBuilder, FormConfig, SessionController, CUSTOM_OPTION,
};
use escoba_plugins::factory;

use crate::commands::cli::RunArgs;
use crate::flow::{standard, tui};

/// Everything a flow needs for one process lifetime.
pub struct RunContext {
    pub cfg: AppConfig,
    pub players: usize,
    /// Raw `--model` values, applied to the form after it is rendered.
    pub models: Vec<String>,
    pub catalog: CatalogCache,
    pub controller: SessionController,
}

impl RunContext {
    pub fn api_key(&self) -> &str {
        &self.cfg.backend.api_key
    }
}

/// TUI is requested by flag or config; terminal support is checked later.
pub fn wants_tui(run_args: &RunArgs, cfg: &AppConfig) -> bool {
    run_args.tui || cfg.tui.enabled
}

pub fn apply_run_overrides(cfg: &mut AppConfig, run_args: &RunArgs) {
    if let Some(url) = &run_args.base_url {
        cfg.backend.base_url = url.clone();
    }
    if let Some(key) = &run_args.api_key {
        cfg.backend.api_key = key.clone();
    }
    if let Some(ms) = run_args.interval_ms {
        cfg.replay.interval_ms = ms;
    }
    if let Some(ms) = run_args.timeout_ms {
        cfg.backend.request_timeout_ms = Some(ms);
    }
}

/// `--players`, else one player per `--model`, else the configured default.
pub fn resolve_players(form: &FormConfig, run_args: &RunArgs) -> usize {
    let requested = run_args.players.unwrap_or(if run_args.models.is_empty() {
        form.default_players
    } else {
        run_args.models.len()
    });
    form.clamp_players(requested)
}

/// Point row `index` at `model`: a catalog entry is selected directly, anything
/// else (or `custom:<id>`) goes into the custom override.
pub fn apply_model_arg(form: &mut FormBuilder, index: usize, model: &str) {
    let model = model.trim();
    if let Some(custom) = model.strip_prefix("custom:") {
        form.select(index, CUSTOM_OPTION);
        form.set_override(index, custom);
        return;
    }
    if !form.select(index, model) {
        form.select(index, CUSTOM_OPTION);
        form.set_override(index, model);
    }
}

pub fn build_form(
    cfg: &FormConfig,
    players: usize,
    catalog: &[String],
    models: &[String],
) -> FormBuilder {
    let mut form = FormBuilder::new(cfg.default_model.clone());
    form.render(players, catalog);
    for (i, model) in models.iter().take(players).enumerate() {
        apply_model_arg(&mut form, i + 1, model);
    }
    form
}

#[tracing::instrument(name = "cli.run_app", skip(run_args, cfg))]
pub async fn run_app(run_args: RunArgs, mut cfg: AppConfig) -> Result<i32, CliError> {
    apply_run_overrides(&mut cfg, &run_args);
    let players = resolve_players(&cfg.form, &run_args);

    let backend =
        factory::build_backend(&cfg.backend).map_err(|e| CliError::Config(e.to_string()))?;
    let catalog = factory::build_catalog(backend.clone());
    let controller = factory::build_controller(&cfg, backend);

    let mut should_use_tui = wants_tui(&run_args, &cfg);
    if should_use_tui {
        if let Err(reason) = crate::tui::check_tui_support() {
            tracing::warn!(target: "escoba.cli", reason = %reason, "TUI disabled");
            should_use_tui = false;
        }
    }
    tracing::debug!(
        target: "escoba.cli",
        players = players,
        tui = should_use_tui,
        base_url = %cfg.backend.base_url,
        "run initialized"
    );

    let ctx = RunContext {
        cfg,
        players,
        models: run_args.models,
        catalog,
        controller,
    };

    if should_use_tui {
        tui::run_tui_flow(&ctx).await
    } else {
        standard::run_standard_flow(&ctx).await
    }
}
