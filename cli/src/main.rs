use clap::Parser;
use escoba_cli::app;
use escoba_cli::commands::{cli, models};
use escoba_core::api::{AppConfig, CliError, DispatchError, LoggingConfig};
use escoba_core::config;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            exit_code_for_error(&e)
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = load_config(args.config.as_deref()).map_err(|e| CliError::Config(e.to_string()))?;

    let mut logging = cfg.logging.clone();
    if let cli::Commands::Run(run_args) = &args.command {
        if app::wants_tui(run_args, &cfg) {
            // stderr output would corrupt the alternate screen
            logging.console = false;
            logging.enabled = logging.enabled && logging.file;
        }
    }
    init_tracing(&logging).map_err(CliError::Command)?;

    dispatch(args.command, cfg).await
}

fn load_config(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return config::load_default();
    };
    let expanded = shellexpand::tilde(path);
    let mut cfg = config::load_from_path(std::path::Path::new(expanded.as_ref()))?;
    config::apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config / invalid run configuration
    // 20: transport / IO error
    // 50: internal/uncategorized
    // 130: cancelled (returned as a normal exit code, not as an error)
    match e {
        CliError::Config(_) => 11,
        CliError::Run(DispatchError::Validation(_)) => 11,
        CliError::Run(DispatchError::Transport(_)) => 20,
        CliError::Catalog(_) => 20,
        CliError::Io(_) => 20,
        CliError::Command(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

async fn dispatch(cmd: cli::Commands, cfg: AppConfig) -> Result<i32, CliError> {
    match cmd {
        cli::Commands::Run(run_args) => app::run_app(run_args, cfg).await,
        cli::Commands::Models(models_args) => models::models_cmd(models_args, cfg).await,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone()).map_err(|e| e.to_string())?,
    };

    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(shellexpand::tilde(d).as_ref()),
            None => std::env::temp_dir().join("escoba-cli"),
        };

        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let file_name = format!("escoba-cli.{}.log", std::process::id());
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    if !logging.console && maybe_writer.is_none() {
        return Err("logging disabled for both console and file".to_string());
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(())
}
