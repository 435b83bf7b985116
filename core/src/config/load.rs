use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default escoba data directory: ~/.escoba
pub fn get_escoba_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".escoba"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.escoba/config.toml (highest)
    let escoba_config = get_escoba_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg = if escoba_config.exists() {
        load_from_path(&escoba_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok());
    Ok(cfg)
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    if cfg.form.default_model.trim().is_empty() {
        anyhow::bail!(
            "invalid config {}: form.default_model must not be blank",
            path.display()
        );
    }
    tracing::debug!(target: "escoba.config", path = %path.display(), "config loaded");
    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest). Blank values are ignored.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_blank("ESCOBA_BASE_URL") {
        cfg.backend.base_url = v;
    }
    if let Some(v) = non_blank("ESCOBA_API_KEY") {
        cfg.backend.api_key = v;
    }
    if let Some(v) = non_blank("ESCOBA_DEFAULT_MODEL") {
        cfg.form.default_model = v.trim().to_string();
    }
}
