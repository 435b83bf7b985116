//! `models`: print the selectable model identifiers.
use escoba_core::api::{AppConfig, CliError};
use escoba_plugins::factory;

use super::cli::ModelsArgs;

pub async fn models_cmd(args: ModelsArgs, mut cfg: AppConfig) -> Result<i32, CliError> {
    if let Some(url) = args.base_url {
        cfg.backend.base_url = url;
    }
    let backend =
        factory::build_backend(&cfg.backend).map_err(|e| CliError::Config(e.to_string()))?;
    let catalog = factory::build_catalog(backend);

    let models = if args.refresh {
        catalog.refresh().await?
    } else {
        catalog.current().await
    };

    if models.is_empty() {
        println!("(no models available, use a custom model id)");
    }
    for model in models {
        println!("{model}");
    }
    Ok(0)
}
