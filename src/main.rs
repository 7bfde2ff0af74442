use anyhow::{Context, Result};
use recaudacion::{
    config::Settings,
    load::load_dataset,
    server::{self, AppState},
};
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) settings + logging ───────────────────────────────────────
    let settings = Settings::from_env()?;
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info").add_directive(settings.log_level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load the panel once; nothing starts without it ───────────
    let dataset = match load_dataset(&settings.panel_path) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            error!("cannot start: {}", e);
            return Err(e).context("loading collection panel");
        }
    };

    let state = Arc::new(AppState::new(dataset, settings.policy.clone())?);
    info!(
        tax_type = %state.defaults.tax_type,
        year = state.defaults.year,
        "default selection"
    );

    // ─── 3) serve ────────────────────────────────────────────────────
    let addr = settings.socket_addr()?;
    server::serve(state, settings.assets_dir.clone(), addr).await;

    Ok(())
}
