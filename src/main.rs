mod collect;
mod config;
mod dispatch;
mod logger;
mod panels;
mod params;
mod store;
mod tabs;
mod web;

use anyhow::Context;
use log::info;

use config::Config;
use web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (cfg, path) = Config::load().context("loading configuration")?;
    logger::init(&cfg.log_level);
    match path {
        Some(p) => info!("config loaded from {}", p.display()),
        None => info!("no config found, using defaults"),
    }

    let addr = cfg.addr()?;
    web::serve(addr, AppState::new(cfg.max_sessions))
        .await
        .with_context(|| format!("serving on {addr}"))?;
    Ok(())
}
