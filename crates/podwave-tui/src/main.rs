mod action;
mod app;
mod app_state;
mod component;
mod components;
mod error;
mod navigation;
mod playback;
mod prefs;
mod render;
mod session;
mod snapshot;
mod theme;
mod widgets;

#[cfg(test)]
mod flow_tests;

use std::path::PathBuf;

use clap::Parser;
use podwave_proto::client::ApiClient;
use podwave_proto::config::Config;

#[derive(Parser, Debug)]
#[command(name = "podwave", about = "Terminal client for the PodWave podcast demo")]
struct Args {
    /// Backend base URL, overriding `api.base_url`.
    #[arg(long)]
    api_url: Option<String>,

    /// Config file to load instead of the default one.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let data_dir = podwave_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("podwave.log");
    let prefs_path = data_dir.join(prefs::PREFS_FILE);

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; HTTP client internals stay at warn.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("podwave log: {}", log_path.display());

    tracing::info!("podwave starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("config load failed, using defaults: {:#}", e);
            Config::default()
        }),
    };
    if let Some(url) = args.api_url {
        config.api.base_url = url;
    }
    tracing::info!("backend at {}", config.api.base_url);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let client = ApiClient::new(config.api.base_url.clone());
    let settings = app::AppSettings::from_config(&config, prefs_path);
    app::App::new(client, settings).run().await
}
