//! OBS Toggle - cycle OBS scenes or reveal a source from one command
//!
//! Each invocation connects to OBS, applies one toggle of the selected group
//! and exits.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use obs_toggle::{paths, toggle, ObsSession, ToggleConfig};

/// OBS Toggle - cycle scenes or reveal a source in OBS Studio
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Group to toggle (defaults to the first group in the config; extra
    /// arguments also fall back to the default)
    #[arg(num_args = 0.., allow_hyphen_values = true)]
    group: Vec<String>,

    /// Path to configuration file (defaults to config.yaml next to the executable)
    #[arg(short, long, env = "OBS_TOGGLE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// List scenes and their sources, then exit without changing anything
    #[arg(long)]
    list: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables
    let dotenv = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level)?;

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(_) => debug!("No .env file found"),
    }

    let config_path = paths::resolve_config_path(args.config.as_deref());
    info!("Configuration file: {}", config_path.display());

    let config = match ToggleConfig::load(&config_path).await {
        Ok(config) => config,
        Err(e) => {
            error!("Error reading config file {}", config_path.display());
            return Err(e).context(format!(
                "Could not load configuration from {}",
                config_path.display()
            ));
        },
    };

    let mut session = ObsSession::from_config(&config);
    session.connect().await?;

    let result = if args.list {
        list_scenes(&session).await
    } else {
        toggle_group(&session, &config, &args.group).await
    };

    session.disconnect().await;
    result
}

async fn toggle_group(session: &ObsSession, config: &ToggleConfig, positionals: &[String]) -> Result<()> {
    let group = toggle::select_group(config, positionals)
        .context("No group given and none configured")?;
    info!("Toggling group '{}'", group);

    let report = toggle::run(session, config, group)
        .await
        .with_context(|| format!("Failed to toggle group '{}'", group))?;

    info!(
        "✅ Done: {} change(s) applied (was on '{}')",
        report.applied.len(),
        report.previous_scene
    );
    Ok(())
}

async fn list_scenes(session: &ObsSession) -> Result<()> {
    use colored::*;

    let scenes = session.list_scenes().await?;

    println!("\n{}", "=== OBS Scenes ===".bold().cyan());
    for scene in &scenes {
        println!("\n  {}", scene.yellow());
        for item in session.list_scene_items(scene).await? {
            println!("    {}", item.green());
        }
    }
    println!();

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
