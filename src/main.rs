use std::{fs, path::Path, sync::Mutex};

use anyhow::{bail, Context, Result};
use glide::{cli::Cli, config::Config, tui};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const SAMPLE_CODE: &str = "\
# Write Python here and press F5 to run it.
name = \"Glide\"
for i in range(3):
    print(f\"Hello from {name}! ({i})\")
";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Cli::parse();

    // Load config, then let CLI flags win
    let mut cfg = Config::load();
    if let Some(python) = &args.python {
        cfg.set("GLIDE_PYTHON", python.clone());
    }
    if let Some(dir) = &args.download_dir {
        cfg.set("GLIDE_DOWNLOAD_DIR", dir.display().to_string());
    }

    init_logging(&cfg.log_path(), args.verbose)?;

    let code = match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => SAMPLE_CODE.to_string(),
    };

    if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
        bail!("glide must be run from an interactive terminal");
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "glide starting");
    let result = tui::run(&cfg, &code).await;
    tracing::info!("glide exiting");
    result
}

/// Route `tracing` output to the log file; the terminal belongs to the TUI.
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("GLIDE_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
