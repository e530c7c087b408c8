use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, bail};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tiling_core::common::config::{Config, config_file, restore_file};
use tiling_core::common::log;
use tiling_core::layout_engine::{LayoutCommand, LayoutEvent, LayoutKind, TilingEngine};
use tiling_core::sys::geometry::Rect;
use tracing::{info, warn};

/// Runs a scripted sequence of tile events through the tiling engine and
/// prints the resulting window frames as JSON.
#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Screen rectangle as X,Y,WIDTH,HEIGHT.
    #[arg(long, value_name = "X,Y,W,H", value_parser = parse_rect, default_value = "0,0,1920,1080")]
    screen: Rect,

    /// Layout to start with instead of the configured default.
    #[arg(long)]
    layout: Option<LayoutKind>,

    /// RON file holding a list of steps, each `event(...)` or `command(...)`.
    #[arg(long, value_name = "PATH")]
    script: Option<PathBuf>,

    /// Start from the layout saved with --save-default instead of an empty screen.
    #[arg(long)]
    restore: bool,

    /// Print the layout tree to stderr after running the script.
    #[arg(long)]
    draw_tree: bool,

    /// Only check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    /// Save the final layout to this path for a later --restore.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,

    /// Save the final layout to the default restore file.
    #[arg(long, conflicts_with = "save")]
    save_default: bool,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "snake_case")]
enum Step {
    Event(LayoutEvent),
    Command(LayoutCommand),
}

#[derive(Serialize)]
struct Output {
    layout: LayoutKind,
    frames: Vec<Rect>,
    /// Steps the engine refused, by position in the script.
    rejected: Vec<Rejected>,
}

#[derive(Serialize)]
struct Rejected {
    step: usize,
    error: String,
}

fn parse_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>().map_err(|e| format!("{p:?}: {e}")))
        .collect::<Result<_, _>>()?;
    match parts[..] {
        [x, y, width, height] if width >= 0.0 && height >= 0.0 => Ok(Rect::new(x, y, width, height)),
        [_, _, _, _] => Err("width and height must not be negative".to_string()),
        _ => Err(format!("expected four numbers, got {}", parts.len())),
    }
}

fn load_config(opt: &Cli) -> anyhow::Result<Config> {
    let path = opt.config.clone().or_else(config_file);
    match path {
        Some(path) if path.exists() => Config::read(&path),
        Some(path) if opt.config.is_some() => bail!("config file {} does not exist", path.display()),
        _ => Ok(Config::default()),
    }
}

fn read_script(path: &Path) -> anyhow::Result<Vec<Step>> {
    let buf = std::fs::read_to_string(path)
        .with_context(|| format!("reading script {}", path.display()))?;
    ron::from_str(&buf).with_context(|| format!("parsing script {}", path.display()))
}

fn run(opt: Cli) -> anyhow::Result<()> {
    let mut config = load_config(&opt)?;

    if opt.validate {
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
            return Ok(());
        }
        for issue in issues {
            eprintln!("{issue}");
        }
        process::exit(1);
    }

    if let Some(kind) = opt.layout {
        config.layout.default_layout = kind;
    }
    for issue in config.validate() {
        warn!("config: {issue}");
    }

    let mut engine = if opt.restore {
        let path = restore_file().context("no data directory for the restore file")?;
        TilingEngine::load(&path).with_context(|| format!("restoring {}", path.display()))?
    } else {
        TilingEngine::new(opt.screen, config.layout.clone())
    };

    let steps = match &opt.script {
        Some(path) => read_script(path)?,
        None => Vec::new(),
    };
    let mut rejected = Vec::new();
    for (i, step) in steps.into_iter().enumerate() {
        match step {
            Step::Event(event) => {
                if let Err(e) = engine.handle_event(event) {
                    rejected.push(Rejected { step: i, error: e.to_string() });
                }
            }
            Step::Command(command) => {
                let _ = engine.handle_command(command);
            }
        }
    }

    if opt.draw_tree {
        eprintln!("{}", engine.draw_tree().trim_end());
    }

    let output = Output {
        layout: engine.layout_kind(),
        frames: engine.frames(),
        rejected,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    let save_to = match opt.save {
        Some(path) => Some(path),
        None if opt.save_default => {
            Some(restore_file().context("no data directory for the restore file")?)
        }
        None => None,
    };
    if let Some(path) = save_to {
        engine.save(&path).with_context(|| format!("saving layout to {}", path.display()))?;
        info!(path = %path.display(), "saved layout");
    }
    Ok(())
}

fn main() {
    let opt = Cli::parse();
    log::init_logging();
    if let Err(e) = run(opt) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
