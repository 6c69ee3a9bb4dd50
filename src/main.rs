//! ninebox - responsive nine-box color grid for the terminal
//!
//! Nine colored boxes that switch between a desktop and a mobile arrangement at a
//! width breakpoint. Clicking any box reshuffles the palette.

mod config;
mod core;
mod frontend;

use crate::core::layout::ContainerRole;
use crate::core::{AppCore, Viewport};
use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use frontend::{Frontend, FrontendEvent, TuiFrontend};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(ClapParser)]
#[command(name = "ninebox")]
#[command(about = "Responsive nine-box color grid", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.ninebox)
    /// Can also be set via NINEBOX_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Override the mobile breakpoint, e.g. "(max-width: 480px)"
    #[arg(short, long, value_name = "QUERY")]
    breakpoint: Option<String>,

    /// Seed for the palette shuffle sequence
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a config file
    ValidateConfig {
        /// Path to config file (defaults to the data directory's config.toml)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Print the layout composed for a viewport width, without starting the UI
    Dump {
        /// Viewport width in pixels
        #[arg(short, long, default_value_t = 1024)]
        width: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: DumpFormat,
    },
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum DumpFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    // TUI apps can't log to stdout, so we write to a file
    // (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("ninebox.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
        tracing::info!("Using custom data directory: {:?}", data_dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }

    if let Some(Commands::ValidateConfig { file }) = &cli.command {
        return validate_config(file.as_deref());
    }

    let mut config = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };
    if let Some(query) = &cli.breakpoint {
        config.breakpoint.query = query.clone();
    }
    if let Some(seed) = cli.seed {
        config.palette.seed = Some(seed);
    }
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Some(Commands::Dump { width, format }) => dump_layout(config, width, format),
        _ => run_tui(config),
    }
}

fn validate_config(file: Option<&std::path::Path>) -> Result<()> {
    let (path, result) = match file {
        Some(path) => (path.to_path_buf(), config::Config::load_from_path(path)),
        None => {
            let path = config::Config::config_path()?;
            let result = config::Config::load_from_path(&path);
            (path, result)
        }
    };
    println!("Validating config file: {:?}", path);

    let config = match result {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    match config.validate() {
        Ok(()) => {
            println!("✓ Config is valid");
            println!("  breakpoint: {}", config.breakpoint.query);
            println!("  palette: {}", config.palette.colors.join(" "));
            match config.palette.seed {
                Some(seed) => println!("  shuffle seed: {}", seed),
                None => println!("  shuffle seed: random"),
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn dump_layout(config: config::Config, width: u32, format: DumpFormat) -> Result<()> {
    let viewport = Rc::new(Viewport::with_width(width, config.viewport.cell_width_px));
    let mut app_core = AppCore::new(config, viewport)?;
    let is_mobile = app_core.is_mobile();
    let width_px = app_core.viewport().width_px();
    let palette = app_core.palette();
    let tree = app_core.layout();

    match format {
        DumpFormat::Text => {
            println!(
                "viewport {}px: {} layout",
                width_px,
                if is_mobile { "mobile" } else { "desktop" }
            );
            println!("palette: {}", palette.colors().join(" "));
            println!(
                "amplified wrappers: {}",
                tree.count_containers(ContainerRole::Amplified)
            );
            print!("{}", tree.outline());
        }
        DumpFormat::Json => {
            let json = serde_json::to_string_pretty(tree).context("Failed to serialize layout")?;
            println!("{}", json);
        }
    }
    Ok(())
}

fn run_tui(config: config::Config) -> Result<()> {
    // Fails before touching the terminal if its size can't be read
    let mut app_core = AppCore::from_terminal(config)?;
    let mut frontend = TuiFrontend::new(&app_core.config.render)?;
    tracing::info!(size = ?frontend.size(), "Terminal UI started");

    let result = event_loop(&mut app_core, &mut frontend);

    app_core.shutdown();
    frontend.cleanup()?;
    tracing::info!("Terminal UI stopped");
    result
}

fn event_loop(app_core: &mut AppCore, frontend: &mut TuiFrontend) -> Result<()> {
    while app_core.running {
        if app_core.needs_render {
            frontend.render(app_core)?;
            app_core.needs_render = false;
        }

        for event in frontend.poll_events()? {
            handle_frontend_event(app_core, &*frontend, event);
        }
    }
    Ok(())
}

fn handle_frontend_event(app_core: &mut AppCore, frontend: &dyn Frontend, event: FrontendEvent) {
    if let Some((x, y)) = event.left_click() {
        if let Some(number) = frontend.box_at(x, y) {
            app_core.click_box(number);
        }
        return;
    }

    match event {
        FrontendEvent::Key { code, modifiers } => app_core.handle_key(code, modifiers),
        FrontendEvent::Resize { width, height } => app_core.resize(width, height),
        FrontendEvent::Mouse { .. } => {}
    }
}
