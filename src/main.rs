//! Catan DevMode - in-game UI layout editor console
//!
//! Reads command lines from stdin (or a script) and applies them to the
//! game's UI elements, menus and settings.

mod config;
mod core;
mod data;
mod validator;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(ClapParser)]
#[command(name = "catan-devmode")]
#[command(about = "DevMode console for editing Catan UI layouts", long_about = None)]
struct Cli {
    /// Custom data directory (default: ~/.catan-devmode)
    /// Can also be set via CATAN_DEVMODE_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Replay commands from a file (one per line, `#` starts a comment)
    #[arg(short, long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Start with DevMode already enabled
    #[arg(long)]
    enable: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate layout configuration
    ValidateLayout {
        /// Layout file to validate (default: the layout in the data directory)
        #[arg(value_name = "FILE")]
        layout: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging to file (use RUST_LOG env var to control level, e.g. RUST_LOG=debug)
    // stdout is the console, so logs go to a file
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("catan-devmode.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let cli = Cli::parse();

    if let Some(dir) = &cli.data_dir {
        tracing::info!("Using custom data directory: {:?}", dir);
    } else if let Ok(env_dir) = std::env::var(config::DATA_DIR_ENV) {
        tracing::info!("Using data directory from {}: {}", config::DATA_DIR_ENV, env_dir);
    }
    let cfg = config::Config::resolve(cli.data_dir.clone())?;

    if let Some(Commands::ValidateLayout { layout }) = &cli.command {
        let ok = run_validate(layout.as_deref(), &cfg)?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let layout = config::Layout::load(&cfg.layout_path())?;
    let settings = config::Settings::load(&cfg.settings_path())?;
    let store = Box::new(config::FileStore::new(cfg.clone()));
    let mut app = core::AppCore::new(cfg, layout, settings, store)?;
    if cli.enable {
        app.session.set_enabled(true);
    }

    match &cli.script {
        Some(path) => run_script(&mut app, path),
        None => run_repl(&mut app),
    }
}

/// Returns false when the layout has errors
fn run_validate(path: Option<&Path>, cfg: &config::Config) -> Result<bool> {
    let layout = match path {
        Some(path) => {
            println!("Validating layout file: {:?}", path);
            config::Layout::load_from_file(path)
        }
        None => {
            println!("Validating layout: {:?}", cfg.layout_path());
            config::Layout::load(&cfg.layout_path())
        }
    };

    let layout = match layout {
        Ok(layout) => layout,
        Err(e) => {
            eprintln!("✗ Failed to load layout: {:#}", e);
            return Ok(false);
        }
    };

    println!("✓ Layout loaded successfully");
    println!(
        "  {} elements, {} menus defined",
        layout.elements.len(),
        layout.menus.len()
    );

    let issues = validator::validate_layout(&layout);
    for issue in &issues {
        eprintln!("{}", issue);
    }

    let errors = validator::count(&issues, validator::IssueKind::Error);
    let warnings = validator::count(&issues, validator::IssueKind::Warning);
    if errors == 0 && warnings == 0 {
        println!("✓ Layout is valid with no issues");
    } else {
        if errors > 0 {
            eprintln!("\n✗ Found {} error(s)", errors);
        }
        if warnings > 0 {
            println!("⚠ Found {} warning(s)", warnings);
        }
    }

    Ok(errors == 0)
}

fn run_script(app: &mut core::AppCore, path: &Path) -> Result<()> {
    let contents =
        std::fs::read_to_string(path).context(format!("Failed to read script: {:?}", path))?;
    tracing::info!("Running script {:?}", path);

    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        println!("> {}", trimmed);
        app.handle_line(line);
        print_messages(app);
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn run_repl(app: &mut core::AppCore) -> Result<()> {
    println!("Catan DevMode console. Enter 0 to toggle DevMode, .help for commands.");
    println!("Data directory: {:?}", app.config.data_dir);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    while app.running {
        print!("{}> ", if app.session.is_enabled() { "dev" } else { "game" });
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        app.handle_line(&line);
        print_messages(app);
    }

    tracing::info!("Console closed");
    Ok(())
}

fn print_messages(app: &mut core::AppCore) {
    for message in app.take_messages() {
        println!("{}", message);
    }
    if app.needs_refresh {
        tracing::debug!("Element set changed ({} elements)", app.elements.len());
        app.needs_refresh = false;
    }
}
