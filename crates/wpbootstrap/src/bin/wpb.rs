//! wpb - render plugin views from the command line.
//!
//! Useful for previewing views and checking which file a view name resolves
//! to, without a running CMS.
//!
//! ```text
//! wpb --config acme/plugin.yaml dispatch renderAdmin_Options --params '{"title":"Settings"}'
//! wpb --config acme/plugin.yaml --theme-root themes/site resolve Admin_Options
//! wpb path Admin_UserList
//! ```
//!
//! Set `WPB_LOG=debug` to see override and action events on stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use wpbootstrap::{MemoryHost, Plugin, PluginConfig};
use wpbootstrap_render::{checked_view_path, DEFAULT_EXTENSION};

#[derive(Parser)]
#[command(name = "wpb", version, about = "Render convention-named plugin views")]
struct Cli {
    /// Plugin configuration file
    #[arg(short, long, global = true, default_value = "plugin.yaml")]
    config: PathBuf,

    /// Active theme directory (overrides the config file)
    #[arg(long, global = true)]
    theme_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a render<Name> or call<Name> method
    Dispatch {
        /// Method name, e.g. renderAdmin_Options
        method: String,
        /// Parameters as a JSON value
        #[arg(short, long)]
        params: Option<String>,
    },
    /// Show which file a view name resolves to
    Resolve {
        /// View name, e.g. Admin_Options
        view: String,
    },
    /// Print the relative file derived from a view name
    Path {
        view: String,
        #[arg(short, long, default_value = DEFAULT_EXTENSION)]
        extension: String,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WPB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_plugin(cli: &Cli) -> Result<Plugin<MemoryHost>> {
    let mut config = PluginConfig::from_file(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(root) = &cli.theme_root {
        config.theme_root = Some(root.clone());
    }
    Ok(Plugin::new(config, MemoryHost::new())?)
}

fn parse_params(raw: Option<&str>) -> Result<Value> {
    match raw {
        Some(raw) => serde_json::from_str(raw).context("--params is not valid JSON"),
        None => Ok(Value::Null),
    }
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Dispatch { method, params } => {
            let plugin = load_plugin(&cli)?;
            let params = parse_params(params.as_deref())?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if let Some(returned) = plugin.handle(method, params, &mut out)? {
                out.write_all(returned.as_bytes())?;
            }
            writeln!(out)?;
        }
        Commands::Resolve { view } => {
            let plugin = load_plugin(&cli)?;
            let resolved = plugin.resolve(view)?;
            if resolved.is_override {
                println!("{} (theme override)", resolved.template_path.display());
            } else {
                println!("{}", resolved.template_path.display());
            }
        }
        Commands::Path { view, extension } => {
            let path = checked_view_path(view)
                .ok_or_else(|| anyhow!("invalid view name {:?}", view))?;
            println!("{}.{}", path, extension.trim_start_matches('.'));
        }
    }

    Ok(())
}
