use clap::{Parser, Subcommand};
use notion_atlas::{config, output, resolve, scan};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notion-atlas")]
#[command(about = "Index and resolve a static Notion workspace export")]
#[command(long_about = "\
Index and resolve a static Notion workspace export

Point notion-atlas at an unpacked export and it builds the navigation tree,
resolves slugs and unique-id fragments to pages and datasets, and prints the
results as JSON for whatever serves them.

Export structure:

  data/
  ├── index.html                       # Root navigation (anchor list)
  ├── Getting Started 4a1b….md         # Page (title + unique-id suffix)
  ├── Getting Started 4a1b…/           # Same-stem dir = nested sub-pages
  │   ├── Deep Dive 9f8e….md
  │   └── screenshot.png               # Assets are served, not listed
  ├── Board a1b2….csv                  # Dataset (view-filtered rows)
  ├── Board a1b2…_all.csv              # Complete variant (auto-paired)
  └── Projects 77aa…/                  # Directory without file = section

Requests are slugs ('getting-started') or slug+fragment strings
('some-page-a1b2c3d4') — the trailing dash token of at least 8 characters
falls back to unique-id matching when no slug matches.

Run 'notion-atlas gen-config' to generate a documented preview.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing preview.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Data root override (defaults to data_path from preview.toml)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the workspace navigation tree
    Nav {
        /// Emit the tree as JSON instead of a display listing
        #[arg(long)]
        json: bool,
    },
    /// Resolve a page by slug or id fragment and print it as JSON
    Page { request: String },
    /// Resolve a dataset pair by slug or id fragment and print it as JSON
    Csv { request: String },
    /// Parse the export and report its shape
    Check,
    /// Print a stock preview.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config_dir)?;
    let data_root = cli
        .data
        .clone()
        .unwrap_or_else(|| config.data_root(&cli.config_dir));

    match cli.command {
        Command::Nav { json } => {
            let ws = scan::scan(&data_root)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ws)?);
            } else {
                output::print_nav_output(&ws);
            }
        }
        Command::Page { request } => {
            let ws = scan::scan(&data_root)?;
            let resolved = resolve::resolve_page(&data_root, &ws.tree, &request)?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Csv { request } => {
            let ws = scan::scan(&data_root)?;
            let resolved = resolve::resolve_dataset(&data_root, &ws.tree, &request)?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Check => {
            println!("==> Checking {}", data_root.display());
            let ws = scan::scan(&data_root)?;
            output::print_nav_output(&ws);
            output::print_check_output(&ws);
            println!("==> Export is valid");
        }
        Command::GenConfig => unreachable!("handled above"),
    }

    Ok(())
}
