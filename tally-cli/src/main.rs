use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tally_core::ShopCategory;
use tally_ingest::{Dataset, DatasetCache};

mod config;
mod logging;
mod render;
mod state;

use config::{load_config, Config, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("TALLY_BUILD_SHA"), ")"),
    about = "Monthly new vs. repeated shop sales report"
)]
struct Cli {
    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List employees found in the sales log
    Employees {
        /// Sales log CSV (default: config data.csv, then ./sales.csv)
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Monthly report with KPIs and per-shop tables for one employee
    Report {
        #[arg(long)]
        employee: String,

        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output format (default: config output.format)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Include a bar chart of monthly sales (table output only)
        #[arg(long, default_value_t = false)]
        chart: bool,
    },

    /// Per-shop breakdown only
    Shops {
        #[arg(long)]
        employee: String,

        #[arg(long)]
        csv: Option<PathBuf>,

        /// Only rows of this category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CategoryArg {
    New,
    Repeated,
}

impl From<CategoryArg> for ShopCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::New => ShopCategory::New,
            CategoryArg::Repeated => ShopCategory::Repeated,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    logging::init_logging(cli.verbose, &cfg.log.level);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Employees { csv } => {
            let dataset = load_dataset(&cfg, csv)?;
            for name in dataset.employees() {
                writeln!(out, "{name}")?;
            }
        }

        Command::Report {
            employee,
            csv,
            format,
            chart,
        } => {
            let dataset = load_dataset(&cfg, csv)?;
            let Some(report) = dataset.report(&employee) else {
                writeln!(out, "No data found for employee: {employee}")?;
                return Ok(());
            };

            match format.unwrap_or(cfg.output.format) {
                OutputFormat::Table => {
                    render::write_report_table(&mut out, &report, cfg.output.decimals, chart)?
                }
                OutputFormat::Json => render::write_report_json(&mut out, &report)?,
                OutputFormat::Csv => render::write_monthly_csv(&mut out, &report.monthly)?,
            }
        }

        Command::Shops {
            employee,
            csv,
            category,
            format,
        } => {
            let dataset = load_dataset(&cfg, csv)?;
            let Some(report) = dataset.report(&employee) else {
                writeln!(out, "No data found for employee: {employee}")?;
                return Ok(());
            };

            let category = category.map(ShopCategory::from);
            let rows = report
                .shops
                .iter()
                .filter(|r| category.is_none_or(|c| r.category == c));

            match format.unwrap_or(cfg.output.format) {
                OutputFormat::Table => render::write_shop_table(&mut out, rows, cfg.output.decimals)?,
                OutputFormat::Json => render::write_shops_json(&mut out, rows)?,
                OutputFormat::Csv => render::write_shops_csv(&mut out, rows)?,
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                writeln!(out, "# {}", config::config_path()?.display())?;
                write!(out, "{}", toml::to_string_pretty(&cfg).context("serialize config")?)?;
            }
        },
    }

    Ok(())
}

fn load_dataset(cfg: &Config, csv: Option<PathBuf>) -> Result<Arc<Dataset>> {
    let path = cfg.resolve_csv(csv);
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }
    let cache = DatasetCache::new(&path);
    cache
        .get()
        .with_context(|| format!("loading {}", path.display()))
}
