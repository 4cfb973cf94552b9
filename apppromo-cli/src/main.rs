mod preview;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use preview::Report;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "apppromo")]
#[command(version, about = "Preview the Android app promotion banner", long_about = None)]
struct Cli {
    /// Log lifecycle details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default), json
    #[arg(short, long, global = true, default_value = "pretty")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount the banner and print the resulting container HTML
    Render {
        /// JSON file with banner options (camelCase keys)
        #[arg(short, long)]
        options: Option<PathBuf>,
        /// Platform the page is viewed on
        #[arg(short, long, default_value_t = Platform::Android)]
        platform: Platform,
        /// Pretend the dismissal cookie is already set
        #[arg(long)]
        dismissed: bool,
    },
    /// Mount the banner, click close and run the collapse delay
    Simulate {
        /// JSON file with banner options (camelCase keys)
        #[arg(short, long)]
        options: Option<PathBuf>,
        /// Platform the page is viewed on
        #[arg(short, long, default_value_t = Platform::Android)]
        platform: Platform,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Platform {
    Android,
    Ios,
    Desktop,
    Unknown,
}

impl From<Platform> for apppromo_ui::Platform {
    fn from(p: Platform) -> Self {
        match p {
            Platform::Android => apppromo_ui::Platform::Android,
            Platform::Ios => apppromo_ui::Platform::Ios,
            Platform::Desktop => apppromo_ui::Platform::Desktop,
            Platform::Unknown => apppromo_ui::Platform::Unknown,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", apppromo_ui::Platform::from(*self).as_str())
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &Report, format: &str) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&report.to_json())?);
        return Ok(());
    }

    let state = match report.state {
        apppromo_ui::BannerState::Visible => report.state.as_str().green(),
        apppromo_ui::BannerState::Dismissed => report.state.as_str().yellow(),
        apppromo_ui::BannerState::Suppressed => report.state.as_str().dimmed(),
    };
    println!("{} {}", "state:".bold(), state);
    println!("{} {}", "key:".bold(), report.key);
    for cookie in &report.cookies {
        println!("{} {}", "cookie:".bold(), cookie);
    }
    if let Some(fired) = report.callback_fired {
        let label = if fired { "fired".green() } else { "not fired".dimmed() };
        println!("{} {}", "callback:".bold(), label);
    }
    println!("{}", report.html);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = match cli.command {
        Commands::Render {
            options,
            platform,
            dismissed,
        } => {
            let options = preview::load_options(options.as_deref())?;
            preview::render(options, platform.into(), dismissed)?
        }
        Commands::Simulate { options, platform } => {
            let options = preview::load_options(options.as_deref())?;
            preview::simulate(options, platform.into())?
        }
    };

    print_report(&report, &cli.format)
}
