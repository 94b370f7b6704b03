#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the NC resilience dashboard.
//!
//! Runs a subcommand when one is given; otherwise shows a menu and guides
//! the user through the chosen tool with prompts.
//!
//! Uses `indicatif-log-bridge` (via [`nc_resilience_cli_utils::init_logger`])
//! so log lines and progress bars share the terminal cleanly.

mod crisis;
mod export;
mod prompts;
mod wizard;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::Select;
use nc_resilience_api::ApiClient;
use nc_resilience_county_models::{CountyFips, EntityType, HazardType};
use nc_resilience_export::ExportFormat;
use nc_resilience_server::ServerConfig;

#[derive(Parser)]
#[command(
    name = "nc_resilience_cli",
    about = "NC county resilience dashboard toolchain"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the dashboard server (configured from the environment)
    Serve,
    /// Walk through the self-assessment wizard
    Assess {
        /// Sector to assess (`agriculture` or `small-business`)
        #[arg(long)]
        entity_type: Option<EntityType>,
    },
    /// Export a county impact report
    Export {
        /// Five-digit county FIPS code (e.g. "37183")
        fips: CountyFips,
        /// Output format: csv, json or text
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Sector lens for the report
        #[arg(long, default_value = "agriculture")]
        entity_type: EntityType,
        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Export the statewide resilience ranking as CSV
    ExportRankings {
        /// Sector lens for the ranking
        #[arg(long, default_value = "agriculture")]
        entity_type: EntityType,
        /// Maximum number of counties
        #[arg(long)]
        limit: Option<u32>,
        /// Directory to write the file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Show crisis-mode resources, optionally for one hazard code (e.g. HRCN)
    Crisis {
        hazard: Option<HazardType>,
    },
}

/// Top-level tool selection for the interactive menu.
enum Tool {
    Assess,
    ExportReport,
    ExportRankings,
    Crisis,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[
        Self::Assess,
        Self::ExportReport,
        Self::ExportRankings,
        Self::Crisis,
        Self::Server,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Assess => "Self-assessment wizard",
            Self::ExportReport => "Export county impact report",
            Self::ExportRankings => "Export county rankings",
            Self::Crisis => "Crisis resources",
            Self::Server => "Start server",
        }
    }
}

async fn serve(interactive: bool) -> Result<(), Box<dyn std::error::Error>> {
    // actix-web runs its own runtime; keep it off the tokio worker.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(async move {
            if interactive {
                nc_resilience_server::interactive::run().await
            } else {
                nc_resilience_server::run_server(ServerConfig::from_env()).await
            }
        })
    })
    .await??;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = nc_resilience_cli_utils::init_logger();
    let cli = Cli::parse();
    let api = ApiClient::from_env();
    log::debug!("Using resilience API at {}", api.base_url());

    match cli.command {
        Some(Commands::Serve) => serve(false).await?,
        Some(Commands::Assess { entity_type }) => wizard::run(&api, entity_type).await?,
        Some(Commands::Export {
            fips,
            format,
            entity_type,
            out_dir,
        }) => {
            let path =
                export::county_report(&api, &multi, &fips, entity_type, format, &out_dir).await?;
            println!("Wrote {}", path.display());
        }
        Some(Commands::ExportRankings {
            entity_type,
            limit,
            out_dir,
        }) => {
            let path = export::rankings(&api, &multi, entity_type, limit, &out_dir).await?;
            println!("Wrote {}", path.display());
        }
        Some(Commands::Crisis { hazard }) => crisis::print(hazard),
        None => run_menu(&api, &multi).await?,
    }

    Ok(())
}

async fn run_menu(
    api: &ApiClient,
    multi: &nc_resilience_cli_utils::MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("NC Resilience Dashboard");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Assess => wizard::run(api, None).await?,
        Tool::ExportReport => export::interactive_report(api, multi).await?,
        Tool::ExportRankings => export::interactive_rankings(api, multi).await?,
        Tool::Crisis => crisis::interactive()?,
        Tool::Server => serve(true).await?,
    }

    Ok(())
}
