#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the incident hotline.
//!
//! ```text
//! hotline report --type Fire --location Downtown --description "..." --name "..." --contact 09123456789
//! hotline list [--type Fire] [--status Pending] [--location Downtown] [--search smoke] [--json]
//! hotline stats [filters] [--json]
//! hotline signup --username maria --first-name Maria --last-name Santos
//! hotline login --username maria
//! hotline hotlines [--json]
//! hotline export [--accounts]
//! hotline migrate
//! ```
//!
//! Store locations come from `--config`/`$HOTLINE_CONFIG` and
//! `--data-dir`/`$HOTLINE_DATA_DIR`. Set `RUST_LOG=debug` for diagnostics.

mod hotlines;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dialoguer::Password;
use hotline_account::{AccountService, FileAccountRepository};
use hotline_codec::{Layout, Record};
use hotline_incident::{FileIncidentRepository, IncidentService, ReportForm};
use hotline_store::{RecordStore, StoreConfig, StoreError};

#[derive(Parser)]
#[command(name = "hotline", about = "Report and review community incidents")]
struct Cli {
    /// TOML config file (defaults to `$HOTLINE_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the store files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Only this incident type (case-insensitive)
    #[arg(long = "type")]
    incident_type: Option<String>,

    /// Only this status (case-insensitive)
    #[arg(long)]
    status: Option<String>,

    /// Only this location (case-insensitive)
    #[arg(long)]
    location: Option<String>,

    /// Free-text search across all fields
    #[arg(long)]
    search: Option<String>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a new incident report
    Report {
        /// Incident type, e.g. Fire, Flood, Accident, Crime, Medical
        #[arg(long = "type")]
        incident_type: String,
        /// Where it happened
        #[arg(long)]
        location: String,
        /// What happened
        #[arg(long)]
        description: String,
        /// Reporter's name
        #[arg(long)]
        name: String,
        /// Reporter's mobile number
        #[arg(long)]
        contact: String,
    },
    /// List incidents
    List(FilterArgs),
    /// Show incident statistics
    Stats(FilterArgs),
    /// Create an account
    Signup {
        /// Login name
        #[arg(long)]
        username: String,
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Check a username and password
    Login {
        /// Login name
        #[arg(long)]
        username: String,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// List emergency hotlines
    Hotlines {
        /// Print JSON instead of a listing
        #[arg(long)]
        json: bool,
    },
    /// Print a store in the legacy container layout
    Export {
        /// Export accounts instead of incidents
        #[arg(long)]
        accounts: bool,
    },
    /// Rewrite both store files in the line layout
    Migrate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = StoreConfig::resolve(cli.config.as_deref(), cli.data_dir.as_deref())?;
    log::debug!("Using data directory {}", config.data_dir.display());

    match cli.command {
        Commands::Report {
            incident_type,
            location,
            description,
            name,
            contact,
        } => {
            let service = IncidentService::new(FileIncidentRepository::from_config(&config));
            let form = ReportForm {
                incident_type,
                location,
                description,
                reporter: name,
                contact,
            };

            match service.submit_report(&form) {
                Ok(record) => {
                    println!("Report submitted successfully!");
                    println!(
                        "{} at {} ({})",
                        record.incident_type, record.location, record.created_at
                    );
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::List(filter) => {
            let service = IncidentService::new(FileIncidentRepository::from_config(&config));
            let records = service.filtered(
                filter.incident_type.as_deref(),
                filter.status.as_deref(),
                filter.location.as_deref(),
                filter.search.as_deref(),
            );

            if filter.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No incidents found.");
            } else {
                print!("{}", output::incident_table(&records));
                println!("\n{} incident(s)", records.len());
            }
        }
        Commands::Stats(filter) => {
            let service = IncidentService::new(FileIncidentRepository::from_config(&config));
            let records = service.filtered(
                filter.incident_type.as_deref(),
                filter.status.as_deref(),
                filter.location.as_deref(),
                filter.search.as_deref(),
            );
            let report = output::StatsReport {
                statistics: hotline_analytics::calculate_statistics(&records),
                locations: hotline_analytics::location_counts(&records),
            };

            if filter.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!(
                    "{}",
                    output::statistics_report(&report.statistics, &report.locations)
                );
            }
        }
        Commands::Signup {
            username,
            first_name,
            last_name,
            password,
        } => {
            let service = AccountService::new(FileAccountRepository::from_config(&config));
            let password = match password {
                Some(password) => password,
                None => Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()?,
            };

            match service.signup(&username, &password, &first_name, &last_name) {
                Ok(_) => println!("Account created successfully!"),
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Login { username, password } => {
            let service = AccountService::new(FileAccountRepository::from_config(&config));
            let password = match password {
                Some(password) => password,
                None => Password::new().with_prompt("Password").interact()?,
            };

            if service.login(&username, &password) {
                let name = service
                    .accounts()
                    .into_iter()
                    .find(|account| account.username == username)
                    .map_or_else(|| username.clone(), |account| account.display_name());
                println!("Welcome, {name}!");
            } else {
                eprintln!("Invalid username or password.");
                std::process::exit(1);
            }
        }
        Commands::Hotlines { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(hotlines::HOTLINES)?);
            } else {
                println!("Emergency hotlines\n");
                for contact in hotlines::HOTLINES {
                    println!("{}\n", contact.render());
                }
            }
        }
        Commands::Export { accounts } => {
            let text = if accounts {
                export(FileAccountRepository::from_config(&config).store())?
            } else {
                export(FileIncidentRepository::from_config(&config).store())?
            };
            println!("{text}");
        }
        Commands::Migrate => {
            migrate(FileIncidentRepository::from_config(&config).store())?;
            migrate(FileAccountRepository::from_config(&config).store())?;
        }
    }

    Ok(())
}

fn export<R: Record>(store: &RecordStore<R>) -> Result<String, Box<dyn std::error::Error>> {
    let records = store.load_all()?;
    Ok(hotline_codec::legacy::encode_container(&records)?)
}

fn migrate<R: Record>(store: &RecordStore<R>) -> Result<(), StoreError> {
    let layout = store.layout()?;
    if layout == Layout::Empty {
        println!("{}: nothing to migrate", store.path().display());
        return Ok(());
    }

    let records = store.load_all()?;
    store.rewrite_all(&records)?;
    println!(
        "{}: rewrote {} record(s) (was {layout:?})",
        store.path().display(),
        records.len()
    );
    if layout == Layout::Legacy {
        println!(
            "{}: original kept as {}",
            store.path().display(),
            store.backup_path().display()
        );
    }
    Ok(())
}
