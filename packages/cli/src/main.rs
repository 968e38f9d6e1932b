#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the incident reporting board.
//!
//! Plays the role the browser UI played in the original: a consumer of
//! the board contracts, not part of the core. State lives in a single
//! JSON key-value file, the stand-in for browser storage.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Password;
use incident_map_board::BoardError;
use incident_map_board::lifecycle::BoardController;
use incident_map_board::sort::SortDirection;
use incident_map_board::validate::ReportForm;
use incident_map_board::viewport::Bounds;
use incident_map_geocoder::Geocoder;
use incident_map_report_models::format_time;
use incident_map_storage::kv::{FileStore, KvStore};

#[derive(Parser)]
#[command(name = "incident-map", about = "Incident reporting board")]
struct Cli {
    /// Path of the JSON key-value store file.
    #[arg(long, default_value = "incident-map.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// File a new report.
    Add {
        /// Reporter name.
        #[arg(long)]
        name: String,
        /// Reporter phone number.
        #[arg(long)]
        phone: String,
        /// Incident type (e.g. "Flood").
        #[arg(long, value_name = "TYPE")]
        report_type: String,
        /// Location as strict "lat, lng" or free text to geocode.
        #[arg(long)]
        location: String,
        /// Optional comment.
        #[arg(long, default_value = "")]
        comment: String,
        /// Optional image URL.
        #[arg(long, default_value = "")]
        image: String,
    },
    /// List the reports visible in a bounding box.
    List {
        /// Viewport bounds; defaults to the whole world.
        #[arg(long, num_args = 4, value_names = ["SOUTH", "WEST", "NORTH", "EAST"], allow_negative_numbers = true)]
        bounds: Option<Vec<f64>>,
        /// Sort column: location, type, time, or status.
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending instead of ascending.
        #[arg(long)]
        desc: bool,
    },
    /// Show one report in full.
    Show {
        /// Index into the report list.
        index: usize,
    },
    /// Toggle a report's open/resolved status (password gated).
    Toggle {
        /// Index into the report list.
        index: usize,
    },
    /// Delete a report (password gated).
    Delete {
        /// Index into the report list.
        index: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    log::debug!("using data file {}", cli.data.display());
    let kv: Arc<dyn KvStore> = Arc::new(FileStore::open(&cli.data)?);
    let geocoder = Geocoder::new(Arc::clone(&kv))?;
    let mut controller = BoardController::new(kv, geocoder);

    let outcome = run(&mut controller, cli.command).await;
    if let Err(e) = outcome {
        eprintln!("{e}");
        std::process::exit(1);
    }

    Ok(())
}

async fn run(controller: &mut BoardController, command: Command) -> Result<(), BoardError> {
    match command {
        Command::Add {
            name,
            phone,
            report_type,
            location,
            comment,
            image,
        } => {
            let report = controller
                .submit(ReportForm {
                    reporter_name: name,
                    reporter_phone: phone,
                    report_type,
                    location,
                    comment,
                    image,
                })
                .await?;
            let location = controller.display_location(&report).await;
            println!("Filed {} report at {location}", report.report_type);
        }
        Command::List { bounds, sort, desc } => {
            let bounds = bounds.map_or_else(
                || Bounds::new(-90.0, -180.0, 90.0, 180.0),
                |b| Bounds::new(b[0], b[1], b[2], b[3]),
            );
            controller.apply_bounds(bounds);

            if let Some(column) = sort {
                let direction = if desc {
                    SortDirection::Descending
                } else {
                    SortDirection::Ascending
                };
                controller.sort_visible(&column, direction);
            }

            println!(
                "{:<30} {:<14} {:<24} {:<8}",
                "Location", "Type", "Time Reported", "Status"
            );
            let visible = controller.visible().to_vec();
            for report in &visible {
                let location = controller.display_location(report).await;
                println!(
                    "{:<30} {:<14} {:<24} {:<8}",
                    location,
                    report.report_type,
                    format_time(report.time),
                    report.status
                );
            }
        }
        Command::Show { index } => {
            let report = controller
                .reports()
                .get(index)
                .cloned()
                .ok_or(BoardError::UnknownReport(index))?;
            println!("Type:     {}", report.report_type);
            println!(
                "Location: {}",
                controller.display_location(&report).await
            );
            println!(
                "Reporter: {} ({})",
                report.reporter_name, report.reporter_phone
            );
            println!("Time:     {}", format_time(report.time));
            println!("Status:   {}", report.status);
            if let Some(comment) = &report.comment {
                println!("Comments: {comment}");
            }
            if let Some(image) = &report.image {
                println!("Image:    {image}");
            }
        }
        Command::Toggle { index } => {
            let password = prompt_password();
            let status = controller.toggle_status(index, &password)?;
            println!("Report {index} is now {status}");
        }
        Command::Delete { index } => {
            let password = prompt_password();
            let removed = controller.delete(index, &password)?;
            println!("Deleted {} report", removed.report_type);
        }
    }

    Ok(())
}

fn prompt_password() -> String {
    Password::new()
        .with_prompt("Enter the password")
        .interact()
        .unwrap_or_default()
}
