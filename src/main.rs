use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use store_atlas::{assign, fixer, geocode, merge};

/// Store Atlas: store-location dataset toolkit.
///
/// Single-run maintenance operations over the store-location CSV datasets.
///
/// Examples:
///   atlas geocode --input store_locations.csv
///   atlas fix-coords
///   atlas add-regions
///   atlas fill-regions --input store_db.csv
///   atlas validate
///   atlas merge
#[derive(Parser)]
#[command(name = "atlas", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Geocode every location row into a coordinates file.
    Geocode {
        /// Locations CSV to read.
        #[arg(long, default_value = "store_locations.csv")]
        input: PathBuf,

        /// Coordinates JSON file to write.
        #[arg(long, default_value = "store_coordinates.json")]
        output: PathBuf,

        /// Pause between geocoding requests, in milliseconds.
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
    },

    /// Interactively repair addresses stuck on fallback coordinates.
    FixCoords {
        /// Coordinates JSON file to repair.
        #[arg(long, default_value = "store_coordinates.json")]
        coordinates: PathBuf,
    },

    /// Append Country and Region columns to the locations list.
    AddRegions {
        #[arg(long, default_value = "store_locations.csv")]
        input: PathBuf,

        #[arg(long, default_value = "store_locations_with_regions.csv")]
        output: PathBuf,
    },

    /// Fill missing region codes in the store database export.
    FillRegions {
        #[arg(long, default_value = "store_db.csv")]
        input: PathBuf,

        #[arg(long, default_value = "store_db_with_regions.csv")]
        output: PathBuf,
    },

    /// Check every row's region code against the classifier.
    Validate {
        #[arg(long, default_value = "store_db.csv")]
        input: PathBuf,
    },

    /// Print the regional distribution report.
    Report {
        #[arg(long, default_value = "store_db.csv")]
        input: PathBuf,
    },

    /// Print the region mapping reference guide.
    Reference,

    /// Merge the store database export into the locations list.
    Merge {
        /// Store database CSV (snake_case headers).
        #[arg(long, default_value = "store_db.csv")]
        stores: PathBuf,

        /// Locations CSV with regions (title-case headers).
        #[arg(long, default_value = "store_locations_with_regions.csv")]
        locations: PathBuf,

        #[arg(long, default_value = "merged_store_locations.csv")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Geocode {
            input,
            output,
            delay_ms,
        } => {
            eprintln!("Geocoding locations from {}...", input.display());
            let summary = or_exit(geocode::geocode_locations(
                input,
                output.clone(),
                Duration::from_millis(delay_ms),
            ));
            eprintln!(
                "Done. {} addresses ({} resolved, {} fallback) written to {}",
                summary.total,
                summary.resolved,
                summary.fallback,
                output.display()
            );
        }

        Command::FixCoords { coordinates } => {
            or_exit(fixer::run_session(&coordinates));
        }

        Command::AddRegions { input, output } => {
            or_exit(assign::add_regions(input, output));
        }

        Command::FillRegions { input, output } => {
            or_exit(assign::fill_regions(input, output));
        }

        Command::Validate { input } => {
            let issues = or_exit(assign::validate(input));
            if issues.is_empty() {
                eprintln!();
                eprintln!("All regions properly assigned.");
            }
        }

        Command::Report { input } => {
            or_exit(assign::report(input));
        }

        Command::Reference => {
            assign::reference();
        }

        Command::Merge {
            stores,
            locations,
            output,
        } => {
            or_exit(merge::merge(stores, locations, output));
        }
    }
}

fn or_exit<T, E: std::fmt::Display>(result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}
