pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::availability::{CheckArgs, ListArgs, SuggestArgs};
use crate::commands::rates::ResolveArgs;

#[derive(Debug, Parser)]
#[command(
    name = "roomdesk",
    about = "Roomdesk operator CLI",
    long_about = "Operate the Roomdesk inventory database and run availability and rate queries.",
    after_help = concat!(
        "Examples:\n",
        "  roomdesk doctor --json\n",
        "  roomdesk seed\n",
        "  roomdesk availability check aurora-standard 2024-06-03 2024-06-07\n",
        "  roomdesk rates resolve --payload pricing.json --room-type deluxe",
    )
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo hotel fixtures")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and DB connectivity checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(subcommand, about = "Query room availability")]
    Availability(AvailabilityCommand),
    #[command(subcommand, about = "Resolve daily rates from a pricing payload")]
    Rates(RatesCommand),
}

#[derive(Debug, Subcommand)]
enum AvailabilityCommand {
    #[command(about = "Count free rooms of one room type for a stay")]
    Check(StayArgs),
    #[command(about = "List a customer's bookable room types for a stay")]
    List {
        #[arg(help = "Customer (tenant) id")]
        customer_id: String,
        #[arg(help = "Check-in date (YYYY-MM-DD or RFC 3339)")]
        check_in: String,
        #[arg(help = "Check-out date (YYYY-MM-DD or RFC 3339)")]
        check_out: String,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
    #[command(about = "Suggest nearby stays when the preferred one is full")]
    Suggest {
        #[command(flatten)]
        stay: StayArgs,
        #[arg(long, help = "Days to scan on each side of the preferred check-in")]
        days: Option<u32>,
    },
}

#[derive(Debug, Args)]
struct StayArgs {
    #[arg(help = "Room type id")]
    room_type_id: String,
    #[arg(help = "Check-in date (YYYY-MM-DD or RFC 3339)")]
    check_in: String,
    #[arg(help = "Check-out date (YYYY-MM-DD or RFC 3339)")]
    check_out: String,
    #[arg(long, default_value_t = 1)]
    rooms: u32,
}

#[derive(Debug, Subcommand)]
enum RatesCommand {
    #[command(about = "Flatten a pricing payload into daily rate rows")]
    Resolve {
        #[arg(long, help = "Path to the pricing payload JSON")]
        payload: PathBuf,
        #[arg(long, help = "Path to a JSON array of {id, name} room types")]
        room_types: Option<PathBuf>,
        #[arg(long, help = "Room type name filter (case-insensitive)")]
        room_type: Option<String>,
        #[arg(long, help = "Keep only rows for this exact date string")]
        date: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Availability(AvailabilityCommand::Check(stay)) => {
            commands::availability::check(CheckArgs {
                room_type_id: stay.room_type_id,
                check_in: stay.check_in,
                check_out: stay.check_out,
                rooms: stay.rooms,
            })
        }
        Command::Availability(AvailabilityCommand::List {
            customer_id,
            check_in,
            check_out,
            guests,
        }) => commands::availability::list(ListArgs { customer_id, check_in, check_out, guests }),
        Command::Availability(AvailabilityCommand::Suggest { stay, days }) => {
            commands::availability::suggest(SuggestArgs {
                room_type_id: stay.room_type_id,
                check_in: stay.check_in,
                check_out: stay.check_out,
                rooms: stay.rooms,
                days,
            })
        }
        Command::Rates(RatesCommand::Resolve { payload, room_types, room_type, date }) => {
            commands::rates::resolve(ResolveArgs { payload, room_types, room_type, date })
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging() {
    let filter = EnvFilter::try_from_env("ROOMDESK_CLI_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
