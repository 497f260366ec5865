use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Chinese calendar and festival lookup.
#[derive(Parser)]
#[command(
    name = "festo",
    version,
    about = "Chinese lunisolar calendar and nearest festival lookup"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Show the nearest upcoming festival or solar term.
    Next(NextArgs),
    /// Show the lunar date and solar term of a day.
    Lunar(LunarArgs),
}

/// Arguments for the `next` subcommand.
#[derive(clap::Args)]
pub struct NextArgs {
    /// Day to search from (YYYY-MM-DD), today if omitted.
    #[arg(short, long)]
    pub from: Option<NaiveDate>,

    /// Number of days to look ahead.
    #[arg(short, long, default_value_t = 60)]
    pub days: u32,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `lunar` subcommand.
#[derive(clap::Args)]
pub struct LunarArgs {
    /// Day to convert (YYYY-MM-DD), today if omitted.
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}
