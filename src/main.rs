mod cli;
mod logging;

use std::process;

use anyhow::Result;
use clap::Parser;
use festo::{Almanac, FestivalInfo, SolarDay};

use crate::cli::{Cli, Command, LunarArgs, NextArgs};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Next(args) => next(args),
        Command::Lunar(args) => lunar(args),
    }
}

fn next(args: NextArgs) -> Result<()> {
    let from = args.from.map(SolarDay::from).unwrap_or_else(festo::today);
    let festival = festo::nearest_festival(&from, args.days)?;
    let info = festival
        .map(|f| f.info(&from))
        .unwrap_or_else(FestivalInfo::none);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }
    match festival {
        Some(f) if info.days == 0 => println!("{} today ({})", f.name(), f.kind().chinese_name()),
        Some(f) => println!(
            "{} in {} days, {} ({})",
            f.name(),
            info.days,
            f.day(),
            f.kind().chinese_name()
        ),
        None => println!("{} (no festival within {} days)", info.name, args.days),
    }
    Ok(())
}

fn lunar(args: LunarArgs) -> Result<()> {
    let day = args.date.map(SolarDay::from).unwrap_or_else(festo::today);
    let almanac = Almanac::shared();
    let lunar = almanac.lunar_day_of(&day)?;

    println!("{day} {lunar}");
    if let Some(term) = almanac.solar_term_of(&day) {
        println!("{}", term.name());
    }
    if let Some(festival) = almanac.festival_on(&day)? {
        println!("{} ({})", festival.name(), festival.kind().chinese_name());
    }
    Ok(())
}
