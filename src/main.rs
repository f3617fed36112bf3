mod browser;
mod cli;
mod error;
mod fmt;
mod loader;
mod metrics;
mod models;
mod settings;
mod tui;

use clap::Parser;

use cli::{Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Dashboard { file, sample } => cli::dashboard::run(file.as_deref(), sample),
        Commands::Report { command } => match command {
            ReportCommands::Summary { file } => cli::report::summary(&file),
            ReportCommands::Monthly { file } => cli::report::monthly(&file),
            ReportCommands::Stock { file, threshold } => cli::report::stock(&file, threshold),
            ReportCommands::Top { file } => cli::report::top(&file),
            ReportCommands::Insights { file, threshold } => {
                cli::report::insights(&file, threshold)
            }
            ReportCommands::Records { file, search } => {
                cli::report::records(&file, search.as_deref())
            }
        },
        Commands::Template { output } => cli::template::run(output.as_deref()),
        Commands::Sample { output, rows } => cli::sample::run(output.as_deref(), rows),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
