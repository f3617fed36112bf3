pub mod dashboard;
pub mod report;
pub mod sample;
pub mod template;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vendas", about = "Terminal sales performance dashboard for CSV/XLSX sales data.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive dashboard: KPIs, monthly trend chart, records, insights.
    Dashboard {
        /// Sales file (CSV or XLSX). Defaults to the last file opened.
        file: Option<String>,
        /// Explore generated sample data instead of a file.
        #[arg(long)]
        sample: bool,
    },
    /// Print reports to the terminal.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Write the template CSV with the expected column header.
    Template {
        /// Output path (default: vendas_modelo.csv)
        #[arg(long)]
        output: Option<String>,
    },
    /// Generate a deterministic sample sales CSV to explore the dashboard.
    Sample {
        /// Output path (default: vendas_exemplo.csv)
        #[arg(long)]
        output: Option<String>,
        /// Number of sales rows to generate
        #[arg(long, default_value = "500")]
        rows: usize,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Headline KPIs: total revenue, units sold, average unit price.
    Summary {
        /// Sales file (CSV or XLSX)
        file: String,
    },
    /// Revenue per calendar month, chronologically ascending.
    Monthly {
        file: String,
    },
    /// Products at or below the stock threshold.
    Stock {
        file: String,
        /// Stock alert threshold
        #[arg(long, default_value = "5")]
        threshold: i64,
    },
    /// Product with the highest total revenue.
    Top {
        file: String,
    },
    /// Growth/decline analysis, top product, and stock alerts.
    Insights {
        file: String,
        /// Stock alert threshold
        #[arg(long, default_value = "5")]
        threshold: i64,
    },
    /// Full derived table (all columns plus revenue).
    Records {
        file: String,
        /// Only rows whose product or category contains this text
        #[arg(long)]
        search: Option<String>,
    },
}
