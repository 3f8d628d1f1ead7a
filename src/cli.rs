use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Aggregate sales CSV files into time-series reports", long_about = None)]
pub struct Cli {
    /// Directory holding config.json and chart_history.json
    #[arg(long = "base-dir", global = true, default_value = ".")]
    pub base_dir: PathBuf,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Inspect a CSV file and suggest column roles for a report
    Probe(ProbeArgs),
    /// Store a CSV file in the upload folder and print its token
    Upload(UploadArgs),
    /// Validate a column mapping, aggregate, and write the report files
    Report(ReportArgs),
    /// Review past aggregation runs
    History(HistoryArgs),
    /// List generated report files, newest first
    Reports,
    /// Show or change the storage folders
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CSV file to inspect
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Optional JSON file to write the columns and suggestions to
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Source CSV file to store
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Input CSV file (alternative to --token)
    #[arg(short = 'i', long = "input", conflicts_with = "token")]
    pub input: Option<PathBuf>,
    /// Token of a previously uploaded file
    #[arg(short = 't', long = "token")]
    pub token: Option<String>,
    /// Time basis: date, year_month, year, or month (anything else means date)
    #[arg(long = "time-mode", default_value = "date")]
    pub time_mode: String,
    /// Column holding the product name
    #[arg(long = "product-col", default_value = "")]
    pub product_col: String,
    /// Column holding the row total
    #[arg(long = "total-col", default_value = "")]
    pub total_col: String,
    /// Column holding the quantity (used with --price-col when no total)
    #[arg(long = "quantity-col", default_value = "")]
    pub quantity_col: String,
    /// Column holding the unit price
    #[arg(long = "price-col", default_value = "")]
    pub price_col: String,
    /// Column holding the calendar date (date mode)
    #[arg(long = "date-col", default_value = "")]
    pub date_col: String,
    /// Column holding the year (year and year_month modes)
    #[arg(long = "year-col", default_value = "")]
    pub year_col: String,
    /// Column holding the month (month and year_month modes)
    #[arg(long = "month-col", default_value = "")]
    pub month_col: String,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommands,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Summarize recorded runs, newest first
    List,
    /// Print one recorded run in full
    Show {
        /// Entry id as printed by `history list`
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the current storage folders
    Show,
    /// Normalize, create, and persist new storage folders
    Set {
        /// Folder for uploaded source files
        #[arg(long = "upload-folder")]
        upload_folder: Option<String>,
        /// Folder for generated report files
        #[arg(long = "output-folder")]
        output_folder: Option<String>,
    },
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
