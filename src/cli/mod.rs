pub mod check;

use clap::{Parser, ValueEnum};

use crate::config::{Config, DEFAULT_API_URL, PlatformSelection};
use crate::error::AppError;
use crate::report::{OutputOptions, ReportFormat};

#[derive(Parser)]
#[command(
    name = "subcount",
    version,
    about = "Count your subscriptions on Patreon and Fanbox"
)]
pub struct Cli {
    /// Cookie store API access key
    pub apikey: String,

    /// Cookie store API URL
    #[arg(default_value = DEFAULT_API_URL)]
    pub apiurl: String,

    /// Enable checking Patreon
    #[arg(short, long)]
    pub patreon: bool,

    /// Enable checking Fanbox
    #[arg(short, long)]
    pub fanbox: bool,

    /// Show extra columns (URL)
    #[arg(short = 'x', long)]
    pub extended: bool,

    /// Hide the table header
    #[arg(long)]
    pub no_header: bool,

    /// Column to sort by (name, pledge, url); prepend '-' for descending
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    pub fn into_config(self) -> Result<Config, AppError> {
        let output = OutputOptions {
            format: match self.output {
                OutputFormat::Table => ReportFormat::Table,
                OutputFormat::Json => ReportFormat::Json,
            },
            extended: self.extended,
            no_header: self.no_header,
            sort: self.sort,
        };
        let platforms = PlatformSelection {
            patreon: self.patreon,
            fanbox: self.fanbox,
        };
        Config::new(&self.apiurl, self.apikey, platforms, output)
    }
}
